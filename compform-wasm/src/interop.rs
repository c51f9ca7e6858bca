use compform::model::Vec2;
use js_sys::{Float32Array, Object, Reflect, Uint32Array, Uint8Array};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object {
    Object::new()
}

pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

/// Plain object from `(key, value)` pairs, in order.
pub fn obj_of(fields: &[(&str, JsValue)]) -> JsValue {
    let obj = new_obj();
    for (k, v) in fields {
        set_kv(&obj, k, v);
    }
    obj.into()
}

pub fn arr_u32(slice: &[u32]) -> JsValue {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice);
    arr.into()
}

pub fn arr_f32(slice: &[f32]) -> JsValue {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice);
    arr.into()
}

pub fn arr_u8(slice: &[u8]) -> JsValue {
    let arr = Uint8Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice);
    arr.into()
}

/// Interleaved `[x0, y0, x1, y1, ..]` coordinates.
pub fn arr_xy<I: IntoIterator<Item = Vec2>>(points: I) -> JsValue {
    let flat: Vec<f32> = points.into_iter().flat_map(|p| [p.x, p.y]).collect();
    arr_f32(&flat)
}
