use crate::interop::{new_obj, obj_of, set_kv};
use compform::config::ConfigError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    obj_of(&[("ok", JsValue::from_bool(true)), ("value", v)])
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    obj_of(&[("ok", JsValue::from_bool(false)), ("error", e.into())])
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = obj_of(&[("param", JsValue::from_str(param))]);
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d))
}

#[inline]
pub fn out_of_range(param: &str, min: f32, max: f32, got: f32) -> JsValue {
    let d = obj_of(&[
        ("param", JsValue::from_str(param)),
        ("min", JsValue::from_f64(min as f64)),
        ("max", JsValue::from_f64(max as f64)),
        ("got", JsValue::from_f64(got as f64)),
    ]);
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d))
}

/// Envelope for a rejected configuration; `code` matches `ConfigError::code`.
pub fn config_error(e: &ConfigError) -> JsValue {
    match e {
        ConfigError::NonFinite { param } => non_finite(param),
        ConfigError::OutOfRange { param, min, max, got } => out_of_range(param, *min, *max, *got),
        ConfigError::TooLarge { what, max, got } => {
            let d = obj_of(&[
                ("what", JsValue::from_str(what)),
                ("max", JsValue::from_f64(*max as f64)),
                ("got", JsValue::from_f64(*got as f64)),
            ]);
            err(e.code(), e.to_string(), Some(d))
        }
        ConfigError::InvertedRange { param, min, max } => {
            let d = obj_of(&[
                ("param", JsValue::from_str(param)),
                ("min", JsValue::from_f64(*min as f64)),
                ("max", JsValue::from_f64(*max as f64)),
            ]);
            err(e.code(), e.to_string(), Some(d))
        }
        ConfigError::Parse(_) => err(e.code(), e.to_string(), None),
    }
}
