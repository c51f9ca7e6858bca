use compform_wasm::Composer;
use js_sys::{Float32Array, Reflect, Uint32Array, Uint8Array};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(v: serde_json::Value) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap()
}

fn field(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

fn quad(composition: &str) -> JsValue {
    js(json!({
        "points": [
            {"x": 0.0, "y": 0.0}, {"x": 100.0, "y": 0.0},
            {"x": 100.0, "y": 100.0}, {"x": 0.0, "y": 100.0}
        ],
        "lines": [
            {"start": 0, "end": 1}, {"start": 1, "end": 2},
            {"start": 2, "end": 3}, {"start": 3, "end": 0}
        ],
        "lineComposition": composition,
        "lineType": "straight",
        "numberOfLines": 4,
        "shapes": [{"name": "dots", "subShape": "Hexagon", "amount": 5}]
    }))
}

#[derive(Deserialize)]
struct Stats {
    selected: u32,
    straight: u32,
    curved: u32,
    polygons_requested: u32,
    polygons_placed: u32,
}

#[wasm_bindgen_test]
fn points_and_connectivity() {
    let mut c = Composer::new(3);
    assert!(c.load_config(quad("Sequential")));
    assert_eq!(c.point_count(), 4);
    assert_eq!(c.edge_count(), 4);
    assert!(c.can_connect(0, 1));
    assert!(!c.can_connect(0, 2));
    assert_eq!(c.valid_connections_for(0), vec![1, 3]);

    let pd = c.get_points();
    let ids = Uint32Array::new(&field(&pd, "ids"));
    let pos = Float32Array::new(&field(&pd, "positions"));
    assert_eq!(ids.length(), 4);
    assert_eq!(pos.to_vec(), vec![0.0, 0.0, 100.0, 0.0, 100.0, 100.0, 0.0, 100.0]);
}

#[wasm_bindgen_test]
fn generate_exposes_typed_arrays() {
    let mut c = Composer::new(3);
    assert!(c.load_config(quad("Sequential")));
    let stats: Stats = serde_wasm_bindgen::from_value(c.generate()).unwrap();
    assert_eq!(stats.selected, 4);
    assert_eq!(stats.straight, 4);
    assert_eq!(stats.curved, 0);
    assert_eq!(stats.polygons_requested, 5);
    assert_eq!(stats.polygons_placed, 5);

    let sp = c.get_selected_paths();
    assert_eq!(Uint32Array::new(&field(&sp, "edges")).length(), 4);
    assert_eq!(Uint32Array::new(&field(&sp, "endpoints")).length(), 8);
    assert_eq!(Uint8Array::new(&field(&sp, "kinds")).to_vec(), vec![0, 0, 0, 0]);
    let pos = Float32Array::new(&field(&sp, "positions")).to_vec();
    let orig = Float32Array::new(&field(&sp, "original")).to_vec();
    assert_eq!(pos.len(), 24);
    // missArea defaults to zero
    assert_eq!(pos, orig);

    let pg = c.get_polygons();
    let offsets = Uint32Array::new(&field(&pg, "offsets")).to_vec();
    assert_eq!(offsets, vec![0, 6, 12, 18, 24, 30]);
    assert_eq!(Float32Array::new(&field(&pg, "positions")).length(), 60);
    assert_eq!(Float32Array::new(&field(&pg, "rotations")).length(), 5);

    let d: Vec<String> = serde_wasm_bindgen::from_value(c.to_svg_paths()).unwrap();
    assert_eq!(d.len(), 9);
    assert!(d[0].starts_with("M "));
}

#[wasm_bindgen_test]
fn clear_and_reseed() {
    let mut a = Composer::new(42);
    let mut b = Composer::new(7);
    assert!(a.load_config(quad("Branched")));
    assert!(b.load_config(quad("Branched")));
    b.reseed(42);
    a.generate();
    b.generate();
    let da: Vec<String> = serde_wasm_bindgen::from_value(a.to_svg_paths()).unwrap();
    let db: Vec<String> = serde_wasm_bindgen::from_value(b.to_svg_paths()).unwrap();
    assert_eq!(da, db);

    a.clear();
    let sp = a.get_selected_paths();
    assert_eq!(Uint32Array::new(&field(&sp, "edges")).length(), 0);
    let straight: Vec<serde_json::Value> = serde_wasm_bindgen::from_value(a.get_paths_of_kind(0)).unwrap();
    assert!(straight.is_empty());
}
