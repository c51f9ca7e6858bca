use crate::interop::{arr_f32, arr_u32, arr_u8, arr_xy, obj_of};
use crate::{error, Composer};
use compform::config::Config;
use compform::model::{PathKind, PlacedSegment, Vec2};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn kind_from_u8(kind: u8) -> Option<PathKind> {
    match kind {
        0 => Some(PathKind::Straight),
        1 => Some(PathKind::Curved),
        _ => None,
    }
}

fn kind_to_u8(kind: PathKind) -> u8 {
    match kind {
        PathKind::Straight => 0,
        PathKind::Curved => 1,
    }
}

fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    Vec2 { x: 0.5 * (a.x + b.x), y: 0.5 * (a.y + b.y) }
}

fn parse_config(v: JsValue) -> Result<Config, JsValue> {
    let val = serde_wasm_bindgen::from_value::<serde_json::Value>(v)
        .map_err(|e| error::err("parse", format!("invalid configuration value: {}", e), None))?;
    Config::from_json_value(val).map_err(|e| error::config_error(&e))
}

#[wasm_bindgen]
impl Composer {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Composer {
        crate::Composer::rs_new(seed)
    }

    // Configuration
    pub fn load_config(&mut self, v: JsValue) -> bool {
        match parse_config(v) {
            Ok(cfg) => {
                self.inner.set_config(cfg);
                true
            }
            Err(_) => {
                web_sys::console::warn_1(&JsValue::from_str("compform: configuration rejected"));
                false
            }
        }
    }
    pub fn load_config_res(&mut self, v: JsValue) -> JsValue {
        match parse_config(v) {
            Ok(cfg) => {
                self.inner.set_config(cfg);
                error::ok(JsValue::from_f64(self.inner.model().edge_count() as f64))
            }
            Err(e) => e,
        }
    }
    pub fn load_config_str_res(&mut self, s: &str) -> JsValue {
        match Config::from_json_str(s) {
            Ok(cfg) => {
                self.inner.set_config(cfg);
                error::ok(JsValue::from_f64(self.inner.model().edge_count() as f64))
            }
            Err(e) => error::config_error(&e),
        }
    }
    pub fn get_config(&self) -> JsValue {
        to_js(&self.inner.config().to_json_value())
    }
    pub fn reseed(&mut self, seed: u32) {
        self.inner.reseed(seed as u64);
    }

    // Connectivity
    pub fn point_count(&self) -> u32 {
        self.rs_point_count()
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.model().edge_count()
    }
    pub fn dropped_edge_count(&self) -> u32 {
        self.inner.model().dropped_edge_count()
    }
    pub fn can_connect(&self, a: u32, b: u32) -> bool {
        self.inner.model().can_connect(a, b)
    }
    pub fn valid_connections_for(&self, index: u32) -> Vec<u32> {
        self.inner.model().valid_connections_for(index).iter().map(|p| p.index).collect()
    }

    // Passes
    pub fn generate(&mut self) -> JsValue {
        let stats = self.inner.generate();
        to_js(&stats)
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }
    pub fn last_stats(&self) -> JsValue {
        to_js(&self.inner.last_stats())
    }

    // Typed arrays getters
    pub fn get_points(&self) -> JsValue {
        let pts = self.inner.points();
        let ids: Vec<u32> = pts.iter().map(|p| p.index).collect();
        let canonical: Vec<u32> = pts.iter().map(|p| p.canonical).collect();
        obj_of(&[
            ("ids", arr_u32(&ids)),
            ("canonical", arr_u32(&canonical)),
            ("positions", arr_xy(pts.iter().map(|p| p.pos()))),
        ])
    }

    /// Straight then curved segments. `positions` and `original` hold
    /// `[p1, cp, p2]` per segment; straight segments carry their chord
    /// midpoint as `cp`.
    pub fn get_selected_paths(&self) -> JsValue {
        let paths = self.inner.selected_paths();
        let n = paths.len();
        let mut edges = Vec::with_capacity(n);
        let mut endpoints = Vec::with_capacity(n * 2);
        let mut kinds = Vec::with_capacity(n);
        let mut widths = Vec::with_capacity(n);
        let mut drawn = Vec::with_capacity(n * 3);
        let mut original = Vec::with_capacity(n * 3);
        for seg in paths.iter() {
            let (a, b) = seg.endpoints();
            edges.push(seg.edge());
            endpoints.extend([a, b]);
            widths.push(seg.line_width());
            kinds.push(kind_to_u8(seg.kind()));
            match seg {
                PlacedSegment::Straight { p1, p2, orig_p1, orig_p2, .. } => {
                    drawn.extend([*p1, midpoint(*p1, *p2), *p2]);
                    original.extend([*orig_p1, midpoint(*orig_p1, *orig_p2), *orig_p2]);
                }
                PlacedSegment::Curved { p1, cp, p2, orig_p1, orig_cp, orig_p2, .. } => {
                    drawn.extend([*p1, *cp, *p2]);
                    original.extend([*orig_p1, *orig_cp, *orig_p2]);
                }
            }
        }
        obj_of(&[
            ("edges", arr_u32(&edges)),
            ("endpoints", arr_u32(&endpoints)),
            ("kinds", arr_u8(&kinds)),
            ("widths", arr_f32(&widths)),
            ("positions", arr_xy(drawn)),
            ("original", arr_xy(original)),
        ])
    }

    /// Segments of one kind (0 straight, 1 curved) as plain objects; null on
    /// an unknown kind.
    pub fn get_paths_of_kind(&self, kind: u8) -> JsValue {
        match kind_from_u8(kind) {
            Some(k) => to_js(self.inner.paths_of_kind(k)),
            None => JsValue::NULL,
        }
    }
    pub fn get_paths_of_kind_res(&self, kind: u8) -> JsValue {
        match kind_from_u8(kind) {
            Some(k) => error::ok(to_js(self.inner.paths_of_kind(k))),
            None => {
                let d = obj_of(&[("got", JsValue::from_f64(kind as f64))]);
                error::err("invalid_kind", "kind must be 0:Straight, 1:Curved", Some(d))
            }
        }
    }

    /// Polygon `i` owns vertices `offsets[i]..offsets[i + 1]` of `positions`.
    pub fn get_polygons(&self) -> JsValue {
        let polys = self.inner.polygons();
        let mut offsets = Vec::with_capacity(polys.len() + 1);
        offsets.push(0u32);
        for p in polys {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + p.vertices.len() as u32);
        }
        let rotations: Vec<f32> = polys.iter().map(|p| p.rotation).collect();
        let shapes: Vec<&str> = polys.iter().map(|p| p.shape.as_str()).collect();
        obj_of(&[
            ("offsets", arr_u32(&offsets)),
            ("positions", arr_xy(polys.iter().flat_map(|p| p.vertices.iter().copied()))),
            ("bases", arr_xy(polys.iter().map(|p| p.base))),
            ("rotations", arr_f32(&rotations)),
            ("shapes", to_js(&shapes)),
        ])
    }

    // SVG
    pub fn to_svg_paths(&self) -> JsValue {
        to_js(&self.inner.to_svg_paths())
    }
    pub fn to_svg_paths_res(&self) -> JsValue {
        error::ok(self.to_svg_paths())
    }
}
