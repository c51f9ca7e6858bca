use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Composer { pub(crate) inner: compform::Composer }

impl Composer {
    pub fn rs_new(seed: u32) -> Composer {
        Composer { inner: compform::Composer::new(compform::config::Config::default(), seed as u64) }
    }
    pub fn rs_point_count(&self) -> u32 { self.inner.model().point_count() }
}
