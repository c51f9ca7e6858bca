// Centralized tolerances and helpers for point matching and geometry

pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold

// Coordinate matching for restated line endpoints (strict less-than)
pub const MATCH_TOL: f32 = 0.1;

// Quantization grid for canonical point identity (0.1 px)
pub const QUANT_SCALE: f32 = 10.0;        // 1.0 / 0.1

#[inline]
pub fn within_match_tol(ax: f32, ay: f32, bx: f32, by: f32) -> bool {
    (ax - bx).abs() < MATCH_TOL && (ay - by).abs() < MATCH_TOL
}

#[inline]
pub fn quantize(x: f32, y: f32) -> (i32, i32) {
    ((x * QUANT_SCALE).round() as i32, (y * QUANT_SCALE).round() as i32)
}

#[inline]
pub fn norm2(mut x: f32, mut y: f32) -> ((f32,f32), f32) {
    let len = (x*x + y*y).sqrt();
    if len > EPS_LEN { x/=len; y/=len; ((x,y), len) } else { ((0.0,0.0), 0.0) }
}
