//! Quadratic Bézier helpers used to place curved paths and to anchor
//! polygons along them.

use crate::model::Vec2;
use super::tolerance::norm2;

/// Distance of a synthesized control point from the chord midpoint.
pub const FALLBACK_CURVE_OFFSET: f32 = 50.0;

/// Control points of a quadratic Bézier curve.
#[derive(Clone, Copy, Debug)]
pub struct QuadBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // Control point
    pub p2: Vec2, // End point
}

impl QuadBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2) -> Self {
        Self { p0, p1, p2 }
    }

    /// Evaluate the curve at parameter t ∈ [0, 1].
    ///
    /// The end parameters return the end points exactly instead of going
    /// through the blend, so `eval(0.0) == p0` and `eval(1.0) == p2` hold
    /// bit for bit.
    pub fn eval(&self, t: f32) -> Vec2 {
        if t == 0.0 {
            return self.p0;
        }
        if t == 1.0 {
            return self.p2;
        }
        let mt = 1.0 - t;
        let a = mt * mt;
        let b = 2.0 * mt * t;
        let c = t * t;
        Vec2 {
            x: a * self.p0.x + b * self.p1.x + c * self.p2.x,
            y: a * self.p0.y + b * self.p1.y + c * self.p2.y,
        }
    }

    /// Derivative at parameter t: 2(1-t)(P1-P0) + 2t(P2-P1).
    pub fn tangent(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        Vec2 {
            x: 2.0 * mt * (self.p1.x - self.p0.x) + 2.0 * t * (self.p2.x - self.p1.x),
            y: 2.0 * mt * (self.p1.y - self.p0.y) + 2.0 * t * (self.p2.y - self.p1.y),
        }
    }
}

/// Control point for a curve with no usable graph point: the chord midpoint
/// pushed `offset` units along the left normal. A zero-length chord uses
/// +y as its normal so the offset is still applied.
pub fn perpendicular_control(a: Vec2, b: Vec2, offset: f32) -> Vec2 {
    let mid = Vec2 { x: 0.5 * (a.x + b.x), y: 0.5 * (a.y + b.y) };
    let ((ux, uy), len) = norm2(b.x - a.x, b.y - a.y);
    let (nx, ny) = if len > 0.0 { (-uy, ux) } else { (0.0, 1.0) };
    Vec2 { x: mid.x + nx * offset, y: mid.y + ny * offset }
}
