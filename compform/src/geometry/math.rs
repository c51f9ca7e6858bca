use super::tolerance::norm2;
use crate::model::Vec2;
use crate::sampling::Sampler;
use std::f32::consts::TAU;

#[inline]
pub fn offset_polar(p: Vec2, angle: f32, dist: f32) -> Vec2 {
    Vec2 { x: p.x + angle.cos() * dist, y: p.y + angle.sin() * dist }
}

/// Jitter `p` by a random offset inside a disc of `radius`. A non-positive
/// radius returns `p` untouched and draws nothing from the sampler.
pub fn offset_position<S: Sampler>(p: Vec2, radius: f32, sampler: &mut S) -> Vec2 {
    if radius.is_nan() || radius <= 0.0 {
        return p;
    }
    let angle = sampler.range(0.0, TAU);
    let dist = sampler.range(0.0, radius);
    offset_polar(p, angle, dist)
}

/// Heading of a direction vector, or None for a zero-length one.
pub fn direction_angle(d: Vec2) -> Option<f32> {
    let (_, len) = norm2(d.x, d.y);
    if len > 0.0 {
        Some(d.y.atan2(d.x))
    } else {
        None
    }
}

/// Vertices of a roughened regular polygon. Vertex `i` sits at angle
/// `rotation + i * TAU / sides` and radius `size + radius_jitter()`, floored
/// at zero. The outline is closed implicitly.
pub fn polygon_vertices<F: FnMut() -> f32>(
    base: Vec2,
    sides: u32,
    rotation: f32,
    size: f32,
    mut radius_jitter: F,
) -> Vec<Vec2> {
    let step = TAU / sides.max(1) as f32;
    (0..sides)
        .map(|i| {
            let r = (size + radius_jitter()).max(0.0);
            offset_polar(base, rotation + step * i as f32, r)
        })
        .collect()
}
