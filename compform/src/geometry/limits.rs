// Centralized ingestion limits to harden against untrusted configuration JSON

// Scene size caps
pub const MAX_POINTS: usize = 100_000;
pub const MAX_LINES: usize = 200_000;
pub const MAX_SHAPES: usize = 64;

// Per-shape caps
pub const MAX_POLYGONS_PER_SHAPE: u32 = 10_000;
pub const MIN_POLYGON_SIDES: u32 = 3;
pub const MAX_POLYGON_SIDES: u32 = 64;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const WIDTH_MAX: f32 = 10_000.0;
pub const MISS_AREA_MAX: f32 = 100_000.0;
pub const ANGLE_MAX_DEG: f32 = 36_000.0;   // +-100 turns

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_width_bounds(w: f32) -> bool { w.is_finite() && w > 0.0 && w <= WIDTH_MAX }

#[inline]
pub fn clamp_sides(n: u32) -> u32 { n.clamp(MIN_POLYGON_SIDES, MAX_POLYGON_SIDES) }
