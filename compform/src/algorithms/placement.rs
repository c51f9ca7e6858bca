//! Turns selected lines into drawable segments and distributes polygons on
//! them.

use crate::config::{Connection, LineType, Range, RotationType, ShapeConfig};
use crate::connectivity::ConnectivityModel;
use crate::geometry::limits;
use crate::geometry::math::{direction_angle, offset_position, polygon_vertices};
use crate::geometry::quad::{perpendicular_control, QuadBezier, FALLBACK_CURVE_OFFSET};
use crate::model::{Edge, PathKind, PlacedSegment, Point, Polygon, Vec2};
use crate::sampling::Sampler;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Mid-path parameters stay clear of the path ends.
const T_MIN: f32 = 0.1;
const T_MAX: f32 = 0.9;
// Noise input advance between consecutive mid-path placements.
const NOISE_STEP: f32 = 0.31;
const NOISE_ORIGIN_MAX: f32 = 1_000.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedPaths {
    pub straight: Vec<PlacedSegment>,
    pub curved: Vec<PlacedSegment>,
}

impl SelectedPaths {
    pub fn len(&self) -> usize {
        self.straight.len() + self.curved.len()
    }
    pub fn is_empty(&self) -> bool {
        self.straight.is_empty() && self.curved.is_empty()
    }
    pub fn of_kind(&self, kind: PathKind) -> &[PlacedSegment] {
        match kind {
            PathKind::Straight => &self.straight,
            PathKind::Curved => &self.curved,
        }
    }
    pub fn iter(&self) -> impl Iterator<Item = &PlacedSegment> {
        self.straight.iter().chain(self.curved.iter())
    }
}

/// Graph points that already carry an endpoint-anchored polygon in the
/// current pass, by canonical id.
#[derive(Clone, Debug, Default)]
pub struct UsedEndpoints {
    ids: HashSet<u32>,
}

impl UsedEndpoints {
    pub fn clear(&mut self) {
        self.ids.clear();
    }
    /// Marks `id` used; false if it already was.
    pub fn claim(&mut self, id: u32) -> bool {
        self.ids.insert(id)
    }
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }
    pub fn len(&self) -> usize {
        self.ids.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Where a polygon goes and which way the path runs there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub base: Vec2,
    pub direction: Option<Vec2>,
}

fn choose_kind<S: Sampler>(line_type: LineType, sampler: &mut S) -> PathKind {
    match line_type {
        LineType::Straight => PathKind::Straight,
        LineType::Curved => PathKind::Curved,
        LineType::Both => {
            if sampler.coin(0.5) {
                PathKind::Curved
            } else {
                PathKind::Straight
            }
        }
    }
}

fn control_point<S: Sampler>(model: &ConnectivityModel, e: &Edge, a: Vec2, b: Vec2, sampler: &mut S) -> Vec2 {
    let ca = model.canonical(e.a);
    let cb = model.canonical(e.b);
    let others: Vec<&Point> = model
        .points()
        .iter()
        .filter(|p| p.canonical != ca && p.canonical != cb)
        .collect();
    match sampler.choose(&others) {
        Some(p) => p.pos(),
        None => perpendicular_control(a, b, FALLBACK_CURVE_OFFSET),
    }
}

/// Build one drawable segment per selected line.
pub fn place_paths<S: Sampler>(
    model: &ConnectivityModel,
    edges: &[Edge],
    line_type: LineType,
    line_width: Range,
    miss_area: f32,
    sampler: &mut S,
) -> SelectedPaths {
    let mut out = SelectedPaths::default();
    for e in edges {
        let (orig_p1, orig_p2) = match (model.point(e.a), model.point(e.b)) {
            (Some(a), Some(b)) => (a.pos(), b.pos()),
            _ => continue,
        };
        let kind = choose_kind(line_type, sampler);
        let width = line_width.draw(sampler);
        match kind {
            PathKind::Straight => {
                let p1 = offset_position(orig_p1, miss_area, sampler);
                let p2 = offset_position(orig_p2, miss_area, sampler);
                out.straight.push(PlacedSegment::Straight {
                    edge: e.id,
                    a: e.a,
                    b: e.b,
                    p1,
                    p2,
                    orig_p1,
                    orig_p2,
                    line_width: width,
                });
            }
            PathKind::Curved => {
                let orig_cp = control_point(model, e, orig_p1, orig_p2, sampler);
                let p1 = offset_position(orig_p1, miss_area, sampler);
                let cp = offset_position(orig_cp, miss_area, sampler);
                let p2 = offset_position(orig_p2, miss_area, sampler);
                out.curved.push(PlacedSegment::Curved {
                    edge: e.id,
                    a: e.a,
                    b: e.b,
                    p1,
                    cp,
                    p2,
                    orig_p1,
                    orig_p2,
                    orig_cp,
                    line_width: width,
                });
            }
        }
    }
    out
}

/// Position and direction at parameter `t` of a drawn segment.
pub fn point_at(seg: &PlacedSegment, t: f32) -> (Vec2, Vec2) {
    match seg {
        PlacedSegment::Straight { p1, p2, .. } => {
            let d = p2.sub(*p1);
            let pos = if t == 0.0 {
                *p1
            } else if t == 1.0 {
                *p2
            } else {
                Vec2 { x: p1.x + d.x * t, y: p1.y + d.y * t }
            };
            (pos, d)
        }
        PlacedSegment::Curved { p1, cp, p2, .. } => {
            let q = QuadBezier::new(*p1, *cp, *p2);
            (q.eval(t), q.tangent(t))
        }
    }
}

/// Anchor on an unused endpoint of a random path, trying the start first.
pub fn anchor_at_end<S: Sampler>(
    paths: &[PlacedSegment],
    model: &ConnectivityModel,
    used: &mut UsedEndpoints,
    sampler: &mut S,
) -> Option<Anchor> {
    let seg = sampler.choose(paths)?;
    let (a, b) = seg.endpoints();
    for (id, t) in [(model.canonical(a), 0.0), (model.canonical(b), 1.0)] {
        if used.claim(id) {
            let (base, dir) = point_at(seg, t);
            return Some(Anchor { base, direction: Some(dir) });
        }
    }
    None
}

/// Anchor inside a random path at a noise-driven parameter in [0.1, 0.9].
pub fn anchor_mid_path<S: Sampler>(
    paths: &[PlacedSegment],
    noise_at: &mut f32,
    sampler: &mut S,
) -> Option<Anchor> {
    let seg = sampler.choose(paths)?;
    let n = sampler.noise(*noise_at);
    *noise_at += NOISE_STEP;
    let t = T_MIN + (T_MAX - T_MIN) * n;
    let (base, dir) = point_at(seg, t);
    Some(Anchor { base, direction: Some(dir) })
}

/// Per-pass placement state: the endpoint-usage set and the noise cursor.
#[derive(Clone, Debug, Default)]
pub struct Placer {
    used: UsedEndpoints,
    noise_at: f32,
}

impl Placer {
    pub fn begin_pass<S: Sampler>(&mut self, sampler: &mut S) {
        self.used.clear();
        self.noise_at = sampler.range(0.0, NOISE_ORIGIN_MAX);
    }

    pub fn used(&self) -> &UsedEndpoints {
        &self.used
    }

    fn anchor<S: Sampler>(
        &mut self,
        shape: &ShapeConfig,
        paths: &SelectedPaths,
        model: &ConnectivityModel,
        sampler: &mut S,
    ) -> Option<Anchor> {
        let kinds: Vec<PathKind> = [PathKind::Straight, PathKind::Curved]
            .into_iter()
            .filter(|k| !paths.of_kind(*k).is_empty())
            .collect();
        let kind = *sampler.choose(&kinds)?;
        let of_kind = paths.of_kind(kind);
        match shape.connection {
            Connection::AtEnd => anchor_at_end(of_kind, model, &mut self.used, sampler),
            Connection::Along => anchor_mid_path(of_kind, &mut self.noise_at, sampler),
        }
    }

    /// Place the requested number of polygons for one sub-shape. Returns
    /// (requested, placed); instances without an anchor are skipped.
    pub fn place_polygons<S: Sampler>(
        &mut self,
        shape: &ShapeConfig,
        paths: &SelectedPaths,
        model: &ConnectivityModel,
        sampler: &mut S,
        out: &mut Vec<Polygon>,
    ) -> (u32, u32) {
        let requested = shape.amount.draw_count(sampler).min(limits::MAX_POLYGONS_PER_SHAPE);
        let sides = shape.side_count();
        let mut placed = 0u32;
        for _ in 0..requested {
            let anchor = match self.anchor(shape, paths, model, sampler) {
                Some(a) => a,
                None => continue,
            };
            let tangent = match shape.rotation_type {
                RotationType::Absolute => anchor.direction.and_then(direction_angle),
                RotationType::Relative => None,
            };
            let rotation = match tangent {
                Some(r) => r,
                None => shape.angle.draw(sampler).to_radians(),
            };
            let size = shape.size.draw(sampler);
            let distort = shape.distort;
            let vertices = polygon_vertices(anchor.base, sides, rotation, size, || distort.draw(sampler));
            out.push(Polygon { shape: shape.name.clone(), base: anchor.base, rotation, vertices });
            placed += 1;
        }
        if placed < requested {
            debug!("shape '{}': placed {} of {} polygons", shape.name, placed, requested);
        }
        (requested, placed)
    }
}
