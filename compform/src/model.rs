use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
    #[inline]
    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x - o.x, y: self.y - o.y }
    }
    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// A parsed configuration point. `index` is its position in the configured
/// point list; `canonical` is the index of the first point sharing its
/// quantization cell and is what selection compares.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub index: u32,
    pub canonical: u32,
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }
}

/// One end of a configured line: a bare point index or a coordinate that is
/// matched against the point list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointRef {
    Index(u32),
    Coord { x: f32, y: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineDecl {
    pub start: EndpointRef,
    pub end: EndpointRef,
}

/// Declared edge resolved against the point table (point indices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Position of the edge in the configured `lines` list.
    pub id: u32,
    pub a: u32,
    pub b: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathKind {
    Straight,
    Curved,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlacedSegment {
    Straight {
        edge: u32,
        a: u32,
        b: u32,
        p1: Vec2,
        p2: Vec2,
        orig_p1: Vec2,
        orig_p2: Vec2,
        line_width: f32,
    },
    Curved {
        edge: u32,
        a: u32,
        b: u32,
        p1: Vec2,
        cp: Vec2,
        p2: Vec2,
        orig_p1: Vec2,
        orig_p2: Vec2,
        orig_cp: Vec2,
        line_width: f32,
    },
}

impl PlacedSegment {
    pub fn kind(&self) -> PathKind {
        match self {
            PlacedSegment::Straight { .. } => PathKind::Straight,
            PlacedSegment::Curved { .. } => PathKind::Curved,
        }
    }
    pub fn edge(&self) -> u32 {
        match self {
            PlacedSegment::Straight { edge, .. } | PlacedSegment::Curved { edge, .. } => *edge,
        }
    }
    /// Point indices of the two graph endpoints.
    pub fn endpoints(&self) -> (u32, u32) {
        match self {
            PlacedSegment::Straight { a, b, .. } | PlacedSegment::Curved { a, b, .. } => (*a, *b),
        }
    }
    /// Drawn (jittered) endpoints.
    pub fn drawn_ends(&self) -> (Vec2, Vec2) {
        match self {
            PlacedSegment::Straight { p1, p2, .. } | PlacedSegment::Curved { p1, p2, .. } => {
                (*p1, *p2)
            }
        }
    }
    pub fn orig_ends(&self) -> (Vec2, Vec2) {
        match self {
            PlacedSegment::Straight { orig_p1, orig_p2, .. }
            | PlacedSegment::Curved { orig_p1, orig_p2, .. } => (*orig_p1, *orig_p2),
        }
    }
    pub fn line_width(&self) -> f32 {
        match self {
            PlacedSegment::Straight { line_width, .. }
            | PlacedSegment::Curved { line_width, .. } => *line_width,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Name of the sub-shape configuration that produced this polygon.
    pub shape: String,
    pub base: Vec2,
    pub rotation: f32,
    /// Closed outline; the last vertex connects back to the first.
    pub vertices: Vec<Vec2>,
}

/// Counters for one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    pub selected: u32,
    pub straight: u32,
    pub curved: u32,
    pub polygons_requested: u32,
    pub polygons_placed: u32,
    pub polygons_skipped: u32,
}
