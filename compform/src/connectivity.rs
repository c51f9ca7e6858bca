//! Adjacency over the configured points and declared lines.
//!
//! Built once per configuration. Lines whose ends cannot be matched to a
//! known point are dropped, never reported as errors. Matched lines always
//! enter the adjacency; lines whose ends share one canonical id stay out of
//! selection only.

use crate::geometry::tolerance::{quantize, within_match_tol};
use crate::model::{Edge, EndpointRef, LineDecl, Point, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How coordinate endpoint references are matched to configured points.
/// Index references bypass matching under either strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Bitwise coordinate equality.
    Exact,
    /// Both coordinates within `MATCH_TOL`; first configured match wins.
    #[default]
    Tolerance,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectivityModel {
    points: Vec<Point>,
    edges: Vec<Edge>,          // accepted lines, endpoints are point indices
    adjacency: Vec<Vec<u32>>,  // point index -> sorted neighbor indices
    dropped: u32,
    strategy: MatchStrategy,
}

impl ConnectivityModel {
    pub fn build(coords: &[Vec2], lines: &[LineDecl], strategy: MatchStrategy) -> Self {
        let mut cells: HashMap<(i32, i32), u32> = HashMap::with_capacity(coords.len());
        let points: Vec<Point> = coords
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let index = i as u32;
                let canonical = *cells.entry(quantize(c.x, c.y)).or_insert(index);
                Point { index, canonical, x: c.x, y: c.y }
            })
            .collect();

        let mut model = ConnectivityModel {
            adjacency: vec![Vec::new(); points.len()],
            points,
            edges: Vec::with_capacity(lines.len()),
            dropped: 0,
            strategy,
        };

        for (id, line) in lines.iter().enumerate() {
            let a = model.resolve(&line.start);
            let b = model.resolve(&line.end);
            let (a, b) = match (a, b) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    debug!("line {} dropped: endpoint does not match a known point", id);
                    model.dropped += 1;
                    continue;
                }
            };
            if model.points[a as usize].canonical == model.points[b as usize].canonical {
                debug!("line {} kept but not selectable: ends share point {}", id, model.points[a as usize].canonical);
            }
            model.edges.push(Edge { id: id as u32, a, b });
            model.adjacency[a as usize].push(b);
            model.adjacency[b as usize].push(a);
        }
        for n in model.adjacency.iter_mut() {
            n.sort_unstable();
            n.dedup();
        }
        debug!(
            "connectivity built: {} points, {} lines accepted, {} dropped ({:?})",
            model.points.len(),
            model.edges.len(),
            model.dropped,
            strategy
        );
        model
    }

    /// Point index for an endpoint reference under this model's strategy.
    pub fn resolve(&self, r: &EndpointRef) -> Option<u32> {
        match *r {
            EndpointRef::Index(i) => {
                if (i as usize) < self.points.len() {
                    Some(i)
                } else {
                    None
                }
            }
            EndpointRef::Coord { x, y } => {
                let hit = match self.strategy {
                    MatchStrategy::Exact => self.points.iter().find(|p| p.x == x && p.y == y),
                    MatchStrategy::Tolerance => {
                        self.points.iter().find(|p| within_match_tol(p.x, p.y, x, y))
                    }
                };
                hit.map(|p| p.index)
            }
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    pub fn point(&self, index: u32) -> Option<&Point> {
        self.points.get(index as usize)
    }
    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }
    pub fn accepted_edges(&self) -> &[Edge] {
        &self.edges
    }
    pub fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }
    pub fn dropped_edge_count(&self) -> u32 {
        self.dropped
    }

    /// Accepted lines whose ends are distinct canonical points; the only
    /// lines a selection may draw.
    pub fn selectable_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| self.canonical(e.a) != self.canonical(e.b))
    }
    pub fn selectable_edge_count(&self) -> u32 {
        self.selectable_edges().count() as u32
    }

    /// Canonical id of a point; unknown indices map to themselves.
    #[inline]
    pub fn canonical(&self, index: u32) -> u32 {
        self.points.get(index as usize).map_or(index, |p| p.canonical)
    }

    pub fn valid_connections_for(&self, index: u32) -> Vec<Point> {
        match self.adjacency.get(index as usize) {
            Some(ns) => ns.iter().filter_map(|&n| self.point(n).copied()).collect(),
            None => Vec::new(),
        }
    }

    pub fn can_connect(&self, a: u32, b: u32) -> bool {
        if self.point(a).is_none() || self.point(b).is_none() {
            return false;
        }
        self.adjacency[a as usize].binary_search(&b).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }
    fn c(x: f32, y: f32) -> EndpointRef {
        EndpointRef::Coord { x, y }
    }
    fn line(a: EndpointRef, b: EndpointRef) -> LineDecl {
        LineDecl { start: a, end: b }
    }

    #[test]
    fn square_adjacency_is_symmetric() {
        let pts = [v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)];
        let lines = [
            line(c(0.0, 0.0), c(10.0, 0.0)),
            line(c(10.0, 0.0), c(10.0, 10.0)),
            line(c(10.0, 10.0), c(0.0, 10.0)),
            line(c(0.0, 10.0), c(0.0, 0.0)),
        ];
        let m = ConnectivityModel::build(&pts, &lines, MatchStrategy::Exact);
        assert_eq!(m.edge_count(), 4);
        assert_eq!(m.dropped_edge_count(), 0);
        for a in 0..4u32 {
            for b in 0..4u32 {
                assert_eq!(m.can_connect(a, b), m.can_connect(b, a));
            }
        }
        assert!(m.can_connect(0, 1));
        assert!(!m.can_connect(0, 2));
        let n: Vec<u32> = m.valid_connections_for(0).iter().map(|p| p.index).collect();
        assert_eq!(n, vec![1, 3]);
    }

    #[test]
    fn exact_rejects_what_tolerance_accepts() {
        let pts = [v(0.0, 0.0), v(10.0, 0.0)];
        let lines = [line(c(0.05, -0.05), c(9.96, 0.0))];
        let exact = ConnectivityModel::build(&pts, &lines, MatchStrategy::Exact);
        assert_eq!(exact.edge_count(), 0);
        assert_eq!(exact.dropped_edge_count(), 1);
        let tol = ConnectivityModel::build(&pts, &lines, MatchStrategy::Tolerance);
        assert_eq!(tol.edge_count(), 1);
        assert!(tol.can_connect(0, 1));
    }

    #[test]
    fn tolerance_is_strict() {
        let pts = [v(0.0, 0.0), v(10.0, 0.0)];
        let lines = [line(c(0.0, 0.5), c(10.0, 0.0))];
        let m = ConnectivityModel::build(&pts, &lines, MatchStrategy::Tolerance);
        assert_eq!(m.edge_count(), 0);
    }

    #[test]
    fn index_refs_bypass_matching() {
        let pts = [v(0.0, 0.0), v(10.0, 0.0), v(5.0, 5.0)];
        let lines = [
            line(EndpointRef::Index(0), EndpointRef::Index(2)),
            line(EndpointRef::Index(1), EndpointRef::Index(9)),
        ];
        let m = ConnectivityModel::build(&pts, &lines, MatchStrategy::Exact);
        assert_eq!(m.edge_count(), 1);
        assert_eq!(m.dropped_edge_count(), 1);
        assert!(m.can_connect(2, 0));
    }

    #[test]
    fn unknown_points_fail_closed() {
        let pts = [v(0.0, 0.0), v(1.0, 0.0)];
        let lines = [line(EndpointRef::Index(0), EndpointRef::Index(1))];
        let m = ConnectivityModel::build(&pts, &lines, MatchStrategy::Tolerance);
        assert!(!m.can_connect(0, 7));
        assert!(!m.can_connect(7, 0));
        assert!(m.valid_connections_for(7).is_empty());
    }

    #[test]
    fn near_duplicates_connect_but_are_not_selectable() {
        let pts = [v(1.0, 1.0), v(1.02, 0.98), v(4.0, 4.0)];
        let lines = [
            line(EndpointRef::Index(0), EndpointRef::Index(1)),
            line(EndpointRef::Index(1), EndpointRef::Index(2)),
        ];
        let m = ConnectivityModel::build(&pts, &lines, MatchStrategy::Exact);
        assert_eq!(m.canonical(1), 0);
        assert_eq!(m.canonical(2), 2);
        assert_eq!(m.edge_count(), 2);
        assert_eq!(m.dropped_edge_count(), 0);
        assert!(m.can_connect(0, 1));
        assert!(m.can_connect(1, 0));
        let ids: Vec<u32> = m.selectable_edges().map(|e| e.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(m.selectable_edge_count(), 1);
    }
}
