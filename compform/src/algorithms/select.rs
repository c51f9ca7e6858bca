//! Edge selection under the three composition policies.
//!
//! Every call owns its own selection state; nothing survives between calls.
//! Points are compared by canonical id so near-duplicate coordinates count as
//! one vertex.

use crate::connectivity::ConnectivityModel;
use crate::model::Edge;
use crate::sampling::Sampler;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Composition {
    #[default]
    Random,
    #[serde(alias = "Branching")]
    Branched,
    Sequential,
}

/// Probabilities that a newly reached point may sprout further branches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchParams {
    /// Used when growing from a branchable point.
    pub branch: f32,
    /// Used when no branchable point has a free edge and growth falls back to
    /// any point already in the structure.
    pub fallback: f32,
}

impl Default for BranchParams {
    fn default() -> Self {
        BranchParams { branch: 0.7, fallback: 0.4 }
    }
}

// Candidate edge with canonical endpoint ids.
#[derive(Clone, Copy, Debug)]
struct Cand {
    edge: Edge,
    a: u32,
    b: u32,
}

impl Cand {
    #[inline]
    fn other(&self, p: u32) -> Option<u32> {
        if self.a == p {
            Some(self.b)
        } else if self.b == p {
            Some(self.a)
        } else {
            None
        }
    }
}

fn candidates(model: &ConnectivityModel) -> Vec<Cand> {
    model
        .selectable_edges()
        .map(|e| Cand { edge: *e, a: model.canonical(e.a), b: model.canonical(e.b) })
        .collect()
}

pub fn select_edges<S: Sampler>(
    model: &ConnectivityModel,
    policy: Composition,
    target: usize,
    params: BranchParams,
    sampler: &mut S,
) -> Vec<Edge> {
    let remaining = candidates(model);
    if target == 0 || remaining.is_empty() {
        return Vec::new();
    }
    let picked = match policy {
        Composition::Random => select_random(remaining, target, sampler),
        Composition::Sequential => SequentialState::start(remaining, sampler).run(target, sampler),
        Composition::Branched => {
            let mut state = BranchState::start(remaining, sampler);
            state.grow(target, params, sampler);
            trace!("branching: {} fallback steps", state.fallback_steps);
            state.picked
        }
    };
    trace!("{:?} selection: {} of {} requested", policy, picked.len(), target);
    picked
}

fn select_random<S: Sampler>(mut remaining: Vec<Cand>, target: usize, sampler: &mut S) -> Vec<Edge> {
    sampler.shuffle(&mut remaining);
    remaining.truncate(target);
    remaining.into_iter().map(|c| c.edge).collect()
}

/// Simple path grown from one open end.
struct SequentialState {
    remaining: Vec<Cand>,
    visited: HashSet<u32>,
    origin: u32,
    open: u32,
    picked: Vec<Edge>,
}

impl SequentialState {
    fn start<S: Sampler>(mut remaining: Vec<Cand>, sampler: &mut S) -> Self {
        let first = remaining.swap_remove(sampler.index(remaining.len()));
        let mut visited = HashSet::new();
        visited.insert(first.a);
        visited.insert(first.b);
        SequentialState {
            remaining,
            visited,
            origin: first.a,
            open: first.b,
            picked: vec![first.edge],
        }
    }

    fn run<S: Sampler>(mut self, target: usize, sampler: &mut S) -> Vec<Edge> {
        while self.picked.len() < target {
            sampler.shuffle(&mut self.remaining);
            let open = self.open;
            let ext = self.remaining.iter().enumerate().find_map(|(i, c)| {
                c.other(open).filter(|o| !self.visited.contains(o)).map(|o| (i, o))
            });
            if let Some((i, next)) = ext {
                let c = self.remaining.swap_remove(i);
                trace!("sequential: {} -> {} via line {}", open, next, c.edge.id);
                self.visited.insert(next);
                self.open = next;
                self.picked.push(c.edge);
                continue;
            }
            // Dead end: a path of two or more lines may close back onto its
            // origin, which ends the walk.
            if self.picked.len() >= 2 {
                let origin = self.origin;
                if let Some(i) = self.remaining.iter().position(|c| c.other(open) == Some(origin)) {
                    let c = self.remaining.swap_remove(i);
                    trace!("sequential: closed {} -> {} via line {}", open, origin, c.edge.id);
                    self.picked.push(c.edge);
                }
            }
            break;
        }
        self.picked
    }
}

/// Connected structure grown from branchable points.
struct BranchState {
    remaining: Vec<Cand>,
    used: HashSet<u32>,
    branchable: HashSet<u32>,
    picked: Vec<Edge>,
    // Lines accepted because no branchable point had a free line.
    fallback_steps: u32,
}

impl BranchState {
    fn start<S: Sampler>(mut remaining: Vec<Cand>, sampler: &mut S) -> Self {
        let first = remaining.swap_remove(sampler.index(remaining.len()));
        let used: HashSet<u32> = [first.a, first.b].into_iter().collect();
        let branchable = used.clone();
        BranchState { remaining, used, branchable, picked: vec![first.edge], fallback_steps: 0 }
    }

    // First candidate matching `touches`, preferring ones that reach a new point.
    fn find<F: Fn(&Cand) -> bool>(&self, touches: F) -> Option<usize> {
        let mut closing = None;
        for (i, c) in self.remaining.iter().enumerate() {
            if !touches(c) {
                continue;
            }
            if !self.used.contains(&c.a) || !self.used.contains(&c.b) {
                return Some(i);
            }
            if closing.is_none() {
                closing = Some(i);
            }
        }
        closing
    }

    fn accept<S: Sampler>(&mut self, i: usize, p: f32, sampler: &mut S) {
        let c = self.remaining.swap_remove(i);
        for pt in [c.a, c.b] {
            if self.used.insert(pt) && sampler.coin(p) {
                self.branchable.insert(pt);
            }
        }
        self.picked.push(c.edge);
    }

    fn grow<S: Sampler>(&mut self, target: usize, params: BranchParams, sampler: &mut S) {
        while self.picked.len() < target {
            sampler.shuffle(&mut self.remaining);
            let branchable = &self.branchable;
            if let Some(i) = self.find(|c| branchable.contains(&c.a) || branchable.contains(&c.b)) {
                trace!("branching: grow from branchable point via line {}", self.remaining[i].edge.id);
                self.accept(i, params.branch, sampler);
                continue;
            }
            let used = &self.used;
            if let Some(i) = self.find(|c| used.contains(&c.a) || used.contains(&c.b)) {
                trace!("branching: fallback growth via line {}", self.remaining[i].edge.id);
                self.accept(i, params.fallback, sampler);
                self.fallback_steps += 1;
                continue;
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::MatchStrategy;
    use crate::model::{EndpointRef, LineDecl, Vec2};
    use crate::sampling::SeededSampler;

    fn model(pts: &[(f32, f32)], lines: &[(u32, u32)]) -> ConnectivityModel {
        let coords: Vec<Vec2> = pts.iter().map(|&(x, y)| Vec2 { x, y }).collect();
        let decls: Vec<LineDecl> = lines
            .iter()
            .map(|&(a, b)| LineDecl { start: EndpointRef::Index(a), end: EndpointRef::Index(b) })
            .collect();
        ConnectivityModel::build(&coords, &decls, MatchStrategy::Tolerance)
    }

    fn quad() -> ConnectivityModel {
        model(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[(0, 1), (1, 2), (2, 3), (3, 0)],
        )
    }

    #[test]
    fn empty_inputs_select_nothing() {
        let mut s = SeededSampler::new(1);
        let m = quad();
        for policy in [Composition::Random, Composition::Branched, Composition::Sequential] {
            assert!(select_edges(&m, policy, 0, BranchParams::default(), &mut s).is_empty());
        }
        let empty = model(&[(0.0, 0.0)], &[]);
        assert!(select_edges(&empty, Composition::Sequential, 3, BranchParams::default(), &mut s).is_empty());
    }

    #[test]
    fn random_takes_min_of_target_and_available() {
        let m = quad();
        for seed in 0..20 {
            let mut s = SeededSampler::new(seed);
            assert_eq!(select_edges(&m, Composition::Random, 2, BranchParams::default(), &mut s).len(), 2);
            assert_eq!(select_edges(&m, Composition::Random, 9, BranchParams::default(), &mut s).len(), 4);
        }
    }

    #[test]
    fn sequential_closes_quadrilateral() {
        let m = quad();
        for seed in 0..50 {
            let mut s = SeededSampler::new(seed);
            let picked = select_edges(&m, Composition::Sequential, 4, BranchParams::default(), &mut s);
            assert_eq!(picked.len(), 4, "seed {}", seed);
            let mut ids: Vec<u32> = picked.iter().map(|e| e.id).collect();
            ids.sort();
            assert_eq!(ids, vec![0, 1, 2, 3]);
            // Each vertex appears in exactly two selected lines
            for p in 0..4u32 {
                assert_eq!(picked.iter().filter(|e| e.a == p || e.b == p).count(), 2);
            }
        }
    }

    #[test]
    fn sequential_on_star_stops_at_hub() {
        // Hub 0 with three spokes: a simple path holds at most two spokes.
        let m = model(
            &[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (-10.0, 0.0)],
            &[(0, 1), (0, 2), (0, 3)],
        );
        for seed in 0..30 {
            let mut s = SeededSampler::new(seed);
            let picked = select_edges(&m, Composition::Sequential, 3, BranchParams::default(), &mut s);
            assert!(!picked.is_empty() && picked.len() <= 2, "seed {} picked {}", seed, picked.len());
        }
    }

    #[test]
    fn branching_isolated_start_yields_one() {
        // Three disjoint lines: nothing can attach to whichever one starts.
        let m = model(
            &[(0.0, 0.0), (1.0, 0.0), (5.0, 5.0), (6.0, 5.0), (9.0, 9.0), (9.0, 12.0)],
            &[(0, 1), (2, 3), (4, 5)],
        );
        for seed in 0..20 {
            let mut s = SeededSampler::new(seed);
            let picked = select_edges(&m, Composition::Branched, 5, BranchParams::default(), &mut s);
            assert_eq!(picked.len(), 1);
        }
    }

    #[test]
    fn branching_with_zero_probabilities_still_grows_via_fallback() {
        let m = model(
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)],
            &[(0, 1), (1, 2), (2, 3), (3, 4)],
        );
        let params = BranchParams { branch: 0.0, fallback: 0.0 };
        let mut s = SeededSampler::new(5);
        let picked = select_edges(&m, Composition::Branched, 4, params, &mut s);
        assert_eq!(picked.len(), 4);
    }

    fn chain() -> ConnectivityModel {
        model(
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0), (5.0, 0.0), (6.0, 0.0)],
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6)],
        )
    }

    #[test]
    fn certain_branching_never_falls_back() {
        // Tree: hub 0 with two arms of two lines each, plus one leaf.
        let m = model(
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (0.0, 2.0), (-1.0, 0.0)],
            &[(0, 1), (1, 2), (0, 3), (3, 4), (0, 5)],
        );
        let params = BranchParams { branch: 1.0, fallback: 0.0 };
        for seed in 0..30 {
            let mut s = SeededSampler::new(seed);
            let mut state = BranchState::start(candidates(&m), &mut s);
            state.grow(5, params, &mut s);
            assert_eq!(state.picked.len(), 5, "seed {}", seed);
            assert_eq!(state.fallback_steps, 0, "seed {}", seed);
            assert_eq!(state.branchable, state.used);
        }
        for seed in 0..30 {
            let mut s = SeededSampler::new(seed);
            let mut state = BranchState::start(candidates(&chain()), &mut s);
            state.grow(6, params, &mut s);
            assert_eq!(state.picked.len(), 6);
            assert_eq!(state.fallback_steps, 0);
        }
    }

    #[test]
    fn zero_branching_exhausts_start_points_then_falls_back() {
        let m = chain();
        let params = BranchParams { branch: 0.0, fallback: 0.0 };
        for seed in 0..30 {
            let mut s = SeededSampler::new(seed);
            let mut state = BranchState::start(candidates(&m), &mut s);
            let start = state.branchable.clone();
            state.grow(6, params, &mut s);
            let picked = &state.picked;
            assert_eq!(picked.len(), 6, "seed {}", seed);
            // Only the first line's ends ever become branchable
            assert_eq!(state.branchable, start);
            let touches_start = |e: &Edge| start.contains(&e.a) || start.contains(&e.b);
            let k = picked[1..].iter().filter(|e| touches_start(e)).count();
            assert!(picked[1..=k].iter().all(|e| touches_start(e)), "seed {}", seed);
            assert_eq!(state.fallback_steps as usize, 5 - k, "seed {}", seed);
        }
    }
}
