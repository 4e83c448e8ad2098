//Sbbu
//Copyright (C) 2022-2024 A. Dubray
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Precedence-based exact search. Instead of permuting edges, the solver
//! walks the segments in a fixed branching order and assigns each one to the
//! edge that claims it. Choosing edge `a` for a segment also covered by the
//! other candidates `b` forces `a` before every such `b`; the constraints are
//! kept in a precedence graph so that two edge orderings inducing the same
//! claim assignment are never both explored. An edge is a candidate for a
//! segment only while no other covering edge is forced before it.
//!
//! The cost of an edge becomes known once all its segments are assigned
//! (`ek` reaches zero); the running total is compared against the incumbent
//! from SBBU and the search backtracks on any level that cannot improve it.

use std::time::Instant;

use rustc_hash::FxHashSet;

use super::statistics::Statistics;
use super::Solution;
use crate::common::{weight_add, weight_mul, Weight};
use crate::core::instance::{EdgeId, Instance, SegmentId};
use crate::core::keyset::OrderedKeySet;
use crate::cost::cost_relax;
use crate::heuristics::sbbu_order;

pub struct PrecedenceTree<'i, const S: bool> {
    instance: &'i Instance,
    /// Segments in branching order: segments of the most covering edges
    /// first, most covered segments first within an edge
    ord_s: Vec<SegmentId>,
    /// preds[eid]: edges currently forced to come before eid
    preds: Vec<FxHashSet<EdgeId>>,
    /// ek[eid]: incident segments of eid not yet assigned
    ek: Vec<usize>,
    statistics: Statistics<S>,
    /// Deadline, in seconds of wall-clock time
    timeout: u64,
}

impl<'i, const S: bool> PrecedenceTree<'i, S> {
    pub fn new(instance: &'i Instance, timeout: u64) -> Self {
        let number_edges = instance.number_edges();
        Self {
            instance,
            ord_s: Self::branching_order(instance),
            preds: vec![FxHashSet::default(); number_edges + 1],
            ek: vec![0; number_edges + 1],
            statistics: Statistics::default(),
            timeout,
        }
    }

    /// Walks the edges sorted by descending number of covered segments (ties:
    /// ascending id) and appends their segments, sorted by descending number
    /// of covering edges (ties: ascending id), the first time they are seen.
    fn branching_order(instance: &Instance) -> Vec<SegmentId> {
        let mut edges: Vec<EdgeId> = instance.edges_iter().collect();
        edges.sort_by(|a, b| {
            instance[*b]
                .segments()
                .len()
                .cmp(&instance[*a].segments().len())
                .then(a.0.cmp(&b.0))
        });
        let mut seen = vec![false; instance.number_segments() + 1];
        let mut ord_s = Vec::with_capacity(instance.number_segments());
        for eid in edges {
            let mut segments: Vec<SegmentId> = instance[eid].segments().to_vec();
            segments.sort_by(|a, b| {
                instance[*b]
                    .edges()
                    .len()
                    .cmp(&instance[*a].edges().len())
                    .then(a.0.cmp(&b.0))
            });
            for sid in segments {
                if !seen[sid.0] {
                    seen[sid.0] = true;
                    ord_s.push(sid);
                }
            }
        }
        ord_s
    }

    /// Runs the search and returns the best ordering found, the incumbent
    /// being seeded with the SBBU ordering.
    pub fn solve(&mut self) -> Solution {
        let start = Instant::now();
        self.reset();
        let (mut best_order, mut cost_opt) = sbbu_order(self.instance);
        let cost_relax_all = cost_relax(self.instance);
        if cost_relax_all == cost_opt {
            return Solution::new(cost_opt, best_order, false);
        }
        let number_levels = self.ord_s.len();
        // assigned[sid]: edge claiming sid in the current prefix
        let mut assigned: Vec<Option<EdgeId>> =
            vec![None; self.instance.number_segments() + 1];
        // per level: untried candidates, index of the current one, precedence
        // pairs added, cost added
        let mut candidates: Vec<Vec<EdgeId>> = vec![vec![]; number_levels];
        let mut candidate_index = vec![0usize; number_levels];
        let mut precedences: Vec<Vec<(EdgeId, EdgeId)>> = vec![vec![]; number_levels];
        let mut cost_add: Vec<Weight> = vec![0; number_levels];
        let mut cost: Weight = 0;
        let mut level: isize = 0;
        let mut timed_out = false;
        while level >= 0 {
            self.statistics.step();
            if start.elapsed().as_secs() >= self.timeout {
                timed_out = true;
                break;
            }
            let l = level as usize;
            let sid = self.ord_s[l];
            if candidates[l].is_empty() {
                candidates[l] = self.available_edges(sid);
            }
            let eid = candidates[l][candidate_index[l]];
            assigned[sid.0] = Some(eid);
            if candidates[l].len() >= 2 {
                precedences[l] = self.add_precedence(eid, &candidates[l]);
            }
            cost_add[l] = self.add_cost(sid, &assigned, cost_opt);
            cost += cost_add[l];
            if cost < cost_opt && l == number_levels - 1 {
                cost_opt = cost;
                best_order = self.linearize(&assigned);
                self.statistics.incumbent();
            }
            if cost < cost_opt && l < number_levels - 1 {
                level += 1;
            } else {
                self.statistics.pruning();
                level = self.backtrack(
                    level,
                    &mut candidates,
                    &mut candidate_index,
                    &mut precedences,
                    &mut cost_add,
                    &mut assigned,
                    &mut cost,
                );
            }
        }
        self.statistics.peak_memory();
        self.statistics.print();
        Solution::new(cost_opt, best_order, timed_out)
    }

    fn reset(&mut self) {
        self.preds.iter_mut().for_each(|preds| preds.clear());
        for eid in self.instance.edges_iter() {
            self.ek[eid.0] = self.instance[eid].segments().len();
        }
    }

    /// Edges allowed to claim `sid`: an edge is available iff no other
    /// covering edge is in the transitive closure of its predecessors.
    fn available_edges(&self, sid: SegmentId) -> Vec<EdgeId> {
        let covering = self.instance[sid].edges();
        if covering.len() == 1 {
            return covering.to_vec();
        }
        let mut available = vec![];
        for &a in covering {
            if self.preds[a.0].is_empty() {
                available.push(a);
                continue;
            }
            let closure = self.predecessors(a);
            if covering
                .iter()
                .all(|&b| b == a || closure.binary_search(&b).is_err())
            {
                available.push(a);
            }
        }
        available
    }

    /// Transitive closure of `preds[eid]`, sorted ascending.
    fn predecessors(&self, eid: EdgeId) -> Vec<EdgeId> {
        let mut closure: Vec<EdgeId> = self.preds[eid.0].iter().copied().collect();
        let mut visited: FxHashSet<EdgeId> = closure.iter().copied().collect();
        let mut next = 0;
        while next < closure.len() {
            for &pred in self.preds[closure[next].0].iter() {
                if visited.insert(pred) {
                    closure.push(pred);
                }
            }
            next += 1;
        }
        closure.sort_unstable();
        closure
    }

    /// Forces `chosen` before every other candidate; returns the pairs
    /// actually added so that backtracking removes exactly those.
    fn add_precedence(
        &mut self,
        chosen: EdgeId,
        candidates: &[EdgeId],
    ) -> Vec<(EdgeId, EdgeId)> {
        let mut added = vec![];
        for &other in candidates {
            if other != chosen && self.preds[other.0].insert(chosen) {
                added.push((other, chosen));
            }
        }
        added
    }

    fn remove_precedence(&mut self, added: &[(EdgeId, EdgeId)]) {
        for &(after, before) in added {
            self.preds[after.0].remove(&before);
        }
    }

    /// Product of the weights of the segments currently assigned to `eid`,
    /// capped at `cost_ub`.
    fn edge_cost(&self, assigned: &[Option<EdgeId>], eid: EdgeId, cost_ub: Weight) -> Weight {
        let mut cost: Weight = 1;
        for &sid in self.instance[eid].segments() {
            if assigned[sid.0] == Some(eid) {
                cost = weight_mul(cost, self.instance[sid].weight());
                if cost >= cost_ub {
                    cost = cost_ub;
                    break;
                }
            }
        }
        if cost == 1 {
            0
        } else {
            cost
        }
    }

    /// Assigning `sid` settles every covering edge whose last segment it was;
    /// returns the sum of their now-known costs.
    fn add_cost(&mut self, sid: SegmentId, assigned: &[Option<EdgeId>], cost_ub: Weight) -> Weight {
        let mut cost: Weight = 0;
        let instance = self.instance;
        for &eid in instance[sid].edges() {
            debug_assert!(self.ek[eid.0] > 0);
            self.ek[eid.0] -= 1;
            if self.ek[eid.0] == 0 && cost < cost_ub {
                cost = weight_add(cost, self.edge_cost(assigned, eid, cost_ub));
            }
        }
        cost
    }

    /// Reverts the `ek` counters of `sid` and refunds the cost added at
    /// `level`.
    fn remove_cost(&mut self, level: usize, sid: SegmentId, cost_add: &mut [Weight]) -> Weight {
        let refund = cost_add[level];
        cost_add[level] = 0;
        for &eid in self.instance[sid].edges() {
            self.ek[eid.0] += 1;
        }
        refund
    }

    /// Undoes levels until one still has an untried candidate; returns -1
    /// when the whole tree is exhausted.
    fn backtrack(
        &mut self,
        mut level: isize,
        candidates: &mut [Vec<EdgeId>],
        candidate_index: &mut [usize],
        precedences: &mut [Vec<(EdgeId, EdgeId)>],
        cost_add: &mut [Weight],
        assigned: &mut [Option<EdgeId>],
        cost: &mut Weight,
    ) -> isize {
        while level >= 0 {
            let l = level as usize;
            let sid = self.ord_s[l];
            *cost -= self.remove_cost(l, sid, cost_add);
            assigned[sid.0] = None;
            if !precedences[l].is_empty() {
                let added = std::mem::take(&mut precedences[l]);
                self.remove_precedence(&added);
            }
            if candidate_index[l] + 1 < candidates[l].len() {
                candidate_index[l] += 1;
                return level;
            }
            candidates[l].clear();
            candidate_index[l] = 0;
            level -= 1;
        }
        level
    }

    /// Linearises a complete segment assignment into a full edge ordering:
    /// Kahn's algorithm over the active precedence constraints, smallest id
    /// first, then the edges claiming nothing, ascending. The precedence
    /// graph guarantees that each segment's assignee is the first covering
    /// edge of the result, so the ordering costs exactly the assignment.
    fn linearize(&self, assigned: &[Option<EdgeId>]) -> Vec<EdgeId> {
        let instance = self.instance;
        let number_edges = instance.number_edges();
        let mut claiming = vec![false; number_edges + 1];
        for sid in instance.segments_iter() {
            if let Some(eid) = assigned[sid.0] {
                claiming[eid.0] = true;
            }
        }
        let mut indegree = vec![0usize; number_edges + 1];
        let mut ready = OrderedKeySet::new();
        for eid in instance.edges_iter() {
            if claiming[eid.0] {
                // every recorded predecessor has claimed a segment itself
                indegree[eid.0] = self.preds[eid.0].len();
                if indegree[eid.0] == 0 {
                    ready.add(eid.0);
                }
            }
        }
        let mut order = Vec::with_capacity(number_edges);
        while let Some(key) = ready.pop_min() {
            let eid = EdgeId(key);
            order.push(eid);
            for successor in instance.edges_iter() {
                if claiming[successor.0] && self.preds[successor.0].contains(&eid) {
                    indegree[successor.0] -= 1;
                    if indegree[successor.0] == 0 {
                        ready.add(successor.0);
                    }
                }
            }
        }
        let number_claiming = claiming.iter().filter(|&&c| c).count();
        assert!(
            order.len() == number_claiming,
            "cycle in the precedence graph among {:?}",
            order
        );
        order.extend(instance.edges_iter().filter(|eid| !claiming[eid.0]));
        order
    }
}
