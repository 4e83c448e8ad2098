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

//! Branch-and-bound over the edge orderings produced by the permutation
//! enumerator.
//!
//! The solver shadows the enumerator prefix and maintains, incrementally:
//!     - `cost_acc`, the exact cost of the accounted prefix,
//!     - `cost_rlx`, the sum of the weights of the segments not yet claimed
//!       by the prefix.
//! `cost_acc + cost_rlx` is an admissible lower bound on the cost of any
//! completion of the prefix: every unclaimed segment will be claimed by some
//! future edge and then contributes at least its own weight to that edge's
//! product. A prefix is pruned when this bound reaches the incumbent, when it
//! already claims every segment (further extensions only append no-ops), or
//! when its last edge claimed nothing (an equivalent ordering with that edge
//! pushed to the tail is visited anyway).

use std::time::Instant;

use super::enumerator::PermEnumerator;
use super::statistics::Statistics;
use super::Solution;
use crate::common::{weight_add, weight_mul, Weight};
use crate::core::instance::{EdgeId, Instance};
use crate::cost::cost_relax;
use crate::heuristics::sbbu_order;

pub struct BranchAndBound<'i, const S: bool> {
    instance: &'i Instance,
    enumerator: PermEnumerator<'i>,
    /// Shadow of the enumerator prefix for which costs are accounted
    ord: Vec<EdgeId>,
    /// contrib[pos]: cost contributed by the edge at prefix position pos
    contrib: Vec<Weight>,
    /// n_cov[sid]: number of accounted prefix edges covering segment sid
    n_cov: Vec<usize>,
    /// Sum of the contributions of the accounted prefix
    cost_acc: Weight,
    /// Sum of the weights of the segments the accounted prefix does not claim
    cost_rlx: Weight,
    statistics: Statistics<S>,
    /// Deadline, in seconds of wall-clock time
    timeout: u64,
}

impl<'i, const S: bool> BranchAndBound<'i, S> {
    pub fn new(instance: &'i Instance, timeout: u64) -> Self {
        Self {
            instance,
            enumerator: PermEnumerator::new(instance),
            ord: vec![],
            contrib: vec![],
            n_cov: vec![0; instance.number_segments() + 1],
            cost_acc: 0,
            cost_rlx: 0,
            statistics: Statistics::default(),
            timeout,
        }
    }

    /// Runs the search and returns the best ordering found. The incumbent is
    /// seeded with the SBBU ordering; on deadline expiry the incumbent is
    /// returned with the `timed_out` flag raised.
    pub fn solve(&mut self) -> Solution {
        let start = Instant::now();
        self.reset();
        let (mut best_order, mut cost_ub) = sbbu_order(self.instance);
        let cost_relax_all = cost_relax(self.instance);
        // the heuristic already matches the strongest lower bound
        if cost_relax_all == cost_ub {
            return Solution::new(cost_ub, best_order, false);
        }
        self.cost_rlx = cost_relax_all;
        let mut timed_out = false;

        while let Some(eid) = self.enumerator.next() {
            self.statistics.step();
            if start.elapsed().as_secs() >= self.timeout {
                timed_out = true;
                break;
            }
            // positions beyond the enumerator prefix were popped while
            // backtracking: refund them before accounting the new edge
            let position = self.enumerator.prefix().len() - 1;
            self.rollback(position);
            let edge_cost = self.account(eid, cost_ub);
            let cost_lb = weight_add(self.cost_acc, self.cost_rlx);
            assert!(
                cost_lb >= cost_relax_all,
                "impossible lower bound {} < {} with prefix {:?}",
                cost_lb,
                cost_relax_all,
                self.ord
            );
            if self.cost_rlx == 0 && cost_lb < cost_ub {
                cost_ub = cost_lb;
                best_order = self.complete_order();
                self.statistics.incumbent();
                // the strongest lower bound is matched, nothing can improve
                if cost_lb == cost_relax_all {
                    break;
                }
            }
            if cost_lb >= cost_ub || self.cost_rlx == 0 || edge_cost == 0 {
                self.statistics.pruning();
                self.enumerator.prune();
            }
        }
        self.statistics.peak_memory();
        self.statistics.print();
        Solution::new(cost_ub, best_order, timed_out)
    }

    fn reset(&mut self) {
        self.enumerator = PermEnumerator::new(self.instance);
        self.ord.clear();
        self.contrib.clear();
        self.n_cov.iter_mut().for_each(|count| *count = 0);
        self.cost_acc = 0;
        self.cost_rlx = 0;
    }

    /// Pops accounted positions until the accounted prefix has length
    /// `position`, refunding their contributions and uncovering their
    /// segments.
    fn rollback(&mut self, position: usize) {
        let instance = self.instance;
        while self.ord.len() > position {
            let eid = self.ord.pop().unwrap();
            let contribution = self.contrib.pop().unwrap();
            self.cost_acc -= contribution;
            for &sid in instance[eid].segments() {
                self.n_cov[sid.0] -= 1;
                if self.n_cov[sid.0] == 0 {
                    self.cost_rlx += instance[sid].weight();
                }
            }
        }
    }

    /// Accounts `eid` at the end of the prefix: updates the covering counts
    /// and the relaxation, stores and returns the edge contribution.
    fn account(&mut self, eid: EdgeId, cost_ub: Weight) -> Weight {
        let instance = self.instance;
        let mut edge_cost: Weight = 1;
        for &sid in instance[eid].segments() {
            self.n_cov[sid.0] += 1;
            if self.n_cov[sid.0] == 1 {
                let weight = instance[sid].weight();
                self.cost_rlx -= weight;
                // once the product exceeds what the upper bound allows, the
                // prefix is pruned regardless of the exact value: stop
                // multiplying so the product cannot wrap
                if cost_ub >= self.cost_acc + edge_cost {
                    edge_cost = weight_mul(edge_cost, weight);
                }
            }
        }
        if edge_cost == 1 {
            edge_cost = 0;
        }
        self.ord.push(eid);
        self.contrib.push(edge_cost);
        self.cost_acc += edge_cost;
        edge_cost
    }

    /// A no-op edge claims nothing wherever it sits in the suffix, so the
    /// incumbent prefix is completed into a full permutation by appending the
    /// unplaced ids in ascending order.
    fn complete_order(&self) -> Vec<EdgeId> {
        let mut order = self.ord.clone();
        let mut placed = vec![false; self.instance.number_edges() + 1];
        for &eid in order.iter() {
            placed[eid.0] = true;
        }
        order.extend(self.instance.edges_iter().filter(|eid| !placed[eid.0]));
        order
    }
}
