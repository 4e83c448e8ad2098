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

//! Generator of the edge orderings explored by the branch-and-bound. The
//! orderings are produced as an implicit depth-first traversal of the
//! permutation tree: `next` extends the current prefix with the smallest
//! available edge id, and `prune` rejects every extension of the current
//! prefix so that the following `next` backtracks to the first prefix with an
//! untried, larger sibling.
//!
//! The enumeration is *tight*: an edge whose incident segments are all
//! already claimed by the prefix would contribute nothing wherever it is
//! placed, so it is silently dropped instead of placed, and it becomes
//! available again as soon as backtracking uncovers one of its segments.
//! Orderings differing only in the position of such no-op edges are therefore
//! visited at most once.

use crate::core::instance::{EdgeId, Instance};
use crate::core::keyset::OrderedKeySet;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    /// Extend the current prefix with the smallest available edge
    Normal,
    /// The current prefix was rejected, backtrack before extending
    Pruned,
}

pub struct PermEnumerator<'i> {
    instance: &'i Instance,
    /// Edges available for extending the current prefix, keyed by id
    avail: OrderedKeySet,
    /// Current prefix of the ordering being built
    prefix: Vec<EdgeId>,
    state: State,
    /// in_avail[eid]: eid is currently in `avail`
    in_avail: Vec<bool>,
    /// in_prefix[eid]: eid is currently placed in the prefix
    in_prefix: Vec<bool>,
    /// n_uncovered[eid]: incident segments of eid not claimed by the prefix
    n_uncovered: Vec<usize>,
    /// n_cov[sid]: number of prefix edges covering segment sid
    n_cov: Vec<usize>,
}

impl<'i> PermEnumerator<'i> {
    pub fn new(instance: &'i Instance) -> Self {
        let number_edges = instance.number_edges();
        let mut avail = OrderedKeySet::new();
        let mut in_avail = vec![false; number_edges + 1];
        let mut n_uncovered = vec![0; number_edges + 1];
        for eid in instance.edges_iter() {
            avail.add(eid.0);
            in_avail[eid.0] = true;
            n_uncovered[eid.0] = instance[eid].segments().len();
        }
        Self {
            instance,
            avail,
            prefix: Vec::with_capacity(number_edges),
            state: State::Normal,
            in_avail,
            in_prefix: vec![false; number_edges + 1],
            n_uncovered,
            n_cov: vec![0; instance.number_segments() + 1],
        }
    }

    /// Current prefix; its last element is the edge returned by the last call
    /// to `next`.
    pub fn prefix(&self) -> &[EdgeId] {
        &self.prefix
    }

    /// Rejects every extension of the current prefix; the following call to
    /// `next` backtracks.
    pub fn prune(&mut self) {
        self.state = State::Pruned;
    }

    /// Places the next edge and returns its id, or None once the enumeration
    /// is exhausted. Between two calls, already-placed positions may have been
    /// popped from the prefix; the caller is expected to resynchronise on
    /// `prefix` before using the returned edge.
    pub fn next(&mut self) -> Option<EdgeId> {
        loop {
            match self.state {
                State::Normal => {
                    let eid = match self.avail.pop_min() {
                        Some(key) => EdgeId(key),
                        None => {
                            self.state = State::Pruned;
                            continue;
                        }
                    };
                    self.in_avail[eid.0] = false;
                    // dropped without being placed: it claims nothing new
                    // here, and it comes back into the available set once one
                    // of its segments is uncovered
                    if self.n_uncovered[eid.0] == 0 {
                        continue;
                    }
                    self.place(eid);
                    return Some(eid);
                }
                State::Pruned => {
                    let eid_old = match self.prefix.last().copied() {
                        Some(eid) => eid,
                        None => return None,
                    };
                    self.unplace(eid_old);
                    let eid = match self.avail.pop_min_greater_than(eid_old.0) {
                        Some(key) => EdgeId(key),
                        None => continue,
                    };
                    self.in_avail[eid.0] = false;
                    if self.n_uncovered[eid.0] == 0 {
                        continue;
                    }
                    self.place(eid);
                    self.state = State::Normal;
                    return Some(eid);
                }
            }
        }
    }

    /// Appends `eid` to the prefix and claims its uncovered segments.
    fn place(&mut self, eid: EdgeId) {
        assert!(
            !self.in_avail[eid.0] && !self.in_prefix[eid.0],
            "edge {:?} placed while still available or already placed",
            eid
        );
        self.prefix.push(eid);
        self.in_prefix[eid.0] = true;
        let instance = self.instance;
        for &sid in instance[eid].segments() {
            self.n_cov[sid.0] += 1;
            if self.n_cov[sid.0] == 1 {
                for &peer in instance[sid].edges() {
                    self.n_uncovered[peer.0] -= 1;
                }
            }
        }
    }

    /// Pops `eid` from the end of the prefix, reverting the claims; edges
    /// whose segments become uncovered are reinserted into the available set.
    fn unplace(&mut self, eid: EdgeId) {
        let popped = self.prefix.pop();
        debug_assert_eq!(Some(eid), popped);
        self.in_prefix[eid.0] = false;
        let instance = self.instance;
        for &sid in instance[eid].segments() {
            self.n_cov[sid.0] -= 1;
            if self.n_cov[sid.0] == 0 {
                for &peer in instance[sid].edges() {
                    self.n_uncovered[peer.0] += 1;
                    if !self.in_avail[peer.0] && !self.in_prefix[peer.0] {
                        self.insert_avail(peer);
                    }
                }
            }
        }
    }

    fn insert_avail(&mut self, eid: EdgeId) {
        let inserted = self.avail.add(eid.0);
        assert!(
            inserted,
            "edge {:?} inserted twice in the available set",
            eid
        );
        self.in_avail[eid.0] = true;
    }
}
