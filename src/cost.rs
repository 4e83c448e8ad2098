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

//! Cost model shared by every solver. Under a given ordering, each segment is
//! claimed by the first edge of the ordering that covers it; the cost of an
//! edge is the product of the weights of the segments it claims (zero when it
//! claims none), and the cost of the ordering is the sum of the edge costs.

use crate::common::{weight_add, weight_mul, Weight, WEIGHT_MAX};
use crate::core::instance::{EdgeId, Instance};

/// Evaluates the cost of an ordering of the pruning edges. The ordering may be
/// partial: unlisted edges contribute nothing. When `cost_ub` is given and the
/// running total reaches it, the evaluation short-circuits to [WEIGHT_MAX].
pub fn cost_of_order(instance: &Instance, order: &[EdgeId], cost_ub: Option<Weight>) -> Weight {
    let cost_ub = cost_ub.unwrap_or(WEIGHT_MAX);
    let mut claimed = vec![false; instance.number_segments() + 1];
    let mut total: Weight = 0;
    for &eid in order {
        let mut edge_cost: Weight = 1;
        for &sid in instance[eid].segments() {
            if !claimed[sid.0] {
                claimed[sid.0] = true;
                edge_cost = weight_mul(edge_cost, instance[sid].weight());
            }
        }
        // an edge claiming no segment costs zero, not one
        if edge_cost > 1 {
            total = weight_add(total, edge_cost);
        }
        if total >= cost_ub {
            return WEIGHT_MAX;
        }
    }
    total
}

/// Sum of the weights of all segments: the tightest admissible lower bound on
/// the total cost, since every segment must be claimed by some edge and then
/// contributes at least its own weight to that edge's product.
pub fn cost_relax(instance: &Instance) -> Weight {
    instance
        .segments_iter()
        .fold(0, |total, sid| weight_add(total, instance[sid].weight()))
}
