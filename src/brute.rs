//! Exhaustive permutation oracle. Only sensible on tiny instances; the tests
//! use it as the ground truth for the exact solvers.

use itertools::Itertools;

use crate::common::{Weight, WEIGHT_MAX};
use crate::core::instance::{EdgeId, Instance};
use crate::cost::cost_of_order;

/// Evaluates every permutation of the pruning edge ids in lexicographic order
/// and returns the first one reaching the optimal cost.
pub fn brute_order(instance: &Instance) -> (Vec<EdgeId>, Weight) {
    let mut best_order: Vec<EdgeId> = instance.edges_iter().collect();
    let mut best_cost = WEIGHT_MAX;
    let number_edges = instance.number_edges();
    for order in instance.edges_iter().permutations(number_edges) {
        let cost = cost_of_order(instance, &order, Some(best_cost));
        if cost < best_cost {
            best_cost = cost;
            best_order = order;
        }
    }
    (best_order, best_cost)
}
