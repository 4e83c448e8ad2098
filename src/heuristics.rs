//! Orderings computed without search, used to seed the exact solvers with an
//! upper bound.

use crate::common::{weight_mul, Weight};
use crate::core::instance::{EdgeId, Instance};
use crate::cost::cost_of_order;

/// SBBU ordering: edge ids sorted ascending on the right endpoint, ties broken
/// by descending left endpoint so that narrower intervals come first. Edges
/// that close early claim the small segments before a wide edge can absorb
/// them into a large product.
pub fn sbbu_order(instance: &Instance) -> (Vec<EdgeId>, Weight) {
    let mut order: Vec<EdgeId> = instance.edges_iter().collect();
    order.sort_by(|a, b| {
        let (ea, eb) = (&instance[*a], &instance[*b]);
        ea.j().cmp(&eb.j()).then(eb.i().cmp(&ea.i()))
    });
    let cost = cost_of_order(instance, &order, None);
    (order, cost)
}

/// Greedy ordering: repeatedly place the edge whose product of still
/// unclaimed incident segment weights is smallest (ties: smallest id), then
/// mark those segments claimed.
pub fn greedy_order(instance: &Instance) -> (Vec<EdgeId>, Weight) {
    let mut order = Vec::with_capacity(instance.number_edges());
    let mut placed = vec![false; instance.number_edges() + 1];
    let mut claimed = vec![false; instance.number_segments() + 1];
    for _ in 0..instance.number_edges() {
        let mut best: Option<(Weight, EdgeId)> = None;
        for eid in instance.edges_iter() {
            if placed[eid.0] {
                continue;
            }
            let mut product: Weight = 1;
            for &sid in instance[eid].segments() {
                if !claimed[sid.0] {
                    product = weight_mul(product, instance[sid].weight());
                }
            }
            if best.map_or(true, |(cost, _)| product < cost) {
                best = Some((product, eid));
            }
        }
        let (_, eid) = best.unwrap();
        placed[eid.0] = true;
        for &sid in instance[eid].segments() {
            claimed[sid.0] = true;
        }
        order.push(eid);
    }
    let cost = cost_of_order(instance, &order, None);
    (order, cost)
}

#[cfg(test)]
mod test_heuristics {
    use super::*;
    use crate::core::instance::Instance;

    fn ids(order: &[EdgeId]) -> Vec<usize> {
        order.iter().map(|eid| eid.0).collect()
    }

    #[test]
    fn sbbu_sorts_on_right_endpoint() {
        let instance = Instance::from_records(&[(1, 10), (3, 15), (15, 20)]).unwrap();
        let (order, cost) = sbbu_order(&instance);
        assert_eq!(vec![1, 2, 3], ids(&order));
        assert_eq!(168, cost);
    }

    #[test]
    fn sbbu_breaks_ties_with_descending_left_endpoint() {
        let instance =
            Instance::from_records(&[(1, 8), (2, 9), (1, 14), (3, 14), (5, 14)]).unwrap();
        let (order, cost) = sbbu_order(&instance);
        assert_eq!(vec![1, 2, 5, 4, 3], ids(&order));
        assert_eq!(66, cost);
    }

    #[test]
    fn greedy_prefers_cheap_edges() {
        let instance = Instance::from_records(&[(1, 10), (4, 11), (8, 15)]).unwrap();
        let (order, cost) = greedy_order(&instance);
        assert_eq!(vec![2, 1, 3], ids(&order));
        assert_eq!(56, cost);
    }
}
