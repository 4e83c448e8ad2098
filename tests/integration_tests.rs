#![allow(non_snake_case)]
use std::path::PathBuf;

use paste::paste;

use sbbu::brute::brute_order;
use sbbu::common::Error;
use sbbu::core::instance::{EdgeId, Instance};
use sbbu::cost::{cost_of_order, cost_relax};
use sbbu::heuristics::{greedy_order, sbbu_order};
use sbbu::parser::instance_from_nmr;
use sbbu::{solve_bb, solve_pt};

fn instance_path(name: &str) -> PathBuf {
    PathBuf::from(format!("tests/instances/{}.nmr", name))
}

fn load(name: &str) -> Instance {
    instance_from_nmr(&instance_path(name)).unwrap()
}

fn ids(order: &[EdgeId]) -> Vec<usize> {
    order.iter().map(|eid| eid.0).collect()
}

macro_rules! test_instance_solvers {
    ($name:ident) => {
        paste! {
            #[test]
            fn [<bb_matches_brute_ $name>]() {
                let instance = load(stringify!($name));
                let (_, cost_brute) = brute_order(&instance);
                let solution = solve_bb(&instance_path(stringify!($name)), 3600, false).unwrap();
                assert!(!solution.timed_out());
                assert_eq!(cost_brute, solution.cost());
                assert_eq!(solution.cost(), cost_of_order(&instance, solution.order(), None));
            }

            #[test]
            fn [<pt_matches_brute_ $name>]() {
                let instance = load(stringify!($name));
                let (_, cost_brute) = brute_order(&instance);
                let solution = solve_pt(&instance_path(stringify!($name)), 3600, false).unwrap();
                assert!(!solution.timed_out());
                assert_eq!(cost_brute, solution.cost());
                assert_eq!(solution.cost(), cost_of_order(&instance, solution.order(), None));
            }

            #[test]
            fn [<greedy_matches_brute_ $name>]() {
                let instance = load(stringify!($name));
                let (_, cost_brute) = brute_order(&instance);
                let (_, cost_greedy) = greedy_order(&instance);
                assert_eq!(cost_brute, cost_greedy);
            }

            #[test]
            fn [<bounds_are_ordered_ $name>]() {
                // relaxation <= optimum <= heuristic
                let instance = load(stringify!($name));
                let (_, cost_brute) = brute_order(&instance);
                let (_, cost_sbbu) = sbbu_order(&instance);
                assert!(cost_relax(&instance) <= cost_brute);
                assert!(cost_brute <= cost_sbbu);
            }

            #[test]
            fn [<solved_order_is_a_permutation_ $name>]() {
                let instance = load(stringify!($name));
                let solution = solve_bb(&instance_path(stringify!($name)), 3600, false).unwrap();
                let mut sorted = ids(solution.order());
                sorted.sort_unstable();
                let expected: Vec<usize> = (1..=instance.number_edges()).collect();
                assert_eq!(expected, sorted);
            }
        }
    };
}

test_instance_solvers!(testA);
test_instance_solvers!(testB);
test_instance_solvers!(testC);
test_instance_solvers!(testD);
test_instance_solvers!(testE);
test_instance_solvers!(testF);

#[test]
fn testA_model_and_costs() {
    let instance = load("testA");
    let segments: Vec<(usize, usize)> = instance
        .segments_iter()
        .map(|sid| (instance[sid].start(), instance[sid].end()))
        .collect();
    assert_eq!(vec![(4, 5), (6, 10), (11, 15), (18, 20)], segments);
    let (order, cost) = sbbu_order(&instance);
    assert_eq!(vec![1, 2, 3], ids(&order));
    assert_eq!(168, cost);
    let (_, cost_brute) = brute_order(&instance);
    assert_eq!(168, cost_brute);
}

#[test]
fn testB_brute_optimum() {
    let instance = load("testB");
    let (order, cost) = brute_order(&instance);
    assert_eq!(24, cost);
    assert_eq!(vec![3, 2, 1], ids(&order));
}

#[test]
fn testF_sbbu_order() {
    let instance = load("testF");
    let (order, _) = sbbu_order(&instance);
    assert_eq!(vec![1, 2, 5, 4, 3], ids(&order));
}

#[test]
fn bb_and_pt_agree_on_every_instance() {
    for name in ["testA", "testB", "testC", "testD", "testE", "testF"] {
        let bb = solve_bb(&instance_path(name), 3600, false).unwrap();
        let pt = solve_pt(&instance_path(name), 3600, false).unwrap();
        assert_eq!(bb.cost(), pt.cost(), "solvers disagree on {}", name);
    }
}

#[test]
fn deadline_is_reported() {
    let solution = solve_bb(&instance_path("testD"), 0, false).unwrap();
    assert!(solution.timed_out());
    // the SBBU incumbent survives the timeout
    let instance = load("testD");
    let (_, cost_sbbu) = sbbu_order(&instance);
    assert_eq!(cost_sbbu, solution.cost());
}

#[test]
fn oversized_segment_fails_at_construction() {
    match instance_from_nmr(&instance_path("overflow")) {
        Err(Error::Overflow(_)) => (),
        other => panic!("expected an overflow error, got {:?}", other),
    }
}

#[test]
fn discretisation_edges_do_not_get_ids() {
    // testE starts with the discretisation edge (1, 4); the pruning edges
    // are renumbered from 1
    let instance = load("testE");
    assert_eq!(3, instance.number_edges());
    assert_eq!(9, instance[EdgeId(1)].j());
    assert_eq!(11, instance.n_nodes());
}
