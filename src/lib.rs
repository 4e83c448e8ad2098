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

//! Minimum-cost ordering of the pruning edges of an NMR distance geometry
//! instance. A Branch-and-Prune enumeration of the molecule explores one atom
//! at a time; a pruning edge `(i, j)` discards candidate positions for every
//! atom in `[i + 3, j]`, at a worst-case price exponential in the number of
//! atoms it is the first to cover. Ordering the pruning edges well can lower
//! that price by orders of magnitude.
//!
//! The crate builds the segmentation model of the instance, seeds an upper
//! bound with the SBBU sort-based heuristic, and offers two exact searches:
//! a branch-and-bound over edge orderings ([solvers::BranchAndBound]) and a
//! precedence-based search over segment assignments
//! ([solvers::PrecedenceTree]).

use std::path::Path;

use peak_alloc::PeakAlloc;

use crate::common::Error;
use crate::core::instance::Instance;
use crate::solvers::{BranchAndBound, PrecedenceTree, Solution};

pub mod args;
pub mod brute;
pub mod common;
pub mod core;
pub mod cost;
pub mod heuristics;
pub mod logger;
pub mod parser;
pub mod solvers;

#[global_allocator]
pub static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Reads an `.nmr` file and runs the branch-and-bound search over edge
/// orderings, with a deadline of `timeout` seconds.
pub fn solve_bb(input: &Path, timeout: u64, verbose: bool) -> Result<Solution, Error> {
    let instance = parser::instance_from_nmr(input)?;
    Ok(solve_bb_instance(&instance, timeout, verbose))
}

pub fn solve_bb_instance(instance: &Instance, timeout: u64, verbose: bool) -> Solution {
    if verbose {
        BranchAndBound::<true>::new(instance, timeout).solve()
    } else {
        BranchAndBound::<false>::new(instance, timeout).solve()
    }
}

/// Reads an `.nmr` file and runs the precedence-based search over segment
/// assignments, with a deadline of `timeout` seconds.
pub fn solve_pt(input: &Path, timeout: u64, verbose: bool) -> Result<Solution, Error> {
    let instance = parser::instance_from_nmr(input)?;
    Ok(solve_pt_instance(&instance, timeout, verbose))
}

pub fn solve_pt_instance(instance: &Instance, timeout: u64, verbose: bool) -> Solution {
    if verbose {
        PrecedenceTree::<true>::new(instance, timeout).solve()
    } else {
        PrecedenceTree::<false>::new(instance, timeout).solve()
    }
}
