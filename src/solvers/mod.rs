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

use std::fmt;

use crate::common::Weight;
use crate::core::instance::EdgeId;

pub mod bb;
pub mod enumerator;
pub mod pt;
mod statistics;

pub use bb::BranchAndBound;
pub use pt::PrecedenceTree;

/// Outcome of a solver run: the best ordering found, its cost, and whether
/// the deadline expired before the search space was exhausted. A timeout is
/// an observable outcome, not an error: the incumbent is still valid.
#[derive(Debug, Clone)]
pub struct Solution {
    cost: Weight,
    order: Vec<EdgeId>,
    timed_out: bool,
}

impl Solution {
    pub fn new(cost: Weight, order: Vec<EdgeId>, timed_out: bool) -> Self {
        Self {
            cost,
            order,
            timed_out,
        }
    }

    pub fn cost(&self) -> Weight {
        self.cost
    }

    pub fn order(&self) -> &[EdgeId] {
        &self.order
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ids: Vec<usize> = self.order.iter().map(|eid| eid.0).collect();
        write!(
            f,
            "cost {}{} with order {:?}",
            self.cost,
            if self.timed_out { " (timeout)" } else { "" },
            ids
        )
    }
}
