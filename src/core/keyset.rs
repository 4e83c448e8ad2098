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

//! This module implements the ordered set of integer keys that backs the
//! permutation enumerator. The enumerator repeatedly extracts the smallest
//! available key, or the smallest key greater than the one it just removed
//! from its prefix, so the set must answer both queries in O(log n).
//!
//! The set is a thin wrapper around a `BTreeSet`: every operation is
//! deterministic and removals free their node, so the structure does not grow
//! with the number of insert/remove cycles performed during the search.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

#[derive(Debug, Default, Clone)]
pub struct OrderedKeySet {
    keys: BTreeSet<usize>,
}

impl OrderedKeySet {
    /// Creates a new empty set
    pub fn new() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// Inserts `key`; returns false if it was already present
    pub fn add(&mut self, key: usize) -> bool {
        self.keys.insert(key)
    }

    /// Removes `key`; returns false if it was absent
    pub fn remove(&mut self, key: usize) -> bool {
        self.keys.remove(&key)
    }

    pub fn contains(&self, key: usize) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Smallest key of the set
    pub fn min(&self) -> Option<usize> {
        self.keys.first().copied()
    }

    /// Smallest key strictly greater than `key`
    pub fn min_greater_than(&self, key: usize) -> Option<usize> {
        self.keys.range((Excluded(key), Unbounded)).next().copied()
    }

    /// Removes and returns the smallest key
    pub fn pop_min(&mut self) -> Option<usize> {
        self.keys.pop_first()
    }

    /// Removes and returns the smallest key strictly greater than `key`
    pub fn pop_min_greater_than(&mut self, key: usize) -> Option<usize> {
        let found = self.min_greater_than(key)?;
        self.keys.remove(&found);
        Some(found)
    }
}

#[cfg(test)]
mod test_keyset {
    use super::OrderedKeySet;

    #[test]
    fn extraction_sequence() {
        let mut set = OrderedKeySet::new();
        for key in 1..=10 {
            set.add(key);
        }
        assert_eq!(Some(1), set.pop_min());
        assert_eq!(Some(2), set.pop_min());
        assert_eq!(Some(3), set.pop_min());
        assert_eq!(Some(4), set.pop_min());
        assert_eq!(Some(5), set.pop_min());
        assert_eq!(5, set.len());
        set.add(1);
        set.add(2);
        assert_eq!(7, set.len());
        assert_eq!(Some(6), set.pop_min_greater_than(2));
        assert_eq!(6, set.len());
        assert_eq!(Some(1), set.pop_min());
        assert_eq!(5, set.len());
        assert_eq!(Some(2), set.pop_min());
        assert_eq!(Some(9), set.pop_min_greater_than(8));
        assert_eq!(None, set.pop_min_greater_than(10));
        assert_eq!(Some(7), set.pop_min());
        assert_eq!(Some(8), set.pop_min_greater_than(7));
        assert_eq!(Some(10), set.pop_min());
        assert_eq!(0, set.len());
        assert_eq!(None, set.pop_min());
        assert_eq!(0, set.len());
    }

    #[test]
    fn no_duplicates() {
        let mut set = OrderedKeySet::new();
        assert!(set.add(7));
        assert!(!set.add(7));
        assert_eq!(1, set.len());
        assert!(set.remove(7));
        assert!(!set.remove(7));
        assert!(set.is_empty());
    }

    #[test]
    fn queries_on_empty_set() {
        let mut set = OrderedKeySet::new();
        assert_eq!(None, set.min());
        assert_eq!(None, set.min_greater_than(0));
        assert_eq!(None, set.pop_min());
        assert_eq!(None, set.pop_min_greater_than(3));
    }

    #[test]
    fn min_greater_than_does_not_remove() {
        let mut set = OrderedKeySet::new();
        set.add(4);
        set.add(9);
        assert_eq!(Some(9), set.min_greater_than(4));
        assert!(set.contains(9));
        assert_eq!(Some(4), set.min());
    }
}
