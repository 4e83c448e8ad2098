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

//! Segmentation model of an NMR instance. The input is a list of inter-atomic
//! distance edges on atoms `1..=n`; an edge `(i, j)` with `j > i + 3` is a
//! *pruning edge* and can prune the candidate positions of every atom in
//! `[i + 3, j]`. The atoms covered by at least one pruning edge are split into
//! *segments*, maximal contiguous ranges covered by exactly the same set of
//! edges. A segment of `p` atoms weighs `2^p`, the number of leaves of the
//! search subtree it represents.
//!
//! The instance owns both collections and links them through two sorted id
//! lists (the segments covered by each edge, the edges covering each segment),
//! so incidence can be walked in O(degree) in both directions without any
//! cyclic reference. Ids are 1-based, assigned during construction, and stable
//! for the lifetime of the instance.

use std::ops::Index;

use rustc_hash::FxHashMap;

use crate::common::{Error, Weight};

/// Abstraction used as a typesafe way of retrieving an `Edge` in the `Instance` structure
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeId(pub usize);

/// Abstraction used as a typesafe way of retrieving a `Segment` in the `Instance` structure
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SegmentId(pub usize);

/// A pruning edge `(i, j)`: a distance constraint between atoms `i` and `j`
/// with `j > i + 3`
#[derive(Debug)]
pub struct Edge {
    i: usize,
    j: usize,
    /// Ids of the segments covered by this edge, ascending
    segments: Vec<SegmentId>,
}

impl Edge {
    fn new(i: usize, j: usize) -> Self {
        Self {
            i,
            j,
            segments: vec![],
        }
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    /// First atom whose candidate positions this edge can prune
    pub fn first_covered(&self) -> usize {
        self.i + 3
    }

    /// True iff every atom of the segment is covered by this edge
    pub fn covers(&self, segment: &Segment) -> bool {
        self.i + 3 <= segment.start() && segment.end() <= self.j
    }

    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }
}

/// A maximal contiguous atom range `[start, end]` covered by the same set of
/// pruning edges
#[derive(Debug)]
pub struct Segment {
    start: usize,
    end: usize,
    weight: Weight,
    /// Ids of the edges covering this segment, ascending
    edges: Vec<EdgeId>,
}

impl Segment {
    fn new(start: usize, end: usize) -> Result<Self, Error> {
        let length = end - start + 1;
        if length > 63 {
            return Err(Error::Overflow(format!(
                "segment [{}, {}] spans {} atoms, its weight does not fit in 64 bits",
                start, end, length
            )));
        }
        Ok(Self {
            start,
            end,
            weight: 1 << length,
            edges: vec![],
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// `2^p` where `p` is the number of atoms of the segment
    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// Data structure representing the instance to order: the pruning edges, the
/// segments they induce, and the bipartite incidence between the two.
/// Immutable once built; the solvers own all their search state.
#[derive(Debug)]
pub struct Instance {
    /// Largest atom index appearing in the input, pruning edge or not
    n_nodes: usize,
    edges: Vec<Edge>,
    segments: Vec<Segment>,
}

impl Instance {
    /// Builds the instance from raw `(i, j)` records. Records with
    /// `j <= i + 3` are discretisation edges: they contribute to `n_nodes`
    /// and are discarded. The pruning edges keep their relative input order
    /// and receive ids `1..`.
    pub fn from_records(records: &[(usize, usize)]) -> Result<Self, Error> {
        if records.is_empty() {
            return Err(Error::Input(String::from("no edges found")));
        }
        let mut n_nodes = 0;
        let mut edges = vec![];
        for &(i, j) in records {
            if n_nodes < j {
                n_nodes = j;
            }
            if j > i + 3 {
                edges.push(Edge::new(i, j));
            }
        }
        let segments = Self::derive_segments(&mut edges)?;
        Ok(Self {
            n_nodes,
            edges,
            segments,
        })
    }

    /// Splits the atoms covered by the pruning edges into segments and fills
    /// the incidence lists on both sides.
    fn derive_segments(edges: &mut [Edge]) -> Result<Vec<Segment>, Error> {
        // covering[a]: ids of the edges covering atom a, ascending because the
        // edges are visited in id order
        let mut covering: FxHashMap<usize, Vec<EdgeId>> = FxHashMap::default();
        for (n, edge) in edges.iter().enumerate() {
            for atom in edge.first_covered()..=edge.j {
                covering.entry(atom).or_default().push(EdgeId(n + 1));
            }
        }
        let mut atoms: Vec<usize> = covering.keys().copied().collect();
        atoms.sort_unstable();

        // consecutive atoms covered by the same set of edges belong to the
        // same segment
        let mut segments: Vec<Segment> = vec![];
        if let Some((&first, rest)) = atoms.split_first() {
            let mut start = first;
            let mut end = first;
            for &atom in rest {
                if atom == end + 1 && covering[&atom] == covering[&start] {
                    end = atom;
                } else {
                    segments.push(Segment::new(start, end)?);
                    start = atom;
                    end = atom;
                }
            }
            segments.push(Segment::new(start, end)?);
        }

        // O(len(segments) * len(edges)); both lists end up sorted because the
        // loops run in ascending id order
        for (s, segment) in segments.iter_mut().enumerate() {
            for (n, edge) in edges.iter_mut().enumerate() {
                if edge.covers(segment) {
                    edge.segments.push(SegmentId(s + 1));
                    segment.edges.push(EdgeId(n + 1));
                }
            }
        }
        Ok(segments)
    }

    /// Largest atom index of the input
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of pruning edges
    pub fn number_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of segments
    pub fn number_segments(&self) -> usize {
        self.segments.len()
    }

    /// Iterates over the edge ids, ascending
    pub fn edges_iter(&self) -> impl Iterator<Item = EdgeId> {
        (1..=self.edges.len()).map(EdgeId)
    }

    /// Iterates over the segment ids, ascending (which is also ascending atom
    /// order)
    pub fn segments_iter(&self) -> impl Iterator<Item = SegmentId> {
        (1..=self.segments.len()).map(SegmentId)
    }
}

impl Index<EdgeId> for Instance {
    type Output = Edge;

    fn index(&self, id: EdgeId) -> &Self::Output {
        &self.edges[id.0 - 1]
    }
}

impl Index<SegmentId> for Instance {
    type Output = Segment;

    fn index(&self, id: SegmentId) -> &Self::Output {
        &self.segments[id.0 - 1]
    }
}

#[cfg(test)]
mod test_instance {
    use super::*;

    #[test]
    fn segments_and_incidence() {
        let instance = Instance::from_records(&[(1, 10), (3, 15), (15, 20)]).unwrap();
        assert_eq!(20, instance.n_nodes());
        assert_eq!(3, instance.number_edges());

        let expected = [(4, 5), (6, 10), (11, 15), (18, 20)];
        assert_eq!(expected.len(), instance.number_segments());
        for (sid, &(start, end)) in instance.segments_iter().zip(expected.iter()) {
            assert_eq!(start, instance[sid].start());
            assert_eq!(end, instance[sid].end());
        }

        assert_eq!(&[SegmentId(1), SegmentId(2)], instance[EdgeId(1)].segments());
        assert_eq!(&[SegmentId(2), SegmentId(3)], instance[EdgeId(2)].segments());
        assert_eq!(&[SegmentId(4)], instance[EdgeId(3)].segments());

        assert_eq!(&[EdgeId(1)], instance[SegmentId(1)].edges());
        assert_eq!(&[EdgeId(1), EdgeId(2)], instance[SegmentId(2)].edges());
        assert_eq!(&[EdgeId(2)], instance[SegmentId(3)].edges());
        assert_eq!(&[EdgeId(3)], instance[SegmentId(4)].edges());
    }

    #[test]
    fn segment_weights_are_powers_of_two() {
        let instance = Instance::from_records(&[(1, 10), (3, 15), (15, 20)]).unwrap();
        assert_eq!(4, instance[SegmentId(1)].weight());
        assert_eq!(32, instance[SegmentId(2)].weight());
        assert_eq!(32, instance[SegmentId(3)].weight());
        assert_eq!(8, instance[SegmentId(4)].weight());
    }

    #[test]
    fn incidence_bounds() {
        // every covered segment lies within [i + 3, j] of its covering edges
        let instance =
            Instance::from_records(&[(1, 8), (2, 9), (1, 14), (3, 14), (5, 14)]).unwrap();
        for eid in instance.edges_iter() {
            let edge = &instance[eid];
            for &sid in edge.segments() {
                let segment = &instance[sid];
                assert!(edge.first_covered() <= segment.start());
                assert!(segment.end() <= edge.j());
                assert!(segment.edges().contains(&eid));
            }
        }
        for sid in instance.segments_iter() {
            for &eid in instance[sid].edges() {
                assert!(instance[eid].segments().contains(&sid));
            }
        }
    }

    #[test]
    fn segments_partition_covered_atoms() {
        let instance =
            Instance::from_records(&[(1, 8), (2, 9), (1, 14), (3, 14), (5, 14)]).unwrap();
        // pairwise disjoint, ascending, and adjacent segments differ in their
        // covering edge sets
        let sids: Vec<SegmentId> = instance.segments_iter().collect();
        for pair in sids.windows(2) {
            let (a, b) = (&instance[pair[0]], &instance[pair[1]]);
            assert!(a.end() < b.start());
            if a.end() + 1 == b.start() {
                assert_ne!(a.edges(), b.edges());
            }
        }
        // every atom covered by a pruning edge lies in exactly one segment
        for eid in instance.edges_iter() {
            let edge = &instance[eid];
            for atom in edge.first_covered()..=edge.j() {
                let owners = sids
                    .iter()
                    .filter(|&&sid| instance[sid].start() <= atom && atom <= instance[sid].end())
                    .count();
                assert_eq!(1, owners);
            }
        }
    }

    #[test]
    fn discretisation_edges_are_discarded() {
        let instance = Instance::from_records(&[(1, 4), (1, 9), (2, 10), (3, 11)]).unwrap();
        assert_eq!(3, instance.number_edges());
        assert_eq!(11, instance.n_nodes());
        assert_eq!(9, instance[EdgeId(1)].j());
    }

    #[test]
    fn no_pruning_edge_yields_no_segment() {
        let instance = Instance::from_records(&[(1, 4), (2, 5)]).unwrap();
        assert_eq!(0, instance.number_edges());
        assert_eq!(0, instance.number_segments());
        assert_eq!(5, instance.n_nodes());
    }

    #[test]
    fn empty_input_is_rejected() {
        match Instance::from_records(&[]) {
            Err(Error::Input(_)) => (),
            other => panic!("expected an input error, got {:?}", other),
        }
    }

    #[test]
    fn oversized_segment_is_rejected() {
        // a single edge covering 64 atoms
        match Instance::from_records(&[(1, 67)]) {
            Err(Error::Overflow(_)) => (),
            other => panic!("expected an overflow error, got {:?}", other),
        }
    }

    #[test]
    fn longest_representable_segment() {
        let instance = Instance::from_records(&[(1, 66)]).unwrap();
        assert_eq!(1, instance.number_segments());
        assert_eq!(1 << 63, instance[SegmentId(1)].weight());
    }
}
