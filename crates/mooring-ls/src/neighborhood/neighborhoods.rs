// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The neighborhood relation between vessels.
//!
//! Neighbor lists are stored in compressed sparse row form: one flat vector
//! of vessel indices plus `num_vessels + 1` offsets, so the neighbors of
//! vessel `i` are `neighbors[offsets[i]..offsets[i + 1]]`.

use mooring_model::index::VesselIndex;

pub trait Neighborhoods: std::fmt::Debug {
    fn name(&self) -> &str;

    fn num_vessels(&self) -> usize;

    /// # Panics
    ///
    /// Panics if `a` or `b` is out of bounds.
    fn are_neighbors(&self, a: VesselIndex, b: VesselIndex) -> bool {
        for index in [a.get(), b.get()] {
            assert!(
                index < self.num_vessels(),
                "called `Neighborhoods::are_neighbors` with vessel index out of bounds: the len is {} but the index is {}",
                self.num_vessels(),
                index
            );
        }
        unsafe { self.are_neighbors_unchecked(a, b) }
    }

    /// # Safety
    ///
    /// `a` and `b` must be within `0..self.num_vessels()`.
    unsafe fn are_neighbors_unchecked(&self, a: VesselIndex, b: VesselIndex) -> bool;

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    fn neighbors_of(&self, vessel_index: VesselIndex) -> &[VesselIndex] {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Neighborhoods::neighbors_of` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        unsafe { self.neighbors_of_unchecked(vessel_index) }
    }

    /// # Safety
    ///
    /// `vessel_index` must be within `0..self.num_vessels()`.
    unsafe fn neighbors_of_unchecked(&self, vessel_index: VesselIndex) -> &[VesselIndex];
}

/// Adjacency lists in compressed sparse row form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CsrAdjacency {
    neighbors: Vec<VesselIndex>,
    offsets: Vec<usize>,
}

impl CsrAdjacency {
    /// Builds the lists by asking `adjacent(i, j)` for every ordered pair
    /// `i != j`.
    pub(crate) fn build<F>(num_vessels: usize, mut adjacent: F) -> Self
    where
        F: FnMut(VesselIndex, VesselIndex) -> bool,
    {
        let mut neighbors = Vec::new();
        let mut offsets = Vec::with_capacity(num_vessels + 1);
        offsets.push(0);
        for i in 0..num_vessels {
            let source = VesselIndex::new(i);
            for j in (0..num_vessels).filter(|&j| j != i) {
                let candidate = VesselIndex::new(j);
                if adjacent(source, candidate) {
                    neighbors.push(candidate);
                }
            }
            offsets.push(neighbors.len());
        }
        neighbors.shrink_to_fit();
        Self { neighbors, offsets }
    }

    #[inline]
    pub(crate) fn num_vessels(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub(crate) fn num_edges(&self) -> usize {
        self.neighbors.len()
    }

    /// # Safety
    ///
    /// `vessel_index` must be within `0..self.num_vessels()`.
    #[inline]
    pub(crate) unsafe fn neighbors_of_unchecked(&self, vessel_index: VesselIndex) -> &[VesselIndex] {
        let index = vessel_index.get();
        debug_assert!(
            index < self.num_vessels(),
            "called `CsrAdjacency::neighbors_of_unchecked` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        unsafe {
            let start = *self.offsets.get_unchecked(index);
            let end = *self.offsets.get_unchecked(index + 1);
            self.neighbors.get_unchecked(start..end)
        }
    }
}

/// Every vessel neighbors every other vessel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullNeighborhoods {
    adjacency: CsrAdjacency,
}

impl FullNeighborhoods {
    pub fn new(num_vessels: usize) -> Self {
        Self {
            adjacency: CsrAdjacency::build(num_vessels, |_, _| true),
        }
    }
}

impl Neighborhoods for FullNeighborhoods {
    fn name(&self) -> &str {
        "FullNeighborhoods"
    }

    #[inline]
    fn num_vessels(&self) -> usize {
        self.adjacency.num_vessels()
    }

    #[inline]
    unsafe fn are_neighbors_unchecked(&self, a: VesselIndex, b: VesselIndex) -> bool {
        a != b
    }

    #[inline]
    unsafe fn neighbors_of_unchecked(&self, vessel_index: VesselIndex) -> &[VesselIndex] {
        unsafe { self.adjacency.neighbors_of_unchecked(vessel_index) }
    }
}
