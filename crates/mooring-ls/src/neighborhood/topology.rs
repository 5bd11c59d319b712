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

//! Neighborhoods derived from resource contention.
//!
//! Two vessels are neighbors when some berth admits both of them and their
//! service windows `[arrival, deadline)` overlap. Pairs that can never meet
//! on a berth cannot influence each other's start times, so moves combining
//! them are skipped.

use crate::neighborhood::neighborhoods::{CsrAdjacency, Neighborhoods};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTopology {
    adjacency: CsrAdjacency,
}

impl StaticTopology {
    pub fn from_model<T>(model: &Model<T>) -> Self
    where
        T: SolverNumeric,
    {
        let adjacency = CsrAdjacency::build(model.num_vessels(), |a, b| {
            let overlap = model.vessel_arrival_time(a) < model.vessel_latest_departure_time(b)
                && model.vessel_arrival_time(b) < model.vessel_latest_departure_time(a);
            overlap
                && (0..model.num_berths()).map(BerthIndex::new).any(|berth| {
                    model.vessel_allowed_on_berth(a, berth)
                        && model.vessel_allowed_on_berth(b, berth)
                })
        });
        Self { adjacency }
    }

    /// Number of directed neighbor relations.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.adjacency.num_edges()
    }
}

impl<T> From<&Model<T>> for StaticTopology
where
    T: SolverNumeric,
{
    fn from(model: &Model<T>) -> Self {
        Self::from_model(model)
    }
}

impl Neighborhoods for StaticTopology {
    fn name(&self) -> &str {
        "StaticTopology"
    }

    #[inline]
    fn num_vessels(&self) -> usize {
        self.adjacency.num_vessels()
    }

    #[inline]
    unsafe fn are_neighbors_unchecked(&self, a: VesselIndex, b: VesselIndex) -> bool {
        unsafe { self.adjacency.neighbors_of_unchecked(a).contains(&b) }
    }

    #[inline]
    unsafe fn neighbors_of_unchecked(&self, vessel_index: VesselIndex) -> &[VesselIndex] {
        unsafe { self.adjacency.neighbors_of_unchecked(vessel_index) }
    }
}
