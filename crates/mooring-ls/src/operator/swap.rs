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

//! Exchanges the preferred berths of two neighboring vessels.
//!
//! The operator walks every unordered pair `(u, w)` with `w` in the neighbor
//! list of `u` and `u < w`. A pair yields a move only if the two vessels
//! currently prefer different berths and each one is allowed on the other's
//! berth. Start times are recomputed by the decoder.

use crate::{
    memory::Schedule, mutator::Mutator, neighborhood::neighborhoods::Neighborhoods,
    operator::LocalSearchOperator, queue::VesselPriorityQueue,
};
use mooring_model::{index::VesselIndex, model::Model};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapOperator {
    vessel: usize,
    cursor: usize,
    num_vessels: usize,
}

impl SwapOperator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, N> LocalSearchOperator<T, N> for SwapOperator
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn name(&self) -> &str {
        "SwapOperator"
    }

    fn prepare(
        &mut self,
        model: &Model<T>,
        _schedule: &Schedule<T>,
        _queue: &VesselPriorityQueue,
        _neighborhoods: &N,
    ) {
        self.num_vessels = model.num_vessels();
        self.vessel = 0;
        self.cursor = 0;
    }

    fn next_neighbor(
        &mut self,
        model: &Model<T>,
        _schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        neighborhoods: &N,
    ) -> bool {
        while self.vessel < self.num_vessels {
            let u = VesselIndex::new(self.vessel);
            let neighbors = neighborhoods.neighbors_of(u);
            while self.cursor < neighbors.len() {
                let w = neighbors[self.cursor];
                self.cursor += 1;
                if w <= u {
                    continue;
                }
                let (berth_u, berth_w) = (mutator.preferred_berth(u), mutator.preferred_berth(w));
                if berth_u == berth_w
                    || !model.vessel_allowed_on_berth(u, berth_w)
                    || !model.vessel_allowed_on_berth(w, berth_u)
                {
                    continue;
                }
                mutator.set_preferred_berth(u, berth_w);
                mutator.set_preferred_berth(w, berth_u);
                return true;
            }
            self.vessel += 1;
            self.cursor = 0;
        }
        false
    }

    fn reset(&mut self) {
        self.vessel = 0;
        self.cursor = 0;
    }
}
