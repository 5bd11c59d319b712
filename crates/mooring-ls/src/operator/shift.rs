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

//! Moves one vessel to a different berth.
//!
//! Every `(vessel, berth)` pair where the berth is allowed and differs from
//! the vessel's current preference is one move. The vessel keeps its place
//! in the queue.

use crate::{
    memory::Schedule, mutator::Mutator, neighborhood::neighborhoods::Neighborhoods,
    operator::LocalSearchOperator, queue::VesselPriorityQueue,
};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftOperator {
    vessel: usize,
    berth: usize,
    num_vessels: usize,
    num_berths: usize,
}

impl ShiftOperator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, N> LocalSearchOperator<T, N> for ShiftOperator
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn name(&self) -> &str {
        "ShiftOperator"
    }

    fn prepare(
        &mut self,
        model: &Model<T>,
        _schedule: &Schedule<T>,
        _queue: &VesselPriorityQueue,
        _neighborhoods: &N,
    ) {
        self.num_vessels = model.num_vessels();
        self.num_berths = model.num_berths();
        self.vessel = 0;
        self.berth = 0;
    }

    fn next_neighbor(
        &mut self,
        model: &Model<T>,
        _schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        _neighborhoods: &N,
    ) -> bool {
        while self.vessel < self.num_vessels {
            let vessel_index = VesselIndex::new(self.vessel);
            let current = mutator.preferred_berth(vessel_index);
            while self.berth < self.num_berths {
                let berth_index = BerthIndex::new(self.berth);
                self.berth += 1;
                if berth_index != current && model.vessel_allowed_on_berth(vessel_index, berth_index)
                {
                    mutator.set_preferred_berth(vessel_index, berth_index);
                    return true;
                }
            }
            self.vessel += 1;
            self.berth = 0;
        }
        false
    }

    fn reset(&mut self) {
        self.vessel = 0;
        self.berth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{neighborhood::neighborhoods::FullNeighborhoods, operator::test_support::drain};
    use mooring_model::{model::ModelBuilder, solution::Solution, time::ProcessingTime};

    #[test]
    fn test_visits_every_other_allowed_berth() {
        let (v0, v1) = (VesselIndex::new(0), VesselIndex::new(1));
        let (b0, b1, b2) = (BerthIndex::new(0), BerthIndex::new(1), BerthIndex::new(2));
        let mut builder = ModelBuilder::<i64>::new(3, 2);
        builder
            .set_vessel_processing_time(v0, b0, ProcessingTime::some(3))
            .set_vessel_processing_time(v0, b1, ProcessingTime::some(3))
            .set_vessel_processing_time(v0, b2, ProcessingTime::some(3))
            .set_vessel_processing_time(v1, b2, ProcessingTime::some(3));
        let model = builder.build();
        let solution = Solution::new(6, vec![b1, b2], vec![0, 0]);

        let mut operator = ShiftOperator::new();
        let moves = drain(&mut operator, &model, &solution, &FullNeighborhoods::new(2));
        let berths: Vec<_> = moves.into_iter().map(|(_, berths)| berths).collect();
        assert_eq!(berths, vec![vec![0, 2], vec![2, 2]]);
    }

    #[test]
    fn test_reset_rewinds() {
        let v0 = VesselIndex::new(0);
        let mut builder = ModelBuilder::<i64>::new(2, 1);
        builder
            .set_vessel_processing_time(v0, BerthIndex::new(0), ProcessingTime::some(1))
            .set_vessel_processing_time(v0, BerthIndex::new(1), ProcessingTime::some(1));
        let model = builder.build();
        let solution = Solution::new(1, vec![BerthIndex::new(0)], vec![0]);
        let mut operator = ShiftOperator::new();
        let neighborhoods = FullNeighborhoods::new(1);
        assert_eq!(drain(&mut operator, &model, &solution, &neighborhoods).len(), 1);
        <ShiftOperator as LocalSearchOperator<i64, FullNeighborhoods>>::reset(&mut operator);
        assert_eq!(operator.vessel, 0);
    }
}
