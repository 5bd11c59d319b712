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

//! Swaps the processing order of two vessels served back to back on the
//! same berth.
//!
//! `prepare` reads the incumbent schedule, sorts every berth's timeline by
//! start time and keeps each consecutive pair whose vessels are neighbors.
//! A move exchanges the queue positions of the pair, so the decoder serves
//! the later vessel first.

use crate::{
    memory::Schedule, mutator::Mutator, neighborhood::neighborhoods::Neighborhoods,
    operator::LocalSearchOperator, queue::VesselPriorityQueue,
};
use mooring_model::{index::VesselIndex, model::Model};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone, Default)]
pub struct TwoOptOperator {
    pairs: Vec<(VesselIndex, VesselIndex)>,
    timeline: Vec<VesselIndex>,
    cursor: usize,
}

impl TwoOptOperator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(num_vessels),
            timeline: Vec::with_capacity(num_vessels),
            cursor: 0,
        }
    }
}

impl<T, N> LocalSearchOperator<T, N> for TwoOptOperator
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn name(&self) -> &str {
        "TwoOptOperator"
    }

    fn prepare(
        &mut self,
        _model: &Model<T>,
        schedule: &Schedule<T>,
        _queue: &VesselPriorityQueue,
        neighborhoods: &N,
    ) {
        self.cursor = 0;
        self.pairs.clear();
        self.timeline.clear();
        self.timeline
            .extend((0..schedule.num_vessels()).map(VesselIndex::new));
        self.timeline.sort_unstable_by_key(|&v| {
            (
                schedule.berth_for_vessel(v),
                schedule.start_time_for_vessel(v),
                v,
            )
        });

        for window in self.timeline.windows(2) {
            let (first, second) = (window[0], window[1]);
            if schedule.berth_for_vessel(first) == schedule.berth_for_vessel(second)
                && neighborhoods.are_neighbors(first, second)
            {
                self.pairs.push((first, second));
            }
        }
    }

    fn next_neighbor(
        &mut self,
        _model: &Model<T>,
        _schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        _neighborhoods: &N,
    ) -> bool {
        while let Some(&(first, second)) = self.pairs.get(self.cursor) {
            self.cursor += 1;
            let positions = (
                mutator.queue().position_of(first),
                mutator.queue().position_of(second),
            );
            if let (Some(a), Some(b)) = positions {
                mutator.swap(a, b);
                return true;
            }
        }
        false
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{neighborhood::neighborhoods::FullNeighborhoods, operator::test_support::drain};
    use mooring_model::{
        index::BerthIndex, model::ModelBuilder, solution::Solution, time::ProcessingTime,
    };

    #[test]
    fn test_swaps_consecutive_vessels_per_berth() {
        let mut builder = ModelBuilder::<i64>::new(2, 4);
        for vessel in 0..4 {
            for berth in 0..2 {
                builder.set_vessel_processing_time(
                    VesselIndex::new(vessel),
                    BerthIndex::new(berth),
                    ProcessingTime::some(5),
                );
            }
        }
        let model = builder.build();
        let (b0, b1) = (BerthIndex::new(0), BerthIndex::new(1));
        // Berth 0 serves 2 then 0; berth 1 serves 1 then 3.
        let solution = Solution::new(30, vec![b0, b1, b0, b1], vec![5, 0, 0, 5]);

        let moves = drain(
            &mut TwoOptOperator::preallocated(4),
            &model,
            &solution,
            &FullNeighborhoods::new(4),
        );
        // Initial queue by start time: [1, 2, 0, 3].
        let queues: Vec<_> = moves.into_iter().map(|(queue, _)| queue).collect();
        assert_eq!(queues, vec![vec![1, 0, 2, 3], vec![3, 2, 0, 1]]);
    }

    #[test]
    fn test_single_vessel_per_berth_has_no_moves() {
        let mut builder = ModelBuilder::<i64>::new(2, 2);
        for vessel in 0..2 {
            for berth in 0..2 {
                builder.set_vessel_processing_time(
                    VesselIndex::new(vessel),
                    BerthIndex::new(berth),
                    ProcessingTime::some(5),
                );
            }
        }
        let model = builder.build();
        let solution = Solution::new(10, vec![BerthIndex::new(0), BerthIndex::new(1)], vec![0, 0]);
        assert!(
            drain(
                &mut TwoOptOperator::new(),
                &model,
                &solution,
                &FullNeighborhoods::new(2)
            )
            .is_empty()
        );
    }
}
