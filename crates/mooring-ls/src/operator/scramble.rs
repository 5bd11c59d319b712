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

//! Shuffles a random window of the priority queue.
//!
//! Each move picks a window of `window` consecutive queue positions (the
//! whole queue when it is shorter) and shuffles it. A sweep consists of
//! `attempts` moves. All randomness comes from the operator's own generator,
//! so a fixed seed replays the same sequence of moves.

use crate::{
    memory::Schedule, mutator::Mutator, neighborhood::neighborhoods::Neighborhoods,
    operator::LocalSearchOperator, queue::VesselPriorityQueue,
};
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_WINDOW: usize = 4;
pub const DEFAULT_ATTEMPTS: usize = 32;

#[derive(Debug, Clone)]
pub struct ScrambleOperator<R> {
    window: usize,
    attempts: usize,
    performed: usize,
    rng: R,
}

impl<R> ScrambleOperator<R>
where
    R: Rng,
{
    /// # Panics
    ///
    /// Panics if `window < 2`.
    pub fn new(window: usize, attempts: usize, rng: R) -> Self {
        assert!(
            window >= 2,
            "called `ScrambleOperator::new` with a window smaller than 2: the window is {}",
            window
        );
        Self {
            window,
            attempts,
            performed: 0,
            rng,
        }
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl ScrambleOperator<ChaCha8Rng> {
    pub fn with_seed(window: usize, attempts: usize, seed: u64) -> Self {
        Self::new(window, attempts, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<T, N, R> LocalSearchOperator<T, N> for ScrambleOperator<R>
where
    T: SolverNumeric,
    N: Neighborhoods,
    R: Rng,
{
    fn name(&self) -> &str {
        "ScrambleOperator"
    }

    fn prepare(
        &mut self,
        _model: &Model<T>,
        _schedule: &Schedule<T>,
        _queue: &VesselPriorityQueue,
        _neighborhoods: &N,
    ) {
        self.performed = 0;
    }

    fn next_neighbor(
        &mut self,
        _model: &Model<T>,
        _schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        _neighborhoods: &N,
    ) -> bool {
        let len = mutator.len();
        if len < 2 || self.performed >= self.attempts {
            return false;
        }
        let window = self.window.min(len);
        let start = self.rng.random_range(0..=len - window);
        mutator.shuffle_range(start, start + window, &mut self.rng);
        self.performed += 1;
        true
    }

    fn reset(&mut self) {
        self.performed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{neighborhood::neighborhoods::FullNeighborhoods, operator::test_support::drain};
    use mooring_model::{
        index::{BerthIndex, VesselIndex},
        model::ModelBuilder,
        solution::Solution,
        time::ProcessingTime,
    };

    fn fixture() -> (Model<i64>, Solution<i64>) {
        let mut builder = ModelBuilder::<i64>::new(1, 6);
        for vessel in 0..6 {
            builder.set_vessel_processing_time(
                VesselIndex::new(vessel),
                BerthIndex::new(0),
                ProcessingTime::some(1),
            );
        }
        let solution = Solution::new(21, vec![BerthIndex::new(0); 6], (0..6).collect());
        (builder.build(), solution)
    }

    #[test]
    fn test_same_seed_same_moves() {
        let (model, solution) = fixture();
        let neighborhoods = FullNeighborhoods::new(6);
        let first = drain(
            &mut ScrambleOperator::with_seed(3, 8, 11),
            &model,
            &solution,
            &neighborhoods,
        );
        let second = drain(
            &mut ScrambleOperator::with_seed(3, 8, 11),
            &model,
            &solution,
            &neighborhoods,
        );
        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
    }

    #[test]
    fn test_moves_stay_permutations_within_window() {
        let (model, solution) = fixture();
        let moves = drain(
            &mut ScrambleOperator::with_seed(10, 5, 3),
            &model,
            &solution,
            &FullNeighborhoods::new(6),
        );
        assert_eq!(moves.len(), 5);
        for (queue, _) in moves {
            let mut sorted = queue.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..6).collect::<Vec<_>>());
        }
    }

    #[test]
    #[should_panic(expected = "window smaller than 2")]
    fn test_tiny_window_panics() {
        let _ = ScrambleOperator::with_seed(1, 1, 0);
    }
}
