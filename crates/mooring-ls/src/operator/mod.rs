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

//! Move generators over the genotype.
//!
//! An operator is prepared once per accepted incumbent and then asked for
//! one neighbor at a time. Each call to `next_neighbor` applies a single move
//! through the [`Mutator`] and returns `true`, or returns `false` once the
//! neighborhood is exhausted. The engine decodes, evaluates and, if the move
//! is rejected, rolls it back before asking again, so operators only keep
//! cursors and never observe their own rejected edits.
//!
//! - `swap`, `shift`, `two_opt`, `scramble`: the simple moves.
//! - `compound`: operators that own and schedule other operators.

pub mod compound;
pub mod scramble;
pub mod shift;
pub mod swap;
pub mod two_opt;

use crate::{
    memory::Schedule, mutator::Mutator, neighborhood::neighborhoods::Neighborhoods,
    queue::VesselPriorityQueue,
};
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;

pub trait LocalSearchOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn name(&self) -> &str;

    /// Called whenever the incumbent changes. `schedule` is the decoded
    /// incumbent and `queue` its priority queue.
    fn prepare(
        &mut self,
        model: &Model<T>,
        schedule: &Schedule<T>,
        queue: &VesselPriorityQueue,
        neighborhoods: &N,
    );

    /// Applies the next move, or returns `false` if there is none left.
    fn next_neighbor(
        &mut self,
        model: &Model<T>,
        schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        neighborhoods: &N,
    ) -> bool;

    /// Rewinds the cursor without redoing the analysis of `prepare`.
    fn reset(&mut self);
}

impl<T, N> std::fmt::Debug for dyn LocalSearchOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchOperator({})", self.name())
    }
}

impl<T, N> std::fmt::Display for dyn LocalSearchOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<T, N, O> LocalSearchOperator<T, N> for Box<O>
where
    T: SolverNumeric,
    N: Neighborhoods,
    O: LocalSearchOperator<T, N> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn prepare(
        &mut self,
        model: &Model<T>,
        schedule: &Schedule<T>,
        queue: &VesselPriorityQueue,
        neighborhoods: &N,
    ) {
        (**self).prepare(model, schedule, queue, neighborhoods)
    }

    fn next_neighbor(
        &mut self,
        model: &Model<T>,
        schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        neighborhoods: &N,
    ) -> bool {
        (**self).next_neighbor(model, schedule, mutator, neighborhoods)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{memory::SearchMemory, neighborhood::neighborhoods::Neighborhoods};
    use mooring_model::{model::Model, solution::Solution};
    use mooring_search::num::SolverNumeric;

    use super::LocalSearchOperator;

    /// Prepares `operator` on `solution` and drains it, rolling back after
    /// every move. Returns the genotype seen after each move.
    pub(crate) fn drain<T, N, O>(
        operator: &mut O,
        model: &Model<T>,
        solution: &Solution<T>,
        neighborhoods: &N,
    ) -> Vec<(Vec<usize>, Vec<usize>)>
    where
        T: SolverNumeric,
        N: Neighborhoods,
        O: LocalSearchOperator<T, N>,
    {
        let mut memory = SearchMemory::new();
        memory.initialize(solution);
        let mut seen = Vec::new();
        loop {
            let moved = {
                let (schedule, mut mutator) = memory.prepare_operator();
                if seen.is_empty() {
                    operator.prepare(model, schedule, mutator.queue(), neighborhoods);
                }
                operator.next_neighbor(model, schedule, &mut mutator, neighborhoods)
            };
            if !moved {
                break;
            }
            seen.push((
                memory.queue().iter().map(|v| v.get()).collect(),
                memory.preferred_berths().iter().map(|b| b.get()).collect(),
            ));
            memory.discard_candidate();
            assert!(seen.len() < 10_000, "operator does not terminate");
        }
        seen
    }
}
