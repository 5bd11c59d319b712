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

//! The local search driver.
//!
//! Each iteration asks the operator for one move, decodes the mutated
//! genotype with the metaheuristic's evaluator and lets the metaheuristic
//! accept or reject the candidate. Rejected moves are rolled back through
//! the undo log. When the operator runs dry, the metaheuristic decides
//! between stopping, sweeping again and moving to the best rejected
//! candidate. The outcome always carries the best schedule seen.

use crate::{
    decoder::Decoder,
    memory::{Schedule, SearchMemory},
    meta::metaheuristic::{LocalOptimumAction, Metaheuristic},
    monitor::local_search_monitor::LocalSearchMonitor,
    neighborhood::neighborhoods::Neighborhoods,
    operator::LocalSearchOperator,
    result::LocalSearchEngineOutcome,
    stats::LocalSearchStatistics,
};
use mooring_model::{model::Model, solution::Solution};
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};
use std::time::Instant;

/// How the main loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Exit {
    LocalOptimum,
    Metaheuristic(String),
    Aborted(String),
}

/// Owns the search memory so that repeated runs reuse its buffers.
#[derive(Debug, Clone)]
pub struct LocalSearchEngine<T>
where
    T: SolverNumeric,
{
    memory: SearchMemory<T>,
}

impl<T> Default for LocalSearchEngine<T>
where
    T: SolverNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LocalSearchEngine<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            memory: SearchMemory::new(),
        }
    }

    /// Buffers grow if a later run has more vessels.
    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            memory: SearchMemory::preallocated(num_vessels),
        }
    }

    /// Improves `initial_solution` until the operator is exhausted and the
    /// metaheuristic stops, the metaheuristic terminates, or the monitor
    /// aborts.
    ///
    /// `initial_solution` must be feasible for `model`. The returned
    /// solution is the best schedule seen, so its objective never exceeds
    /// the initial one.
    ///
    /// # Panics
    ///
    /// Panics if `initial_solution` does not cover every vessel of `model`.
    #[allow(clippy::too_many_arguments)]
    pub fn run<D, N, O, M, SM>(
        &mut self,
        model: &Model<T>,
        decoder: &mut D,
        neighborhoods: &N,
        operator: &mut O,
        metaheuristic: &mut M,
        monitor: &mut SM,
        initial_solution: &Solution<T>,
    ) -> LocalSearchEngineOutcome<T>
    where
        D: Decoder<T, M::Evaluator>,
        N: Neighborhoods,
        O: LocalSearchOperator<T, N>,
        M: Metaheuristic<T>,
        SM: LocalSearchMonitor<T>,
    {
        assert_eq!(
            initial_solution.num_vessels(),
            model.num_vessels(),
            "called `LocalSearchEngine::run` with an initial solution of the wrong size: the model has {} vessels but the solution has {}",
            model.num_vessels(),
            initial_solution.num_vessels()
        );

        let start_time = Instant::now();
        let mut stats = LocalSearchStatistics::default();

        self.memory.initialize(initial_solution);
        let mut best = self.memory.current_schedule().clone();

        metaheuristic.on_start(model, self.memory.current_schedule());
        monitor.on_enter_search(model, self.memory.current_schedule(), &stats);

        self.prepare(model, operator, neighborhoods);
        // Candidates decoded since the operator was last prepared.
        let mut sweep_candidates: u64 = 0;

        let exit = loop {
            if let SearchCommand::Terminate(message) = monitor.search_command(&stats) {
                break Exit::Aborted(message);
            }
            if let SearchCommand::Terminate(message) =
                metaheuristic.search_command(stats.iterations, model, &best)
            {
                break Exit::Metaheuristic(message);
            }

            stats.on_iteration();

            let moved = {
                let (current, mut mutator) = self.memory.prepare_operator();
                operator.next_neighbor(model, current, &mut mutator, neighborhoods)
            };

            if !moved {
                self.memory.discard_candidate();
                stats.on_local_optimum();
                monitor.on_local_optimum(self.memory.current_schedule(), &stats);

                if sweep_candidates == 0 {
                    break Exit::LocalOptimum;
                }

                let action =
                    metaheuristic.on_local_optimum(model, self.memory.current_schedule(), &best);
                match action {
                    LocalOptimumAction::Stop => break Exit::LocalOptimum,
                    LocalOptimumAction::Terminate(message) => break Exit::Metaheuristic(message),
                    LocalOptimumAction::Restart => {
                        self.memory.clear_fallback();
                    }
                    LocalOptimumAction::AcceptFallback => {
                        if !self.memory.adopt_fallback() {
                            break Exit::LocalOptimum;
                        }
                        stats.on_solution_accepted();
                        metaheuristic.on_accept(model, self.memory.current_schedule());
                        monitor.on_solution_accepted(self.memory.current_schedule(), &stats);
                        self.update_best(model, &mut best, metaheuristic, monitor, &mut stats);
                    }
                }

                sweep_candidates = 0;
                self.prepare(model, operator, neighborhoods);
                monitor.on_iteration(self.memory.current_schedule(), &stats);
                continue;
            }

            let decoded = {
                let (queue, preferred_berths, candidate) = self.memory.evaluation_target();
                decoder.decode(
                    model,
                    queue,
                    preferred_berths,
                    metaheuristic.evaluator(),
                    candidate,
                )
            };

            if !decoded {
                self.memory.discard_candidate();
                stats.on_infeasible_candidate();
                monitor.on_iteration(self.memory.current_schedule(), &stats);
                continue;
            }

            sweep_candidates += 1;
            stats.on_solution_examined();

            let accept = metaheuristic.should_accept(
                model,
                self.memory.current_schedule(),
                self.memory.candidate_schedule(),
                &best,
            );

            if accept {
                self.memory.accept_candidate();
                stats.on_solution_accepted();
                metaheuristic.on_accept(model, self.memory.current_schedule());
                monitor.on_solution_accepted(self.memory.current_schedule(), &stats);
                self.update_best(model, &mut best, metaheuristic, monitor, &mut stats);

                sweep_candidates = 0;
                self.prepare(model, operator, neighborhoods);
            } else {
                if metaheuristic.admits_as_fallback(model, self.memory.candidate_schedule(), &best)
                {
                    self.memory.record_fallback();
                }
                self.memory.discard_candidate();
                metaheuristic.on_reject(model, self.memory.candidate_schedule());
                monitor.on_solution_rejected(self.memory.candidate_schedule(), &stats);
            }

            monitor.on_iteration(self.memory.current_schedule(), &stats);
        };

        stats.set_total_time(start_time.elapsed());
        monitor.on_exit_search(&best, &stats);

        let solution = Solution::from(best);
        match exit {
            Exit::LocalOptimum => LocalSearchEngineOutcome::local_optimum(solution, stats),
            Exit::Metaheuristic(message) => {
                LocalSearchEngineOutcome::metaheuristic(solution, message, stats)
            }
            Exit::Aborted(message) => LocalSearchEngineOutcome::aborted(solution, message, stats),
        }
    }

    #[inline]
    fn prepare<N, O>(&self, model: &Model<T>, operator: &mut O, neighborhoods: &N)
    where
        N: Neighborhoods,
        O: LocalSearchOperator<T, N>,
    {
        operator.prepare(
            model,
            self.memory.current_schedule(),
            self.memory.queue(),
            neighborhoods,
        );
    }

    /// Copies the current schedule into `best` if it is strictly better.
    fn update_best<M, SM>(
        &self,
        model: &Model<T>,
        best: &mut Schedule<T>,
        metaheuristic: &mut M,
        monitor: &mut SM,
        stats: &mut LocalSearchStatistics,
    ) where
        M: Metaheuristic<T>,
        SM: LocalSearchMonitor<T>,
    {
        let current = self.memory.current_schedule();
        if current.objective_value() >= best.objective_value() {
            return;
        }
        best.clone_from(current);
        stats.on_improving_solution();
        metaheuristic.on_new_best(model, best);
        monitor.on_solution_found(best, stats);
    }
}
