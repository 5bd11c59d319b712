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

//! Branch-and-bound solver for the berth allocation problem.
//!
//! `BnbSolver` is the execution engine only: the order in which the tree is
//! explored comes from a [`DecisionBuilder`] and the bounds from an
//! [`ObjectiveEvaluator`]. The solver owns the trail, the decision stack and
//! the berth availability so that repeated solves reuse their buffers.
//!
//! The search is a depth-first walk over semi-active, chronologically
//! ordered schedules. A node is pruned when its lower bound reaches the
//! incumbent, so an exhausted tree proves the incumbent optimal.

use crate::{
    berth_availability::BerthAvailability,
    branching::decision::{Decision, DecisionBuilder},
    eval::evaluator::ObjectiveEvaluator,
    fixed::FixedAssignment,
    incumbent::Incumbent,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::{BnbSolverOutcome, BnbTerminationReason},
    stack::SearchStack,
    state::SearchState,
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use mooring_model::{feasibility::check_solution, model::Model, solution::Solution};
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

#[derive(Debug, Clone)]
pub struct BnbSolver<T>
where
    T: SolverNumeric,
{
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
    berth_availability: BerthAvailability<T>,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
            berth_availability: BerthAvailability::new(),
        }
    }

    /// Reserves the buffers for a model of the given size up front.
    ///
    /// # Note
    ///
    /// Every solve grows the buffers to the model it is given, so this only
    /// moves the allocations to construction time.
    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_vessels),
            stack: SearchStack::preallocated(num_berths, num_vessels),
            berth_availability: BerthAvailability::preallocated(num_berths),
        }
    }

    #[inline]
    pub fn solve<B, E, S>(
        &mut self,
        model: &Model<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_with_warm_start(model, builder, evaluator, monitor, &[], None)
    }

    #[inline]
    pub fn solve_with_fixed<B, E, S>(
        &mut self,
        model: &Model<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        fixed: &[FixedAssignment<T>],
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_with_warm_start(model, builder, evaluator, monitor, fixed, None)
    }

    /// Solves `model` with `fixed` pre-applied, seeding the incumbent with
    /// `initial_solution`.
    ///
    /// The warm start is recomputed against `model` and only used if it is
    /// feasible and agrees with every fixed assignment; otherwise it is
    /// ignored. When the search cannot beat it, the warm start itself is
    /// returned.
    ///
    /// # Panics
    ///
    /// Panics if a fixed assignment references a vessel or berth outside
    /// `model`, or if two fixed assignments pin the same vessel. Callers going
    /// through `mooring-api` get both cases back as errors before the solver
    /// is reached.
    pub fn solve_with_warm_start<B, E, S>(
        &mut self,
        model: &Model<T>,
        builder: &mut B,
        evaluator: &mut E,
        mut monitor: S,
        fixed: &[FixedAssignment<T>],
        initial_solution: Option<&Solution<T>>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        self.reset();
        let session = BnbSolverSearchSession::new(self, model, fixed, builder, evaluator, &mut monitor);
        let outcome = session.run(initial_solution);
        self.reset();
        outcome
    }

    /// Clears the per-run state but keeps the allocated capacity.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
        self.berth_availability.reset();
    }
}

/// Returns `solution` rebuilt against `model` if it is feasible and honours
/// every fixed assignment.
fn admissible_warm_start<T>(
    model: &Model<T>,
    fixed: &[FixedAssignment<T>],
    solution: &Solution<T>,
) -> Option<Solution<T>>
where
    T: SolverNumeric,
{
    let candidate = Solution::from_assignments(
        model,
        solution.berths().to_vec(),
        solution.start_times().to_vec(),
    )?;
    check_solution(model, &candidate).ok()?;
    let conforms = fixed.iter().all(|assignment| {
        candidate.berth_for_vessel(assignment.vessel_index) == assignment.berth_index
            && candidate.start_time_for_vessel(assignment.vessel_index) == assignment.start_time
    });
    conforms.then_some(candidate)
}

/// The state of a single run.
struct BnbSolverSearchSession<'a, T, B, E, S>
where
    T: SolverNumeric,
{
    solver: &'a mut BnbSolver<T>,
    model: &'a Model<T>,
    fixed: &'a [FixedAssignment<T>],
    builder: &'a mut B,
    evaluator: &'a mut E,
    monitor: &'a mut S,
    state: SearchState<T>,
    incumbent: Incumbent<T>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<T, B, E, S> std::fmt::Debug for BnbSolverSearchSession<'_, T, B, E, S>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BnbSolverSearchSession")
            .field("state", &self.state)
            .field("incumbent", &self.incumbent)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, B, E, S> BnbSolverSearchSession<'a, T, B, E, S>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
    S: TreeSearchMonitor<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        model: &'a Model<T>,
        fixed: &'a [FixedAssignment<T>],
        builder: &'a mut B,
        evaluator: &'a mut E,
        monitor: &'a mut S,
    ) -> Self {
        Self {
            solver,
            model,
            fixed,
            builder,
            evaluator,
            monitor,
            state: SearchState::new(model.num_berths(), model.num_vessels()),
            incumbent: Incumbent::new(),
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self, initial_solution: Option<&Solution<T>>) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.model, &self.stats);

        if !self.initialize(initial_solution) {
            return self.finish(BnbTerminationReason::InfeasibilityProven, String::new());
        }

        loop {
            if let SearchCommand::Terminate(message) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                return self.finish(BnbTerminationReason::Aborted, message);
            }
            self.stats.on_step();
            self.monitor.on_step(&self.state, &self.stats);

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    let reason = if self.incumbent.has_solution() {
                        BnbTerminationReason::OptimalityProven
                    } else {
                        BnbTerminationReason::InfeasibilityProven
                    };
                    return self.finish(reason, String::new());
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        }
    }

    fn finish(mut self, reason: BnbTerminationReason, message: String) -> BnbSolverOutcome<T> {
        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);

        let solution = self.incumbent.into_solution();
        match (reason, solution) {
            (BnbTerminationReason::OptimalityProven, Some(solution)) => {
                BnbSolverOutcome::optimal(solution, self.stats)
            }
            (BnbTerminationReason::Aborted, solution) => {
                BnbSolverOutcome::aborted(solution, message, self.stats)
            }
            (_, _) => BnbSolverOutcome::infeasible(self.stats),
        }
    }

    /// Prepares the root node. Returns `false` if the fixed assignments
    /// already make the model infeasible.
    fn initialize(&mut self, initial_solution: Option<&Solution<T>>) -> bool {
        let (num_berths, num_vessels) = (self.model.num_berths(), self.model.num_vessels());
        self.solver.trail.ensure_capacity(num_vessels);
        self.solver.stack.ensure_capacity(num_berths, num_vessels);

        if !self
            .solver
            .berth_availability
            .initialize(self.model, self.fixed)
        {
            return false;
        }

        for assignment in self.fixed {
            let Some(cost) = self.evaluator.evaluate_vessel_assignment(
                self.model,
                assignment.vessel_index,
                assignment.berth_index,
                assignment.start_time,
            ) else {
                return false;
            };
            let objective = self.state.current_objective().saturating_add_val(cost);
            self.state.set_current_objective(objective);
            self.state.assign_vessel(
                assignment.vessel_index,
                assignment.berth_index,
                assignment.start_time,
            );
        }

        if let Some(warm) =
            initial_solution.and_then(|s| admissible_warm_start(self.model, self.fixed, s))
        {
            self.incumbent.try_install(warm);
        }

        self.solver.trail.push_frame(&self.state);
        self.solver.stack.push_frame();
        self.stats.on_node_explored();

        if self.state.is_complete() {
            self.handle_complete_solution();
        } else {
            self.expand();
        }
        true
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
        self.monitor.on_backtrack(&self.state, &self.stats);
    }

    #[inline]
    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };

        let new_objective = self
            .state
            .current_objective()
            .saturating_add_val(decision.cost_delta());
        if new_objective >= self.incumbent.upper_bound() {
            self.prune(PruneReason::BoundDominated);
            return;
        }

        self.descend(decision, new_objective);
    }

    fn descend(&mut self, decision: Decision<T>, new_objective: T) {
        let (vessel_index, berth_index) = (decision.vessel_index(), decision.berth_index());
        let processing_time = self
            .model
            .vessel_processing_time(vessel_index, berth_index)
            .into_option()
            .unwrap_or_else(T::zero);
        let new_berth_time = decision.start_time().saturating_add_val(processing_time);

        self.solver.trail.push_frame(&self.state);
        self.solver.trail.apply_assignment(
            &mut self.state,
            berth_index,
            vessel_index,
            decision.start_time(),
            new_berth_time,
            new_objective,
        );
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.state.num_assigned_vessels() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        if self.state.is_complete() {
            self.handle_complete_solution();
        } else {
            self.expand();
        }
    }

    /// Records the current leaf if it beats the incumbent. The leaf's frame
    /// stays on the stack with no children and is popped by the next step.
    fn handle_complete_solution(&mut self) {
        if self.state.current_objective() >= self.incumbent.upper_bound() {
            self.prune(PruneReason::BoundDominated);
            return;
        }
        match Solution::try_from(&self.state) {
            Ok(solution) => {
                debug_assert!(
                    check_solution(self.model, &solution).is_ok(),
                    "called `BnbSolverSearchSession::handle_complete_solution` with an infeasible leaf"
                );
                self.stats.on_solution_found();
                self.monitor.on_solution_found(&solution, &self.stats);
                self.incumbent.try_install(solution);
            }
            Err(_) => self.prune(PruneReason::Infeasible),
        }
    }

    /// Bounds the current node and, unless it is pruned, enqueues its
    /// children. A pruned node keeps an empty frame that the next step
    /// backtracks out of. An incomplete node without children counts as an
    /// infeasible prune.
    fn expand(&mut self) {
        self.stats.on_lower_bound_evaluated();
        let Some(remaining) = self.evaluator.estimate_remaining_cost(
            self.model,
            &self.solver.berth_availability,
            &self.state,
        ) else {
            self.prune(PruneReason::Infeasible);
            return;
        };

        let lower_bound = self.state.current_objective().saturating_add_val(remaining);
        self.monitor
            .on_lower_bound_computed(&self.state, lower_bound, remaining, &self.stats);

        if lower_bound >= self.incumbent.upper_bound() {
            self.prune(PruneReason::BoundDominated);
            return;
        }

        let decisions = self.builder.next_decision(
            self.evaluator,
            self.model,
            &self.solver.berth_availability,
            &self.state,
        );
        let count = self.solver.stack.extend_best_first(decisions);
        self.stats.on_decisions_generated(count as u64);
        self.monitor
            .on_decisions_enqueued(&self.state, count, &self.stats);

        if count == 0 {
            self.prune(PruneReason::Infeasible);
        }
    }

    #[inline]
    fn prune(&mut self, reason: PruneReason) {
        match reason {
            PruneReason::Infeasible => self.stats.on_pruning_infeasible(),
            PruneReason::BoundDominated => self.stats.on_pruning_bound(),
        }
        self.monitor.on_prune(&self.state, reason, &self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::{
            chronological::ChronologicalExhaustiveBuilder, edf::EdfHeuristicBuilder,
            fcfs::FcfsHeuristicBuilder, lpt::LptHeuristicBuilder, regret::RegretHeuristicBuilder,
            slack::SlackHeuristicBuilder, spt::SptHeuristicBuilder, test_support,
            wspt::WsptHeuristicBuilder,
        },
        eval::{
            hybrid::HybridEvaluator, workload::WorkloadEvaluator, wtft::WeightedFlowTimeEvaluator,
        },
        monitor::{
            composite::CompositeTreeSearchMonitor, log::LogTreeSearchMonitor,
            no_op::NoOperationMonitor, solution::SolutionLimitMonitor, time::TimeLimitMonitor,
        },
    };
    use mooring_core::math::interval::ClosedOpenInterval;
    use mooring_model::{
        index::{BerthIndex, VesselIndex},
        model::ModelBuilder,
        time::ProcessingTime,
    };
    use mooring_search::result::SolverResult;
    use std::time::Duration;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    fn solve_default(model: &Model<i64>) -> BnbSolverOutcome<i64> {
        let mut solver = BnbSolver::new();
        solver.solve(
            model,
            &mut ChronologicalExhaustiveBuilder,
            &mut HybridEvaluator::new(),
            NoOperationMonitor::new(),
        )
    }

    /// One berth. Serving the short, heavy vessel first costs 5 * 2 + 12.
    fn one_berth_model() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(1, 2);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(10))
            .set_vessel_processing_time(v(1), b(0), ProcessingTime::some(2))
            .set_vessel_weight(v(1), 5);
        builder.build()
    }

    fn uniform_model() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(2, 2);
        for vessel in 0..2 {
            for berth in 0..2 {
                builder.set_vessel_processing_time(v(vessel), b(berth), ProcessingTime::some(10));
            }
        }
        // Open during [0, 100) only.
        for berth in 0..2 {
            builder.add_berth_closing_time(b(berth), ClosedOpenInterval::new(100, i64::MAX));
        }
        builder.build()
    }

    fn objective<B, E>(model: &Model<i64>, mut builder: B, mut evaluator: E) -> Option<i64>
    where
        B: DecisionBuilder<i64, E>,
        E: ObjectiveEvaluator<i64>,
    {
        let outcome = BnbSolver::new().solve(
            model,
            &mut builder,
            &mut evaluator,
            NoOperationMonitor::new(),
        );
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::OptimalityProven);
        let solution = outcome.result().solution()?;
        assert!(check_solution(model, solution).is_ok());
        Some(solution.objective_value())
    }

    macro_rules! every_builder {
        ($model:expr, $evaluator:expr) => {
            vec![
                objective($model, ChronologicalExhaustiveBuilder, $evaluator),
                objective($model, FcfsHeuristicBuilder::new(), $evaluator),
                objective($model, RegretHeuristicBuilder::new(), $evaluator),
                objective($model, SlackHeuristicBuilder::new(), $evaluator),
                objective($model, EdfHeuristicBuilder::new(), $evaluator),
                objective($model, WsptHeuristicBuilder::new(), $evaluator),
                objective($model, SptHeuristicBuilder::new(), $evaluator),
                objective($model, LptHeuristicBuilder::new(), $evaluator),
            ]
        };
    }

    #[test]
    fn test_one_berth_optimum() {
        let outcome = solve_default(&one_berth_model());
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.objective_value(), 22);
        assert_eq!(solution.start_times(), &[2, 0]);
        assert!(matches!(outcome.result(), SolverResult::Optimal(_)));
    }

    #[test]
    fn test_every_strategy_agrees_on_the_optimum() {
        let model = test_support::model();
        for evaluator_results in [
            every_builder!(&model, WeightedFlowTimeEvaluator::new()),
            every_builder!(&model, WorkloadEvaluator::new()),
            every_builder!(&model, HybridEvaluator::new()),
        ] {
            assert!(evaluator_results.iter().all(|&o| o == Some(55)), "{evaluator_results:?}");
        }
    }

    #[test]
    fn test_closing_time_delays_start() {
        let mut builder = ModelBuilder::<i64>::new(1, 1);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(5))
            .add_berth_closing_time(b(0), ClosedOpenInterval::new(0, 10));
        let outcome = solve_default(&builder.build());
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.start_times(), &[10]);
        assert_eq!(solution.objective_value(), 15);
    }

    #[test]
    fn test_deadline_makes_model_infeasible() {
        let mut builder = ModelBuilder::<i64>::new(1, 2);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(10))
            .set_vessel_processing_time(v(1), b(0), ProcessingTime::some(10))
            .set_vessel_latest_departure_time(v(0), 12)
            .set_vessel_latest_departure_time(v(1), 12);
        let outcome = solve_default(&builder.build());
        assert_eq!(outcome.result(), &SolverResult::Infeasible);
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::InfeasibilityProven);
    }

    #[test]
    fn test_forbidden_everywhere_is_infeasible() {
        let mut builder = ModelBuilder::<i64>::new(2, 1);
        builder
            .forbid_vessel_berth_assignment(v(0), b(0))
            .forbid_vessel_berth_assignment(v(0), b(1));
        let outcome = solve_default(&builder.build());
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::InfeasibilityProven);
    }

    #[test]
    fn test_empty_model_is_trivially_optimal() {
        let model = ModelBuilder::<i64>::new(2, 0).build();
        let outcome = solve_default(&model);
        assert_eq!(outcome.result().objective_value(), Some(0));
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::OptimalityProven);
    }

    #[test]
    fn test_fixed_assignment_is_honoured() {
        let model = uniform_model();
        let fixed = [FixedAssignment::new(0, b(1), v(0))];
        let outcome = BnbSolver::new().solve_with_fixed(
            &model,
            &mut RegretHeuristicBuilder::new(),
            &mut HybridEvaluator::new(),
            NoOperationMonitor::new(),
            &fixed,
        );
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.berths(), &[b(1), b(0)]);
        assert_eq!(solution.start_times(), &[0, 0]);
        assert_eq!(solution.objective_value(), 20);
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::OptimalityProven);
    }

    #[test]
    fn test_infeasible_fixed_assignment_stops_immediately() {
        let model = uniform_model();
        // Runs past the opening window [0, 100).
        let fixed = [FixedAssignment::new(95, b(0), v(0))];
        let outcome = BnbSolver::new().solve_with_fixed(
            &model,
            &mut ChronologicalExhaustiveBuilder,
            &mut WeightedFlowTimeEvaluator::new(),
            NoOperationMonitor::new(),
            &fixed,
        );
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::InfeasibilityProven);
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_fully_fixed_model_returns_fixed_schedule() {
        let model = uniform_model();
        let fixed = [
            FixedAssignment::new(20, b(0), v(0)),
            FixedAssignment::new(5, b(0), v(1)),
        ];
        let outcome = BnbSolver::new().solve_with_fixed(
            &model,
            &mut ChronologicalExhaustiveBuilder,
            &mut HybridEvaluator::new(),
            NoOperationMonitor::new(),
            &fixed,
        );
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.start_times(), &[20, 5]);
        assert_eq!(solution.objective_value(), 30 + 15);
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::OptimalityProven);
    }

    #[test]
    #[should_panic(expected = "fixed more than once")]
    fn test_duplicate_fixed_vessel_panics() {
        let model = uniform_model();
        let fixed = [
            FixedAssignment::new(0, b(0), v(0)),
            FixedAssignment::new(20, b(1), v(0)),
        ];
        BnbSolver::new().solve_with_fixed(
            &model,
            &mut ChronologicalExhaustiveBuilder,
            &mut HybridEvaluator::new(),
            NoOperationMonitor::new(),
            &fixed,
        );
    }

    #[test]
    fn test_optimal_warm_start_is_returned_when_unbeaten() {
        let model = one_berth_model();
        let warm = Solution::new(22, vec![b(0), b(0)], vec![2, 0]);
        let outcome = BnbSolver::new().solve_with_warm_start(
            &model,
            &mut ChronologicalExhaustiveBuilder,
            &mut HybridEvaluator::new(),
            NoOperationMonitor::new(),
            &[],
            Some(&warm),
        );
        assert_eq!(outcome.result(), &SolverResult::Optimal(warm));
        assert_eq!(outcome.statistics().solutions_found, 0);
    }

    #[test]
    fn test_poor_warm_start_is_improved() {
        let model = one_berth_model();
        let warm = Solution::new(70, vec![b(0), b(0)], vec![0, 10]);
        let outcome = BnbSolver::new().solve_with_warm_start(
            &model,
            &mut FcfsHeuristicBuilder::new(),
            &mut WorkloadEvaluator::new(),
            NoOperationMonitor::new(),
            &[],
            Some(&warm),
        );
        assert_eq!(outcome.result().objective_value(), Some(22));
    }

    #[test]
    fn test_infeasible_warm_start_is_ignored() {
        let model = one_berth_model();
        // Both vessels at time 0 on the same berth overlap.
        let warm = Solution::new(1, vec![b(0), b(0)], vec![0, 0]);
        let outcome = BnbSolver::new().solve_with_warm_start(
            &model,
            &mut ChronologicalExhaustiveBuilder,
            &mut HybridEvaluator::new(),
            NoOperationMonitor::new(),
            &[],
            Some(&warm),
        );
        assert_eq!(outcome.result().objective_value(), Some(22));
    }

    #[test]
    fn test_solution_limit_aborts_with_feasible_result() {
        let model = test_support::model();
        let outcome = BnbSolver::new().solve(
            &model,
            &mut LptHeuristicBuilder::new(),
            &mut WeightedFlowTimeEvaluator::new(),
            SolutionLimitMonitor::new(1),
        );
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::Aborted);
        assert_eq!(outcome.termination().message, "solution limit reached");
        assert!(matches!(outcome.result(), SolverResult::Feasible(_)));
        assert_eq!(outcome.statistics().solutions_found, 1);
    }

    #[test]
    fn test_zero_time_limit_aborts_before_any_work() {
        let model = test_support::model();
        let outcome = BnbSolver::new().solve(
            &model,
            &mut ChronologicalExhaustiveBuilder,
            &mut HybridEvaluator::new(),
            TimeLimitMonitor::new(Duration::ZERO),
        );
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::Aborted);
        assert_eq!(outcome.termination().message, "time limit exceeded");
        assert_eq!(outcome.result(), &SolverResult::Unknown);
    }

    #[test]
    fn test_solver_is_reusable_and_deterministic() {
        let model = test_support::model();
        let mut solver = BnbSolver::preallocated(2, 3);
        let mut builder = SlackHeuristicBuilder::preallocated(2, 3);
        let mut evaluator = HybridEvaluator::preallocated(2, 3);

        let mut monitor = CompositeTreeSearchMonitor::new();
        monitor.add_monitor(LogTreeSearchMonitor::default());
        let first = solver.solve(&model, &mut builder, &mut evaluator, monitor);
        let second = solver.solve(&model, &mut builder, &mut evaluator, NoOperationMonitor::new());

        assert_eq!(first.result(), second.result());
        assert_eq!(
            first.statistics().nodes_explored,
            second.statistics().nodes_explored
        );
        assert_eq!(first.result().objective_value(), Some(55));

        // A different size after a larger one.
        let small = solver.solve(
            &one_berth_model(),
            &mut builder,
            &mut evaluator,
            NoOperationMonitor::new(),
        );
        assert_eq!(small.result().objective_value(), Some(22));
    }

    #[test]
    fn test_statistics_are_coherent() {
        let model = test_support::model();
        let outcome = solve_default(&model);
        let stats = outcome.statistics();
        assert!(stats.nodes_explored >= 4);
        assert!(stats.solutions_found >= 1);
        assert_eq!(stats.max_depth, 3);
        assert!(stats.lower_bound_evaluations >= 1);
        assert!(stats.steps >= stats.nodes_explored - 1);
    }

    #[test]
    fn test_node_without_children_is_pruned_as_infeasible() {
        // Both arrive at 5 on their own berth. Placing vessel 1 first leaves
        // vessel 0 with a start equal to the last one on another berth, which
        // only the order (0, 1) may produce.
        let mut builder = ModelBuilder::<i64>::new(2, 2);
        builder
            .set_vessel_arrival_time(v(0), 5)
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(5))
            .set_vessel_arrival_time(v(1), 5)
            .set_vessel_processing_time(v(1), b(1), ProcessingTime::some(3));
        let model = builder.build();

        let outcome = BnbSolver::new().solve(
            &model,
            &mut SptHeuristicBuilder::new(),
            &mut HybridEvaluator::new(),
            NoOperationMonitor::new(),
        );
        assert_eq!(outcome.termination_reason(), BnbTerminationReason::OptimalityProven);
        assert_eq!(outcome.result().objective_value(), Some(10 + 8));
        assert!(outcome.statistics().prunings_infeasible >= 1);
    }

    /// Arrivals grow with the vessel index and every vessel fits berth 0,
    /// which has no closing times. The other berths are faster for some
    /// vessels but closed at times or forbidden.
    fn staggered_model(num_vessels: usize) -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(4, num_vessels);
        for vessel in 0..num_vessels {
            let i = vessel as i64;
            builder
                .set_vessel_arrival_time(v(vessel), 3 * i)
                .set_vessel_weight(v(vessel), 1 + i % 4)
                .set_vessel_processing_time(
                    v(vessel),
                    b(0),
                    ProcessingTime::some(12 + (7 * i) % 9),
                );
            for berth in 1..4 {
                if (vessel + berth) % 3 != 0 {
                    let p = 3 + (5 * i + 2 * berth as i64) % 7;
                    builder.set_vessel_processing_time(v(vessel), b(berth), ProcessingTime::some(p));
                }
            }
        }
        builder
            .add_berth_closing_time(b(1), ClosedOpenInterval::new(20, 60))
            .add_berth_closing_time(b(2), ClosedOpenInterval::new(0, 40))
            .add_berth_closing_time(b(3), ClosedOpenInterval::new(90, 150));
        builder.build()
    }

    #[test]
    fn test_fcfs_first_dive_reaches_a_leaf() {
        let num_vessels = 24;
        let model = staggered_model(num_vessels);
        let outcome = BnbSolver::new().solve(
            &model,
            &mut FcfsHeuristicBuilder::preallocated(4, num_vessels),
            &mut HybridEvaluator::preallocated(4, num_vessels),
            SolutionLimitMonitor::new(1),
        );

        let solution = outcome.result().solution().unwrap();
        assert!(check_solution(&model, solution).is_ok());
        let stats = outcome.statistics();
        assert_eq!(stats.nodes_explored, num_vessels as u64 + 1);
        assert_eq!(stats.backtracks, 0);
        assert_eq!(stats.prunings(), 0);
    }
}
