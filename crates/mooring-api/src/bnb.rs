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

//! Exact solving with branch-and-bound.
//!
//! A [`BnbConfig`] names the branching strategy and the lower bound by
//! value; [`BnbSolver::solve`] validates everything the caller passed,
//! dispatches to the matching engine types and translates the outcome back
//! to 1-based indices.

use crate::{
    error::{MooringError, Result},
    fixed::{FixedAssignment, translate_all},
    model::Model,
    names::normalize,
    solution::Solution,
};
use mooring_bnb::{
    bnb::BnbSolver as InnerSolver,
    branching::{
        chronological::ChronologicalExhaustiveBuilder, decision::DecisionBuilder,
        edf::EdfHeuristicBuilder, fcfs::FcfsHeuristicBuilder, lpt::LptHeuristicBuilder,
        regret::RegretHeuristicBuilder, slack::SlackHeuristicBuilder, spt::SptHeuristicBuilder,
        wspt::WsptHeuristicBuilder,
    },
    eval::{
        evaluator::ObjectiveEvaluator, hybrid::HybridEvaluator, workload::WorkloadEvaluator,
        wtft::WeightedFlowTimeEvaluator,
    },
    fixed::FixedAssignment as InnerFixedAssignment,
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogTreeSearchMonitor,
        solution::SolutionLimitMonitor, time::TimeLimitMonitor,
    },
    result::{BnbSolverOutcome, BnbTerminationReason},
    stats::BnbSolverStatistics,
};
use mooring_model::solution::Solution as InnerSolution;
use mooring_search::result::{SolverResult, Termination};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info_span};

/// The order in which the search tree is expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecisionBuilderKind {
    /// Every vessel, berth pair in index order.
    #[default]
    Chronological,
    /// Earliest arrival first.
    Fcfs,
    /// Largest gap between the best and second-best berth first.
    Regret,
    /// Smallest deadline slack first.
    Slack,
    /// Earliest deadline first.
    Edf,
    /// Weighted shortest processing time.
    Wspt,
    /// Shortest processing time.
    Spt,
    /// Longest processing time.
    Lpt,
}

impl DecisionBuilderKind {
    pub const ALL: [DecisionBuilderKind; 8] = [
        DecisionBuilderKind::Chronological,
        DecisionBuilderKind::Fcfs,
        DecisionBuilderKind::Regret,
        DecisionBuilderKind::Slack,
        DecisionBuilderKind::Edf,
        DecisionBuilderKind::Wspt,
        DecisionBuilderKind::Spt,
        DecisionBuilderKind::Lpt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionBuilderKind::Chronological => "chronological",
            DecisionBuilderKind::Fcfs => "fcfs",
            DecisionBuilderKind::Regret => "regret",
            DecisionBuilderKind::Slack => "slack",
            DecisionBuilderKind::Edf => "edf",
            DecisionBuilderKind::Wspt => "wspt",
            DecisionBuilderKind::Spt => "spt",
            DecisionBuilderKind::Lpt => "lpt",
        }
    }
}

impl std::fmt::Display for DecisionBuilderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionBuilderKind {
    type Err = MooringError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "chronological" | "chronologicalexhaustive" | "exhaustive" => {
                Ok(DecisionBuilderKind::Chronological)
            }
            "fcfs" | "firstcomefirstserved" => Ok(DecisionBuilderKind::Fcfs),
            "regret" => Ok(DecisionBuilderKind::Regret),
            "slack" => Ok(DecisionBuilderKind::Slack),
            "edf" | "earliestdeadlinefirst" => Ok(DecisionBuilderKind::Edf),
            "wspt" => Ok(DecisionBuilderKind::Wspt),
            "spt" => Ok(DecisionBuilderKind::Spt),
            "lpt" => Ok(DecisionBuilderKind::Lpt),
            _ => Err(MooringError::invalid_argument(format!(
                "unknown decision builder: {:?}",
                s
            ))),
        }
    }
}

/// The lower bound used for pruning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EvaluatorKind {
    #[default]
    Hybrid,
    Workload,
    WeightedFlowTime,
}

impl EvaluatorKind {
    pub const ALL: [EvaluatorKind; 3] = [
        EvaluatorKind::Hybrid,
        EvaluatorKind::Workload,
        EvaluatorKind::WeightedFlowTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorKind::Hybrid => "hybrid",
            EvaluatorKind::Workload => "workload",
            EvaluatorKind::WeightedFlowTime => "weighted_flow_time",
        }
    }
}

impl std::fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluatorKind {
    type Err = MooringError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "hybrid" => Ok(EvaluatorKind::Hybrid),
            "workload" => Ok(EvaluatorKind::Workload),
            "weightedflowtime" | "wtft" => Ok(EvaluatorKind::WeightedFlowTime),
            _ => Err(MooringError::invalid_argument(format!(
                "unknown evaluator: {:?}",
                s
            ))),
        }
    }
}

/// Everything a branch-and-bound solve needs besides the model.
///
/// `solution_limit` and `time_limit_ms` mean "no limit" when zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnbConfig {
    pub builder: DecisionBuilderKind,
    pub evaluator: EvaluatorKind,
    pub solution_limit: u64,
    pub time_limit_ms: u64,
    pub enable_log: bool,
    pub fixed: Vec<FixedAssignment>,
    /// Seeds the incumbent. Ignored by the search if it is infeasible or
    /// disagrees with `fixed`.
    pub initial_solution: Option<Solution>,
}

impl BnbConfig {
    #[inline]
    pub fn new(builder: DecisionBuilderKind, evaluator: EvaluatorKind) -> Self {
        Self {
            builder,
            evaluator,
            ..Self::default()
        }
    }

    /// Parses both strategy names; fails before any search work.
    pub fn from_names(builder: &str, evaluator: &str) -> Result<Self> {
        Ok(Self::new(builder.parse()?, evaluator.parse()?))
    }

    pub fn with_solution_limit(mut self, solution_limit: u64) -> Self {
        self.solution_limit = solution_limit;
        self
    }

    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    pub fn with_log(mut self, enable_log: bool) -> Self {
        self.enable_log = enable_log;
        self
    }

    pub fn with_fixed(mut self, fixed: Vec<FixedAssignment>) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_initial_solution(mut self, initial_solution: Solution) -> Self {
        self.initial_solution = Some(initial_solution);
        self
    }
}

/// Result of a branch-and-bound solve with 1-based indices.
#[derive(Debug, Clone)]
pub struct BnbOutcome {
    termination: Termination<BnbTerminationReason>,
    result: SolverResult<i64>,
    solution: Option<Solution>,
    statistics: BnbSolverStatistics,
}

impl BnbOutcome {
    fn from_inner(outcome: BnbSolverOutcome<i64>) -> Self {
        let (result, termination, statistics) = outcome.into_parts();
        let solution = result.solution().map(Solution::from);
        Self {
            termination,
            result,
            solution,
            statistics,
        }
    }

    #[inline]
    pub fn termination(&self) -> &Termination<BnbTerminationReason> {
        &self.termination
    }

    #[inline]
    pub fn termination_reason(&self) -> BnbTerminationReason {
        self.termination.reason
    }

    /// The engine-level result with 0-based berths.
    #[inline]
    pub fn result(&self) -> &SolverResult<i64> {
        &self.result
    }

    /// `Optimal`, `Feasible`, `Infeasible` or `Unknown`.
    #[inline]
    pub fn status(&self) -> &'static str {
        self.result.status()
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    #[inline]
    pub fn objective_value(&self) -> Option<i64> {
        self.solution.as_ref().map(Solution::objective_value)
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for BnbOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.status(), self.termination)?;
        if let Some(solution) = &self.solution {
            writeln!(f, "{}", solution)?;
        }
        write!(f, "{}", self.statistics)
    }
}

/// Reusable branch-and-bound solver. Scratch buffers survive between
/// calls; concurrent solves need separate instances.
#[derive(Debug, Clone, Default)]
pub struct BnbSolver {
    inner: InnerSolver<i64>,
}

impl BnbSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            inner: InnerSolver::preallocated(num_berths, num_vessels),
        }
    }

    /// Validates `config` against `model` and runs the search.
    ///
    /// Index and shape errors in `config` are reported before any search
    /// work. Infeasibility and aborted searches are reported through the
    /// outcome.
    pub fn solve(&mut self, model: &Model, config: &BnbConfig) -> Result<BnbOutcome> {
        let fixed = translate_all(model, &config.fixed)?;
        let initial = config
            .initial_solution
            .as_ref()
            .map(|solution| solution.to_internal(model))
            .transpose()?;

        let span = info_span!(
            "bnb_solve",
            builder = %config.builder,
            evaluator = %config.evaluator,
            num_vessels = model.num_vessels(),
            num_berths = model.num_berths(),
        );
        let _guard = span.enter();

        let request = Request {
            solver: &mut self.inner,
            model,
            config,
            fixed: &fixed,
            initial: initial.as_ref(),
        };
        let outcome = match config.evaluator {
            EvaluatorKind::Hybrid => request.with_evaluator(HybridEvaluator::preallocated(
                model.num_berths(),
                model.num_vessels(),
            )),
            EvaluatorKind::Workload => request.with_evaluator(WorkloadEvaluator::preallocated(
                model.num_berths(),
                model.num_vessels(),
            )),
            EvaluatorKind::WeightedFlowTime => request.with_evaluator(
                WeightedFlowTimeEvaluator::preallocated(model.num_berths(), model.num_vessels()),
            ),
        };

        debug!(
            termination = %outcome.termination(),
            status = outcome.result().status(),
            objective = ?outcome.result().objective_value(),
            nodes = outcome.statistics().nodes_explored,
            backtracks = outcome.statistics().backtracks,
            prunings = outcome.statistics().prunings(),
            elapsed_secs = outcome.statistics().time_total.as_secs_f64(),
            "bnb finished"
        );
        Ok(BnbOutcome::from_inner(outcome))
    }
}

/// Solves `model` with a fresh solver.
pub fn solve(model: &Model, config: &BnbConfig) -> Result<BnbOutcome> {
    BnbSolver::preallocated(model.num_berths(), model.num_vessels()).solve(model, config)
}

/// A validated solve waiting for its strategies to be instantiated.
struct Request<'a> {
    solver: &'a mut InnerSolver<i64>,
    model: &'a Model,
    config: &'a BnbConfig,
    fixed: &'a [InnerFixedAssignment<i64>],
    initial: Option<&'a InnerSolution<i64>>,
}

impl Request<'_> {
    fn with_evaluator<E>(self, evaluator: E) -> BnbSolverOutcome<i64>
    where
        E: ObjectiveEvaluator<i64>,
    {
        let (nb, nv) = (self.model.num_berths(), self.model.num_vessels());
        match self.config.builder {
            DecisionBuilderKind::Chronological => {
                self.run(ChronologicalExhaustiveBuilder::new(), evaluator)
            }
            DecisionBuilderKind::Fcfs => self.run(FcfsHeuristicBuilder::preallocated(nb, nv), evaluator),
            DecisionBuilderKind::Regret => {
                self.run(RegretHeuristicBuilder::preallocated(nb, nv), evaluator)
            }
            DecisionBuilderKind::Slack => {
                self.run(SlackHeuristicBuilder::preallocated(nb, nv), evaluator)
            }
            DecisionBuilderKind::Edf => self.run(EdfHeuristicBuilder::preallocated(nb, nv), evaluator),
            DecisionBuilderKind::Wspt => self.run(WsptHeuristicBuilder::preallocated(nb, nv), evaluator),
            DecisionBuilderKind::Spt => self.run(SptHeuristicBuilder::preallocated(nb, nv), evaluator),
            DecisionBuilderKind::Lpt => self.run(LptHeuristicBuilder::preallocated(nb, nv), evaluator),
        }
    }

    fn run<B, E>(self, mut builder: B, mut evaluator: E) -> BnbSolverOutcome<i64>
    where
        B: DecisionBuilder<i64, E>,
        E: ObjectiveEvaluator<i64>,
    {
        let mut monitor: CompositeTreeSearchMonitor<'_, i64> =
            CompositeTreeSearchMonitor::with_capacity(3);
        if self.config.time_limit_ms > 0 {
            monitor.add_monitor(TimeLimitMonitor::new(Duration::from_millis(
                self.config.time_limit_ms,
            )));
        }
        if self.config.solution_limit > 0 {
            monitor.add_monitor(SolutionLimitMonitor::new(self.config.solution_limit));
        }
        if self.config.enable_log {
            monitor.add_monitor(LogTreeSearchMonitor::default());
        }
        self.solver.solve_with_warm_start(
            self.model.inner(),
            &mut builder,
            &mut evaluator,
            monitor,
            self.fixed,
            self.initial,
        )
    }
}
