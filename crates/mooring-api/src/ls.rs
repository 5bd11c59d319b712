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

//! Improving an existing schedule with local search.
//!
//! [`LsConfig`] names the neighborhood and the metaheuristic, and carries
//! the operator as an [`Operator`] tree. Compound operators own their
//! children by value, so a child can only be placed into one compound.

use crate::{
    error::{MooringError, Result},
    model::Model,
    names::normalize,
    solution::Solution,
};
use mooring_ls::{
    decoder::GreedyDecoder,
    engine::LocalSearchEngine as InnerEngine,
    meta::{
        greedy_descent::GreedyDescent,
        guided_local_search::GuidedLocalSearch,
        metaheuristic::{DEFAULT_STAGNATION_LIMIT, Metaheuristic},
        simulated_annealing::{GeometricCooling, LinearCooling, SimulatedAnnealing},
        tabu_search::TabuSearch,
    },
    monitor::{
        composite::CompositeLocalSearchMonitor, log::LogLocalSearchMonitor,
        solution::SolutionLimitMonitor, time::TimeLimitMonitor,
    },
    neighborhood::{
        neighborhoods::{FullNeighborhoods, Neighborhoods},
        topology::StaticTopology,
    },
    operator::{
        compound::{
            BoxedOperator, MultiArmedBanditCompoundOperator, RandomCompoundOperator,
            RoundRobinCompoundOperator,
        },
        scramble::{DEFAULT_ATTEMPTS, DEFAULT_WINDOW, ScrambleOperator},
        shift::ShiftOperator,
        swap::SwapOperator,
        two_opt::TwoOptOperator,
    },
    result::{LocalSearchEngineOutcome, LocalSearchTerminationReason},
    stats::LocalSearchStatistics,
};
use mooring_model::{feasibility::check_solution, solution::Solution as InnerSolution};
use mooring_search::result::Termination;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::{str::FromStr, time::Duration};
use tracing::{debug, info_span};

/// Which vessel pairs the operators may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NeighborhoodKind {
    /// Every pair.
    #[default]
    Full,
    /// Pairs that share an allowed berth and overlap in time.
    StaticTopology,
}

impl std::fmt::Display for NeighborhoodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NeighborhoodKind::Full => f.write_str("full"),
            NeighborhoodKind::StaticTopology => f.write_str("static_topology"),
        }
    }
}

impl FromStr for NeighborhoodKind {
    type Err = MooringError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "full" => Ok(NeighborhoodKind::Full),
            "statictopology" | "topology" => Ok(NeighborhoodKind::StaticTopology),
            _ => Err(MooringError::invalid_argument(format!(
                "unknown neighborhood: {:?}",
                s
            ))),
        }
    }
}

/// Temperature schedule of simulated annealing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoolingKind {
    /// `temperature *= alpha` per candidate.
    Geometric {
        initial: f64,
        alpha: f64,
        min_temperature: f64,
    },
    /// `temperature -= decrement` per candidate.
    Linear {
        initial: f64,
        decrement: f64,
        min_temperature: f64,
    },
}

impl CoolingKind {
    fn validate(&self) -> Result<()> {
        match *self {
            CoolingKind::Geometric {
                initial,
                alpha,
                min_temperature,
            } => {
                if !(initial.is_finite() && initial > 0.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "initial temperature must be positive, got {}",
                        initial
                    )));
                }
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "cooling alpha must be in (0, 1), got {}",
                        alpha
                    )));
                }
                if !(min_temperature.is_finite() && min_temperature > 0.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "geometric cooling needs a positive minimum temperature, got {}",
                        min_temperature
                    )));
                }
            }
            CoolingKind::Linear {
                initial,
                decrement,
                min_temperature,
            } => {
                if !(initial.is_finite() && initial > 0.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "initial temperature must be positive, got {}",
                        initial
                    )));
                }
                if !(decrement.is_finite() && decrement > 0.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "cooling decrement must be positive, got {}",
                        decrement
                    )));
                }
                if !(min_temperature.is_finite() && min_temperature >= 0.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "minimum temperature must not be negative, got {}",
                        min_temperature
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The acceptance policy. `None` parameters are derived from the model and
/// the initial solution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MetaheuristicKind {
    #[default]
    GreedyDescent,
    SimulatedAnnealing {
        cooling: Option<CoolingKind>,
        seed: u64,
    },
    TabuSearch {
        tenure: Option<usize>,
        stagnation_limit: u64,
    },
    GuidedLocalSearch {
        lambda: Option<f64>,
        stagnation_limit: u64,
    },
}

impl MetaheuristicKind {
    pub const fn simulated_annealing(seed: u64) -> Self {
        MetaheuristicKind::SimulatedAnnealing {
            cooling: None,
            seed,
        }
    }

    pub const fn tabu_search() -> Self {
        MetaheuristicKind::TabuSearch {
            tenure: None,
            stagnation_limit: DEFAULT_STAGNATION_LIMIT,
        }
    }

    pub const fn guided_local_search() -> Self {
        MetaheuristicKind::GuidedLocalSearch {
            lambda: None,
            stagnation_limit: DEFAULT_STAGNATION_LIMIT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaheuristicKind::GreedyDescent => "greedy_descent",
            MetaheuristicKind::SimulatedAnnealing { .. } => "simulated_annealing",
            MetaheuristicKind::TabuSearch { .. } => "tabu_search",
            MetaheuristicKind::GuidedLocalSearch { .. } => "guided_local_search",
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            MetaheuristicKind::GreedyDescent => Ok(()),
            MetaheuristicKind::SimulatedAnnealing { cooling, .. } => {
                cooling.as_ref().map_or(Ok(()), CoolingKind::validate)
            }
            MetaheuristicKind::TabuSearch { tenure, .. } => match tenure {
                Some(0) => Err(MooringError::invalid_argument("tabu tenure must be positive")),
                _ => Ok(()),
            },
            MetaheuristicKind::GuidedLocalSearch { lambda, .. } => match lambda {
                Some(lambda) if !(lambda.is_finite() && lambda >= 0.0) => {
                    Err(MooringError::invalid_argument(format!(
                        "guided local search lambda must be finite and non-negative, got {}",
                        lambda
                    )))
                }
                _ => Ok(()),
            },
        }
    }
}

impl std::fmt::Display for MetaheuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the policy name with derived parameters and seed `0`.
impl FromStr for MetaheuristicKind {
    type Err = MooringError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "greedydescent" | "greedy" => Ok(MetaheuristicKind::GreedyDescent),
            "simulatedannealing" | "sa" => Ok(MetaheuristicKind::simulated_annealing(0)),
            "tabusearch" | "tabu" => Ok(MetaheuristicKind::tabu_search()),
            "guidedlocalsearch" | "gls" => Ok(MetaheuristicKind::guided_local_search()),
            _ => Err(MooringError::invalid_argument(format!(
                "unknown metaheuristic: {:?}",
                s
            ))),
        }
    }
}

/// A move generator, possibly composed of others.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Swap,
    Shift,
    TwoOpt,
    Scramble {
        window: usize,
        attempts: usize,
        seed: u64,
    },
    RoundRobin(Vec<Operator>),
    Random {
        children: Vec<Operator>,
        seed: u64,
    },
    MultiArmedBandit {
        children: Vec<Operator>,
        memory: f64,
        exploration: f64,
    },
}

impl Operator {
    #[inline]
    pub fn swap() -> Self {
        Operator::Swap
    }

    #[inline]
    pub fn shift() -> Self {
        Operator::Shift
    }

    #[inline]
    pub fn two_opt() -> Self {
        Operator::TwoOpt
    }

    /// Scramble with the default window and attempt count.
    #[inline]
    pub fn scramble(seed: u64) -> Self {
        Operator::Scramble {
            window: DEFAULT_WINDOW,
            attempts: DEFAULT_ATTEMPTS,
            seed,
        }
    }

    #[inline]
    pub fn round_robin(children: Vec<Operator>) -> Self {
        Operator::RoundRobin(children)
    }

    #[inline]
    pub fn random(children: Vec<Operator>, seed: u64) -> Self {
        Operator::Random { children, seed }
    }

    /// `memory` must lie in `(0, 1]` and `exploration` must not be
    /// negative; both are checked when the operator is built.
    #[inline]
    pub fn multi_armed_bandit(children: Vec<Operator>, memory: f64, exploration: f64) -> Self {
        Operator::MultiArmedBandit {
            children,
            memory,
            exploration,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Swap => "swap",
            Operator::Shift => "shift",
            Operator::TwoOpt => "two_opt",
            Operator::Scramble { .. } => "scramble",
            Operator::RoundRobin(_) => "round_robin",
            Operator::Random { .. } => "random",
            Operator::MultiArmedBandit { .. } => "multi_armed_bandit",
        }
    }

    /// Instantiates the operator tree for the neighborhood type `N`.
    pub fn build<N>(&self) -> Result<BoxedOperator<i64, N>>
    where
        N: Neighborhoods + 'static,
    {
        Ok(match self {
            Operator::Swap => Box::new(SwapOperator::new()),
            Operator::Shift => Box::new(ShiftOperator::new()),
            Operator::TwoOpt => Box::new(TwoOptOperator::new()),
            Operator::Scramble {
                window,
                attempts,
                seed,
            } => {
                if *window < 2 {
                    return Err(MooringError::invalid_argument(format!(
                        "scramble window must be at least 2, got {}",
                        window
                    )));
                }
                Box::new(ScrambleOperator::with_seed(*window, *attempts, *seed))
            }
            Operator::RoundRobin(children) => {
                Box::new(RoundRobinCompoundOperator::new(build_all(children)?))
            }
            Operator::Random { children, seed } => Box::new(RandomCompoundOperator::with_seed(
                build_all(children)?,
                *seed,
            )),
            Operator::MultiArmedBandit {
                children,
                memory,
                exploration,
            } => {
                if !(*memory > 0.0 && *memory <= 1.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "bandit memory must be in (0, 1], got {}",
                        memory
                    )));
                }
                if !(*exploration >= 0.0) {
                    return Err(MooringError::invalid_argument(format!(
                        "bandit exploration must not be negative, got {}",
                        exploration
                    )));
                }
                Box::new(MultiArmedBanditCompoundOperator::new(
                    build_all(children)?,
                    *memory,
                    *exploration,
                ))
            }
        })
    }
}

fn build_all<N>(children: &[Operator]) -> Result<Vec<BoxedOperator<i64, N>>>
where
    N: Neighborhoods + 'static,
{
    children.iter().map(Operator::build).collect()
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let children = match self {
            Operator::RoundRobin(children)
            | Operator::Random { children, .. }
            | Operator::MultiArmedBandit { children, .. } => children,
            _ => return f.write_str(self.name()),
        };
        write!(f, "{}(", self.name())?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", child)?;
        }
        f.write_str(")")
    }
}

/// Parses the leaf operators; scramble gets seed `0`.
impl FromStr for Operator {
    type Err = MooringError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "swap" => Ok(Operator::Swap),
            "shift" => Ok(Operator::Shift),
            "twoopt" | "2opt" => Ok(Operator::TwoOpt),
            "scramble" => Ok(Operator::scramble(0)),
            _ => Err(MooringError::invalid_argument(format!(
                "unknown operator: {:?}",
                s
            ))),
        }
    }
}

/// Everything a local search run needs besides the model and the initial
/// schedule. `solution_limit` and `time_limit_ms` mean "no limit" when zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LsConfig {
    pub neighborhood: NeighborhoodKind,
    pub metaheuristic: MetaheuristicKind,
    pub operator: Operator,
    pub time_limit_ms: u64,
    /// Maximum number of decoded candidates.
    pub solution_limit: u64,
    pub enable_log: bool,
}

impl Default for LsConfig {
    fn default() -> Self {
        Self {
            neighborhood: NeighborhoodKind::Full,
            metaheuristic: MetaheuristicKind::GreedyDescent,
            operator: Operator::round_robin(vec![
                Operator::two_opt(),
                Operator::swap(),
                Operator::shift(),
            ]),
            time_limit_ms: 0,
            solution_limit: 0,
            enable_log: false,
        }
    }
}

impl LsConfig {
    pub fn new(
        neighborhood: NeighborhoodKind,
        metaheuristic: MetaheuristicKind,
        operator: Operator,
    ) -> Self {
        Self {
            neighborhood,
            metaheuristic,
            operator,
            ..Self::default()
        }
    }

    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    pub fn with_solution_limit(mut self, solution_limit: u64) -> Self {
        self.solution_limit = solution_limit;
        self
    }

    pub fn with_log(mut self, enable_log: bool) -> Self {
        self.enable_log = enable_log;
        self
    }
}

/// Result of a local search run with 1-based berths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsOutcome {
    termination: Termination<LocalSearchTerminationReason>,
    solution: Solution,
    statistics: LocalSearchStatistics,
}

impl LsOutcome {
    fn from_inner(outcome: LocalSearchEngineOutcome<i64>) -> Self {
        let (solution, termination, statistics) = outcome.into_parts();
        Self {
            termination,
            solution: Solution::from(solution),
            statistics,
        }
    }

    #[inline]
    pub fn termination(&self) -> &Termination<LocalSearchTerminationReason> {
        &self.termination
    }

    #[inline]
    pub fn termination_reason(&self) -> LocalSearchTerminationReason {
        self.termination.reason
    }

    /// The best schedule seen; never worse than the initial one.
    #[inline]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    #[inline]
    pub fn into_solution(self) -> Solution {
        self.solution
    }

    #[inline]
    pub fn objective_value(&self) -> i64 {
        self.solution.objective_value()
    }

    #[inline]
    pub fn statistics(&self) -> &LocalSearchStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for LsOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.termination)?;
        writeln!(f, "{}", self.solution)?;
        write!(f, "{}", self.statistics)
    }
}

/// Reusable local search engine. Concurrent runs need separate instances.
#[derive(Debug, Clone, Default)]
pub struct LocalSearchEngine {
    inner: InnerEngine<i64>,
}

impl LocalSearchEngine {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            inner: InnerEngine::preallocated(num_vessels),
        }
    }

    /// Improves `initial` on `model`.
    ///
    /// `initial` must be feasible; its objective is recomputed from the
    /// model, so the stored value is ignored.
    pub fn solve(&mut self, model: &Model, initial: &Solution, config: &LsConfig) -> Result<LsOutcome> {
        let initial = initial.to_internal(model)?;
        if let Err(violation) = check_solution(model.inner(), &initial) {
            return Err(MooringError::invalid_argument(format!(
                "initial solution is infeasible: {}",
                violation
            )));
        }
        config.metaheuristic.validate()?;

        let span = info_span!(
            "ls_solve",
            neighborhood = %config.neighborhood,
            metaheuristic = %config.metaheuristic,
            operator = %config.operator,
            num_vessels = model.num_vessels(),
            num_berths = model.num_berths(),
        );
        let _guard = span.enter();

        let run = Run {
            engine: &mut self.inner,
            model,
            config,
            initial: &initial,
        };
        let outcome = match config.neighborhood {
            NeighborhoodKind::Full => {
                run.with_neighborhoods(FullNeighborhoods::new(model.num_vessels()))?
            }
            NeighborhoodKind::StaticTopology => {
                run.with_neighborhoods(StaticTopology::from_model(model.inner()))?
            }
        };

        debug!(
            termination = %outcome.termination(),
            initial = initial.objective_value(),
            objective = outcome.solution().objective_value(),
            iterations = outcome.statistics().iterations,
            candidates = outcome.statistics().total_solutions,
            accepted = outcome.statistics().accepted_solutions,
            improving = outcome.statistics().improving_solutions,
            elapsed_secs = outcome.statistics().time_total.as_secs_f64(),
            "local search finished"
        );
        Ok(LsOutcome::from_inner(outcome))
    }
}

/// Runs local search with a fresh engine.
pub fn solve(model: &Model, initial: &Solution, config: &LsConfig) -> Result<LsOutcome> {
    LocalSearchEngine::preallocated(model.num_vessels()).solve(model, initial, config)
}

/// A validated run waiting for its strategies to be instantiated.
struct Run<'a> {
    engine: &'a mut InnerEngine<i64>,
    model: &'a Model,
    config: &'a LsConfig,
    initial: &'a InnerSolution<i64>,
}

impl Run<'_> {
    fn with_neighborhoods<N>(self, neighborhoods: N) -> Result<LocalSearchEngineOutcome<i64>>
    where
        N: Neighborhoods + 'static,
    {
        let mut operator = self.config.operator.build::<N>()?;
        let (model, initial) = (self.model.inner(), self.initial);
        Ok(match self.config.metaheuristic {
            MetaheuristicKind::GreedyDescent => {
                self.run(&neighborhoods, &mut operator, GreedyDescent::new())
            }
            MetaheuristicKind::SimulatedAnnealing { cooling, seed } => match cooling {
                None => self.run(
                    &neighborhoods,
                    &mut operator,
                    SimulatedAnnealing::from_reference_solution(initial, seed),
                ),
                Some(CoolingKind::Geometric {
                    initial: temperature,
                    alpha,
                    min_temperature,
                }) => self.run(
                    &neighborhoods,
                    &mut operator,
                    SimulatedAnnealing::new(
                        GeometricCooling::new(temperature, alpha, min_temperature),
                        ChaCha8Rng::seed_from_u64(seed),
                    ),
                ),
                Some(CoolingKind::Linear {
                    initial: temperature,
                    decrement,
                    min_temperature,
                }) => self.run(
                    &neighborhoods,
                    &mut operator,
                    SimulatedAnnealing::new(
                        LinearCooling::new(temperature, decrement, min_temperature),
                        ChaCha8Rng::seed_from_u64(seed),
                    ),
                ),
            },
            MetaheuristicKind::TabuSearch {
                tenure,
                stagnation_limit,
            } => {
                let tenure = tenure.unwrap_or_else(|| TabuSearch::from_model(model).tenure());
                self.run(
                    &neighborhoods,
                    &mut operator,
                    TabuSearch::with_stagnation_limit(tenure, stagnation_limit),
                )
            }
            MetaheuristicKind::GuidedLocalSearch {
                lambda,
                stagnation_limit,
            } => {
                let lambda = lambda
                    .unwrap_or_else(|| GuidedLocalSearch::from_reference(model, initial).lambda());
                self.run(
                    &neighborhoods,
                    &mut operator,
                    GuidedLocalSearch::preallocated(
                        lambda,
                        stagnation_limit,
                        model.num_vessels(),
                        model.num_berths(),
                    ),
                )
            }
        })
    }

    fn run<N, M>(
        self,
        neighborhoods: &N,
        operator: &mut BoxedOperator<i64, N>,
        mut metaheuristic: M,
    ) -> LocalSearchEngineOutcome<i64>
    where
        N: Neighborhoods + 'static,
        M: Metaheuristic<i64>,
    {
        let mut monitor: CompositeLocalSearchMonitor<'_, i64> =
            CompositeLocalSearchMonitor::with_capacity(3);
        if self.config.time_limit_ms > 0 {
            monitor.add_monitor(TimeLimitMonitor::new(Duration::from_millis(
                self.config.time_limit_ms,
            )));
        }
        if self.config.solution_limit > 0 {
            monitor.add_monitor(SolutionLimitMonitor::new(self.config.solution_limit));
        }
        if self.config.enable_log {
            monitor.add_monitor(LogLocalSearchMonitor::default());
        }
        let mut decoder = GreedyDecoder::preallocated(self.model.num_berths());
        self.engine.run(
            self.model.inner(),
            &mut decoder,
            neighborhoods,
            operator,
            &mut metaheuristic,
            &mut monitor,
            self.initial,
        )
    }
}
