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

use crate::stats::LocalSearchStatistics;
use mooring_model::solution::Solution;
use mooring_search::{num::SolverNumeric, result::Termination};

/// Why a local search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalSearchTerminationReason {
    /// A sweep ended without an accepted move and the metaheuristic did not
    /// continue.
    LocalOptimum,
    /// The metaheuristic ended the search; the message says why.
    Metaheuristic,
    /// A monitor stopped the search; the message says which.
    Aborted,
}

impl std::fmt::Display for LocalSearchTerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalSearchTerminationReason::LocalOptimum => write!(f, "LocalOptimum"),
            LocalSearchTerminationReason::Metaheuristic => write!(f, "Metaheuristic"),
            LocalSearchTerminationReason::Aborted => write!(f, "Aborted"),
        }
    }
}

/// The best schedule seen during a run, never worse than the initial one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchEngineOutcome<T> {
    solution: Solution<T>,
    termination: Termination<LocalSearchTerminationReason>,
    statistics: LocalSearchStatistics,
}

impl<T> LocalSearchEngineOutcome<T> {
    #[inline]
    pub fn local_optimum(solution: Solution<T>, statistics: LocalSearchStatistics) -> Self {
        Self {
            solution,
            termination: Termination::new(
                LocalSearchTerminationReason::LocalOptimum,
                "neighborhood exhausted",
            ),
            statistics,
        }
    }

    #[inline]
    pub fn metaheuristic<R>(
        solution: Solution<T>,
        message: R,
        statistics: LocalSearchStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        Self {
            solution,
            termination: Termination::new(LocalSearchTerminationReason::Metaheuristic, message),
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(solution: Solution<T>, message: R, statistics: LocalSearchStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            solution,
            termination: Termination::new(LocalSearchTerminationReason::Aborted, message),
            statistics,
        }
    }

    #[inline]
    pub fn solution(&self) -> &Solution<T> {
        &self.solution
    }

    #[inline]
    pub fn termination(&self) -> &Termination<LocalSearchTerminationReason> {
        &self.termination
    }

    #[inline]
    pub fn termination_reason(&self) -> LocalSearchTerminationReason {
        self.termination.reason
    }

    #[inline]
    pub fn statistics(&self) -> &LocalSearchStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_parts(
        self,
    ) -> (
        Solution<T>,
        Termination<LocalSearchTerminationReason>,
        LocalSearchStatistics,
    ) {
        (self.solution, self.termination, self.statistics)
    }
}

impl<T> std::fmt::Display for LocalSearchEngineOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LocalSearchEngineOutcome(objective: {}, {})",
            self.solution.objective_value(),
            self.termination
        )
    }
}
