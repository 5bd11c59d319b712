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

use crate::stats::BnbSolverStatistics;
use mooring_model::solution::Solution;
use mooring_search::result::{SolverResult, Termination};
use num_traits::{PrimInt, Signed};

/// Why a branch-and-bound run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BnbTerminationReason {
    /// The tree was exhausted with a solution in hand.
    OptimalityProven,
    /// The tree was exhausted without any solution.
    InfeasibilityProven,
    /// A monitor stopped the search; the message says which.
    Aborted,
}

impl std::fmt::Display for BnbTerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BnbTerminationReason::OptimalityProven => write!(f, "OptimalityProven"),
            BnbTerminationReason::InfeasibilityProven => write!(f, "InfeasibilityProven"),
            BnbTerminationReason::Aborted => write!(f, "Aborted"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination: Termination<BnbTerminationReason>,
    statistics: BnbSolverStatistics,
}

impl<T> BnbSolverOutcome<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn optimal(solution: Solution<T>, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination: Termination::new(
                BnbTerminationReason::OptimalityProven,
                "search tree exhausted",
            ),
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination: Termination::new(
                BnbTerminationReason::InfeasibilityProven,
                "search tree exhausted",
            ),
            statistics,
        }
    }

    /// Stopped early. The best solution so far, if any, is reported as
    /// feasible; without one the result is unknown.
    #[inline]
    pub fn aborted<R>(
        solution: Option<Solution<T>>,
        message: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(solution) => SolverResult::Feasible(solution),
            None => SolverResult::Unknown,
        };
        Self {
            result,
            termination: Termination::new(BnbTerminationReason::Aborted, message),
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination(&self) -> &Termination<BnbTerminationReason> {
        &self.termination
    }

    #[inline]
    pub fn termination_reason(&self) -> BnbTerminationReason {
        self.termination.reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_parts(
        self,
    ) -> (
        SolverResult<T>,
        Termination<BnbTerminationReason>,
        BnbSolverStatistics,
    ) {
        (self.result, self.termination, self.statistics)
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BnbSolverOutcome({}, {})", self.result, self.termination)
    }
}
