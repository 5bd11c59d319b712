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

use mooring_model::solution::Solution;
use num_traits::{PrimInt, Signed};

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// No feasible schedule exists.
    Infeasible,
    /// A schedule proven to be optimal.
    Optimal(Solution<T>),
    /// A schedule without an optimality proof.
    Feasible(Solution<T>),
    /// The search stopped before finding a schedule or proving infeasibility.
    Unknown,
}

impl<T> SolverResult<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(self, SolverResult::Optimal(_) | SolverResult::Feasible(_))
    }

    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            _ => None,
        }
    }

    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            _ => None,
        }
    }

    #[inline]
    pub fn objective_value(&self) -> Option<T> {
        self.solution().map(Solution::objective_value)
    }

    /// Short status name: `Optimal`, `Feasible`, `Infeasible` or `Unknown`.
    pub fn status(&self) -> &'static str {
        match self {
            SolverResult::Infeasible => "Infeasible",
            SolverResult::Optimal(_) => "Optimal",
            SolverResult::Feasible(_) => "Feasible",
            SolverResult::Unknown => "Unknown",
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => write!(
                f,
                "{}(objective={})",
                self.status(),
                solution.objective_value()
            ),
            _ => write!(f, "{}", self.status()),
        }
    }
}

/// Why a search stopped, with a human-readable message.
///
/// Each engine brings its own reason enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination<R> {
    pub reason: R,
    pub message: String,
}

impl<R> Termination<R> {
    #[inline]
    pub fn new<S>(reason: R, message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            reason,
            message: message.into(),
        }
    }
}

impl<R> std::fmt::Display for Termination<R>
where
    R: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "{}: {}", self.reason, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_model::index::BerthIndex;

    fn solution(objective: i64) -> Solution<i64> {
        Solution::new(objective, vec![BerthIndex::new(0)], vec![0])
    }

    #[test]
    fn test_solution_accessors() {
        let optimal = SolverResult::Optimal(solution(10));
        assert!(optimal.has_solution());
        assert_eq!(optimal.objective_value(), Some(10));
        assert_eq!(optimal.status(), "Optimal");

        let unknown = SolverResult::<i64>::Unknown;
        assert!(!unknown.has_solution());
        assert!(unknown.solution().is_none());
        assert!(SolverResult::<i64>::Infeasible.into_solution().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SolverResult::Feasible(solution(7)).to_string(),
            "Feasible(objective=7)"
        );
        assert_eq!(SolverResult::<i64>::Infeasible.to_string(), "Infeasible");
        assert_eq!(Termination::new("Aborted", "time limit").to_string(), "Aborted: time limit");
        assert_eq!(Termination::new("Done", "").to_string(), "Done");
    }
}
