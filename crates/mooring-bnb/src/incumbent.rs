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

//! The best solution known to a running search.

use mooring_model::solution::Solution;
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone)]
pub struct Incumbent<T> {
    upper_bound: T,
    solution: Option<Solution<T>>,
}

impl<T> Default for Incumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Incumbent<T>
where
    T: SolverNumeric,
{
    /// No solution; every objective is an improvement.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: T::max_value(),
            solution: None,
        }
    }

    /// Objective a new solution has to beat strictly.
    #[inline]
    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }

    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        self.solution.as_ref()
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// Installs `solution` if it is strictly better. Returns whether it was
    /// installed.
    #[inline]
    pub fn try_install(&mut self, solution: Solution<T>) -> bool {
        if solution.objective_value() >= self.upper_bound {
            return false;
        }
        self.upper_bound = solution.objective_value();
        self.solution = Some(solution);
        true
    }

    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        self.solution
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
    fn test_only_strict_improvements_are_installed() {
        let mut incumbent = Incumbent::new();
        assert_eq!(incumbent.upper_bound(), i64::MAX);
        assert!(!incumbent.has_solution());

        assert!(incumbent.try_install(solution(10)));
        assert!(!incumbent.try_install(solution(10)));
        assert!(!incumbent.try_install(solution(12)));
        assert!(incumbent.try_install(solution(7)));

        assert_eq!(incumbent.upper_bound(), 7);
        assert_eq!(incumbent.into_solution().map(|s| s.objective_value()), Some(7));
    }
}
