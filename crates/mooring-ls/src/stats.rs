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

use mooring_core::num::saturating::SaturatingAddVal;
use std::time::Duration;

/// Counters collected during one local search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocalSearchStatistics {
    /// Iterations of the main loop, exhausted sweeps included.
    pub iterations: u64,
    /// Candidates decoded and shown to the metaheuristic.
    pub total_solutions: u64,
    pub accepted_solutions: u64,
    /// Accepted candidates that improved on the best schedule.
    pub improving_solutions: u64,
    /// Moves the decoder could not turn into a schedule.
    pub infeasible_candidates: u64,
    /// Sweeps that ended without an accepted candidate.
    pub local_optima: u64,
    pub time_total: Duration,
}

impl LocalSearchStatistics {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_examined(&mut self) {
        self.total_solutions = self.total_solutions.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_accepted(&mut self) {
        self.accepted_solutions = self.accepted_solutions.saturating_add_val(1);
    }

    #[inline]
    pub fn on_improving_solution(&mut self) {
        self.improving_solutions = self.improving_solutions.saturating_add_val(1);
    }

    #[inline]
    pub fn on_infeasible_candidate(&mut self) {
        self.infeasible_candidates = self.infeasible_candidates.saturating_add_val(1);
    }

    #[inline]
    pub fn on_local_optimum(&mut self) {
        self.local_optima = self.local_optima.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Examined candidates that were not accepted.
    #[inline]
    pub fn rejected_solutions(&self) -> u64 {
        self.total_solutions.saturating_sub(self.accepted_solutions)
    }
}

impl std::fmt::Display for LocalSearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mooring-LS Engine Statistics:")?;
        writeln!(f, "  Iterations:            {}", self.iterations)?;
        writeln!(f, "  Candidates examined:   {}", self.total_solutions)?;
        writeln!(f, "  Accepted:              {}", self.accepted_solutions)?;
        writeln!(f, "  Rejected:              {}", self.rejected_solutions())?;
        writeln!(f, "  Improving:             {}", self.improving_solutions)?;
        writeln!(f, "  Infeasible candidates: {}", self.infeasible_candidates)?;
        writeln!(f, "  Local optima:          {}", self.local_optima)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = LocalSearchStatistics::default();
        stats.on_iteration();
        stats.on_solution_examined();
        stats.on_solution_examined();
        stats.on_solution_examined();
        stats.on_solution_accepted();
        stats.on_improving_solution();
        stats.on_local_optimum();
        stats.on_infeasible_candidate();
        assert_eq!(stats.rejected_solutions(), 2);
        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.local_optima, 1);

        let table = stats.to_string();
        assert!(table.contains("Candidates examined:   3"));
        assert!(table.contains("Rejected:              2"));
    }
}
