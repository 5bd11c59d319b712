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

/// Counters collected during one branch-and-bound run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnbSolverStatistics {
    /// Nodes entered, the root included.
    pub nodes_explored: u64,
    pub backtracks: u64,
    /// Children produced by the decision builder.
    pub decisions_generated: u64,
    /// Deepest level reached, in assigned vessels.
    pub max_depth: u64,
    /// Nodes discarded because a vessel can no longer be placed.
    pub prunings_infeasible: u64,
    /// Nodes discarded because their lower bound reaches the incumbent.
    pub prunings_bound: u64,
    /// Improving solutions recorded, the warm start excluded.
    pub solutions_found: u64,
    /// Iterations of the main loop.
    pub steps: u64,
    pub lower_bound_evaluations: u64,
    pub time_total: Duration,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decisions_generated(&mut self, count: u64) {
        self.decisions_generated = self.decisions_generated.saturating_add_val(count);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add_val(1);
    }

    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add_val(1);
    }

    #[inline]
    pub fn on_lower_bound_evaluated(&mut self) {
        self.lower_bound_evaluations = self.lower_bound_evaluations.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Total number of pruned nodes.
    #[inline]
    pub fn prunings(&self) -> u64 {
        self.prunings_infeasible.saturating_add_val(self.prunings_bound)
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mooring-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:          {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:              {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:       {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:     {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (infeasible):   {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):        {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:         {}", self.solutions_found)?;
        writeln!(f, "  Steps:                   {}", self.steps)?;
        writeln!(f, "  Lower bound evaluations: {}", self.lower_bound_evaluations)?;
        writeln!(f, "  Total time:              {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = BnbSolverStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_decisions_generated(5);
        stats.on_depth_update(3);
        stats.on_depth_update(1);
        stats.on_pruning_bound();
        stats.on_pruning_infeasible();
        stats.on_lower_bound_evaluated();

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.decisions_generated, 5);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.prunings(), 2);
        assert_eq!(stats.lower_bound_evaluations, 1);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = BnbSolverStatistics {
            decisions_generated: u64::MAX - 1,
            ..Default::default()
        };
        stats.on_decisions_generated(10);
        assert_eq!(stats.decisions_generated, u64::MAX);
    }

    #[test]
    fn test_display_lists_every_counter() {
        let text = BnbSolverStatistics::default().to_string();
        assert!(text.starts_with("Mooring-BnB Solver Statistics:"));
        assert!(text.contains("Lower bound evaluations: 0"));
        assert!(text.contains("Prunings (bound):        0"));
    }
}
