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

//! Schedules with 1-based berths.

use crate::{
    error::{MooringError, Result},
    index::{berth_index, external_berth, vessel_index},
    model::Model,
};
use mooring_model::solution::Solution as InnerSolution;

/// A berth and start time for every vessel, plus the weighted completion
/// time. `berths()[i]` is the 1-based berth of vessel `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    objective_value: i64,
    berths: Vec<usize>,
    start_times: Vec<i64>,
}

impl Solution {
    /// Fails if the two vectors differ in length or a berth is `0`.
    pub fn new(objective_value: i64, berths: Vec<usize>, start_times: Vec<i64>) -> Result<Self> {
        if berths.len() != start_times.len() {
            return Err(MooringError::invalid_argument(format!(
                "solution has {} berths but {} start times",
                berths.len(),
                start_times.len()
            )));
        }
        for &berth in &berths {
            berth_index(berth, usize::MAX)?;
        }
        Ok(Self {
            objective_value,
            berths,
            start_times,
        })
    }

    #[inline]
    pub fn objective_value(&self) -> i64 {
        self.objective_value
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.berths.len()
    }

    #[inline]
    pub fn berths(&self) -> &[usize] {
        &self.berths
    }

    #[inline]
    pub fn start_times(&self) -> &[i64] {
        &self.start_times
    }

    pub fn berth(&self, vessel: usize) -> Result<usize> {
        let v = vessel_index(vessel, self.num_vessels())?;
        Ok(self.berths[v.get()])
    }

    pub fn start_time(&self, vessel: usize) -> Result<i64> {
        let v = vessel_index(vessel, self.num_vessels())?;
        Ok(self.start_times[v.get()])
    }

    /// Translates to 0-based berths and recomputes the objective against
    /// `model`. Feasibility is not checked here.
    pub fn to_internal(&self, model: &Model) -> Result<InnerSolution<i64>> {
        if self.num_vessels() != model.num_vessels() {
            return Err(MooringError::invalid_argument(format!(
                "solution covers {} vessels but the model has {}",
                self.num_vessels(),
                model.num_vessels()
            )));
        }
        let berths = self
            .berths
            .iter()
            .map(|&b| berth_index(b, model.num_berths()))
            .collect::<Result<Vec<_>>>()?;
        InnerSolution::from_assignments(model.inner(), berths, self.start_times.clone()).ok_or_else(
            || MooringError::invalid_argument("solution places a vessel on a forbidden berth"),
        )
    }
}

impl From<&InnerSolution<i64>> for Solution {
    fn from(solution: &InnerSolution<i64>) -> Self {
        Self {
            objective_value: solution.objective_value(),
            berths: solution.berths().iter().map(|&b| external_berth(b)).collect(),
            start_times: solution.start_times().to_vec(),
        }
    }
}

impl From<InnerSolution<i64>> for Solution {
    #[inline]
    fn from(solution: InnerSolution<i64>) -> Self {
        Self::from(&solution)
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution(objective: {}, [", self.objective_value)?;
        for (i, (berth, start)) in self.berths.iter().zip(&self.start_times).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}@{}", i + 1, berth, start)?;
        }
        write!(f, "])")
    }
}
