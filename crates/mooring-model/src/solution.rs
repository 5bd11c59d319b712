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

//! Complete berth schedules.

use crate::{
    index::{BerthIndex, VesselIndex},
    model::Model,
};
use mooring_core::num::constants::MinusOne;
use num_traits::{PrimInt, Signed};

/// `weight · finish`, clamped to the representable range.
#[inline]
pub fn weighted_cost<T>(weight: T, finish: T) -> T
where
    T: PrimInt + Signed,
{
    weight.checked_mul(&finish).unwrap_or_else(|| {
        if (weight < T::zero()) != (finish < T::zero()) {
            T::min_value()
        } else {
            T::max_value()
        }
    })
}

/// A complete schedule: one `(berth, start_time)` per vessel plus the
/// weighted completion time `Σ w_v · (s_v + p_{v,b_v})`.
///
/// The solution has no back-reference to the model it was built for;
/// consistency is checked with [`crate::feasibility::check_solution`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution<T> {
    objective_value: T,
    berths: Vec<BerthIndex>,
    start_times: Vec<T>,
}

impl<T> Solution<T>
where
    T: PrimInt + Signed,
{
    /// # Panics
    ///
    /// Panics if `berths` and `start_times` have different lengths.
    pub fn new(objective_value: T, berths: Vec<BerthIndex>, start_times: Vec<T>) -> Self {
        assert_eq!(
            berths.len(),
            start_times.len(),
            "called `Solution::new` with inconsistent vector lengths: berths.len() = {}, start_times.len() = {}",
            berths.len(),
            start_times.len()
        );

        Self {
            objective_value,
            berths,
            start_times,
        }
    }

    /// Builds a solution and computes its objective against `model`.
    ///
    /// Returns `None` when a vessel sits on a berth it has no processing time
    /// for, or the dimensions disagree with the model.
    pub fn from_assignments(
        model: &Model<T>,
        berths: Vec<BerthIndex>,
        start_times: Vec<T>,
    ) -> Option<Self>
    where
        T: MinusOne,
    {
        if berths.len() != model.num_vessels() || start_times.len() != model.num_vessels() {
            return None;
        }

        let mut objective = T::zero();
        for (v, (&berth, &start)) in berths.iter().zip(start_times.iter()).enumerate() {
            if berth.get() >= model.num_berths() {
                return None;
            }
            let vessel = VesselIndex::new(v);
            let processing = model.vessel_processing_time(vessel, berth).into_option()?;
            let finish = start.saturating_add(processing);
            objective = objective.saturating_add(weighted_cost(model.vessel_weight(vessel), finish));
        }

        Some(Self::new(objective, berths, start_times))
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn berth_for_vessel(&self, vessel_index: VesselIndex) -> BerthIndex {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Solution::berth_for_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.berths[index]
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn start_time_for_vessel(&self, vessel_index: VesselIndex) -> T {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Solution::start_time_for_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.start_times[index]
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.berths.len()
    }

    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    #[inline]
    pub fn berths(&self) -> &[BerthIndex] {
        &self.berths
    }

    #[inline]
    pub fn start_times(&self) -> &[T] {
        &self.start_times
    }

    /// Iterates `(vessel, berth, start_time)` in vessel order.
    pub fn iter(&self) -> impl Iterator<Item = (VesselIndex, BerthIndex, T)> + '_ {
        self.berths
            .iter()
            .zip(self.start_times.iter())
            .enumerate()
            .map(|(v, (&b, &s))| (VesselIndex::new(v), b, s))
    }

    pub fn into_parts(self) -> (T, Vec<BerthIndex>, Vec<T>) {
        (self.objective_value, self.berths, self.start_times)
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution Summary")?;
        writeln!(f, "   Objective Value: {}", self.objective_value)?;
        writeln!(f)?;

        if self.num_vessels() == 0 {
            writeln!(f, "   (No vessels assigned)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10} | {:<12}", "Vessel", "Berth", "Start Time")?;
        writeln!(f, "   {:-<10}-+-{:-<10}-+-{:-<12}", "", "", "")?;
        for (vessel, berth, start) in self.iter() {
            writeln!(f, "   {:<10} | {:<10} | {:<12}", vessel.get(), berth.get(), start)?;
        }
        Ok(())
    }
}
