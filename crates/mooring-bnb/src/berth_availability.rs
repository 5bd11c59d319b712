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

//! Per-berth availability for a single solve.
//!
//! `BerthAvailability` combines the model's opening windows with the windows
//! occupied by fixed assignments. After [`BerthAvailability::initialize`] each
//! berth carries two sorted, disjoint lists:
//!
//! - `available`: openings minus fixed occupancies. Every decision the search
//!   makes has to fit entirely inside one of these windows.
//! - `unavailable`: closings plus fixed occupancies.
//!
//! Initialization doubles as the validation of the fixed assignments: a
//! fixed assignment that starts before its vessel arrives, finishes after its
//! deadline, uses a forbidden berth, leaves the berth's opening windows, or
//! overlaps another fixed assignment makes the whole instance infeasible.

use crate::fixed::FixedAssignment;
use fixedbitset::FixedBitSet;
use mooring_core::{
    algorithm::{earliest_fit, normalize_in_place, subtract_into},
    math::interval::ClosedOpenInterval,
    num::constants::MinusOne,
};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
};
use num_traits::{PrimInt, Signed};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BerthAvailability<T>
where
    T: PrimInt,
{
    unavailable_times: Vec<Vec<ClosedOpenInterval<T>>>,
    available_times: Vec<Vec<ClosedOpenInterval<T>>>,
    mirrors_previous: Vec<bool>,
    num_berths: usize,
}

impl<T> BerthAvailability<T>
where
    T: PrimInt,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            unavailable_times: Vec::new(),
            available_times: Vec::new(),
            mirrors_previous: Vec::new(),
            num_berths: 0,
        }
    }

    #[inline]
    pub fn preallocated(num_berths: usize) -> Self {
        let mut availability = Self::new();
        availability.ensure_capacity(num_berths);
        availability
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_berths: usize) {
        if self.unavailable_times.len() < num_berths {
            self.unavailable_times.resize(num_berths, Vec::new());
        }
        if self.available_times.len() < num_berths {
            self.available_times.resize(num_berths, Vec::new());
        }
    }

    /// Clears every list but keeps the allocations.
    #[inline]
    pub fn reset(&mut self) {
        self.unavailable_times.iter_mut().for_each(Vec::clear);
        self.available_times.iter_mut().for_each(Vec::clear);
        self.mirrors_previous.clear();
        self.num_berths = 0;
    }

    /// Builds the availability of every berth of `model` with `fixed`
    /// pre-applied.
    ///
    /// Returns `false` if any fixed assignment is infeasible on its own or
    /// overlaps another one.
    ///
    /// # Panics
    ///
    /// Panics if a fixed assignment references a vessel or berth outside the
    /// model, or if two fixed assignments pin the same vessel.
    pub fn initialize(&mut self, model: &Model<T>, fixed: &[FixedAssignment<T>]) -> bool
    where
        T: Signed + MinusOne,
    {
        let num_berths = model.num_berths();
        let num_vessels = model.num_vessels();

        self.reset();
        self.ensure_capacity(num_berths);
        self.num_berths = num_berths;

        let mut seen = FixedBitSet::with_capacity(num_vessels);
        let mut feasible = true;

        for assignment in fixed {
            let vessel = assignment.vessel_index;
            let berth = assignment.berth_index;
            assert!(
                vessel.get() < num_vessels,
                "called `BerthAvailability::initialize` with vessel index out of bounds: the len is {} but the index is {}",
                num_vessels,
                vessel.get()
            );
            assert!(
                berth.get() < num_berths,
                "called `BerthAvailability::initialize` with berth index out of bounds: the len is {} but the index is {}",
                num_berths,
                berth.get()
            );
            assert!(
                !seen.put(vessel.get()),
                "called `BerthAvailability::initialize` with vessel {} fixed more than once",
                vessel
            );

            if !feasible {
                continue;
            }

            let Some(duration) = model.vessel_processing_time(vessel, berth).into_option() else {
                feasible = false;
                continue;
            };
            let start = assignment.start_time;
            let Some(finish) = start.checked_add(&duration) else {
                feasible = false;
                continue;
            };

            if start < model.vessel_arrival_time(vessel)
                || finish > model.vessel_latest_departure_time(vessel)
                || earliest_fit(model.berth_opening_times(berth), start, duration) != Some(start)
            {
                feasible = false;
                continue;
            }

            self.unavailable_times[berth.get()].push(ClosedOpenInterval::new(start, finish));
        }

        if !feasible {
            self.reset();
            return false;
        }

        for b in 0..num_berths {
            let berth = BerthIndex::new(b);
            let occupied = &mut self.unavailable_times[b];
            occupied.sort_unstable();
            if occupied.windows(2).any(|w| w[0].intersects(w[1])) {
                self.reset();
                return false;
            }
            normalize_in_place(occupied);

            subtract_into(
                model.berth_opening_times(berth),
                occupied,
                &mut self.available_times[b],
            );

            occupied.extend_from_slice(model.berth_closing_times(berth));
            normalize_in_place(occupied);
        }

        self.mirrors_previous.push(false);
        for b in 1..num_berths {
            let (previous, current) = (BerthIndex::new(b - 1), BerthIndex::new(b));
            let same_column = (0..num_vessels).all(|v| {
                let vessel = VesselIndex::new(v);
                model.vessel_processing_time(vessel, previous)
                    == model.vessel_processing_time(vessel, current)
            });
            self.mirrors_previous
                .push(same_column && self.has_identical_availability(previous, current));
        }

        true
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.num_berths
    }

    /// Windows in which a vessel may be serviced at `berth_index`.
    ///
    /// # Panics
    ///
    /// Panics if `berth_index` is not in `0..num_berths()`.
    #[inline]
    pub fn available_intervals(&self, berth_index: BerthIndex) -> &[ClosedOpenInterval<T>] {
        let index = berth_index.get();
        assert!(
            index < self.num_berths(),
            "called `BerthAvailability::available_intervals` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        &self.available_times[index]
    }

    /// # Safety
    ///
    /// `berth_index` must be in `0..num_berths()`.
    #[inline]
    pub unsafe fn available_intervals_unchecked(
        &self,
        berth_index: BerthIndex,
    ) -> &[ClosedOpenInterval<T>] {
        let index = berth_index.get();
        debug_assert!(
            index < self.num_berths(),
            "called `BerthAvailability::available_intervals_unchecked` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        unsafe { self.available_times.get_unchecked(index) }
    }

    /// Closings and fixed occupancies of `berth_index`.
    ///
    /// # Panics
    ///
    /// Panics if `berth_index` is not in `0..num_berths()`.
    #[inline]
    pub fn unavailable_intervals(&self, berth_index: BerthIndex) -> &[ClosedOpenInterval<T>] {
        let index = berth_index.get();
        assert!(
            index < self.num_berths(),
            "called `BerthAvailability::unavailable_intervals` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        &self.unavailable_times[index]
    }

    /// Earliest `t >= not_before` with `[t, t + duration)` inside an
    /// available window of the berth.
    #[inline]
    pub fn earliest_availability(
        &self,
        berth_index: BerthIndex,
        not_before: T,
        duration: T,
    ) -> Option<T> {
        earliest_fit(self.available_intervals(berth_index), not_before, duration)
    }

    /// # Safety
    ///
    /// `berth_index` must be in `0..num_berths()`.
    #[inline]
    pub unsafe fn earliest_availability_unchecked(
        &self,
        berth_index: BerthIndex,
        not_before: T,
        duration: T,
    ) -> Option<T> {
        let windows = unsafe { self.available_intervals_unchecked(berth_index) };
        earliest_fit(windows, not_before, duration)
    }

    /// Returns `true` if `berth_index` is interchangeable with the berth
    /// right before it: same available windows and the same processing time
    /// for every vessel.
    #[inline]
    pub fn mirrors_previous(&self, berth_index: BerthIndex) -> bool {
        self.mirrors_previous
            .get(berth_index.get())
            .copied()
            .unwrap_or(false)
    }

    /// Returns `true` if both berths have exactly the same available windows.
    #[inline]
    pub fn has_identical_availability(&self, left: BerthIndex, right: BerthIndex) -> bool {
        self.available_intervals(left) == self.available_intervals(right)
    }
}

impl<T> std::fmt::Display for BerthAvailability<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "BerthAvailability({} berths)", self.num_berths)?;
        for (b, windows) in self.available_times.iter().take(self.num_berths).enumerate() {
            write!(f, "  berth {}:", b)?;
            for window in windows {
                write!(f, " {}", window)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
