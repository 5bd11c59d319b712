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

use crate::{
    index::{BerthIndex, VesselIndex},
    time::ProcessingTime,
};
use mooring_core::{math::interval::ClosedOpenInterval, num::constants::MinusOne};
use num_traits::{PrimInt, Signed};

#[inline(always)]
fn flatten_index(num_berths: usize, vessel_index: VesselIndex, berth_index: BerthIndex) -> usize {
    vessel_index.get() * num_berths + berth_index.get()
}

/// Size of the berth-assignment space of a model.
///
/// The value is `Π_v max(1, allowed_berths(v))`, the number of distinct
/// vessel-to-berth maps, held in `log2` space since it overflows every
/// integer type for realistic instances. Sequencing on each berth is not
/// counted, so two models with the same allowed sets compare equal.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    log2_val: f64,
}

impl Complexity {
    /// Builds the complexity from per-vessel allowed berth counts.
    pub fn from_allowed_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let log2_val = counts
            .into_iter()
            .map(|count| (count.max(1) as f64).log2())
            .sum();
        Complexity { log2_val }
    }

    /// The base-2 logarithm of the assignment space size; always `>= 0`.
    #[inline]
    pub fn log2(&self) -> f64 {
        self.log2_val
    }

    /// Order of magnitude in base 10.
    #[inline]
    pub fn exponent(&self) -> u64 {
        (self.log2_val * std::f64::consts::LOG10_2).floor() as u64
    }

    /// Base-10 coefficient, in `[1, 10)`.
    #[inline]
    pub fn mantissa(&self) -> f64 {
        let log10 = self.log2_val * std::f64::consts::LOG10_2;
        10.0_f64.powf(log10 - log10.floor())
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Complexity(log2={:.4})", self.log2_val)
    }
}

/// The immutable berth allocation instance.
///
/// Data is stored as structure-of-arrays:
/// - `arrival_times[v]`, `latest_departure_times[v]`, `vessel_weights[v]`
/// - `processing_times[v * num_berths + b]`, sentinel-encoded
/// - `opening_times[b]` / `closing_times[b]`: sorted, disjoint windows that
///   partition `[0, T::MAX)`
/// - `shortest_processing_times[v]` and `allowed_berths_count[v]`, derived
///
/// Obtain one through [`ModelBuilder::build`].
#[derive(Clone)]
pub struct Model<T>
where
    T: PrimInt + Signed,
{
    arrival_times: Vec<T>,
    latest_departure_times: Vec<T>,
    vessel_weights: Vec<T>,
    processing_times: Vec<ProcessingTime<T>>,
    opening_times: Vec<Vec<ClosedOpenInterval<T>>>,
    closing_times: Vec<Vec<ClosedOpenInterval<T>>>,
    shortest_processing_times: Vec<ProcessingTime<T>>,
    allowed_berths_count: Vec<usize>,
}

impl<T> Model<T>
where
    T: PrimInt + Signed + MinusOne,
{
    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.arrival_times.len()
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.opening_times.len()
    }

    #[inline]
    pub fn complexity(&self) -> Complexity {
        Complexity::from_allowed_counts(self.allowed_berths_count.iter().copied())
    }

    /// `Σ_v log2(max(1, allowed_berths(v)))`.
    ///
    /// Deterministic, finite, and non-negative for every model.
    #[inline]
    pub fn log_complexity(&self) -> f64 {
        self.complexity().log2()
    }

    #[inline]
    pub fn vessel_arrival_times(&self) -> &[T] {
        &self.arrival_times
    }

    #[inline]
    pub fn vessel_latest_departure_times(&self) -> &[T] {
        &self.latest_departure_times
    }

    #[inline]
    pub fn vessel_weights(&self) -> &[T] {
        &self.vessel_weights
    }

    /// The flat `vessels × berths` processing-time matrix, row-major by vessel.
    #[inline]
    pub fn vessel_processing_times(&self) -> &[ProcessingTime<T>] {
        &self.processing_times
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    #[inline]
    pub fn vessel_arrival_time(&self, vessel_index: VesselIndex) -> T {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Model::vessel_arrival_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.arrival_times[index]
    }

    /// # Safety
    ///
    /// `vessel_index` must be in `0..num_vessels()`.
    #[inline]
    pub unsafe fn vessel_arrival_time_unchecked(&self, vessel_index: VesselIndex) -> T {
        debug_assert!(
            vessel_index.get() < self.num_vessels(),
            "called `Model::vessel_arrival_time_unchecked` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index.get()
        );
        unsafe { *self.arrival_times.get_unchecked(vessel_index.get()) }
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    #[inline]
    pub fn vessel_latest_departure_time(&self, vessel_index: VesselIndex) -> T {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Model::vessel_latest_departure_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.latest_departure_times[index]
    }

    /// # Safety
    ///
    /// `vessel_index` must be in `0..num_vessels()`.
    #[inline]
    pub unsafe fn vessel_latest_departure_time_unchecked(&self, vessel_index: VesselIndex) -> T {
        debug_assert!(
            vessel_index.get() < self.num_vessels(),
            "called `Model::vessel_latest_departure_time_unchecked` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index.get()
        );
        unsafe { *self.latest_departure_times.get_unchecked(vessel_index.get()) }
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    #[inline]
    pub fn vessel_weight(&self, vessel_index: VesselIndex) -> T {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Model::vessel_weight` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.vessel_weights[index]
    }

    /// # Safety
    ///
    /// `vessel_index` must be in `0..num_vessels()`.
    #[inline]
    pub unsafe fn vessel_weight_unchecked(&self, vessel_index: VesselIndex) -> T {
        debug_assert!(
            vessel_index.get() < self.num_vessels(),
            "called `Model::vessel_weight_unchecked` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index.get()
        );
        unsafe { *self.vessel_weights.get_unchecked(vessel_index.get()) }
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn vessel_processing_time(
        &self,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    ) -> ProcessingTime<T> {
        assert!(
            vessel_index.get() < self.num_vessels(),
            "called `Model::vessel_processing_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index.get()
        );
        assert!(
            berth_index.get() < self.num_berths(),
            "called `Model::vessel_processing_time` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index.get()
        );
        self.processing_times[flatten_index(self.num_berths(), vessel_index, berth_index)]
    }

    /// # Safety
    ///
    /// `vessel_index` must be in `0..num_vessels()` and `berth_index` in
    /// `0..num_berths()`.
    #[inline]
    pub unsafe fn vessel_processing_time_unchecked(
        &self,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    ) -> ProcessingTime<T> {
        debug_assert!(
            vessel_index.get() < self.num_vessels(),
            "called `Model::vessel_processing_time_unchecked` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index.get()
        );
        debug_assert!(
            berth_index.get() < self.num_berths(),
            "called `Model::vessel_processing_time_unchecked` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index.get()
        );
        let flat_index = flatten_index(self.num_berths(), vessel_index, berth_index);
        unsafe { *self.processing_times.get_unchecked(flat_index) }
    }

    /// Returns `true` if the vessel has a processing time on the berth.
    #[inline]
    pub fn vessel_allowed_on_berth(&self, vessel_index: VesselIndex, berth_index: BerthIndex) -> bool {
        self.vessel_processing_time(vessel_index, berth_index).is_some()
    }

    /// Number of berths the vessel may use.
    ///
    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    #[inline]
    pub fn allowed_berths_count(&self, vessel_index: VesselIndex) -> usize {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Model::allowed_berths_count` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.allowed_berths_count[index]
    }

    /// The smallest processing time across all berths, or `None` if the
    /// vessel is forbidden everywhere.
    ///
    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    #[inline]
    pub fn vessel_shortest_processing_time(&self, vessel_index: VesselIndex) -> ProcessingTime<T> {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Model::vessel_shortest_processing_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.shortest_processing_times[index]
    }

    /// Sorted, disjoint windows during which the berth can host vessels.
    ///
    /// # Panics
    ///
    /// Panics if `berth_index` is not in `0..num_berths()`.
    #[inline]
    pub fn berth_opening_times(&self, berth_index: BerthIndex) -> &[ClosedOpenInterval<T>] {
        let index = berth_index.get();
        assert!(
            index < self.num_berths(),
            "called `Model::berth_opening_times` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        &self.opening_times[index]
    }

    /// # Safety
    ///
    /// `berth_index` must be in `0..num_berths()`.
    #[inline]
    pub unsafe fn berth_opening_times_unchecked(
        &self,
        berth_index: BerthIndex,
    ) -> &[ClosedOpenInterval<T>] {
        debug_assert!(
            berth_index.get() < self.num_berths(),
            "called `Model::berth_opening_times_unchecked` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index.get()
        );
        unsafe { self.opening_times.get_unchecked(berth_index.get()) }
    }

    /// Sorted, disjoint maintenance windows; the complement of the openings
    /// within `[0, T::MAX)`.
    ///
    /// # Panics
    ///
    /// Panics if `berth_index` is not in `0..num_berths()`.
    #[inline]
    pub fn berth_closing_times(&self, berth_index: BerthIndex) -> &[ClosedOpenInterval<T>] {
        let index = berth_index.get();
        assert!(
            index < self.num_berths(),
            "called `Model::berth_closing_times` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        &self.closing_times[index]
    }
}

impl<T> std::fmt::Debug for Model<T>
where
    T: PrimInt + Signed + MinusOne + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("arrival_times", &self.arrival_times)
            .field("latest_departure_times", &self.latest_departure_times)
            .field("vessel_weights", &self.vessel_weights)
            .field("processing_times", &self.processing_times)
            .field("opening_times", &self.opening_times)
            .field("closing_times", &self.closing_times)
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: PrimInt + Signed + MinusOne,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_vessels: {}, num_berths: {}, complexity: {})",
            self.num_vessels(),
            self.num_berths(),
            self.complexity()
        )
    }
}

/// Mutable builder for [`Model`].
///
/// Starts from permissive bounds and an empty topology:
///
/// | field | default |
/// | :--- | :--- |
/// | berth openings | `[0, T::MAX)` |
/// | arrival time | `0` |
/// | latest departure | `T::MAX` |
/// | weight | `1` |
/// | processing time | `None` (forbidden) |
///
/// A fresh builder therefore describes an infeasible instance until
/// processing times are set.
///
/// ```rust
/// # use mooring_model::model::ModelBuilder;
/// # use mooring_model::index::{BerthIndex, VesselIndex};
/// # use mooring_model::time::ProcessingTime;
/// let mut builder = ModelBuilder::<i64>::new(1, 1);
/// builder
///     .set_vessel_latest_departure_time(VesselIndex::new(0), 1000)
///     .set_vessel_processing_time(VesselIndex::new(0), BerthIndex::new(0), ProcessingTime::some(10));
/// let model = builder.build();
/// assert_eq!(model.allowed_berths_count(VesselIndex::new(0)), 1);
/// ```
#[derive(Clone)]
pub struct ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    num_berths: usize,
    num_vessels: usize,
    opening_times: Vec<rangemap::RangeSet<T>>,
    closing_times: Vec<rangemap::RangeSet<T>>,
    arrival_times: Vec<T>,
    latest_departure_times: Vec<T>,
    vessel_weights: Vec<T>,
    processing_times: Vec<ProcessingTime<T>>,
}

#[inline(always)]
fn unconstrained_berth<T>() -> rangemap::RangeSet<T>
where
    T: PrimInt + Signed,
{
    let mut set = rangemap::RangeSet::new();
    set.insert(T::zero()..T::max_value());
    set
}

impl<T> ModelBuilder<T>
where
    T: PrimInt + Signed + MinusOne,
{
    pub fn new(num_berths: usize, num_vessels: usize) -> Self {
        ModelBuilder {
            num_berths,
            num_vessels,
            opening_times: vec![unconstrained_berth(); num_berths],
            closing_times: vec![rangemap::RangeSet::new(); num_berths],
            arrival_times: vec![T::zero(); num_vessels],
            latest_departure_times: vec![T::max_value(); num_vessels],
            vessel_weights: vec![T::one(); num_vessels],
            processing_times: vec![ProcessingTime::none(); num_vessels * num_berths],
        }
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.num_berths
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.num_vessels
    }

    #[inline(always)]
    fn check_vessel(&self, method: &str, vessel_index: VesselIndex) {
        assert!(
            vessel_index.get() < self.num_vessels,
            "called `ModelBuilder::{}` with vessel index out of bounds: the len is {} but the index is {}",
            method,
            self.num_vessels,
            vessel_index.get()
        );
    }

    #[inline(always)]
    fn check_berth(&self, method: &str, berth_index: BerthIndex) {
        assert!(
            berth_index.get() < self.num_berths,
            "called `ModelBuilder::{}` with berth index out of bounds: the len is {} but the index is {}",
            method,
            self.num_berths,
            berth_index.get()
        );
    }

    /// Closes the berth during `closing_interval`; it stops being an opening.
    ///
    /// # Panics
    ///
    /// Panics if `berth_index` is not in `0..num_berths()`.
    pub fn add_berth_closing_time(
        &mut self,
        berth_index: BerthIndex,
        closing_interval: ClosedOpenInterval<T>,
    ) -> &mut Self {
        self.check_berth("add_berth_closing_time", berth_index);
        if closing_interval.is_empty() {
            return self;
        }
        let index = berth_index.get();
        self.opening_times[index].remove(closing_interval.into());
        self.closing_times[index].insert(closing_interval.into());
        self
    }

    /// Reopens the berth during `opening_interval`; it stops being a closing.
    ///
    /// # Panics
    ///
    /// Panics if `berth_index` is not in `0..num_berths()`.
    pub fn add_berth_opening_time(
        &mut self,
        berth_index: BerthIndex,
        opening_interval: ClosedOpenInterval<T>,
    ) -> &mut Self {
        self.check_berth("add_berth_opening_time", berth_index);
        if opening_interval.is_empty() {
            return self;
        }
        let index = berth_index.get();
        self.closing_times[index].remove(opening_interval.into());
        self.opening_times[index].insert(opening_interval.into());
        self
    }

    pub fn add_berth_closing_times<I>(&mut self, berth_index: BerthIndex, intervals: I) -> &mut Self
    where
        I: IntoIterator<Item = ClosedOpenInterval<T>>,
    {
        for interval in intervals {
            self.add_berth_closing_time(berth_index, interval);
        }
        self
    }

    pub fn add_berth_opening_times<I>(&mut self, berth_index: BerthIndex, intervals: I) -> &mut Self
    where
        I: IntoIterator<Item = ClosedOpenInterval<T>>,
    {
        for interval in intervals {
            self.add_berth_opening_time(berth_index, interval);
        }
        self
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    pub fn set_vessel_arrival_time(&mut self, vessel_index: VesselIndex, arrival_time: T) -> &mut Self {
        self.check_vessel("set_vessel_arrival_time", vessel_index);
        self.arrival_times[vessel_index.get()] = arrival_time;
        self
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    pub fn set_vessel_latest_departure_time(
        &mut self,
        vessel_index: VesselIndex,
        latest_departure_time: T,
    ) -> &mut Self {
        self.check_vessel("set_vessel_latest_departure_time", vessel_index);
        self.latest_departure_times[vessel_index.get()] = latest_departure_time;
        self
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()` or if `weight`
    /// is negative.
    pub fn set_vessel_weight(&mut self, vessel_index: VesselIndex, weight: T) -> &mut Self {
        self.check_vessel("set_vessel_weight", vessel_index);
        assert!(
            weight >= T::zero(),
            "called `ModelBuilder::set_vessel_weight` with a negative weight"
        );
        self.vessel_weights[vessel_index.get()] = weight;
        self
    }

    /// Overwrites whatever was stored for the pair, including a prior forbid.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn set_vessel_processing_time(
        &mut self,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        processing_time: ProcessingTime<T>,
    ) -> &mut Self {
        self.check_vessel("set_vessel_processing_time", vessel_index);
        self.check_berth("set_vessel_processing_time", berth_index);
        let flat_index = flatten_index(self.num_berths, vessel_index, berth_index);
        self.processing_times[flat_index] = processing_time;
        self
    }

    /// Disallows the pair; equivalent to storing `ProcessingTime::none()`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn forbid_vessel_berth_assignment(
        &mut self,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    ) -> &mut Self {
        self.check_vessel("forbid_vessel_berth_assignment", vessel_index);
        self.check_berth("forbid_vessel_berth_assignment", berth_index);
        let flat_index = flatten_index(self.num_berths, vessel_index, berth_index);
        self.processing_times[flat_index] = ProcessingTime::none();
        self
    }

    pub fn build(self) -> Model<T> {
        let opening_times: Vec<Vec<ClosedOpenInterval<T>>> = self
            .opening_times
            .into_iter()
            .map(|set| set.into_iter().map(ClosedOpenInterval::from).collect())
            .collect();

        let closing_times: Vec<Vec<ClosedOpenInterval<T>>> = self
            .closing_times
            .into_iter()
            .map(|set| set.into_iter().map(ClosedOpenInterval::from).collect())
            .collect();

        let (shortest_processing_times, allowed_berths_count) = if self.num_berths == 0 {
            (
                vec![ProcessingTime::none(); self.num_vessels],
                vec![0; self.num_vessels],
            )
        } else {
            self.processing_times
                .chunks_exact(self.num_berths)
                .map(|row| {
                    let allowed = row.iter().filter(|pt| pt.is_some()).count();
                    let shortest = row.iter().filter_map(|pt| pt.into_option()).min();
                    (ProcessingTime::from_option(shortest), allowed)
                })
                .unzip()
        };

        Model {
            arrival_times: self.arrival_times,
            latest_departure_times: self.latest_departure_times,
            vessel_weights: self.vessel_weights,
            processing_times: self.processing_times,
            opening_times,
            closing_times,
            shortest_processing_times,
            allowed_berths_count,
        }
    }
}

impl<T> std::fmt::Debug for ModelBuilder<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("num_berths", &self.num_berths)
            .field("num_vessels", &self.num_vessels)
            .field("opening_times", &self.opening_times)
            .field("arrival_times", &self.arrival_times)
            .field("latest_departure_times", &self.latest_departure_times)
            .field("vessel_weights", &self.vessel_weights)
            .finish()
    }
}

impl<T> std::fmt::Display for ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ModelBuilder(num_vessels: {}, num_berths: {})",
            self.num_vessels, self.num_berths
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn vi(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn bi(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    fn iv(s: IntegerType, e: IntegerType) -> ClosedOpenInterval<IntegerType> {
        ClosedOpenInterval::new(s, e)
    }

    #[test]
    fn test_builder_defaults() {
        let model = ModelBuilder::<IntegerType>::new(2, 3).build();
        assert_eq!(model.num_berths(), 2);
        assert_eq!(model.num_vessels(), 3);
        assert_eq!(model.vessel_arrival_time(vi(1)), 0);
        assert_eq!(model.vessel_latest_departure_time(vi(1)), IntegerType::MAX);
        assert_eq!(model.vessel_weight(vi(2)), 1);
        assert!(model.vessel_processing_time(vi(0), bi(1)).is_none());
        assert_eq!(model.berth_opening_times(bi(0)), &[iv(0, IntegerType::MAX)]);
        assert!(model.berth_closing_times(bi(0)).is_empty());
        assert_eq!(model.allowed_berths_count(vi(0)), 0);
    }

    #[test]
    fn test_setters_round_trip() {
        let mut builder = ModelBuilder::<IntegerType>::new(2, 2);
        builder
            .set_vessel_arrival_time(vi(0), 5)
            .set_vessel_latest_departure_time(vi(0), 50)
            .set_vessel_weight(vi(0), 3)
            .set_vessel_processing_time(vi(0), bi(1), ProcessingTime::some(7));
        let model = builder.build();
        assert_eq!(model.vessel_arrival_time(vi(0)), 5);
        assert_eq!(model.vessel_latest_departure_time(vi(0)), 50);
        assert_eq!(model.vessel_weight(vi(0)), 3);
        assert_eq!(model.vessel_processing_time(vi(0), bi(1)).into_option(), Some(7));
        assert!(model.vessel_allowed_on_berth(vi(0), bi(1)));
        assert!(!model.vessel_allowed_on_berth(vi(0), bi(0)));
        unsafe {
            assert_eq!(model.vessel_arrival_time_unchecked(vi(0)), 5);
            assert_eq!(model.vessel_weight_unchecked(vi(0)), 3);
            assert_eq!(
                model.vessel_processing_time_unchecked(vi(0), bi(1)),
                model.vessel_processing_time(vi(0), bi(1))
            );
        }
    }

    #[test]
    fn test_forbid_and_set_overwrite_each_other() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 1);
        builder.set_vessel_processing_time(vi(0), bi(0), ProcessingTime::some(4));
        builder.forbid_vessel_berth_assignment(vi(0), bi(0));
        assert!(builder.clone().build().vessel_processing_time(vi(0), bi(0)).is_none());

        builder.set_vessel_processing_time(vi(0), bi(0), ProcessingTime::some(9));
        let model = builder.build();
        assert_eq!(model.vessel_processing_time(vi(0), bi(0)).into_option(), Some(9));
    }

    #[test]
    fn test_closings_and_openings_stay_complementary() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 0);
        builder.add_berth_closing_times(bi(0), vec![iv(10, 20), iv(15, 30), iv(50, 60)]);
        builder.add_berth_opening_time(bi(0), iv(55, 58));
        let model = builder.build();

        assert_eq!(
            model.berth_opening_times(bi(0)),
            &[iv(0, 10), iv(30, 50), iv(55, 58), iv(60, IntegerType::MAX)]
        );
        assert_eq!(
            model.berth_closing_times(bi(0)),
            &[iv(10, 30), iv(50, 55), iv(58, 60)]
        );
    }

    #[test]
    fn test_empty_intervals_are_ignored() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 0);
        builder.add_berth_closing_time(bi(0), iv(5, 5));
        let model = builder.build();
        assert_eq!(model.berth_opening_times(bi(0)), &[iv(0, IntegerType::MAX)]);
    }

    #[test]
    fn test_shortest_processing_and_allowed_counts() {
        let mut builder = ModelBuilder::<IntegerType>::new(3, 2);
        builder
            .set_vessel_processing_time(vi(0), bi(0), ProcessingTime::some(12))
            .set_vessel_processing_time(vi(0), bi(2), ProcessingTime::some(8));
        let model = builder.build();
        assert_eq!(model.vessel_shortest_processing_time(vi(0)).into_option(), Some(8));
        assert!(model.vessel_shortest_processing_time(vi(1)).is_none());
        assert_eq!(model.allowed_berths_count(vi(0)), 2);
        assert_eq!(model.allowed_berths_count(vi(1)), 0);
    }

    #[test]
    fn test_log_complexity_sums_log2_of_allowed() {
        let mut builder = ModelBuilder::<IntegerType>::new(4, 3);
        for b in 0..4 {
            builder.set_vessel_processing_time(vi(0), bi(b), ProcessingTime::some(1));
        }
        builder
            .set_vessel_processing_time(vi(1), bi(0), ProcessingTime::some(1))
            .set_vessel_processing_time(vi(1), bi(1), ProcessingTime::some(1));
        let model = builder.build();
        // log2(4) + log2(2) + log2(max(1, 0))
        assert!((model.log_complexity() - 3.0).abs() < 1e-12);
        assert_eq!(model.log_complexity(), model.clone().log_complexity());
    }

    #[test]
    fn test_log_complexity_is_zero_for_degenerate_models() {
        assert_eq!(ModelBuilder::<IntegerType>::new(0, 0).build().log_complexity(), 0.0);
        assert_eq!(ModelBuilder::<IntegerType>::new(0, 5).build().log_complexity(), 0.0);
    }

    #[test]
    fn test_complexity_display() {
        let complexity = Complexity::from_allowed_counts([1024usize]);
        assert_eq!(complexity.exponent(), 3);
        assert_eq!(format!("{}", complexity), "1.02 × 10^3");
        assert_eq!(format!("{:?}", complexity), "Complexity(log2=10.0000)");
    }

    #[test]
    #[should_panic(
        expected = "called `ModelBuilder::set_vessel_arrival_time` with vessel index out of bounds: the len is 2 but the index is 2"
    )]
    fn test_builder_vessel_out_of_bounds_panics() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 2);
        builder.set_vessel_arrival_time(vi(2), 0);
    }

    #[test]
    #[should_panic(expected = "with a negative weight")]
    fn test_builder_negative_weight_panics() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 1);
        builder.set_vessel_weight(vi(0), -1);
    }

    #[test]
    fn test_display_formats() {
        let builder = ModelBuilder::<IntegerType>::new(2, 3);
        assert_eq!(format!("{}", builder), "ModelBuilder(num_vessels: 3, num_berths: 2)");
        let model = builder.build();
        assert!(format!("{}", model).starts_with("Model(num_vessels: 3, num_berths: 2"));
    }
}
