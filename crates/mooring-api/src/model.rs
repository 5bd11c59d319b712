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

//! Building and reading problem instances with 1-based indices.
//!
//! Every setter validates its arguments and reports problems as
//! [`MooringError`]s instead of panicking. Berth windows follow the usual
//! calling convention: the first opening window added to a berth replaces
//! the default "always open", later ones are merged in. Closing windows are
//! carved out of whatever is open when they are added.

use crate::{
    error::{MooringError, Result},
    index::{berth_index, vessel_index},
};
use mooring_core::math::interval::ClosedOpenInterval;
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::{Model as InnerModel, ModelBuilder as InnerModelBuilder},
    time::ProcessingTime,
};

/// Single-use builder for a [`Model`].
///
/// [`build`](ModelBuilder::build) consumes the builder's contents; any
/// further call fails with [`MooringError::AlreadyConsumed`].
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    inner: Option<InnerModelBuilder<i64>>,
    num_berths: usize,
    num_vessels: usize,
    has_explicit_openings: Vec<bool>,
}

impl ModelBuilder {
    /// Every berth starts open on `[0, i64::MAX)`, every vessel has arrival
    /// `0`, no deadline, weight `1` and no allowed berth.
    pub fn new(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            inner: Some(InnerModelBuilder::new(num_berths, num_vessels)),
            num_berths,
            num_vessels,
            has_explicit_openings: vec![false; num_berths],
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

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.inner.is_none()
    }

    #[inline]
    fn inner_mut(&mut self) -> Result<&mut InnerModelBuilder<i64>> {
        self.inner.as_mut().ok_or(MooringError::AlreadyConsumed)
    }

    #[inline]
    fn vessel(&self, vessel: usize) -> Result<VesselIndex> {
        if self.inner.is_none() {
            return Err(MooringError::AlreadyConsumed);
        }
        vessel_index(vessel, self.num_vessels)
    }

    #[inline]
    fn berth(&self, berth: usize) -> Result<BerthIndex> {
        if self.inner.is_none() {
            return Err(MooringError::AlreadyConsumed);
        }
        berth_index(berth, self.num_berths)
    }

    pub fn set_arrival_time(&mut self, vessel: usize, arrival_time: i64) -> Result<&mut Self> {
        let v = self.vessel(vessel)?;
        self.inner_mut()?.set_vessel_arrival_time(v, arrival_time);
        Ok(self)
    }

    pub fn set_latest_departure_time(
        &mut self,
        vessel: usize,
        latest_departure_time: i64,
    ) -> Result<&mut Self> {
        let v = self.vessel(vessel)?;
        self.inner_mut()?
            .set_vessel_latest_departure_time(v, latest_departure_time);
        Ok(self)
    }

    /// Fails with [`MooringError::InvalidArgument`] if `weight` is negative.
    pub fn set_weight(&mut self, vessel: usize, weight: i64) -> Result<&mut Self> {
        let v = self.vessel(vessel)?;
        if weight < 0 {
            return Err(MooringError::invalid_argument(format!(
                "weight of vessel {} must be non-negative, got {}",
                vessel, weight
            )));
        }
        self.inner_mut()?.set_vessel_weight(v, weight);
        Ok(self)
    }

    /// Allows the pair with the given duration, overwriting an earlier
    /// forbid. Fails with [`MooringError::InvalidArgument`] if
    /// `processing_time` is negative.
    pub fn set_processing_time(
        &mut self,
        vessel: usize,
        berth: usize,
        processing_time: i64,
    ) -> Result<&mut Self> {
        let (v, b) = (self.vessel(vessel)?, self.berth(berth)?);
        if processing_time < 0 {
            return Err(MooringError::invalid_argument(format!(
                "processing time of vessel {} at berth {} must be non-negative, got {}",
                vessel, berth, processing_time
            )));
        }
        self.inner_mut()?
            .set_vessel_processing_time(v, b, ProcessingTime::some(processing_time));
        Ok(self)
    }

    pub fn forbid_assignment(&mut self, vessel: usize, berth: usize) -> Result<&mut Self> {
        let (v, b) = (self.vessel(vessel)?, self.berth(berth)?);
        self.inner_mut()?.forbid_vessel_berth_assignment(v, b);
        Ok(self)
    }

    /// Opens `berth` on `[start, end)`. The first opening of a berth first
    /// closes it everywhere.
    pub fn add_opening_time(&mut self, berth: usize, start: i64, end: i64) -> Result<&mut Self> {
        let b = self.berth(berth)?;
        let interval = window(berth, start, end)?;
        let first = !self.has_explicit_openings[b.get()];
        let inner = self.inner_mut()?;
        if first {
            inner.add_berth_closing_time(b, ClosedOpenInterval::new(0, i64::MAX));
        }
        inner.add_berth_opening_time(b, interval);
        self.has_explicit_openings[b.get()] = true;
        Ok(self)
    }

    /// Closes `berth` on `[start, end)`.
    pub fn add_closing_time(&mut self, berth: usize, start: i64, end: i64) -> Result<&mut Self> {
        let b = self.berth(berth)?;
        let interval = window(berth, start, end)?;
        self.inner_mut()?.add_berth_closing_time(b, interval);
        Ok(self)
    }

    pub fn build(&mut self) -> Result<Model> {
        let inner = self.inner.take().ok_or(MooringError::AlreadyConsumed)?;
        Ok(Model {
            inner: inner.build(),
        })
    }
}

fn window(berth: usize, start: i64, end: i64) -> Result<ClosedOpenInterval<i64>> {
    if start < 0 {
        return Err(MooringError::invalid_argument(format!(
            "window of berth {} starts before time 0: [{}, {})",
            berth, start, end
        )));
    }
    ClosedOpenInterval::try_new(start, end).ok_or_else(|| {
        MooringError::invalid_argument(format!(
            "window of berth {} ends before it starts: [{}, {})",
            berth, start, end
        ))
    })
}

/// An immutable problem instance.
#[derive(Debug, Clone)]
pub struct Model {
    inner: InnerModel<i64>,
}

impl Model {
    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.inner.num_vessels()
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.inner.num_berths()
    }

    /// Sum over vessels of `log2` of the number of allowed berths.
    #[inline]
    pub fn log_complexity(&self) -> f64 {
        self.inner.log_complexity()
    }

    pub fn arrival_time(&self, vessel: usize) -> Result<i64> {
        let v = vessel_index(vessel, self.num_vessels())?;
        Ok(self.inner.vessel_arrival_time(v))
    }

    pub fn latest_departure_time(&self, vessel: usize) -> Result<i64> {
        let v = vessel_index(vessel, self.num_vessels())?;
        Ok(self.inner.vessel_latest_departure_time(v))
    }

    pub fn weight(&self, vessel: usize) -> Result<i64> {
        let v = vessel_index(vessel, self.num_vessels())?;
        Ok(self.inner.vessel_weight(v))
    }

    /// `None` if the pair is forbidden.
    pub fn processing_time(&self, vessel: usize, berth: usize) -> Result<Option<i64>> {
        let v = vessel_index(vessel, self.num_vessels())?;
        let b = berth_index(berth, self.num_berths())?;
        Ok(self.inner.vessel_processing_time(v, b).into_option())
    }

    pub fn is_allowed(&self, vessel: usize, berth: usize) -> Result<bool> {
        let v = vessel_index(vessel, self.num_vessels())?;
        let b = berth_index(berth, self.num_berths())?;
        Ok(self.inner.vessel_allowed_on_berth(v, b))
    }

    /// Sorted, disjoint `[start, end)` windows during which `berth` is open.
    pub fn opening_times(&self, berth: usize) -> Result<Vec<(i64, i64)>> {
        let b = berth_index(berth, self.num_berths())?;
        Ok(pairs(self.inner.berth_opening_times(b)))
    }

    /// Sorted, disjoint `[start, end)` windows during which `berth` is closed.
    pub fn closing_times(&self, berth: usize) -> Result<Vec<(i64, i64)>> {
        let b = berth_index(berth, self.num_berths())?;
        Ok(pairs(self.inner.berth_closing_times(b)))
    }

    /// The engine-level model with 0-based indices.
    #[inline]
    pub fn inner(&self) -> &InnerModel<i64> {
        &self.inner
    }
}

impl From<InnerModel<i64>> for Model {
    #[inline]
    fn from(inner: InnerModel<i64>) -> Self {
        Self { inner }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

fn pairs(intervals: &[ClosedOpenInterval<i64>]) -> Vec<(i64, i64)> {
    intervals.iter().map(|i| (i.start(), i.end())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexKind;

    #[test]
    fn test_setters_translate_indices() {
        let mut builder = ModelBuilder::new(2, 3);
        builder
            .set_arrival_time(1, 5)
            .and_then(|b| b.set_latest_departure_time(3, 90))
            .and_then(|b| b.set_weight(2, 4))
            .and_then(|b| b.set_processing_time(3, 2, 7))
            .unwrap();
        let model = builder.build().unwrap();

        assert_eq!(model.num_vessels(), 3);
        assert_eq!(model.num_berths(), 2);
        assert_eq!(model.arrival_time(1), Ok(5));
        assert_eq!(model.latest_departure_time(3), Ok(90));
        assert_eq!(model.weight(2), Ok(4));
        assert_eq!(model.processing_time(3, 2), Ok(Some(7)));
        assert_eq!(model.processing_time(3, 1), Ok(None));
        assert_eq!(model.is_allowed(3, 2), Ok(true));
        assert_eq!(
            model.inner().vessel_arrival_time(VesselIndex::new(0)),
            5
        );
    }

    #[test]
    fn test_out_of_range_indices() {
        let mut builder = ModelBuilder::new(2, 3);
        assert_eq!(
            builder.set_arrival_time(0, 1).err(),
            Some(MooringError::IndexOutOfRange {
                kind: IndexKind::Vessel,
                index: 0,
                len: 3
            })
        );
        assert_eq!(
            builder.set_processing_time(1, 3, 1).err(),
            Some(MooringError::IndexOutOfRange {
                kind: IndexKind::Berth,
                index: 3,
                len: 2
            })
        );
        let model = builder.build().unwrap();
        assert!(model.weight(4).is_err());
        assert!(model.opening_times(0).is_err());
    }

    #[test]
    fn test_invalid_arguments() {
        let mut builder = ModelBuilder::new(1, 1);
        assert!(matches!(
            builder.set_weight(1, -1),
            Err(MooringError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.set_processing_time(1, 1, -3),
            Err(MooringError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.add_opening_time(1, 10, 5),
            Err(MooringError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.add_closing_time(1, -2, 5),
            Err(MooringError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_build_consumes() {
        let mut builder = ModelBuilder::new(1, 1);
        assert!(builder.build().is_ok());
        assert!(builder.is_consumed());
        assert_eq!(builder.build().err(), Some(MooringError::AlreadyConsumed));
        assert_eq!(
            builder.set_weight(1, 1).err(),
            Some(MooringError::AlreadyConsumed)
        );
    }

    #[test]
    fn test_forbid_after_set_overwrites() {
        let mut builder = ModelBuilder::new(1, 1);
        builder
            .set_processing_time(1, 1, 5)
            .and_then(|b| b.forbid_assignment(1, 1))
            .unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.processing_time(1, 1), Ok(None));
    }

    #[test]
    fn test_opening_windows_replace_default() {
        let mut builder = ModelBuilder::new(2, 1);
        builder
            .add_opening_time(1, 0, 100)
            .and_then(|b| b.add_opening_time(1, 200, 300))
            .and_then(|b| b.add_closing_time(2, 50, 60))
            .unwrap();
        let model = builder.build().unwrap();

        assert_eq!(model.opening_times(1), Ok(vec![(0, 100), (200, 300)]));
        assert_eq!(
            model.closing_times(1),
            Ok(vec![(100, 200), (300, i64::MAX)])
        );
        assert_eq!(model.opening_times(2), Ok(vec![(0, 50), (60, i64::MAX)]));
        assert_eq!(model.closing_times(2), Ok(vec![(50, 60)]));
    }
}
