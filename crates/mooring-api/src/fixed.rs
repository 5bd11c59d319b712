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

//! Fixed assignments with 1-based indices.

use crate::{
    error::{MooringError, Result},
    index::{berth_index, external_berth, external_vessel, vessel_index},
    model::Model,
};
use mooring_bnb::fixed::FixedAssignment as InnerFixedAssignment;

/// Pins `vessel` to `berth` starting at `start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedAssignment {
    pub vessel: usize,
    pub berth: usize,
    pub start_time: i64,
}

impl FixedAssignment {
    #[inline]
    pub fn new(vessel: usize, berth: usize, start_time: i64) -> Self {
        Self {
            vessel,
            berth,
            start_time,
        }
    }

    /// Translates to 0-based indices, checking both against `model`.
    pub fn to_internal(&self, model: &Model) -> Result<InnerFixedAssignment<i64>> {
        let v = vessel_index(self.vessel, model.num_vessels())?;
        let b = berth_index(self.berth, model.num_berths())?;
        Ok(InnerFixedAssignment::new(self.start_time, b, v))
    }
}

impl std::fmt::Display for FixedAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FixedAssignment(vessel: {}, berth: {}, start_time: {})",
            self.vessel, self.berth, self.start_time
        )
    }
}

/// Fails on index `0`, which has no 0-based counterpart. Upper bounds are
/// checked by [`FixedAssignment::to_internal`].
impl TryFrom<FixedAssignment> for InnerFixedAssignment<i64> {
    type Error = MooringError;

    fn try_from(value: FixedAssignment) -> Result<Self> {
        let v = vessel_index(value.vessel, usize::MAX)?;
        let b = berth_index(value.berth, usize::MAX)?;
        Ok(InnerFixedAssignment::new(value.start_time, b, v))
    }
}

impl From<InnerFixedAssignment<i64>> for FixedAssignment {
    fn from(value: InnerFixedAssignment<i64>) -> Self {
        Self::new(
            external_vessel(value.vessel_index),
            external_berth(value.berth_index),
            value.start_time,
        )
    }
}

/// Translates `fixed` against `model` and rejects vessels pinned twice.
pub(crate) fn translate_all(
    model: &Model,
    fixed: &[FixedAssignment],
) -> Result<Vec<InnerFixedAssignment<i64>>> {
    let mut seen = vec![false; model.num_vessels()];
    let mut translated = Vec::with_capacity(fixed.len());
    for assignment in fixed {
        let inner = assignment.to_internal(model)?;
        let slot = &mut seen[inner.vessel_index.get()];
        if *slot {
            return Err(MooringError::invalid_argument(format!(
                "vessel {} is fixed more than once",
                assignment.vessel
            )));
        }
        *slot = true;
        translated.push(inner);
    }
    Ok(translated)
}
