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

//! Translation between the 1-based indices callers use and the 0-based
//! indices the engines store.

use crate::error::{IndexKind, MooringError, Result};
use mooring_model::index::{BerthIndex, VesselIndex};

#[inline]
fn to_internal(kind: IndexKind, index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        return Err(MooringError::IndexOutOfRange { kind, index, len });
    }
    Ok(index - 1)
}

/// Checks `vessel` against `1..=num_vessels`.
#[inline]
pub(crate) fn vessel_index(vessel: usize, num_vessels: usize) -> Result<VesselIndex> {
    to_internal(IndexKind::Vessel, vessel, num_vessels).map(VesselIndex::new)
}

/// Checks `berth` against `1..=num_berths`.
#[inline]
pub(crate) fn berth_index(berth: usize, num_berths: usize) -> Result<BerthIndex> {
    to_internal(IndexKind::Berth, berth, num_berths).map(BerthIndex::new)
}

#[inline]
pub(crate) fn external_vessel(vessel_index: VesselIndex) -> usize {
    vessel_index.get() + 1
}

#[inline]
pub(crate) fn external_berth(berth_index: BerthIndex) -> usize {
    berth_index.get() + 1
}
