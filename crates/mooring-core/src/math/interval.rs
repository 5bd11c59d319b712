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

//! # Closed-Open Intervals
//!
//! `ClosedOpenInterval<T>` models the half-open window `[start, end)` that
//! berth openings, maintenance closings, and vessel occupancies are expressed
//! in. Two intervals that merely touch (`[0, 5)` and `[5, 9)`) do not
//! intersect, which is exactly the semantics needed for back-to-back
//! berthing.
//!
//! The type is `Copy`, ordered by `(start, end)`, and converts to and from
//! `std::ops::Range<T>` so it can be handed to `rangemap` directly.

use num_traits::PrimInt;
use smallvec::{SmallVec, smallvec};
use std::cmp::{max, min};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T> {
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "called `ClosedOpenInterval::new` with start after end"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates `[start, end)` or returns `None` if `start > end`.
    #[inline]
    pub fn try_new(start_inclusive: T, end_exclusive: T) -> Option<Self> {
        (start_inclusive <= end_exclusive).then_some(Self {
            start_inclusive,
            end_exclusive,
        })
    }

    #[inline]
    pub(crate) fn new_unchecked(start_inclusive: T, end_exclusive: T) -> Self {
        debug_assert!(
            start_inclusive <= end_exclusive,
            "called `ClosedOpenInterval::new_unchecked` with start after end"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    #[inline]
    pub const fn start(&self) -> T {
        self.start_inclusive
    }

    #[inline]
    pub const fn end(&self) -> T {
        self.end_exclusive
    }

    #[inline]
    pub fn len(&self) -> T {
        self.end_exclusive - self.start_inclusive
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    /// Returns `true` if both windows share at least one instant.
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    /// Returns `true` if the windows overlap or touch end-to-start.
    #[inline]
    pub fn touches(&self, other: Self) -> bool {
        self.start_inclusive <= other.end_exclusive && other.start_inclusive <= self.end_exclusive
    }

    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.start_inclusive <= value && value < self.end_exclusive
    }

    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        self.start_inclusive <= other.start_inclusive && other.end_exclusive <= self.end_exclusive
    }

    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let start = max(self.start_inclusive, other.start_inclusive);
        let end = min(self.end_exclusive, other.end_exclusive);
        (start < end).then(|| Self::new_unchecked(start, end))
    }

    /// Merges two touching or overlapping windows into their hull.
    #[inline]
    pub fn union(&self, other: Self) -> Option<Self> {
        self.touches(other).then(|| {
            Self::new_unchecked(
                min(self.start_inclusive, other.start_inclusive),
                max(self.end_exclusive, other.end_exclusive),
            )
        })
    }

    /// Removes `other` from `self`, leaving zero, one, or two pieces in
    /// ascending order.
    pub fn difference(&self, other: Self) -> SmallVec<[Self; 2]> {
        if other.is_empty() || !self.intersects(other) {
            return smallvec![*self];
        }

        let mut pieces = SmallVec::new();
        if self.start_inclusive < other.start_inclusive {
            pieces.push(Self::new_unchecked(
                self.start_inclusive,
                other.start_inclusive,
            ));
        }
        if other.end_exclusive < self.end_exclusive {
            pieces.push(Self::new_unchecked(other.end_exclusive, self.end_exclusive));
        }
        pieces
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> From<std::ops::Range<T>> for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<ClosedOpenInterval<T>> for std::ops::Range<T> {
    #[inline]
    fn from(interval: ClosedOpenInterval<T>) -> Self {
        interval.start_inclusive..interval.end_exclusive
    }
}
