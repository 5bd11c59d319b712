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

//! Sentinel-encoded processing times.

use mooring_core::num::constants::MinusOne;
use num_traits::Signed;

/// A processing time that may be absent.
///
/// Instead of `Option<T>`, a negative raw value encodes "no processing time",
/// which keeps the dense `vessels × berths` matrix one machine word per cell.
/// Absence means the vessel is not allowed on that berth.
///
/// ```rust
/// # use mooring_model::time::ProcessingTime;
/// let some = ProcessingTime::some(5i32);
/// assert_eq!(some.into_option(), Some(5));
///
/// let none: ProcessingTime<i32> = ProcessingTime::none();
/// assert!(none.is_none());
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessingTime<T>(T)
where
    T: Signed;

impl<T> ProcessingTime<T>
where
    T: Copy + Signed + PartialOrd + MinusOne,
{
    const NONE_SENTINEL: T = T::MINUS_ONE;

    #[inline]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => ProcessingTime(v),
            None => ProcessingTime(Self::NONE_SENTINEL),
        }
    }

    /// Wraps a raw value; negative values read back as `None`.
    #[inline]
    pub const fn from_raw(value: T) -> Self {
        ProcessingTime(value)
    }

    /// # Panics
    ///
    /// Panics if `value` is negative.
    pub fn some(value: T) -> Self
    where
        T: std::fmt::Display,
    {
        assert!(
            value > Self::NONE_SENTINEL,
            "called `ProcessingTime::some` with a negative value: {}",
            value
        );
        ProcessingTime(value)
    }

    #[inline]
    pub fn none() -> Self {
        ProcessingTime(Self::NONE_SENTINEL)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 <= Self::NONE_SENTINEL
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub fn raw(&self) -> T {
        self.0
    }

    #[inline]
    pub fn into_option(&self) -> Option<T> {
        if self.is_none() { None } else { Some(self.0) }
    }

    /// # Panics
    ///
    /// Panics if the processing time is absent.
    pub fn unwrap(&self) -> T {
        if self.is_none() {
            panic!("called `ProcessingTime::unwrap()` on a `None` value")
        }
        self.0
    }

    #[inline]
    pub fn unwrap_or(&self, default: T) -> T {
        if self.is_none() { default } else { self.0 }
    }
}

impl<T> std::fmt::Debug for ProcessingTime<T>
where
    T: Copy + Signed + PartialOrd + MinusOne + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.into_option() {
            Some(v) => write!(f, "ProcessingTime(Some({:?}))", v),
            None => write!(f, "ProcessingTime(None)"),
        }
    }
}

impl<T> std::fmt::Display for ProcessingTime<T>
where
    T: Copy + Signed + PartialOrd + MinusOne + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.into_option() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "forbidden"),
        }
    }
}

impl<T> From<Option<T>> for ProcessingTime<T>
where
    T: Copy + Signed + PartialOrd + MinusOne,
{
    #[inline]
    fn from(value: Option<T>) -> Self {
        ProcessingTime::from_option(value)
    }
}

impl<T> From<ProcessingTime<T>> for Option<T>
where
    T: Copy + Signed + PartialOrd + MinusOne,
{
    #[inline]
    fn from(value: ProcessingTime<T>) -> Self {
        value.into_option()
    }
}
