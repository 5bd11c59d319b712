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

//! # Strongly Typed Indices
//!
//! `TypedIndex<Tag>` wraps a `usize` together with a zero-sized tag type so
//! that a vessel index can never be passed where a berth index is expected.
//! The wrapper is `#[repr(transparent)]`; it costs nothing at runtime.
//!
//! ```rust
//! use mooring_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy)]
//! struct CraneTag;
//! impl TypedIndexTag for CraneTag {
//!     const NAME: &'static str = "CraneIndex";
//! }
//!
//! let crane = TypedIndex::<CraneTag>::new(2);
//! assert_eq!(crane.get(), 2);
//! assert_eq!(crane.to_string(), "CraneIndex(2)");
//! ```

use std::marker::PhantomData;

/// Names an index space for diagnostics.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _tag: PhantomData<T>,
}

impl<T> TypedIndex<T> {
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _tag: PhantomData,
        }
    }

    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Returns the index one past this one.
    #[inline(always)]
    pub const fn next(&self) -> Self {
        Self::new(self.index + 1)
    }
}

impl<T> Default for TypedIndex<T> {
    #[inline]
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(value: TypedIndex<T>) -> Self {
        value.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct DockTag;

    impl TypedIndexTag for DockTag {
        const NAME: &'static str = "DockIndex";
    }

    type DockIndex = TypedIndex<DockTag>;

    #[test]
    fn test_new_get_and_next() {
        let dock = DockIndex::new(4);
        assert_eq!(dock.get(), 4);
        assert_eq!(dock.next().get(), 5);
        assert_eq!(DockIndex::default().get(), 0);
    }

    #[test]
    fn test_formatting_uses_tag_name() {
        let dock = DockIndex::new(7);
        assert_eq!(format!("{}", dock), "DockIndex(7)");
        assert_eq!(format!("{:?}", dock), "DockIndex(7)");
    }

    #[test]
    fn test_usize_conversions_round_trip() {
        let dock: DockIndex = 11usize.into();
        let raw: usize = dock.into();
        assert_eq!(raw, 11);
    }

    #[test]
    fn test_ordering_follows_raw_index() {
        let mut docks = vec![DockIndex::new(3), DockIndex::new(1), DockIndex::new(2)];
        docks.sort();
        assert_eq!(
            docks.iter().map(|d| d.get()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
