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

//! The vessel priority queue: the order in which the decoder places vessels.
//!
//! A thin wrapper over `Vec<VesselIndex>`. Every vessel appears exactly once
//! while a search is running; debug builds check this after bulk edits.

use mooring_model::index::VesselIndex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VesselPriorityQueue {
    queue: Vec<VesselIndex>,
}

impl VesselPriorityQueue {
    #[inline]
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            queue: Vec::with_capacity(num_vessels),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// # Panics
    ///
    /// Panics if `position` is not within `0..len()`.
    #[inline]
    pub fn get(&self, position: usize) -> VesselIndex {
        assert!(
            position < self.queue.len(),
            "called `VesselPriorityQueue::get` with position out of bounds: the len is {} but the index is {}",
            self.queue.len(),
            position
        );
        self.queue[position]
    }

    /// Position of `vessel_index` in the queue.
    #[inline]
    pub fn position_of(&self, vessel_index: VesselIndex) -> Option<usize> {
        self.queue.iter().position(|&v| v == vessel_index)
    }

    #[inline]
    pub fn push(&mut self, vessel_index: VesselIndex) {
        self.queue.push(vessel_index);
    }

    #[inline]
    pub fn as_slice(&self) -> &[VesselIndex] {
        &self.queue
    }

    #[inline]
    pub(crate) fn buffer_mut(&mut self) -> &mut Vec<VesselIndex> {
        &mut self.queue
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, VesselIndex> {
        self.queue.iter()
    }

    /// Replaces the contents with `0..num_vessels` ordered by `key`, ties by
    /// vessel index.
    pub fn fill_sorted_by_key<K, F>(&mut self, num_vessels: usize, mut key: F)
    where
        K: Ord,
        F: FnMut(VesselIndex) -> K,
    {
        self.queue.clear();
        self.queue.extend((0..num_vessels).map(VesselIndex::new));
        self.queue.sort_by_key(|&v| (key(v), v));
        debug_assert!(self.is_permutation());
    }

    /// `true` if every vessel in `0..len()` appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.queue.len()];
        self.queue.iter().all(|v| match seen.get_mut(v.get()) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        })
    }
}

impl<'a> IntoIterator for &'a VesselPriorityQueue {
    type Item = &'a VesselIndex;
    type IntoIter = std::slice::Iter<'a, VesselIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.queue.iter()
    }
}

impl FromIterator<VesselIndex> for VesselPriorityQueue {
    fn from_iter<I: IntoIterator<Item = VesselIndex>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for VesselPriorityQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, vessel) in self.queue.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", vessel.get())?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    #[test]
    fn test_fill_sorted_by_key_breaks_ties_by_index() {
        let keys = [5, 1, 5, 0];
        let mut queue = VesselPriorityQueue::new();
        queue.fill_sorted_by_key(4, |vessel| keys[vessel.get()]);
        assert_eq!(queue.as_slice(), &[v(3), v(1), v(0), v(2)]);
        assert_eq!(queue.position_of(v(0)), Some(2));
        assert!(queue.is_permutation());
    }

    #[test]
    fn test_permutation_check_detects_duplicates() {
        let queue: VesselPriorityQueue = [v(0), v(0)].into_iter().collect();
        assert!(!queue.is_permutation());
        let queue: VesselPriorityQueue = [v(1), v(0)].into_iter().collect();
        assert!(queue.is_permutation());
    }

    #[test]
    fn test_display() {
        let queue: VesselPriorityQueue = [v(2), v(0), v(1)].into_iter().collect();
        assert_eq!(queue.to_string(), "[2 -> 0 -> 1]");
        assert_eq!(VesselPriorityQueue::new().to_string(), "[]");
    }

    #[test]
    #[should_panic(expected = "called `VesselPriorityQueue::get` with position out of bounds")]
    fn test_get_out_of_bounds_panics() {
        VesselPriorityQueue::preallocated(4).get(0);
    }
}
