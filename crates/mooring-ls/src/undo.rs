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

//! Journal of genotype edits.
//!
//! Each edit pushes the information needed to invert it. Rolling back walks
//! the journal backwards, so the cost is proportional to the size of the
//! change, not to the number of vessels.

use crate::queue::VesselPriorityQueue;
use mooring_model::index::{BerthIndex, VesselIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UndoEntry {
    /// Positions `a` and `b` were swapped.
    Swap { a: usize, b: usize },
    /// The vessel at `from` was moved to `to`.
    Shift { from: usize, to: usize },
    /// Positions `start..start + len` were overwritten; the old contents sit
    /// at the top of the backup stack.
    Range { start: usize, len: usize },
    /// The preferred berth of `vessel` was `previous`.
    Berth {
        vessel: VesselIndex,
        previous: BerthIndex,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
    backup: Vec<VesselIndex>,
}

impl UndoLog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_vessels),
            backup: Vec::with_capacity(num_vessels),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every entry; the current genotype becomes the baseline.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.backup.clear();
    }

    #[inline]
    pub fn push_swap(&mut self, a: usize, b: usize) {
        self.entries.push(UndoEntry::Swap { a, b });
    }

    #[inline]
    pub fn push_shift(&mut self, from: usize, to: usize) {
        self.entries.push(UndoEntry::Shift { from, to });
    }

    /// Saves `queue[start..end]` before it is overwritten.
    pub fn push_range_backup(&mut self, queue: &VesselPriorityQueue, start: usize, end: usize) {
        self.backup.extend_from_slice(&queue.as_slice()[start..end]);
        self.entries.push(UndoEntry::Range {
            start,
            len: end - start,
        });
    }

    #[inline]
    pub fn push_berth(&mut self, vessel: VesselIndex, previous: BerthIndex) {
        self.entries.push(UndoEntry::Berth { vessel, previous });
    }

    /// Undoes every recorded edit, newest first, and empties the log.
    pub fn apply_rollback(
        &mut self,
        queue: &mut VesselPriorityQueue,
        preferred_berths: &mut [BerthIndex],
    ) {
        while let Some(entry) = self.entries.pop() {
            match entry {
                UndoEntry::Swap { a, b } => queue.buffer_mut().swap(a, b),
                UndoEntry::Shift { from, to } => {
                    let buffer = queue.buffer_mut();
                    let vessel = buffer.remove(to);
                    buffer.insert(from, vessel);
                }
                UndoEntry::Range { start, len } => {
                    let split = self.backup.len() - len;
                    queue.buffer_mut()[start..start + len].copy_from_slice(&self.backup[split..]);
                    self.backup.truncate(split);
                }
                UndoEntry::Berth { vessel, previous } => {
                    preferred_berths[vessel.get()] = previous;
                }
            }
        }
        debug_assert!(self.backup.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    fn queue(order: &[usize]) -> VesselPriorityQueue {
        order.iter().map(|&i| v(i)).collect()
    }

    #[test]
    fn test_rollback_restores_mixed_edits() {
        let mut q = queue(&[0, 1, 2, 3, 4]);
        let mut berths = vec![b(0), b(1), b(0), b(1), b(0)];
        let original = (q.clone(), berths.clone());
        let mut log = UndoLog::preallocated(5);

        q.buffer_mut().swap(0, 4);
        log.push_swap(0, 4);

        let moved = q.buffer_mut().remove(1);
        q.buffer_mut().insert(3, moved);
        log.push_shift(1, 3);

        log.push_berth(v(2), berths[2]);
        berths[2] = b(1);

        log.push_range_backup(&q, 1, 4);
        q.buffer_mut()[1..4].reverse();

        log.push_berth(v(2), berths[2]);
        berths[2] = b(2);

        assert_eq!(log.len(), 5);
        log.apply_rollback(&mut q, &mut berths);
        assert!(log.is_empty());
        assert_eq!((q, berths), original);
    }

    #[test]
    fn test_clear_makes_edits_permanent() {
        let mut q = queue(&[0, 1]);
        let mut berths = vec![b(0), b(0)];
        let mut log = UndoLog::new();
        q.buffer_mut().swap(0, 1);
        log.push_swap(0, 1);
        log.clear();
        log.apply_rollback(&mut q, &mut berths);
        assert_eq!(q.as_slice(), &[v(1), v(0)]);
    }
}
