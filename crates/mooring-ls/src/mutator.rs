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

//! Journaled access to the genotype.
//!
//! Operators never touch the queue or the preferred berths directly; every
//! edit goes through a `Mutator`, which records its inverse in the undo log.

use crate::{queue::VesselPriorityQueue, undo::UndoLog};
use mooring_model::index::{BerthIndex, VesselIndex};
use rand::{Rng, seq::SliceRandom};

#[derive(Debug)]
pub struct Mutator<'a> {
    queue: &'a mut VesselPriorityQueue,
    preferred_berths: &'a mut [BerthIndex],
    log: &'a mut UndoLog,
}

impl<'a> Mutator<'a> {
    #[inline]
    pub fn new(
        queue: &'a mut VesselPriorityQueue,
        preferred_berths: &'a mut [BerthIndex],
        log: &'a mut UndoLog,
    ) -> Self {
        Self {
            queue,
            preferred_berths,
            log,
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
    pub fn queue(&self) -> &VesselPriorityQueue {
        &*self.queue
    }

    #[inline]
    pub fn preferred_berths(&self) -> &[BerthIndex] {
        &*self.preferred_berths
    }

    /// The vessel at queue position `position`.
    #[inline]
    pub fn get(&self, position: usize) -> VesselIndex {
        self.queue.get(position)
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn preferred_berth(&self, vessel_index: VesselIndex) -> BerthIndex {
        let index = vessel_index.get();
        assert!(
            index < self.preferred_berths.len(),
            "called `Mutator::preferred_berth` with vessel index out of bounds: the len is {} but the index is {}",
            self.preferred_berths.len(),
            index
        );
        self.preferred_berths[index]
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    pub fn set_preferred_berth(&mut self, vessel_index: VesselIndex, berth_index: BerthIndex) {
        let index = vessel_index.get();
        assert!(
            index < self.preferred_berths.len(),
            "called `Mutator::set_preferred_berth` with vessel index out of bounds: the len is {} but the index is {}",
            self.preferred_berths.len(),
            index
        );
        let previous = std::mem::replace(&mut self.preferred_berths[index], berth_index);
        if previous != berth_index {
            self.log.push_berth(vessel_index, previous);
        }
    }

    /// Swaps the vessels at queue positions `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.queue.buffer_mut().swap(a, b);
        self.log.push_swap(a, b);
    }

    /// Moves the vessel at `from` to `to`, shifting the vessels in between.
    pub fn shift(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let buffer = self.queue.buffer_mut();
        let vessel = buffer.remove(from);
        buffer.insert(to, vessel);
        self.log.push_shift(from, to);
    }

    /// Shuffles queue positions `start..end` with `rng`.
    pub fn shuffle_range<R>(&mut self, start: usize, end: usize, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if end.saturating_sub(start) < 2 {
            return;
        }
        self.log.push_range_backup(&*self.queue, start, end);
        self.queue.buffer_mut()[start..end].shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    #[test]
    fn test_every_edit_is_undone() {
        let mut queue: VesselPriorityQueue = (0..6).map(v).collect();
        let mut berths = vec![BerthIndex::new(0); 6];
        let mut log = UndoLog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        {
            let mut mutator = Mutator::new(&mut queue, &mut berths, &mut log);
            mutator.swap(0, 5);
            mutator.shift(1, 4);
            mutator.shuffle_range(0, 6, &mut rng);
            mutator.set_preferred_berth(v(3), BerthIndex::new(1));
            assert_eq!(mutator.preferred_berth(v(3)), BerthIndex::new(1));
            assert!(mutator.queue().is_permutation());
        }

        log.apply_rollback(&mut queue, &mut berths);
        assert_eq!(queue.as_slice(), (0..6).map(v).collect::<Vec<_>>().as_slice());
        assert!(berths.iter().all(|&b| b == BerthIndex::new(0)));
    }

    #[test]
    fn test_no_op_edits_are_not_journaled() {
        let mut queue: VesselPriorityQueue = (0..3).map(v).collect();
        let mut berths = vec![BerthIndex::new(0); 3];
        let mut log = UndoLog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut mutator = Mutator::new(&mut queue, &mut berths, &mut log);
        mutator.swap(1, 1);
        mutator.shift(2, 2);
        mutator.shuffle_range(1, 2, &mut rng);
        mutator.set_preferred_berth(v(0), BerthIndex::new(0));
        assert!(log.is_empty());
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let run = |seed| {
            let mut queue: VesselPriorityQueue = (0..8).map(v).collect();
            let mut berths = vec![BerthIndex::new(0); 8];
            let mut log = UndoLog::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            Mutator::new(&mut queue, &mut berths, &mut log).shuffle_range(2, 8, &mut rng);
            queue
        };
        assert_eq!(run(42), run(42));
    }
}
