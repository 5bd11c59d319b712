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

//! Searches and normalization over sorted, disjoint interval lists.
//!
//! Every per-berth window list in the workspace is kept sorted by start and
//! pairwise disjoint; the helpers here assume and (in debug builds) assert
//! that shape.

use crate::math::interval::ClosedOpenInterval;
use num_traits::PrimInt;

/// Returns `true` if the intervals are sorted by start and do not overlap.
#[inline(always)]
pub fn are_disjoint_and_sorted<T>(intervals: &[ClosedOpenInterval<T>]) -> bool
where
    T: PrimInt,
{
    intervals.windows(2).all(|w| w[0].end() <= w[1].start())
}

/// Index of the first interval whose start is `>= key`.
#[inline(always)]
pub fn lower_bound_start<T>(intervals: &[ClosedOpenInterval<T>], key: T) -> usize
where
    T: PrimInt,
{
    debug_assert!(
        are_disjoint_and_sorted(intervals),
        "called `lower_bound_start` with intervals that are not disjoint and sorted"
    );

    intervals.partition_point(|interval| interval.start() < key)
}

/// Earliest `t >= not_before` such that `[t, t + duration)` lies inside one
/// of `windows`.
///
/// Returns `None` when no window is long enough, or when `t + duration` would
/// overflow.
pub fn earliest_fit<T>(windows: &[ClosedOpenInterval<T>], not_before: T, duration: T) -> Option<T>
where
    T: PrimInt,
{
    // The window that contains `not_before` (if any) starts before it, so
    // begin the scan one slot to the left of the lower bound.
    let first = lower_bound_start(windows, not_before).saturating_sub(1);
    for window in &windows[first..] {
        if window.end() <= not_before {
            continue;
        }
        let start = window.start().max(not_before);
        let finish = start.checked_add(&duration)?;
        if finish <= window.end() {
            return Some(start);
        }
    }
    None
}

/// Sorts and merges touching or overlapping intervals in place.
pub fn normalize_in_place<T>(intervals: &mut Vec<ClosedOpenInterval<T>>)
where
    T: PrimInt,
{
    intervals.retain(|interval| !interval.is_empty());
    if intervals.len() < 2 {
        return;
    }

    intervals.sort_unstable();
    let mut write = 0;
    for read in 1..intervals.len() {
        let next = intervals[read];
        match intervals[write].union(next) {
            Some(merged) => intervals[write] = merged,
            None => {
                write += 1;
                intervals[write] = next;
            }
        }
    }
    intervals.truncate(write + 1);

    debug_assert!(are_disjoint_and_sorted(intervals));
}

/// Writes `base \ blocked` into `out`. Both inputs must be normalized.
pub fn subtract_into<T>(
    base: &[ClosedOpenInterval<T>],
    blocked: &[ClosedOpenInterval<T>],
    out: &mut Vec<ClosedOpenInterval<T>>,
) where
    T: PrimInt,
{
    debug_assert!(are_disjoint_and_sorted(base));
    debug_assert!(are_disjoint_and_sorted(blocked));

    out.clear();
    let mut cursor = 0usize;
    for &window in base {
        while cursor < blocked.len() && blocked[cursor].end() <= window.start() {
            cursor += 1;
        }

        let mut remainder = Some(window);
        let mut scan = cursor;
        while let Some(piece) = remainder {
            if scan >= blocked.len() || blocked[scan].start() >= piece.end() {
                out.push(piece);
                break;
            }
            let pieces = piece.difference(blocked[scan]);
            remainder = None;
            for part in pieces {
                if part.end() <= blocked[scan].start() {
                    out.push(part);
                } else {
                    remainder = Some(part);
                }
            }
            scan += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedOpenInterval<IntegerType> {
        ClosedOpenInterval::new(s, e)
    }

    #[test]
    fn test_are_disjoint_and_sorted() {
        assert!(are_disjoint_and_sorted::<IntegerType>(&[]));
        assert!(are_disjoint_and_sorted(&[iv(0, 5), iv(5, 10)]));
        assert!(!are_disjoint_and_sorted(&[iv(0, 10), iv(9, 15)]));
        assert!(!are_disjoint_and_sorted(&[iv(10, 20), iv(0, 5)]));
    }

    #[test]
    fn test_lower_bound_start() {
        let v = vec![iv(0, 5), iv(5, 10), iv(10, 20)];
        assert_eq!(lower_bound_start(&v, 0), 0);
        assert_eq!(lower_bound_start(&v, 4), 1);
        assert_eq!(lower_bound_start(&v, 5), 1);
        assert_eq!(lower_bound_start(&v, 10), 2);
        assert_eq!(lower_bound_start(&v, 21), 3);
    }

    #[test]
    fn test_earliest_fit_inside_current_window() {
        let windows = vec![iv(0, 10), iv(20, 40)];
        assert_eq!(earliest_fit(&windows, 3, 5), Some(3));
    }

    #[test]
    fn test_earliest_fit_jumps_to_next_window() {
        let windows = vec![iv(0, 10), iv(20, 40)];
        assert_eq!(earliest_fit(&windows, 7, 5), Some(20));
        assert_eq!(earliest_fit(&windows, 25, 15), Some(25));
        assert_eq!(earliest_fit(&windows, 26, 15), None);
    }

    #[test]
    fn test_earliest_fit_handles_overflow() {
        let windows = vec![iv(0, IntegerType::MAX)];
        assert_eq!(earliest_fit(&windows, IntegerType::MAX - 2, 10), None);
    }

    #[test]
    fn test_normalize_merges_and_sorts() {
        let mut v = vec![iv(8, 12), iv(0, 3), iv(3, 5), iv(10, 15), iv(20, 20)];
        normalize_in_place(&mut v);
        assert_eq!(v, vec![iv(0, 5), iv(8, 15)]);
    }

    #[test]
    fn test_subtract_into_punches_holes() {
        let base = vec![iv(0, 100)];
        let blocked = vec![iv(10, 20), iv(50, 60)];
        let mut out = Vec::new();
        subtract_into(&base, &blocked, &mut out);
        assert_eq!(out, vec![iv(0, 10), iv(20, 50), iv(60, 100)]);
    }

    #[test]
    fn test_subtract_into_across_multiple_windows() {
        let base = vec![iv(0, 10), iv(20, 30)];
        let blocked = vec![iv(5, 25)];
        let mut out = Vec::new();
        subtract_into(&base, &blocked, &mut out);
        assert_eq!(out, vec![iv(0, 5), iv(25, 30)]);
    }

    #[test]
    fn test_subtract_into_without_blocked_copies_base() {
        let base = vec![iv(0, 10)];
        let mut out = vec![iv(99, 100)];
        subtract_into(&base, &[], &mut out);
        assert_eq!(out, base);
    }
}
