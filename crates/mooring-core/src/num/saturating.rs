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

//! Saturating arithmetic by value.
//!
//! Cost accumulation in the solvers goes through these so that an overflowing
//! sum clamps to `MAX` instead of wrapping into a small (and wrongly
//! attractive) value.

use core::ops::{Add, Mul, Sub};

pub trait SaturatingAddVal: Sized + Add<Self, Output = Self> {
    fn saturating_add_val(self, rhs: Self) -> Self;
}

pub trait SaturatingSubVal: Sized + Sub<Self, Output = Self> {
    fn saturating_sub_val(self, rhs: Self) -> Self;
}

pub trait SaturatingMulVal: Sized + Mul<Self, Output = Self> {
    fn saturating_mul_val(self, rhs: Self) -> Self;
}

macro_rules! impl_saturating {
    ($($t:ty),* $(,)?) => {
        $(
            impl SaturatingAddVal for $t {
                #[inline(always)]
                fn saturating_add_val(self, rhs: Self) -> Self {
                    <$t>::saturating_add(self, rhs)
                }
            }

            impl SaturatingSubVal for $t {
                #[inline(always)]
                fn saturating_sub_val(self, rhs: Self) -> Self {
                    <$t>::saturating_sub(self, rhs)
                }
            }

            impl SaturatingMulVal for $t {
                #[inline(always)]
                fn saturating_mul_val(self, rhs: Self) -> Self {
                    <$t>::saturating_mul(self, rhs)
                }
            }
        )*
    };
}

impl_saturating!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize
);

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_all<T: SaturatingAddVal + Copy>(start: T, values: &[T]) -> T {
        values.iter().fold(start, |acc, &v| acc.saturating_add_val(v))
    }

    #[test]
    fn test_saturating_add_clamps_at_max() {
        assert_eq!(i64::MAX.saturating_add_val(10), i64::MAX);
        assert_eq!(sum_all(0i64, &[i64::MAX, i64::MAX, 1]), i64::MAX);
    }

    #[test]
    fn test_saturating_sub_clamps_at_min() {
        assert_eq!(i32::MIN.saturating_sub_val(1), i32::MIN);
        assert_eq!(3u16.saturating_sub_val(5), 0);
    }

    #[test]
    fn test_saturating_mul_clamps_both_directions() {
        assert_eq!(i64::MAX.saturating_mul_val(3), i64::MAX);
        assert_eq!(i64::MIN.saturating_mul_val(3), i64::MIN);
        assert_eq!(12i64.saturating_mul_val(3), 36);
    }
}
