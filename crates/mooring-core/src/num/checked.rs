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

//! Checked arithmetic by value.
//!
//! Each trait forwards to the primitive's inherent `checked_*` method and
//! returns `None` on overflow.

use core::ops::{Add, Mul, Sub};

pub trait CheckedAddVal: Sized + Add<Self, Output = Self> {
    fn checked_add_val(self, rhs: Self) -> Option<Self>;
}

pub trait CheckedSubVal: Sized + Sub<Self, Output = Self> {
    fn checked_sub_val(self, rhs: Self) -> Option<Self>;
}

pub trait CheckedMulVal: Sized + Mul<Self, Output = Self> {
    fn checked_mul_val(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_checked {
    ($($t:ty),* $(,)?) => {
        $(
            impl CheckedAddVal for $t {
                #[inline(always)]
                fn checked_add_val(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }

            impl CheckedSubVal for $t {
                #[inline(always)]
                fn checked_sub_val(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_sub(self, rhs)
                }
            }

            impl CheckedMulVal for $t {
                #[inline(always)]
                fn checked_mul_val(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_mul(self, rhs)
                }
            }
        )*
    };
}

impl_checked!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_detects_overflow() {
        assert_eq!(5i64.checked_add_val(7), Some(12));
        assert_eq!(i64::MAX.checked_add_val(1), None);
        assert_eq!(u8::MAX.checked_add_val(1), None);
    }

    #[test]
    fn test_checked_sub_detects_underflow() {
        assert_eq!(10i32.checked_sub_val(3), Some(7));
        assert_eq!(0u32.checked_sub_val(1), None);
        assert_eq!(i32::MIN.checked_sub_val(1), None);
    }

    #[test]
    fn test_checked_mul_detects_overflow() {
        assert_eq!(6i64.checked_mul_val(7), Some(42));
        assert_eq!(i64::MAX.checked_mul_val(2), None);
    }
}
