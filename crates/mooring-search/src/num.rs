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

//! # Solver Numeric Trait
//!
//! `SolverNumeric` gathers the integer capabilities the engines rely on so
//! that generic signatures stay short:
//!
//! - `PrimInt + Signed` for the arithmetic itself and the sentinel encoding
//!   of `ProcessingTime`.
//! - `FromPrimitive + ToPrimitive` for the few float conversions (annealing
//!   probabilities, bandit rewards).
//! - By-value checked and saturating add/sub/mul from `mooring_core`, used for
//!   every cost accumulation.
//! - `Hash` for tabu fingerprints, `Send + Sync` so models can be shared.
//!
//! Every signed primitive except `i128` qualifies.

use mooring_core::num::{
    checked::{CheckedAddVal, CheckedMulVal, CheckedSubVal},
    constants::MinusOne,
    saturating::{SaturatingAddVal, SaturatingMulVal, SaturatingSubVal},
};
use num_traits::{FromPrimitive, PrimInt, Signed, ToPrimitive};
use std::hash::Hash;

pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + ToPrimitive
    + MinusOne
    + SaturatingAddVal
    + SaturatingSubVal
    + SaturatingMulVal
    + CheckedAddVal
    + CheckedSubVal
    + CheckedMulVal
    + Hash
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
    + 'static
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + ToPrimitive
        + MinusOne
        + SaturatingAddVal
        + SaturatingSubVal
        + SaturatingMulVal
        + CheckedAddVal
        + CheckedSubVal
        + CheckedMulVal
        + Hash
        + std::fmt::Debug
        + std::fmt::Display
        + Send
        + Sync
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted_sum<T: SolverNumeric>(pairs: &[(T, T)]) -> T {
        pairs.iter().fold(T::zero(), |acc, &(w, c)| {
            acc.saturating_add_val(w.saturating_mul_val(c))
        })
    }

    #[test]
    fn test_signed_primitives_qualify() {
        assert_eq!(weighted_sum(&[(2i32, 5), (1, 3)]), 13);
        assert_eq!(weighted_sum(&[(2i64, 5), (1, 3)]), 13);
        assert_eq!(weighted_sum(&[(2i16, 5), (1, 3)]), 13);
    }

    #[test]
    fn test_accumulation_saturates() {
        assert_eq!(weighted_sum(&[(i64::MAX, 2), (1, 1)]), i64::MAX);
    }
}
