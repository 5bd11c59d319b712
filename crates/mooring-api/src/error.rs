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

//! Errors reported to callers.
//!
//! Infeasible models and aborted searches are results, not errors; they are
//! reported through the outcome's status and termination reason.

use thiserror::Error;

/// Which kind of index was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Vessel,
    Berth,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Vessel => write!(f, "vessel"),
            IndexKind::Berth => write!(f, "berth"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MooringError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// `index` is the 1-based index the caller passed.
    #[error("{kind} index out of range: the index is {index} but valid indices are 1..={len}")]
    IndexOutOfRange {
        kind: IndexKind,
        index: usize,
        len: usize,
    },
    #[error("the model builder has already been consumed")]
    AlreadyConsumed,
}

impl MooringError {
    #[inline]
    pub(crate) fn invalid_argument<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        MooringError::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, MooringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MooringError::IndexOutOfRange {
            kind: IndexKind::Berth,
            index: 4,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "berth index out of range: the index is 4 but valid indices are 1..=3"
        );
        assert_eq!(
            MooringError::invalid_argument("negative weight").to_string(),
            "invalid argument: negative weight"
        );
        assert_eq!(
            MooringError::AlreadyConsumed.to_string(),
            "the model builder has already been consumed"
        );
    }
}
