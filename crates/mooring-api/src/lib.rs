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

//! Mooring: berth allocation for callers
//!
//! The engine crates speak 0-based typed indices and panic on contract
//! violations. This crate is the boundary: vessels and berths are numbered
//! from 1, every index is checked, and bad input comes back as a
//! [`MooringError`] instead of a panic.
//!
//! ```
//! use mooring_api::{bnb::{self, BnbConfig}, model::ModelBuilder};
//!
//! let mut builder = ModelBuilder::new(1, 1);
//! builder.set_processing_time(1, 1, 10)?;
//! let model = builder.build()?;
//!
//! let outcome = bnb::solve(&model, &BnbConfig::default())?;
//! assert_eq!(outcome.objective_value(), Some(10));
//! # Ok::<(), mooring_api::MooringError>(())
//! ```
//!
//! Infeasible models and searches stopped by a limit are not errors; see
//! [`BnbOutcome::status`](bnb::BnbOutcome::status) and the termination
//! reasons.

pub mod bnb;
pub mod error;
pub mod fixed;
mod index;
pub mod ls;
pub mod model;
mod names;
pub mod solution;

pub use bnb::{BnbConfig, BnbOutcome, BnbSolver, DecisionBuilderKind, EvaluatorKind};
pub use error::{IndexKind, MooringError, Result};
pub use fixed::FixedAssignment;
pub use ls::{
    CoolingKind, LocalSearchEngine, LsConfig, LsOutcome, MetaheuristicKind, NeighborhoodKind,
    Operator,
};
pub use model::{Model, ModelBuilder};
pub use mooring_bnb::result::BnbTerminationReason;
pub use mooring_ls::result::LocalSearchTerminationReason;
pub use solution::Solution;
