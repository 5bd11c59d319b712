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

//! Mooring-BnB: branch-and-bound for berth allocation
//!
//! An exact, deterministic solver that minimizes the total weighted
//! completion time of a berth allocation [`Model`](mooring_model::model::Model).
//!
//! Core flow
//! - Choose a [`DecisionBuilder`](branching::decision::DecisionBuilder) for the
//!   order in which children are explored.
//! - Choose an [`ObjectiveEvaluator`](eval::evaluator::ObjectiveEvaluator) for
//!   pricing decisions and bounding nodes.
//! - Optionally pass fixed assignments, a warm start and monitors.
//! - Run [`BnbSolver`](bnb::BnbSolver); the outcome carries the result, why
//!   the search stopped and its statistics.
//!
//! State is mutated in place and restored through a trail, so a solver that
//! is reused across solves does not allocate once its buffers have grown.

pub mod berth_availability;
pub mod bnb;
pub mod branching;
pub mod eval;
pub mod fixed;
pub mod incumbent;
pub mod monitor;
pub mod result;
mod stack;
pub mod state;
pub mod stats;
mod trail;
