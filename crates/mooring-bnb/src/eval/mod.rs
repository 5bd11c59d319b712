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

//! Objective evaluation and lower bounds.
//!
//! - `evaluator`: the `ObjectiveEvaluator` trait.
//! - `bounds`: relaxations shared by the evaluators (earliest finishes and a
//!   WSPT bound for identical parallel machines).
//! - `hybrid`: the larger of the window-aware and the capacity bound.
//! - `workload`: capacity bound only, maintenance windows relaxed.
//! - `wtft`: window-aware weighted flow time with single-berth sequencing.
//!
//! Every evaluator is admissible: it never overestimates the cheapest
//! completion below a node. Pruning is only correct under that property.

pub mod bounds;
pub mod evaluator;
pub mod hybrid;
pub mod workload;
pub mod wtft;
