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

//! Mooring-LS: local search for berth allocation
//!
//! Improves a feasible schedule by searching over a genotype: a priority
//! queue of vessels plus a preferred berth per vessel. A
//! [`GreedyDecoder`](decoder::GreedyDecoder) turns the genotype into a
//! schedule; operators edit it through a journaled
//! [`Mutator`](mutator::Mutator) so rejected moves are undone in time
//! proportional to the edit.
//!
//! Building blocks
//! - Neighborhoods restrict which vessel pairs operators may combine.
//! - Operators (`swap`, `shift`, `two_opt`, `scramble` and the compound
//!   schedulers) enumerate moves.
//! - Metaheuristics (greedy descent, simulated annealing, tabu search and
//!   guided local search) accept or reject candidates and decide what
//!   happens at a local optimum.
//! - Monitors observe the run and enforce time and solution limits.
//!
//! [`LocalSearchEngine`](engine::LocalSearchEngine) wires them together and
//! returns the best schedule seen.

pub mod decoder;
pub mod engine;
pub mod eval;
pub mod memory;
pub mod meta;
pub mod monitor;
pub mod mutator;
pub mod neighborhood;
pub mod operator;
pub mod queue;
pub mod result;
pub mod stats;
pub mod undo;
