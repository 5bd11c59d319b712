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

//! # Mooring Model
//!
//! The problem side of the berth allocation solver.
//!
//! - `index`: `VesselIndex` and `BerthIndex`.
//! - `time`: `ProcessingTime<T>`, a sentinel-encoded optional duration.
//! - `model`: the immutable `Model` and its `ModelBuilder`.
//! - `solution`: complete schedules and their weighted completion time.
//! - `feasibility`: verifies a schedule against a model.
//!
//! Data is stored as flat vectors per attribute rather than per-vessel
//! structs so that the solver hot loops stay cache friendly.

pub mod feasibility;
pub mod index;
pub mod model;
pub mod solution;
pub mod time;
