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

//! Relaxations shared by the evaluators.
//!
//! All of them bound the completions a node's subtree can still produce. The
//! subtree only contains semi-active, chronologically ordered schedules, so a
//! vessel placed below the node starts no earlier than
//! `max(arrival, berth release, last decision time)`.
//!
//! A vessel's semi-active start on a berth only moves when that berth is
//! used. Starts never decrease along a branch, so the next vessel placed on a
//! berth must already start at or after the last decision time there. A berth
//! where no unassigned vessel does is closed for the whole subtree.

use crate::{berth_availability::BerthAvailability, state::SearchState};
use fixedbitset::FixedBitSet;
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
    solution::weighted_cost,
};
use mooring_search::num::SolverNumeric;
use std::cmp::Ordering;

/// What the relaxations need to know about one unassigned vessel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VesselBound<T> {
    pub vessel_index: VesselIndex,
    pub weight: T,
    /// Smallest finish time over all berths, windows and deadline respected.
    pub earliest_finish: T,
    /// Shortest processing time over the berths that admit a finish.
    pub shortest_processing: T,
    /// Shortest processing time over all allowed berths.
    pub shortest_allowed_processing: T,
    pub feasible_berths: usize,
    /// The berth of the earliest finish.
    pub best_berth: BerthIndex,
}

/// Semi-active `(start, finish)` of `vessel_index` on `berth_index` given the
/// current berth release, or `None` if it is forbidden there or misses its
/// deadline.
#[inline]
fn semi_active_placement<T>(
    model: &Model<T>,
    berth_availability: &BerthAvailability<T>,
    state: &SearchState<T>,
    vessel_index: VesselIndex,
    berth_index: BerthIndex,
) -> Option<(T, T)>
where
    T: SolverNumeric,
{
    let processing_time = model
        .vessel_processing_time(vessel_index, berth_index)
        .into_option()?;
    let ready = model
        .vessel_arrival_time(vessel_index)
        .max(state.berth_free_time(berth_index));
    let start = berth_availability.earliest_availability(berth_index, ready, processing_time)?;
    let finish = start.checked_add_val(processing_time)?;
    if finish > model.vessel_latest_departure_time(vessel_index) {
        return None;
    }
    Some((start, finish))
}

/// Marks in `open` every berth that some unassigned vessel can still be
/// placed on next, i.e. at or after the last decision time.
pub fn collect_open_berths<T>(
    model: &Model<T>,
    berth_availability: &BerthAvailability<T>,
    state: &SearchState<T>,
    open: &mut FixedBitSet,
) where
    T: SolverNumeric,
{
    open.clear();
    open.grow(model.num_berths());
    let last = state.last_decision_time();
    for b in 0..model.num_berths() {
        let berth_index = BerthIndex::new(b);
        let reachable = state.unassigned_vessels().any(|vessel_index| {
            semi_active_placement(model, berth_availability, state, vessel_index, berth_index)
                .is_some_and(|(start, _)| start >= last)
        });
        open.set(b, reachable);
    }
}

/// Earliest finish of `vessel_index` on `berth_index` below `state`, or
/// `None` if it cannot be placed there before its deadline.
///
/// `open` comes from [`collect_open_berths`]. A vessel whose semi-active
/// start lies before the last decision time can only use the berth after
/// another vessel has, which needs the berth to be open.
#[inline]
pub fn earliest_finish<T>(
    model: &Model<T>,
    berth_availability: &BerthAvailability<T>,
    state: &SearchState<T>,
    open: &FixedBitSet,
    vessel_index: VesselIndex,
    berth_index: BerthIndex,
) -> Option<T>
where
    T: SolverNumeric,
{
    let (start, finish) =
        semi_active_placement(model, berth_availability, state, vessel_index, berth_index)?;
    let last = state.last_decision_time();
    if start >= last {
        return Some(finish);
    }
    if !open.contains(berth_index.get()) {
        return None;
    }

    let processing_time = model
        .vessel_processing_time(vessel_index, berth_index)
        .into_option()?;
    let start = berth_availability.earliest_availability(berth_index, last, processing_time)?;
    let finish = start.checked_add_val(processing_time)?;
    if finish > model.vessel_latest_departure_time(vessel_index) {
        return None;
    }
    Some(finish)
}

/// Fills `out` with one entry per unassigned vessel. Returns `false` as soon
/// as a vessel has no feasible berth left. `open` is scratch space.
pub fn collect_vessel_bounds<T>(
    model: &Model<T>,
    berth_availability: &BerthAvailability<T>,
    state: &SearchState<T>,
    open: &mut FixedBitSet,
    out: &mut Vec<VesselBound<T>>,
) -> bool
where
    T: SolverNumeric,
{
    out.clear();
    collect_open_berths(model, berth_availability, state, open);
    for vessel_index in state.unassigned_vessels() {
        let mut bound: Option<VesselBound<T>> = None;
        let mut shortest_allowed = T::max_value();
        for b in 0..model.num_berths() {
            let berth_index = BerthIndex::new(b);
            let Some(processing_time) = model
                .vessel_processing_time(vessel_index, berth_index)
                .into_option()
            else {
                continue;
            };
            shortest_allowed = shortest_allowed.min(processing_time);

            let Some(finish) = earliest_finish(
                model,
                berth_availability,
                state,
                open,
                vessel_index,
                berth_index,
            ) else {
                continue;
            };
            match bound.as_mut() {
                None => {
                    bound = Some(VesselBound {
                        vessel_index,
                        weight: model.vessel_weight(vessel_index),
                        earliest_finish: finish,
                        shortest_processing: processing_time,
                        shortest_allowed_processing: T::max_value(),
                        feasible_berths: 1,
                        best_berth: berth_index,
                    })
                }
                Some(entry) => {
                    entry.feasible_berths += 1;
                    entry.shortest_processing = entry.shortest_processing.min(processing_time);
                    if finish < entry.earliest_finish {
                        entry.earliest_finish = finish;
                        entry.best_berth = berth_index;
                    }
                }
            }
        }

        match bound {
            Some(mut entry) => {
                entry.shortest_allowed_processing = shortest_allowed;
                out.push(entry);
            }
            None => return false,
        }
    }
    true
}

/// `Σ w_v · earliest_finish_v`.
#[inline]
pub fn per_vessel_bound<T>(bounds: &[VesselBound<T>]) -> T
where
    T: SolverNumeric,
{
    bounds.iter().fold(T::zero(), |acc, entry| {
        acc.saturating_add_val(weighted_cost(entry.weight, entry.earliest_finish))
    })
}

/// Smith's ratio order `p / w` ascending, exact via cross-multiplication.
/// Jobs without weight go last.
#[inline]
fn wspt_order<T>(a: &(T, T), b: &(T, T)) -> Ordering
where
    T: SolverNumeric,
{
    let (pa, wa) = (a.0.to_i128().unwrap_or(i128::MAX), a.1.to_i128().unwrap_or(0));
    let (pb, wb) = (b.0.to_i128().unwrap_or(i128::MAX), b.1.to_i128().unwrap_or(0));
    match (wa == 0, wb == 0) {
        (true, true) => pa.cmp(&pb),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => pa.saturating_mul(wb).cmp(&pb.saturating_mul(wa)),
    }
}

#[inline]
fn clamp_to<T>(value: i128) -> T
where
    T: SolverNumeric,
{
    let max = T::max_value().to_i128().unwrap_or(i128::MAX);
    let min = T::min_value().to_i128().unwrap_or(i128::MIN);
    T::from_i128(value.clamp(min, max)).unwrap_or_else(T::max_value)
}

/// Lower bound on `Σ w_j C_j` for `jobs = [(processing, weight)]` sharing
/// `machines` identical machines, all released at `release`.
///
/// Uses `OPT_m >= OPT_1 / m`, where `OPT_1` is the WSPT sequence on a single
/// machine. Sorts `jobs` in place.
pub fn parallel_wspt_bound<T>(jobs: &mut [(T, T)], release: T, machines: usize) -> T
where
    T: SolverNumeric,
{
    if jobs.is_empty() || machines == 0 {
        return T::zero();
    }
    jobs.sort_unstable_by(wspt_order);

    let release = release.to_i128().unwrap_or(0);
    let mut prefix: i128 = 0;
    let mut sequenced: i128 = 0;
    let mut released: i128 = 0;
    for &(processing, weight) in jobs.iter() {
        let p = processing.to_i128().unwrap_or(i128::MAX);
        let w = weight.to_i128().unwrap_or(0);
        prefix = prefix.saturating_add(p);
        sequenced = sequenced.saturating_add(w.saturating_mul(prefix));
        released = released.saturating_add(w.saturating_mul(release));
    }

    let spread = sequenced.div_euclid(machines as i128);
    clamp_to(released.saturating_add(spread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_core::math::interval::ClosedOpenInterval;
    use mooring_model::{model::ModelBuilder, time::ProcessingTime};

    #[test]
    fn test_parallel_wspt_bound_single_machine_is_exact() {
        // WSPT: (1,3) then (2,2) then (4,1): 3*1 + 2*3 + 1*7 = 16
        let mut jobs = vec![(4i64, 1i64), (1, 3), (2, 2)];
        assert_eq!(parallel_wspt_bound(&mut jobs, 0, 1), 16);
        assert_eq!(jobs, vec![(1, 3), (2, 2), (4, 1)]);
    }

    #[test]
    fn test_parallel_wspt_bound_with_release_and_machines() {
        // single machine sequence: 1*2 + 1*4 = 6, halved = 3; plus release 10 * 2
        let mut jobs = vec![(2i64, 1i64), (2, 1)];
        assert_eq!(parallel_wspt_bound(&mut jobs, 10, 2), 23);
    }

    #[test]
    fn test_zero_weight_jobs_sort_last() {
        let mut jobs = vec![(1i64, 0i64), (5, 1)];
        assert_eq!(parallel_wspt_bound(&mut jobs, 0, 1), 5);
        assert_eq!(jobs[1], (1, 0));
    }

    #[test]
    fn test_parallel_wspt_bound_saturates() {
        let mut jobs = vec![(i64::MAX / 2, i64::MAX / 2), (i64::MAX / 2, 3)];
        assert_eq!(parallel_wspt_bound(&mut jobs, 0, 1), i64::MAX);
    }

    #[test]
    fn test_collect_vessel_bounds_respects_windows() {
        let (v0, b0, b1) = (VesselIndex::new(0), BerthIndex::new(0), BerthIndex::new(1));
        let mut builder = ModelBuilder::<i64>::new(2, 1);
        builder
            .set_vessel_processing_time(v0, b0, ProcessingTime::some(5))
            .set_vessel_processing_time(v0, b1, ProcessingTime::some(3))
            .set_vessel_weight(v0, 2)
            .add_berth_closing_time(b1, ClosedOpenInterval::new(0, 10));
        let model = builder.build();

        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let state = SearchState::new(2, 1);

        let mut out = Vec::new();
        let mut open = FixedBitSet::new();
        assert!(collect_vessel_bounds(&model, &availability, &state, &mut open, &mut out));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].earliest_finish, 5);
        assert_eq!(out[0].best_berth, b0);
        assert_eq!(out[0].shortest_processing, 3);
        assert_eq!(out[0].feasible_berths, 2);
        assert_eq!(per_vessel_bound(&out), 10);
    }

    #[test]
    fn test_collect_vessel_bounds_detects_dead_vessel() {
        let v0 = VesselIndex::new(0);
        let mut builder = ModelBuilder::<i64>::new(1, 1);
        builder
            .set_vessel_processing_time(v0, BerthIndex::new(0), ProcessingTime::some(5))
            .set_vessel_latest_departure_time(v0, 4);
        let model = builder.build();
        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let state = SearchState::new(1, 1);
        let mut out = Vec::new();
        let mut open = FixedBitSet::new();
        assert!(!collect_vessel_bounds(&model, &availability, &state, &mut open, &mut out));
    }

    /// Vessel 0 only fits berth 0 and vessel 1 only berth 1, where it was
    /// placed at 50. With `late_vessel`, a third vessel for berth 0 arrives
    /// at 60.
    fn stranded(late_vessel: bool) -> (Model<i64>, BerthAvailability<i64>, SearchState<i64>) {
        let (v, b) = (VesselIndex::new, BerthIndex::new);
        let num_vessels = if late_vessel { 3 } else { 2 };
        let mut builder = ModelBuilder::<i64>::new(2, num_vessels);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(5))
            .set_vessel_processing_time(v(1), b(1), ProcessingTime::some(5))
            .set_vessel_arrival_time(v(1), 50);
        if late_vessel {
            builder
                .set_vessel_processing_time(v(2), b(0), ProcessingTime::some(5))
                .set_vessel_arrival_time(v(2), 60);
        }
        let model = builder.build();

        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let mut state = SearchState::new(2, num_vessels);
        state.assign_vessel(v(1), b(1), 50);
        state.set_berth_free_time(b(1), 55);
        state.set_last_decision(50, v(1), b(1));
        (model, availability, state)
    }

    #[test]
    fn test_berth_without_next_vessel_is_closed() {
        let (model, availability, state) = stranded(false);
        let mut open = FixedBitSet::new();
        collect_open_berths(&model, &availability, &state, &mut open);
        assert!(!open.contains(0));
        assert!(!open.contains(1));

        let mut out = Vec::new();
        assert!(!collect_vessel_bounds(&model, &availability, &state, &mut open, &mut out));
    }

    #[test]
    fn test_late_vessel_keeps_berth_open() {
        let (model, availability, state) = stranded(true);
        let mut open = FixedBitSet::new();
        collect_open_berths(&model, &availability, &state, &mut open);
        assert!(open.contains(0));
        assert!(!open.contains(1));

        let (v0, b0) = (VesselIndex::new(0), BerthIndex::new(0));
        assert_eq!(
            earliest_finish(&model, &availability, &state, &open, v0, b0),
            Some(55)
        );
        let mut out = Vec::new();
        assert!(collect_vessel_bounds(&model, &availability, &state, &mut open, &mut out));
        assert_eq!(out.len(), 2);
    }
}
