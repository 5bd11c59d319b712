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

//! Checks a [`Solution`] against the constraints of a [`Model`].

use crate::{
    index::{BerthIndex, VesselIndex},
    model::Model,
    solution::{Solution, weighted_cost},
};
use mooring_core::{algorithm::earliest_fit, num::constants::MinusOne};
use num_traits::{PrimInt, Signed};

/// The first constraint a solution was found to break.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeasibilityViolation<T> {
    DimensionMismatch {
        expected: usize,
        found: usize,
    },
    BerthOutOfRange {
        vessel: VesselIndex,
        berth: BerthIndex,
    },
    ForbiddenAssignment {
        vessel: VesselIndex,
        berth: BerthIndex,
    },
    BeforeArrival {
        vessel: VesselIndex,
        start: T,
        arrival: T,
    },
    DeadlineExceeded {
        vessel: VesselIndex,
        finish: T,
        deadline: T,
    },
    OutsideOpening {
        vessel: VesselIndex,
        berth: BerthIndex,
        start: T,
    },
    Overlap {
        berth: BerthIndex,
        first: VesselIndex,
        second: VesselIndex,
    },
    ObjectiveMismatch {
        expected: T,
        found: T,
    },
}

impl<T> std::fmt::Display for FeasibilityViolation<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "solution covers {} vessels but the model has {}",
                found, expected
            ),
            Self::BerthOutOfRange { vessel, berth } => {
                write!(f, "{} is assigned to unknown {}", vessel, berth)
            }
            Self::ForbiddenAssignment { vessel, berth } => {
                write!(f, "{} is not allowed on {}", vessel, berth)
            }
            Self::BeforeArrival {
                vessel,
                start,
                arrival,
            } => write!(f, "{} starts at {} before arrival {}", vessel, start, arrival),
            Self::DeadlineExceeded {
                vessel,
                finish,
                deadline,
            } => write!(
                f,
                "{} finishes at {} after its deadline {}",
                vessel, finish, deadline
            ),
            Self::OutsideOpening {
                vessel,
                berth,
                start,
            } => write!(
                f,
                "{} at {} from {} is not inside an opening window",
                vessel, berth, start
            ),
            Self::Overlap {
                berth,
                first,
                second,
            } => write!(f, "{} and {} overlap on {}", first, second, berth),
            Self::ObjectiveMismatch { expected, found } => write!(
                f,
                "objective is {} but the schedule costs {}",
                found, expected
            ),
        }
    }
}

impl<T> std::error::Error for FeasibilityViolation<T> where T: std::fmt::Debug + std::fmt::Display {}

/// Verifies every hard constraint and the reported objective.
pub fn check_solution<T>(
    model: &Model<T>,
    solution: &Solution<T>,
) -> Result<(), FeasibilityViolation<T>>
where
    T: PrimInt + Signed + MinusOne,
{
    if solution.num_vessels() != model.num_vessels() {
        return Err(FeasibilityViolation::DimensionMismatch {
            expected: model.num_vessels(),
            found: solution.num_vessels(),
        });
    }

    let mut objective = T::zero();
    let mut per_berth: Vec<Vec<(T, T, VesselIndex)>> = vec![Vec::new(); model.num_berths()];

    for (vessel, berth, start) in solution.iter() {
        if berth.get() >= model.num_berths() {
            return Err(FeasibilityViolation::BerthOutOfRange { vessel, berth });
        }
        let Some(processing) = model.vessel_processing_time(vessel, berth).into_option() else {
            return Err(FeasibilityViolation::ForbiddenAssignment { vessel, berth });
        };

        let arrival = model.vessel_arrival_time(vessel);
        if start < arrival {
            return Err(FeasibilityViolation::BeforeArrival {
                vessel,
                start,
                arrival,
            });
        }

        let finish = start.saturating_add(processing);
        let deadline = model.vessel_latest_departure_time(vessel);
        if finish > deadline {
            return Err(FeasibilityViolation::DeadlineExceeded {
                vessel,
                finish,
                deadline,
            });
        }

        if earliest_fit(model.berth_opening_times(berth), start, processing) != Some(start) {
            return Err(FeasibilityViolation::OutsideOpening {
                vessel,
                berth,
                start,
            });
        }

        per_berth[berth.get()].push((start, finish, vessel));
        objective = objective.saturating_add(weighted_cost(model.vessel_weight(vessel), finish));
    }

    for (b, occupancies) in per_berth.iter_mut().enumerate() {
        occupancies.sort_unstable_by_key(|&(start, finish, vessel)| (start, finish, vessel.get()));
        for pair in occupancies.windows(2) {
            let (_, first_finish, first) = pair[0];
            let (second_start, second_finish, second) = pair[1];
            // Zero-length stays never collide.
            if second_start < first_finish && second_start < second_finish {
                return Err(FeasibilityViolation::Overlap {
                    berth: BerthIndex::new(b),
                    first,
                    second,
                });
            }
        }
    }

    if objective != solution.objective_value() {
        return Err(FeasibilityViolation::ObjectiveMismatch {
            expected: objective,
            found: solution.objective_value(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::ModelBuilder, time::ProcessingTime};
    use mooring_core::math::interval::ClosedOpenInterval;

    fn bi(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    fn vi(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn model() -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(2, 2);
        for v in 0..2 {
            builder.set_vessel_latest_departure_time(vi(v), 100);
            for b in 0..2 {
                builder.set_vessel_processing_time(vi(v), bi(b), ProcessingTime::some(10));
            }
        }
        builder
            .set_vessel_arrival_time(vi(1), 5)
            .add_berth_closing_time(bi(1), ClosedOpenInterval::new(20, 40));
        builder.build()
    }

    #[test]
    fn test_feasible_schedule_passes() {
        let m = model();
        let sol = Solution::new(10 + 25, vec![bi(0), bi(0)], vec![0, 15]);
        assert_eq!(check_solution(&m, &sol), Ok(()));
    }

    #[test]
    fn test_overlap_detected() {
        let m = model();
        let sol = Solution::new(10 + 19, vec![bi(0), bi(0)], vec![0, 9]);
        assert_eq!(
            check_solution(&m, &sol),
            Err(FeasibilityViolation::Overlap {
                berth: bi(0),
                first: vi(0),
                second: vi(1)
            })
        );
    }

    #[test]
    fn test_before_arrival_and_deadline() {
        let m = model();
        let early = Solution::new(10 + 14, vec![bi(0), bi(1)], vec![0, 4]);
        assert!(matches!(
            check_solution(&m, &early),
            Err(FeasibilityViolation::BeforeArrival { .. })
        ));

        let late = Solution::new(10 + 105, vec![bi(0), bi(1)], vec![0, 95]);
        assert!(matches!(
            check_solution(&m, &late),
            Err(FeasibilityViolation::DeadlineExceeded { .. })
        ));
    }

    #[test]
    fn test_maintenance_window_detected() {
        let m = model();
        let sol = Solution::new(10 + 25, vec![bi(0), bi(1)], vec![0, 15]);
        assert!(matches!(
            check_solution(&m, &sol),
            Err(FeasibilityViolation::OutsideOpening { .. })
        ));
    }

    #[test]
    fn test_objective_mismatch_detected() {
        let m = model();
        let sol = Solution::new(1, vec![bi(0), bi(1)], vec![0, 5]);
        assert_eq!(
            check_solution(&m, &sol),
            Err(FeasibilityViolation::ObjectiveMismatch {
                expected: 25,
                found: 1
            })
        );
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let m = model();
        let sol = Solution::new(0, vec![bi(0)], vec![0]);
        let err = check_solution(&m, &sol).unwrap_err();
        assert_eq!(err.to_string(), "solution covers 1 vessels but the model has 2");
    }
}
