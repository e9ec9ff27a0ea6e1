//! Optimistic screening of a single demand.
//!
//! The estimates assume the vehicle leaves the depot at once, drives each leg
//! without detours and takes the fewest rests the rules allow. A demand that
//! fails even this cannot be served by any route.

use hosroute_core::{
    DemandLegs, DemandRequest, DemandTiming, Feasibility, InfeasibleReason, MapNodeId, Minutes,
    PrepConfig, TravelTimeSource,
};

/// Look up the three legs of a single-demand trip.
///
/// # Errors
///
/// Returns the first missing leg as [`InfeasibleReason::Unreachable`].
pub fn trip_legs<T: TravelTimeSource>(
    travel: &T,
    depot: MapNodeId,
    request: &DemandRequest,
) -> Result<DemandLegs, InfeasibleReason> {
    let leg = |from: MapNodeId, to: MapNodeId| {
        travel
            .travel_time(from, to)
            .ok_or(InfeasibleReason::Unreachable { from, to })
    };
    Ok(DemandLegs {
        depot_to_origin: leg(depot, request.from)?,
        origin_to_destination: leg(request.from, request.to)?,
        destination_to_depot: leg(request.to, depot)?,
    })
}

/// Rest minutes the screen assumes for a drive of `drive` minutes.
#[must_use]
pub const fn rest_allowance(config: &PrepConfig, drive: Minutes) -> Minutes {
    if config.use_breaks {
        config.rules.estimate_rest(drive)
    } else {
        0
    }
}

/// Compute the optimistic timings for `request`.
///
/// # Examples
///
/// ```
/// use hosroute_core::{DemandLegs, DemandRequest, MapNodeId, PrepConfig};
/// use hosroute_graph::estimate_timing;
///
/// let request = DemandRequest::new(MapNodeId(7), MapNodeId(9), 600, 1200);
/// let legs = DemandLegs {
///     depot_to_origin: 500,
///     origin_to_destination: 120,
///     destination_to_depot: 400,
/// };
/// let timing = estimate_timing(&PrepConfig::default(), &request, legs);
/// assert_eq!(timing.depot_origin, 500 + 15 + 30);
/// assert_eq!(timing.earliest_pickup, 600);
/// ```
#[must_use]
pub const fn estimate_timing(
    config: &PrepConfig,
    request: &DemandRequest,
    legs: DemandLegs,
) -> DemandTiming {
    let DemandLegs {
        depot_to_origin,
        origin_to_destination,
        destination_to_depot,
    } = legs;
    let depot_origin =
        depot_to_origin + request.pickup_dwell + rest_allowance(config, depot_to_origin);
    let earliest_pickup = if request.early > depot_origin {
        request.early
    } else {
        depot_origin
    };
    let loaded_and_home = origin_to_destination + destination_to_depot;
    let round_trip = earliest_pickup
        + request.pickup_dwell
        + request.dropoff_dwell
        + loaded_and_home
        + rest_allowance(config, loaded_and_home);
    let earliest_destination = earliest_pickup
        + request.pickup_dwell
        + origin_to_destination
        + rest_allowance(config, origin_to_destination);
    DemandTiming {
        depot_origin,
        earliest_pickup,
        earliest_destination,
        round_trip,
    }
}

/// Judge `timing` against the pickup window and the horizon.
///
/// A missed pickup window is reported ahead of a blown horizon.
#[must_use]
pub const fn judge(config: &PrepConfig, request: &DemandRequest, timing: &DemandTiming) -> Feasibility {
    if timing.depot_origin > request.late {
        return Feasibility::Infeasible(InfeasibleReason::PickupWindowMissed {
            earliest_arrival: timing.depot_origin,
            late: request.late,
        });
    }
    if timing.round_trip > config.horizon {
        return Feasibility::Infeasible(InfeasibleReason::HorizonExceeded {
            round_trip: timing.round_trip,
            horizon: config.horizon,
        });
    }
    Feasibility::Feasible
}

#[cfg(test)]
mod tests {
    use super::*;
    use hosroute_core::test_support::{LineTravelTimes, demand};
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> PrepConfig {
        PrepConfig {
            horizon: 10_000,
            ..PrepConfig::default()
        }
    }

    fn legs(depot_to_origin: Minutes) -> DemandLegs {
        DemandLegs {
            depot_to_origin,
            origin_to_destination: 60,
            destination_to_depot: 60,
        }
    }

    /// Demand 7 -> 9 with a 600..=1200 pickup window is feasible exactly when
    /// the drive to 7, the dwell and the rests fit before 1200.
    #[rstest]
    #[case(400, true)]
    #[case(480, true)]
    #[case(659, true)]
    #[case(660, false)]
    #[case(661, false)]
    fn pickup_window_counts_drive_dwell_and_rest(
        config: PrepConfig,
        #[case] depot_to_origin: Minutes,
        #[case] feasible: bool,
    ) {
        let request = demand(7, 9, 600, 1200);
        let timing = estimate_timing(&config, &request, legs(depot_to_origin));
        let rest = config.rules.estimate_rest(depot_to_origin);
        assert_eq!(timing.depot_origin, depot_to_origin + 15 + rest);
        assert_eq!(timing.depot_origin <= 1200, feasible);
        assert_eq!(
            judge(&config, &request, &timing) == Feasibility::Feasible,
            feasible
        );
    }

    #[rstest]
    fn early_window_delays_pickup(config: PrepConfig) {
        let request = demand(7, 9, 600, 1200);
        let timing = estimate_timing(&config, &request, legs(100));
        assert_eq!(timing.earliest_pickup, 600);
        assert_eq!(timing.earliest_destination, 600 + 15 + 60);
        assert_eq!(timing.round_trip, 600 + 15 + 15 + 120);
    }

    #[rstest]
    fn horizon_is_checked_after_window(config: PrepConfig) {
        let request = demand(1, 2, 9_900, 9_990);
        let timing = estimate_timing(&config, &request, legs(100));
        assert_eq!(
            judge(&config, &request, &timing),
            Feasibility::Infeasible(InfeasibleReason::HorizonExceeded {
                round_trip: timing.round_trip,
                horizon: 10_000,
            })
        );
    }

    #[rstest]
    fn rests_vanish_without_breaks() {
        let config = PrepConfig {
            use_breaks: false,
            ..PrepConfig::default()
        };
        assert_eq!(rest_allowance(&config, 5_000), 0);
    }

    #[rstest]
    fn missing_leg_names_the_pair() {
        let travel = LineTravelTimes::new(60).without(MapNodeId(9));
        let err = trip_legs(&travel, MapNodeId(0), &demand(7, 9, 0, 100))
            .expect_err("dropoff is cut off");
        assert_eq!(
            err,
            InfeasibleReason::Unreachable {
                from: MapNodeId(7),
                to: MapNodeId(9)
            }
        );
    }
}
