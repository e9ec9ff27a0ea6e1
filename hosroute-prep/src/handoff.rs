//! The end-to-end preparation pipeline.
//!
//! [`prepare`] validates the configuration, builds and augments the graph,
//! evaluates the dimension tables, seeds the initial routes and gathers the
//! remaining solver inputs into a [`SolverHandoff`].

use std::collections::BTreeMap;

use hosroute_core::{
    AccumulatorBounds, BreakNodeIndex, ConfigError, DemandRecord, DemandRequest, FleetSpec,
    GraphError, NodeId, NodeIdAllocator, PickupDelivery, PrepConfig, RouteError, SolverHandoff,
    TimeWindow, TravelTimeSource,
};
use hosroute_graph::{BreakGraphAugmenter, SolverSpaceGraphBuilder, rest_allowance};
use log::{info, warn};
use thiserror::Error;

use crate::{DimensionCallbackBuilder, InitialRouteConstructor};

/// Errors that abort preparation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Graph construction or augmentation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Seeding the initial routes hit a defect.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Turn demands and map-space travel times into a solver handoff.
///
/// Infeasible demands are reported in [`SolverHandoff::demands`] and left out
/// of everything else.
///
/// # Errors
///
/// Returns [`PrepError::Config`] for an invalid configuration,
/// [`PrepError::Graph`] when a leg is too long to augment, and
/// [`PrepError::Route`] when a seed walk finds an inconsistent break chain.
///
/// # Examples
///
/// ```
/// use hosroute_core::PrepConfig;
/// use hosroute_core::test_support::{LineTravelTimes, yard_demands};
/// use hosroute_prep::prepare;
///
/// # fn main() -> Result<(), hosroute_prep::PrepError> {
/// let handoff = prepare(&PrepConfig::default(), &LineTravelTimes::new(60), &yard_demands())?;
/// assert_eq!(handoff.pairs.len(), 2);
/// assert_eq!(handoff.initial_routes.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn prepare<T>(
    config: &PrepConfig,
    travel: &T,
    demands: &[DemandRequest],
) -> Result<SolverHandoff, PrepError>
where
    T: TravelTimeSource,
{
    config.validate()?;
    let mut ids = NodeIdAllocator::new();
    let mut built = SolverSpaceGraphBuilder::new(travel, config).build(demands, &mut ids)?;
    let breaks = if config.use_breaks {
        BreakGraphAugmenter::from_config(config).augment(&mut built.graph, &mut ids)?
    } else {
        BreakNodeIndex::new()
    };
    let dimensions =
        DimensionCallbackBuilder::new(&built.graph, &breaks, &built.demands, config.rules)
            .build();
    let initial_routes = InitialRouteConstructor::from_config(&built.graph, &breaks, config)
        .construct(&built.demands, config.vehicle_count)?;

    let pairs: Vec<_> = built
        .demands
        .iter()
        .filter_map(|record| pickup_delivery(config, record))
        .collect();
    let planning = TimeWindow::new(0, config.horizon);
    let break_windows: BTreeMap<_, _> = breaks.iter().map(|node| (node.id, planning)).collect();
    let drop_penalties = drop_penalties(config, &pairs, &breaks);
    let accumulator_bounds = accumulator_bounds(config, &pairs);
    let fleet = FleetSpec {
        vehicle_count: config.vehicle_count,
        capacity: config.vehicle_capacity,
        fixed_cost: config.vehicle_fixed_cost,
        window: planning,
        depot: NodeId::DEPOT,
    };

    let dropped = built.demands.len().saturating_sub(pairs.len());
    if dropped > 0 {
        warn!("{dropped} of {} demands left out as infeasible", built.demands.len());
    }
    info!(
        "handoff ready: {} nodes, {} arcs, {} pairs, {} break nodes, {} seeded vehicles",
        built.graph.node_count(),
        built.graph.edge_count(),
        pairs.len(),
        breaks.len(),
        initial_routes.len()
    );

    Ok(SolverHandoff {
        graph: built.graph,
        breaks,
        dimensions,
        demands: built.demands,
        pairs,
        break_windows,
        drop_penalties,
        accumulator_bounds,
        fleet,
        initial_routes,
    })
}

/// Pair and windows for a feasible demand.
fn pickup_delivery(config: &PrepConfig, record: &DemandRecord) -> Option<PickupDelivery> {
    let (pickup, dropoff) = record.node_pair()?;
    let request = &record.request;
    let dropoff_window = match record.legs {
        Some(legs) if config.constrain_dropoff_windows => {
            let drive = legs.origin_to_destination;
            let long = config.rules.long;
            let early = request.early + drive + long.whole_periods(drive) * long.rest;
            let late = request.late + drive + rest_allowance(config, drive) + long.rest;
            TimeWindow::new(early.min(config.horizon), late.min(config.horizon))
        }
        _ => TimeWindow::new(0, config.horizon),
    };
    Some(PickupDelivery {
        demand: record.id,
        pickup,
        dropoff,
        pickup_window: request.pickup_window(),
        dropoff_window,
    })
}

fn drop_penalties(
    config: &PrepConfig,
    pairs: &[PickupDelivery],
    breaks: &BreakNodeIndex,
) -> BTreeMap<NodeId, i64> {
    pairs
        .iter()
        .flat_map(|pair| [pair.pickup, pair.dropoff])
        .map(|node| (node, config.demand_drop_penalty))
        .chain(breaks.iter().map(|node| (node.id, config.break_drop_penalty)))
        .collect()
}

fn accumulator_bounds(config: &PrepConfig, pairs: &[PickupDelivery]) -> AccumulatorBounds {
    let baseline = config.accumulator_baseline;
    AccumulatorBounds {
        baseline,
        drive_ceiling: baseline + config.rules.long.period - 1,
        short_ceiling: baseline + config.rules.short.period - 1,
        constrained_nodes: pairs
            .iter()
            .flat_map(|pair| [pair.pickup, pair.dropoff])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hosroute_core::test_support::{
        LineTravelTimes, ReplaySolver, demand, sample_demands, yard_demands,
    };
    use hosroute_core::{BreakRule, DemandId, Dimension, HosRules, InfeasibleReason, SolveError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn handoff() -> SolverHandoff {
        prepare(&PrepConfig::default(), &LineTravelTimes::new(60), &sample_demands())
            .expect("sample should prepare")
    }

    #[rstest]
    fn infeasible_demands_are_reported_not_paired(handoff: SolverHandoff) {
        assert_eq!(handoff.demands.len(), 3);
        assert_eq!(handoff.feasible_demands().count(), 2);
        let served: Vec<_> = handoff.pairs.iter().map(|pair| pair.demand).collect();
        assert_eq!(served, vec![DemandId(0), DemandId(1)]);
    }

    #[rstest]
    fn pairs_carry_pickup_windows(handoff: SolverHandoff) {
        let second = handoff.pairs.get(1).expect("second pair");
        assert_eq!((second.pickup, second.dropoff), (NodeId(2), NodeId(4)));
        assert_eq!(second.pickup_window, TimeWindow::new(60, 2000));
        assert_eq!(second.dropoff_window, TimeWindow::new(0, 10_080));
    }

    #[rstest]
    fn every_break_gets_a_window_and_a_penalty(handoff: SolverHandoff) {
        assert_eq!(handoff.break_windows.len(), handoff.breaks.len());
        assert!(!handoff.breaks.is_empty());
        for node in handoff.breaks.iter() {
            assert_eq!(handoff.break_windows.get(&node.id), Some(&TimeWindow::new(0, 10_080)));
            assert_eq!(handoff.drop_penalties.get(&node.id), Some(&1_000_000));
        }
        assert_eq!(handoff.drop_penalties.get(&NodeId(1)), Some(&1_000_000_000));
        assert_eq!(handoff.drop_penalties.get(&NodeId::DEPOT), None);
    }

    #[rstest]
    fn bounds_sit_one_below_each_period(handoff: SolverHandoff) {
        let bounds = &handoff.accumulator_bounds;
        assert_eq!(bounds.baseline, 1000);
        assert_eq!(bounds.drive_ceiling, 1659);
        assert_eq!(bounds.short_ceiling, 1479);
        assert_eq!(
            bounds.constrained_nodes,
            vec![NodeId(1), NodeId(3), NodeId(2), NodeId(4)]
        );
    }

    #[rstest]
    fn fleet_follows_the_config(handoff: SolverHandoff) {
        assert_eq!(handoff.fleet.vehicle_count, 100);
        assert_eq!(handoff.fleet.capacity, 1);
        assert_eq!(handoff.fleet.fixed_cost, 1000);
        assert_eq!(handoff.fleet.window, TimeWindow::new(0, 10_080));
    }

    #[rstest]
    fn seed_routes_replay_through_a_solver() {
        let handoff = prepare(&PrepConfig::default(), &LineTravelTimes::new(60), &yard_demands())
            .expect("yard demands should prepare");
        let assignment = handoff
            .solve_with(&ReplaySolver)
            .expect("seeded handoff replays");
        assert_eq!(assignment.routes.len(), 1);
        assert_eq!(assignment.objective, 1000);
        let route = assignment.routes.first().expect("one route");
        let stops: Vec<_> = std::iter::once(NodeId::DEPOT)
            .chain(route.nodes.iter().copied())
            .chain(std::iter::once(NodeId::DEPOT))
            .collect();
        let load = handoff.dimensions.cumulative(Dimension::Load, &stops);
        assert_eq!(load.last(), Some(&0));
        assert!(load.iter().all(|&on_board| (0..=1).contains(&on_board)), "{load:?}");
    }

    #[rstest]
    fn approach_of_a_whole_long_period_misses_the_window() {
        // 660 minutes to the pickup force a short and a long break first.
        let handoff = prepare(
            &PrepConfig::default(),
            &LineTravelTimes::new(60),
            &[demand(11, 12, 600, 1200)],
        )
        .expect("demand should prepare");
        let record = handoff.demands.first().expect("one demand");
        assert_eq!(
            record.reason(),
            Some(&InfeasibleReason::PickupWindowMissed {
                earliest_arrival: 660 + 15 + 600 + 30,
                late: 1200,
            })
        );
        assert!(handoff.pairs.is_empty());
        assert!(handoff.initial_routes.is_empty());
    }

    #[rstest]
    fn dropoff_windows_narrow_on_request() {
        let config = PrepConfig {
            constrain_dropoff_windows: true,
            ..PrepConfig::default()
        };
        let handoff = prepare(&config, &LineTravelTimes::new(60), &[demand(3, 20, 60, 2000)])
            .expect("demand should prepare");
        let pair = handoff.pairs.first().expect("one pair");
        // 1020 loaded minutes: one whole long period, rest estimate 630.
        assert_eq!(
            pair.dropoff_window,
            TimeWindow::new(60 + 1020 + 600, 2000 + 1020 + 630 + 600)
        );
    }

    #[rstest]
    fn switching_breaks_off_leaves_the_graph_bare() {
        let config = PrepConfig {
            use_breaks: false,
            ..PrepConfig::default()
        };
        let handoff = prepare(&config, &LineTravelTimes::new(60), &sample_demands())
            .expect("sample should prepare");
        assert!(handoff.breaks.is_empty());
        assert!(handoff.break_windows.is_empty());
        assert_eq!(handoff.initial_routes.len(), 2);
    }

    #[rstest]
    fn invalid_config_is_refused() {
        let config = PrepConfig {
            rules: HosRules::new(BreakRule::SHORT, BreakRule::LONG),
            ..PrepConfig::default()
        };
        let err = prepare(&config, &LineTravelTimes::new(60), &sample_demands())
            .expect_err("short period above long period");
        assert!(matches!(err, PrepError::Config(ConfigError::InvalidRules { .. })));
    }

    #[rstest]
    fn oversized_leg_is_fatal() {
        let config = PrepConfig {
            max_breaks_per_leg: 2,
            ..PrepConfig::default()
        };
        let err = prepare(&config, &LineTravelTimes::new(60), &sample_demands())
            .expect_err("long legs exceed two breaks");
        assert!(matches!(
            err,
            PrepError::Graph(GraphError::GraphSizeExceeded { .. })
        ));
    }

    #[rstest]
    fn nothing_to_seed_means_no_solution() {
        let handoff = prepare(&PrepConfig::default(), &LineTravelTimes::new(60), &[])
            .expect("empty input prepares");
        assert_eq!(handoff.graph.node_count(), 1);
        assert_eq!(handoff.solve_with(&ReplaySolver), Err(SolveError::NoSolution));
    }
}
