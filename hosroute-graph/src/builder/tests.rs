//! Tests for `SolverSpaceGraphBuilder`.

use super::*;
use hosroute_core::test_support::{LineTravelTimes, demand, sample_demands};
use hosroute_core::{InfeasibleReason, MapNodeId};
use rstest::{fixture, rstest};

#[fixture]
fn config() -> PrepConfig {
    PrepConfig::default()
}

fn build(config: &PrepConfig, demands: &[DemandRequest]) -> BuiltGraph {
    let builder = SolverSpaceGraphBuilder::new(LineTravelTimes::new(60), config);
    builder
        .build(demands, &mut NodeIdAllocator::new())
        .expect("graph should build")
}

#[rstest]
fn origins_are_numbered_before_destinations(config: PrepConfig) {
    let built = build(&config, &sample_demands());
    let pairs: Vec<_> = built.demands.iter().map(DemandRecord::node_pair).collect();
    assert_eq!(
        pairs,
        vec![
            Some((NodeId(1), NodeId(3))),
            Some((NodeId(2), NodeId(4))),
            None
        ]
    );
}

#[rstest]
fn late_pickup_window_is_reported(config: PrepConfig) {
    let built = build(&config, &sample_demands());
    let dropped = built.demands.get(2).expect("third demand");
    assert_eq!(
        dropped.reason(),
        Some(&InfeasibleReason::PickupWindowMissed {
            earliest_arrival: 300 + 15,
            late: 100,
        })
    );
    assert_eq!(built.feasible().count(), 2);
}

#[rstest]
fn unreachable_leg_excludes_demand(config: PrepConfig) {
    let builder = SolverSpaceGraphBuilder::new(LineTravelTimes::new(60).without(MapNodeId(9)), &config);
    let built = builder
        .build(&[demand(5, 9, 0, 1000)], &mut NodeIdAllocator::new())
        .expect("graph should build");
    let record = built.demands.first().expect("one demand");
    assert_eq!(
        record.reason(),
        Some(&InfeasibleReason::Unreachable {
            from: MapNodeId(5),
            to: MapNodeId(9)
        })
    );
    assert_eq!(record.legs, None);
    assert_eq!(built.graph.node_count(), 1);
}

#[rstest]
fn horizon_bounds_the_round_trip() {
    let config = PrepConfig {
        horizon: 400,
        ..PrepConfig::default()
    };
    let built = build(&config, &[demand(2, 4, 0, 600)]);
    assert_eq!(
        built.demands.first().and_then(DemandRecord::reason),
        Some(&InfeasibleReason::HorizonExceeded {
            round_trip: 135 + 30 + 360,
            horizon: 400,
        })
    );
}

#[rstest]
fn trip_legs_and_dwell_loops_are_added(config: PrepConfig) {
    let built = build(&config, &sample_demands());
    let graph = &built.graph;
    assert_eq!(graph.weight(NodeId(0), NodeId(1)), Some(120));
    assert_eq!(graph.weight(NodeId(1), NodeId(3)), Some(120));
    assert_eq!(graph.weight(NodeId(3), NodeId(0)), Some(240));
    assert_eq!(graph.weight(NodeId(2), NodeId(4)), Some(1020));
    assert_eq!(graph.weight(NodeId(1), NodeId(1)), Some(0));
    assert_eq!(
        graph.kind(NodeId(4)),
        Some(NodeKind::Dropoff {
            demand: DemandId(1)
        })
    );
}

#[rstest]
fn cross_legs_respect_the_next_pickup_window(config: PrepConfig) {
    let built = build(&config, &sample_demands());
    // Dropoff 3 is reached at 270 and pickup 2 closes at 2000.
    assert_eq!(built.graph.weight(NodeId(3), NodeId(2)), Some(60));
    // Dropoff 4 is reached at 1860; pickup 1 closed at 600.
    assert_eq!(built.graph.weight(NodeId(4), NodeId(1)), None);
    assert_eq!(built.graph.edge_count(), 11);
}

#[rstest]
fn rebuilding_with_fresh_ids_is_identical(config: PrepConfig) {
    let first = build(&config, &sample_demands());
    let second = build(&config, &sample_demands());
    assert_eq!(first.graph, second.graph);
    assert_eq!(first.demands, second.demands);
}

#[rstest]
fn allocator_is_shared_with_the_caller(config: PrepConfig) {
    let builder = SolverSpaceGraphBuilder::new(LineTravelTimes::new(60), &config);
    let mut ids = NodeIdAllocator::new();
    builder
        .build(&sample_demands(), &mut ids)
        .expect("graph should build");
    assert_eq!(ids.peek(), NodeId(5));
}
