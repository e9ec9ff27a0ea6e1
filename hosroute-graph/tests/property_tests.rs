//! Property-based tests for graph construction and break augmentation.
//!
//! # Invariants tested
//!
//! - **Short legs:** legs no longer than the short period get no breaks.
//! - **Exact splits:** every node's split sums to its sub-leg and the long
//!   breaks together cover the whole leg.
//! - **Restore deltas:** every node restores exactly its own period.
//! - **Reproducibility:** identical input and a fresh allocator give an
//!   identical graph and index.
//! - **Unique ids:** break ids are contiguous and never collide with demand
//!   nodes.


use std::collections::BTreeSet;

use hosroute_core::test_support::LineTravelTimes;
use hosroute_core::{
    BreakKind, BreakNodeIndex, HosRules, Minutes, NodeId, NodeIdAllocator, PrepConfig,
    SolverSpaceGraph,
};
use hosroute_graph::{BreakGraphAugmenter, SolverSpaceGraphBuilder};
use proptest::prelude::*;

use proptest_support::{demand_set, leg_minutes};

fn augmenter() -> BreakGraphAugmenter {
    BreakGraphAugmenter::new(HosRules::default(), 100)
}

fn build_and_augment(
    demands: &[hosroute_core::DemandRequest],
    minutes_per_step: Minutes,
) -> Result<(SolverSpaceGraph, BreakNodeIndex), TestCaseError> {
    let config = PrepConfig::default();
    let builder = SolverSpaceGraphBuilder::new(LineTravelTimes::new(minutes_per_step), &config);
    let mut ids = NodeIdAllocator::new();
    let mut built = builder
        .build(demands, &mut ids)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let index = BreakGraphAugmenter::from_config(&config)
        .augment(&mut built.graph, &mut ids)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    Ok((built.graph, index))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: legs within the short period are left untouched.
    #[test]
    fn short_legs_stay_bare(minutes in 0_i64..=480) {
        let mut ids = NodeIdAllocator::new();
        let chain = augmenter()
            .split_leg_with_breaks(NodeId(1), NodeId(2), minutes, &mut ids)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(chain.is_empty());
        prop_assert_eq!(ids.issued(), 0);
    }

    /// Property: splits are exact and long breaks cover the leg.
    #[test]
    fn splits_preserve_leg_length(minutes in leg_minutes()) {
        let chain = augmenter()
            .split_leg_with_breaks(NodeId(1), NodeId(2), minutes, &mut NodeIdAllocator::new())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        if chain.is_empty() {
            prop_assert!(minutes <= 480);
        } else {
            let covered: Minutes = chain
                .iter()
                .filter(|node| node.kind == BreakKind::Long)
                .map(|node| node.leg_time_before)
                .sum();
            prop_assert_eq!(covered, minutes);
        }
        for node in &chain {
            prop_assert!(node.leg_time_before >= 0);
            prop_assert!(node.leg_time_after >= 0);
            prop_assert!(node.leg_time_before <= node.accumulator_period);
            prop_assert_eq!(node.restore_delta(), -node.accumulator_period);
        }
    }

    /// Property: building twice with fresh allocators gives identical output.
    #[test]
    fn pipeline_is_reproducible(demands in demand_set(6, 40)) {
        let first = build_and_augment(&demands, 45)?;
        let second = build_and_augment(&demands, 45)?;
        prop_assert_eq!(first, second);
    }

    /// Property: break ids follow the demand ids without gaps or overlap.
    #[test]
    fn break_ids_are_contiguous(demands in demand_set(6, 40)) {
        let (graph, index) = build_and_augment(&demands, 45)?;
        let demand_nodes: BTreeSet<_> = graph
            .nodes()
            .filter(|(id, kind)| !kind.is_break() && !id.is_depot())
            .map(|(id, _)| id.0)
            .collect();
        let break_nodes: Vec<_> = index.iter().map(|node| node.id.0).collect();
        let first_break = u32::try_from(demand_nodes.len()).unwrap_or(u32::MAX) + 1;
        let expected: Vec<u32> = (first_break..).take(break_nodes.len()).collect();
        prop_assert_eq!(break_nodes, expected);
        for node in index.iter() {
            prop_assert_eq!(graph.weight(node.anchor_from, node.id), Some(node.leg_time_before));
            prop_assert_eq!(graph.weight(node.id, node.anchor_to), Some(node.leg_time_after));
        }
    }
}
