//! Core domain types for HOS-aware pickup-and-delivery preparation.
//!
//! This crate holds the data model shared by graph construction, break
//! augmentation and route seeding: identifiers, Hours-of-Service rules, the
//! append-only solver-space graph, the break node index, per-arc transit
//! tables and the contract with the external routing solver.
//!
//! Unreachable pairs are `None` throughout; no lookup ever reports a missing
//! arc as zero.

#![forbid(unsafe_code)]

mod config;
mod demand;
mod error;
mod graph;
mod ids;
mod index;
mod node;
mod rules;
mod solver;
mod transit;
mod travel_time;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ConfigError, DEFAULT_ACCUMULATOR_BASELINE, DEFAULT_HORIZON_MINUTES, PrepConfig};
pub use demand::{
    DEFAULT_DWELL_MINUTES, DemandLegs, DemandRecord, DemandRequest, DemandTiming, Feasibility,
    InfeasibleReason, TimeWindow,
};
pub use error::{GraphError, RouteError};
pub use graph::SolverSpaceGraph;
pub use ids::{DemandId, MapNodeId, Minutes, NodeId, NodeIdAllocator};
pub use index::BreakNodeIndex;
pub use node::{BreakNode, NodeKind};
pub use rules::{BreakKind, BreakRule, HosRules};
pub use solver::{
    AccumulatorBounds, AssignedRoute, Assignment, FleetSpec, InitialRoute, PickupDelivery,
    RoutingSolver, SolveError, SolverHandoff,
};
pub use transit::{Dimension, DimensionTables, TransitTable, UNREACHABLE_TRANSIT};
pub use travel_time::{TravelTimeError, TravelTimeGraph, TravelTimeSource};
