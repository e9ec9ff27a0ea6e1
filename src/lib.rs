//! Facade crate for Hours-of-Service aware pickup-and-delivery preparation.
//!
//! This crate re-exports the core domain types and graph construction, and
//! exposes the end-to-end preparation pipeline behind the `prep` feature.

#![forbid(unsafe_code)]

pub use hosroute_core::{
    BreakKind, BreakNode, BreakNodeIndex, BreakRule, ConfigError, DemandId, DemandRecord,
    DemandRequest, Feasibility, GraphError, HosRules, InfeasibleReason, MapNodeId, Minutes, NodeId,
    NodeIdAllocator, NodeKind, PrepConfig, RouteError, RoutingSolver, SolveError, SolverHandoff,
    SolverSpaceGraph, TimeWindow, TravelTimeError, TravelTimeGraph, TravelTimeSource,
};
pub use hosroute_graph::{BreakGraphAugmenter, BuiltGraph, SolverSpaceGraphBuilder};

#[cfg(feature = "prep")]
pub use hosroute_prep::{
    DimensionCallbackBuilder, InitialRouteConstructor, PrepError, prepare, validate_route,
};
