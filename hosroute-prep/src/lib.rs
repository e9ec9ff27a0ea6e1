//! From demands to a solver-ready problem.
//!
//! This crate closes the preparation pipeline. [`DimensionCallbackBuilder`]
//! evaluates the per-arc transits the solver accumulates,
//! [`InitialRouteConstructor`] seeds one break-respecting route per vehicle,
//! and [`prepare`] runs every stage in order to produce a
//! [`SolverHandoff`](hosroute_core::SolverHandoff).

#![forbid(unsafe_code)]

mod dimensions;
mod handoff;
mod routes;

pub use dimensions::DimensionCallbackBuilder;
pub use handoff::{PrepError, prepare};
pub use routes::{
    Accumulators, InitialRouteConstructor, Stage, Step, Visit, WalkState, validate_route,
};
