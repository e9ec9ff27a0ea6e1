//! Solver-space graph construction and Hours-of-Service break augmentation.
//!
//! [`SolverSpaceGraphBuilder`] screens demands and lays out the compact
//! pickup-and-delivery graph; [`BreakGraphAugmenter`] then threads a chain of
//! synthetic rest stops through every leg long enough to need one. Both share
//! a single [`NodeIdAllocator`](hosroute_core::NodeIdAllocator) so the id
//! layout is fixed by call order.

#![forbid(unsafe_code)]

mod augment;
mod builder;
mod feasibility;

pub use augment::BreakGraphAugmenter;
pub use builder::{BuiltGraph, SolverSpaceGraphBuilder};
pub use feasibility::{estimate_timing, judge, rest_allowance, trip_legs};
