//! Map-space travel times.
//!
//! The [`TravelTimeSource`] trait is the seam between this crate and whatever
//! produced the road network data. A missing pair means the destination is
//! unreachable; it is never reported as zero.

mod error;
mod source;

pub use error::TravelTimeError;
pub use source::{TravelTimeGraph, TravelTimeSource};
