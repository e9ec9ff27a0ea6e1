use thiserror::Error;

use crate::{MapNodeId, Minutes};

/// Errors from building a [`crate::TravelTimeGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelTimeError {
    /// A travel time was negative.
    ///
    /// Usually a sign that an unreachable marker leaked through as a number.
    #[error("travel time {from}->{to} is negative ({minutes})")]
    NegativeTime {
        /// Start of the pair.
        from: MapNodeId,
        /// End of the pair.
        to: MapNodeId,
        /// Offending value.
        minutes: Minutes,
    },
}
