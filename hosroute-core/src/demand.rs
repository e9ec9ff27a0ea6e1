//! Pickup-and-delivery demands and their feasibility verdicts.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DemandId, MapNodeId, Minutes, NodeId};

/// Dwell time assumed at a pickup or dropoff when none is given.
pub const DEFAULT_DWELL_MINUTES: Minutes = 15;

/// Inclusive window of minutes from the start of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeWindow {
    /// Earliest minute.
    pub early: Minutes,
    /// Latest minute.
    pub late: Minutes,
}

impl TimeWindow {
    /// Construct a window.
    #[must_use]
    pub const fn new(early: Minutes, late: Minutes) -> Self {
        Self { early, late }
    }

    /// Whether `minute` falls in the window.
    #[must_use]
    pub const fn contains(self, minute: Minutes) -> bool {
        self.early <= minute && minute <= self.late
    }
}

/// A load to collect at `from` and deliver to `to`.
///
/// # Examples
///
/// ```
/// use hosroute_core::{DemandRequest, MapNodeId};
///
/// let request = DemandRequest::new(MapNodeId(7), MapNodeId(9), 600, 1200);
/// assert_eq!(request.pickup_dwell, 15);
/// assert_eq!(request.with_dwell(30, 45).dropoff_dwell, 45);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemandRequest {
    /// Pickup location.
    pub from: MapNodeId,
    /// Delivery location.
    pub to: MapNodeId,
    /// Earliest pickup minute.
    pub early: Minutes,
    /// Latest pickup minute.
    pub late: Minutes,
    /// Minutes spent loading.
    #[cfg_attr(feature = "serde", serde(default = "default_dwell"))]
    pub pickup_dwell: Minutes,
    /// Minutes spent unloading.
    #[cfg_attr(feature = "serde", serde(default = "default_dwell"))]
    pub dropoff_dwell: Minutes,
}

#[cfg(feature = "serde")]
const fn default_dwell() -> Minutes {
    DEFAULT_DWELL_MINUTES
}

impl DemandRequest {
    /// Request with the default dwell at both ends.
    #[must_use]
    pub const fn new(from: MapNodeId, to: MapNodeId, early: Minutes, late: Minutes) -> Self {
        Self {
            from,
            to,
            early,
            late,
            pickup_dwell: DEFAULT_DWELL_MINUTES,
            dropoff_dwell: DEFAULT_DWELL_MINUTES,
        }
    }

    /// Replace both dwell times.
    #[must_use]
    pub const fn with_dwell(mut self, pickup: Minutes, dropoff: Minutes) -> Self {
        self.pickup_dwell = pickup;
        self.dropoff_dwell = dropoff;
        self
    }

    /// The pickup window `[early, late]`.
    #[must_use]
    pub const fn pickup_window(&self) -> TimeWindow {
        TimeWindow::new(self.early, self.late)
    }
}

/// Map-space driving times for the three legs of a single-demand trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemandLegs {
    /// Depot to pickup.
    pub depot_to_origin: Minutes,
    /// Pickup to delivery.
    pub origin_to_destination: Minutes,
    /// Delivery back to the depot.
    pub destination_to_depot: Minutes,
}

/// Optimistic timings used only to screen a demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemandTiming {
    /// Minutes from the plan start until loading finishes, if the vehicle
    /// leaves immediately.
    pub depot_origin: Minutes,
    /// Earliest minute loading can start.
    pub earliest_pickup: Minutes,
    /// Earliest minute the vehicle can reach the delivery.
    pub earliest_destination: Minutes,
    /// Earliest minute the vehicle can be back at the depot.
    pub round_trip: Minutes,
}

/// Why a demand was screened out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InfeasibleReason {
    /// One of the trip's legs has no route.
    Unreachable {
        /// Start of the missing leg.
        from: MapNodeId,
        /// End of the missing leg.
        to: MapNodeId,
    },
    /// Even leaving at once, loading cannot finish before the window closes.
    PickupWindowMissed {
        /// Minute loading would finish.
        earliest_arrival: Minutes,
        /// Latest pickup minute.
        late: Minutes,
    },
    /// The shortest possible round trip ends after the horizon.
    HorizonExceeded {
        /// Minute the round trip ends.
        round_trip: Minutes,
        /// Planning horizon.
        horizon: Minutes,
    },
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { from, to } => write!(f, "no route from {from} to {to}"),
            Self::PickupWindowMissed {
                earliest_arrival,
                late,
            } => write!(
                f,
                "earliest pickup completes at {earliest_arrival}, after late bound {late}"
            ),
            Self::HorizonExceeded {
                round_trip,
                horizon,
            } => write!(
                f,
                "round trip ends at {round_trip}, after horizon {horizon}"
            ),
        }
    }
}

/// Outcome of the feasibility screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Feasibility {
    /// The demand may be served.
    Feasible,
    /// The demand cannot be served by any vehicle.
    Infeasible(InfeasibleReason),
}

/// A demand together with everything graph construction learnt about it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemandRecord {
    /// Position in the input list.
    pub id: DemandId,
    /// The demand as requested.
    pub request: DemandRequest,
    /// Leg times, when all three legs are reachable.
    pub legs: Option<DemandLegs>,
    /// Screening estimates, when the legs are known.
    pub timing: Option<DemandTiming>,
    /// Screening verdict.
    pub feasibility: Feasibility,
    /// Solver-space pickup node, for feasible demands.
    pub origin_id: Option<NodeId>,
    /// Solver-space dropoff node, for feasible demands.
    pub destination_id: Option<NodeId>,
}

impl DemandRecord {
    /// Whether the demand passed screening.
    #[must_use]
    pub const fn is_feasible(&self) -> bool {
        matches!(self.feasibility, Feasibility::Feasible)
    }

    /// Why the demand failed screening.
    #[must_use]
    pub const fn reason(&self) -> Option<&InfeasibleReason> {
        match &self.feasibility {
            Feasibility::Feasible => None,
            Feasibility::Infeasible(reason) => Some(reason),
        }
    }

    /// Pickup and dropoff ids, once both are allocated.
    #[must_use]
    pub const fn node_pair(&self) -> Option<(NodeId, NodeId)> {
        match (self.origin_id, self.destination_id) {
            (Some(origin), Some(destination)) => Some((origin, destination)),
            _ => None,
        }
    }
}
