//! Identifier newtypes and the solver-space id allocator.
//!
//! Map-space and solver-space ids are distinct types so a travel-time lookup
//! can never be fed a synthetic node by accident.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whole minutes. Signed because accumulator restores are negative deltas.
pub type Minutes = i64;

/// A node in the map-space travel-time input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct MapNodeId(pub u32);

impl fmt::Display for MapNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// A node in the solver-space graph.
///
/// Every pickup, dropoff and break gets its own id, even when two of them sit
/// on the same map location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct NodeId(pub u32);

impl NodeId {
    /// The single depot every vehicle starts and ends at.
    pub const DEPOT: Self = Self(0);

    /// Whether this id is the depot.
    #[must_use]
    pub const fn is_depot(self) -> bool {
        self.0 == Self::DEPOT.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a demand in the caller's input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct DemandId(pub u32);

impl fmt::Display for DemandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic issuer of solver-space ids.
///
/// One allocator is threaded by `&mut` through graph construction and every
/// leg split, so the issue order is fixed by call order alone. Ids are never
/// reused.
///
/// # Examples
///
/// ```
/// use hosroute_core::{NodeId, NodeIdAllocator};
///
/// let mut ids = NodeIdAllocator::new();
/// assert_eq!(ids.next_id(), NodeId(1));
/// assert_eq!(ids.next_id(), NodeId(2));
/// assert_eq!(ids.issued(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdAllocator {
    first: u32,
    next: u32,
}

impl NodeIdAllocator {
    /// Allocator whose first id follows the depot.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(NodeId(1))
    }

    /// Allocator whose first issued id is `start`.
    #[must_use]
    pub const fn starting_at(start: NodeId) -> Self {
        Self {
            first: start.0,
            next: start.0,
        }
    }

    /// Issue the next id.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` id space is exhausted.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .unwrap_or_else(|| panic!("solver-space id space exhausted after {id}"));
        id
    }

    /// The id the next call to [`Self::next_id`] will return.
    #[must_use]
    pub const fn peek(&self) -> NodeId {
        NodeId(self.next)
    }

    /// How many ids this allocator has issued.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.next - self.first
    }
}

impl Default for NodeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_are_sequential_from_one() {
        let mut ids = NodeIdAllocator::new();
        let issued: Vec<_> = (0..4).map(|_| ids.next_id()).collect();
        assert_eq!(issued, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);
        assert_eq!(ids.peek(), NodeId(5));
    }

    #[rstest]
    #[case(30)]
    #[case(1000)]
    fn starting_point_is_honoured(#[case] start: u32) {
        let mut ids = NodeIdAllocator::starting_at(NodeId(start));
        assert_eq!(ids.next_id(), NodeId(start));
        assert_eq!(ids.issued(), 1);
    }

    #[rstest]
    fn depot_is_node_zero() {
        assert!(NodeId(0).is_depot());
        assert!(!NodeId(1).is_depot());
    }
}
