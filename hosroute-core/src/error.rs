//! Errors raised while building and walking the solver-space graph.
//!
//! Infeasible demands and unreachable arcs are data, not errors; see
//! [`crate::Feasibility`] and [`crate::SolverSpaceGraph::weight`]. Apart from
//! [`RouteError::NoBreakOpportunity`], everything here marks a defect the
//! caller must not paper over.

use thiserror::Error;

use crate::{BreakKind, Minutes, NodeId, NodeKind};

/// Violations of the append-only graph and index contracts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge referenced a node that was never registered.
    #[error("node {node} is not registered in the graph")]
    UnknownNode {
        /// The missing node.
        node: NodeId,
    },
    /// A node was registered twice with different tags.
    #[error("node {node} already registered as {existing:?}, refusing {proposed:?}")]
    NodeConflict {
        /// The node in question.
        node: NodeId,
        /// Tag already recorded.
        existing: NodeKind,
        /// Tag that was refused.
        proposed: NodeKind,
    },
    /// An edge was added twice with different weights.
    #[error("edge {from}->{to} already weighs {existing}, refusing {proposed}")]
    EdgeConflict {
        /// Edge start.
        from: NodeId,
        /// Edge end.
        to: NodeId,
        /// Weight already recorded.
        existing: Minutes,
        /// Weight that was refused.
        proposed: Minutes,
    },
    /// An edge weight was negative.
    #[error("edge {from}->{to} has negative weight {minutes}")]
    NegativeWeight {
        /// Edge start.
        from: NodeId,
        /// Edge end.
        to: NodeId,
        /// Offending weight.
        minutes: Minutes,
    },
    /// A leg would need more break nodes than the configured limit.
    ///
    /// This almost always means travel times arrived in the wrong unit.
    #[error(
        "leg {from}->{to} of {leg_minutes} minutes needs {required} break nodes, limit is {limit}"
    )]
    GraphSizeExceeded {
        /// Leg start.
        from: NodeId,
        /// Leg end.
        to: NodeId,
        /// Leg length.
        leg_minutes: Minutes,
        /// Break nodes the split would create.
        required: usize,
        /// Configured per-leg ceiling.
        limit: usize,
    },
    /// A break chain was registered twice for the same leg.
    #[error("break chain for leg {from}->{to} already recorded")]
    DuplicateChain {
        /// Leg start.
        from: NodeId,
        /// Leg end.
        to: NodeId,
    },
    /// A pending break anchor had nothing to resolve to.
    #[error("break node {node} on leg {from}->{to} has no long break to anchor to")]
    UnresolvedAnchor {
        /// The break whose anchor stayed pending.
        node: NodeId,
        /// Leg start.
        from: NodeId,
        /// Leg end.
        to: NodeId,
    },
}

/// Failures of the greedy initial-route walk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The next chain node was not the required break kind, even after
    /// skipping one.
    ///
    /// Signals a defect in the break chain, not bad input.
    #[error(
        "break chain {position}->{goal} offers {found:?} at slot {cursor}, expected {expected:?}"
    )]
    ChainConsistency {
        /// Where the walk stood.
        position: NodeId,
        /// Where the walk was heading.
        goal: NodeId,
        /// Break kind the alternation required.
        expected: BreakKind,
        /// What the chain held instead, or `None` when it ran out.
        found: Option<BreakKind>,
        /// Chain slot that was inspected.
        cursor: usize,
    },
    /// A move needed an edge the graph does not have.
    #[error("no edge {from}->{to} in the solver-space graph")]
    MissingEdge {
        /// Edge start.
        from: NodeId,
        /// Edge end.
        to: NodeId,
    },
    /// Accumulated driving forces a break the leg cannot offer in time.
    ///
    /// Either the leg was short enough to need no break on a fresh clock, or
    /// driving carried into the leg reaches its next break past a period.
    /// Not a defect: the vehicle's seed is abandoned.
    #[error("leg {from}->{to} offers no break within the driving limits")]
    NoBreakOpportunity {
        /// Leg start.
        from: NodeId,
        /// Leg end.
        to: NodeId,
    },
}

impl RouteError {
    /// Whether the error only abandons one seed rather than signalling a
    /// defect.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoBreakOpportunity { .. })
    }
}
