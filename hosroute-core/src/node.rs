//! Node tags and synthetic break nodes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BreakKind, BreakRule, DemandId, Minutes, NodeId};

/// What a solver-space node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// The shared start and end of every route.
    Depot,
    /// Where a demand's load is collected.
    Pickup {
        /// The demand being collected.
        demand: DemandId,
    },
    /// Where a demand's load is delivered.
    Dropoff {
        /// The demand being delivered.
        demand: DemandId,
    },
    /// A short break opportunity.
    ShortBreak,
    /// A long rest opportunity.
    LongBreak,
}

impl NodeKind {
    /// The break kind, if this node is a break.
    #[must_use]
    pub const fn break_kind(self) -> Option<BreakKind> {
        match self {
            Self::ShortBreak => Some(BreakKind::Short),
            Self::LongBreak => Some(BreakKind::Long),
            Self::Depot | Self::Pickup { .. } | Self::Dropoff { .. } => None,
        }
    }

    /// Whether this node is a break of either kind.
    #[must_use]
    pub const fn is_break(self) -> bool {
        self.break_kind().is_some()
    }

    /// The demand served here, for pickups and dropoffs.
    #[must_use]
    pub const fn demand(self) -> Option<DemandId> {
        match self {
            Self::Pickup { demand } | Self::Dropoff { demand } => Some(demand),
            Self::Depot | Self::ShortBreak | Self::LongBreak => None,
        }
    }
}

impl From<BreakKind> for NodeKind {
    fn from(kind: BreakKind) -> Self {
        match kind {
            BreakKind::Short => Self::ShortBreak,
            BreakKind::Long => Self::LongBreak,
        }
    }
}

/// A rest stop inserted part way along a leg.
///
/// The node splits the sub-leg `anchor_from -> anchor_to` into
/// `leg_time_before` and `leg_time_after`, which always sum to the sub-leg's
/// length. `leg` is the full leg the node was generated for and keys its
/// chain in [`crate::BreakNodeIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreakNode {
    /// Solver-space id of this node.
    pub id: NodeId,
    /// Which rule the rest satisfies.
    pub kind: BreakKind,
    /// Start and end of the full leg this node belongs to.
    pub leg: (NodeId, NodeId),
    /// Node driven from to reach this break.
    pub anchor_from: NodeId,
    /// Node driven to after the break.
    pub anchor_to: NodeId,
    /// Minutes from `anchor_from` to this node.
    pub leg_time_before: Minutes,
    /// Minutes from this node to `anchor_to`.
    pub leg_time_after: Minutes,
    /// Minutes spent resting.
    pub rest_duration: Minutes,
    /// Driving limit the rest resets.
    pub accumulator_period: Minutes,
}

impl BreakNode {
    /// Break of `kind`, governed by `rule`, on the sub-leg `anchors` split
    /// into `split.0` then `split.1` minutes.
    #[must_use]
    pub const fn new(
        kind: BreakKind,
        rule: BreakRule,
        id: NodeId,
        leg: (NodeId, NodeId),
        anchors: (NodeId, NodeId),
        split: (Minutes, Minutes),
    ) -> Self {
        Self {
            id,
            kind,
            leg,
            anchor_from: anchors.0,
            anchor_to: anchors.1,
            leg_time_before: split.0,
            leg_time_after: split.1,
            rest_duration: rule.rest,
            accumulator_period: rule.period,
        }
    }

    /// A single break at the midpoint of a whole leg.
    ///
    /// The earlier half is rounded down so the later half absorbs any odd
    /// minute. Non-positive legs give a zero split.
    ///
    /// # Examples
    ///
    /// ```
    /// use hosroute_core::{BreakKind, BreakNode, BreakRule, NodeId};
    ///
    /// let node = BreakNode::spanning(
    ///     BreakKind::Long,
    ///     BreakRule::LONG,
    ///     NodeId(30),
    ///     (NodeId(10), NodeId(20)),
    ///     61,
    /// );
    /// assert_eq!((node.leg_time_before, node.leg_time_after), (30, 31));
    /// assert_eq!(node.restore_delta(), -660);
    /// ```
    #[must_use]
    pub const fn spanning(
        kind: BreakKind,
        rule: BreakRule,
        id: NodeId,
        leg: (NodeId, NodeId),
        leg_minutes: Minutes,
    ) -> Self {
        let split = if leg_minutes > 0 {
            let half = leg_minutes.div_euclid(2);
            (half, leg_minutes - half)
        } else {
            (0, 0)
        };
        Self::new(kind, rule, id, leg, leg, split)
    }

    /// Change applied to the matching accumulator when the rest is taken.
    #[must_use]
    pub const fn restore_delta(&self) -> Minutes {
        -self.accumulator_period
    }

    /// Solver-space tag for this node.
    #[must_use]
    pub const fn node_kind(&self) -> NodeKind {
        match self.kind {
            BreakKind::Short => NodeKind::ShortBreak,
            BreakKind::Long => NodeKind::LongBreak,
        }
    }

    /// Sub-leg length, which the split always preserves.
    #[must_use]
    pub const fn span(&self) -> Minutes {
        self.leg_time_before + self.leg_time_after
    }
}
