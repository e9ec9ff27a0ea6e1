//! Per-arc transit tables for the solver's cumulative dimensions.
//!
//! Each table is a pure function of the arc's start node and the graph
//! weight. Break nodes carry negative adjustments that reset the drive and
//! short-break accumulators; every other node adjusts by zero.

use hosroute_core::{
    BreakNodeIndex, DemandId, DemandRecord, DimensionTables, HosRules, Minutes, NodeId, NodeKind,
    SolverSpaceGraph, TransitTable,
};
use log::debug;

/// Builds the time, drive, short-break and load tables over a graph.
///
/// # Examples
///
/// ```
/// use hosroute_core::{BreakNodeIndex, HosRules, NodeId, SolverSpaceGraph};
/// use hosroute_prep::DimensionCallbackBuilder;
///
/// let graph = SolverSpaceGraph::new();
/// let breaks = BreakNodeIndex::new();
/// let builder = DimensionCallbackBuilder::new(&graph, &breaks, &[], HosRules::default());
/// assert_eq!(builder.service_time(NodeId::DEPOT), 0);
/// assert_eq!(builder.time(NodeId::DEPOT, NodeId(4)), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DimensionCallbackBuilder<'a> {
    graph: &'a SolverSpaceGraph,
    breaks: &'a BreakNodeIndex,
    demands: &'a [DemandRecord],
    rules: HosRules,
}

impl<'a> DimensionCallbackBuilder<'a> {
    /// Builder over `graph`.
    ///
    /// `demands` must be ordered by id, as the graph builder returns them.
    #[must_use]
    pub const fn new(
        graph: &'a SolverSpaceGraph,
        breaks: &'a BreakNodeIndex,
        demands: &'a [DemandRecord],
        rules: HosRules,
    ) -> Self {
        Self {
            graph,
            breaks,
            demands,
            rules,
        }
    }

    /// Minutes spent at `node` before leaving it.
    ///
    /// Dwell for pickups and dropoffs, the rest for breaks, zero for the
    /// depot and for unknown nodes.
    #[must_use]
    pub fn service_time(&self, node: NodeId) -> Minutes {
        match self.graph.kind(node) {
            Some(NodeKind::Pickup { demand }) => {
                self.demand(demand).map_or(0, |r| r.request.pickup_dwell)
            }
            Some(NodeKind::Dropoff { demand }) => {
                self.demand(demand).map_or(0, |r| r.request.dropoff_dwell)
            }
            Some(NodeKind::ShortBreak | NodeKind::LongBreak) => {
                self.breaks.get(node).map_or(0, |brk| brk.rest_duration)
            }
            Some(NodeKind::Depot) | None => 0,
        }
    }

    /// Drive-accumulator adjustment for leaving a node of `kind`.
    #[must_use]
    pub const fn drive_adjustment(&self, kind: NodeKind) -> Minutes {
        match kind {
            NodeKind::LongBreak => self.rules.long.restore_delta(),
            NodeKind::Depot
            | NodeKind::Pickup { .. }
            | NodeKind::Dropoff { .. }
            | NodeKind::ShortBreak => 0,
        }
    }

    /// Short-accumulator adjustment for leaving a node of `kind`.
    ///
    /// A long break is capped at the part of the long period the preceding
    /// short break has not already credited.
    #[must_use]
    pub const fn short_break_adjustment(&self, kind: NodeKind) -> Minutes {
        match kind {
            NodeKind::ShortBreak => self.rules.short.restore_delta(),
            NodeKind::LongBreak => self.rules.long_break_short_credit(),
            NodeKind::Depot | NodeKind::Pickup { .. } | NodeKind::Dropoff { .. } => 0,
        }
    }

    /// Load change for leaving a node of `kind`.
    #[must_use]
    pub const fn load_delta(kind: NodeKind) -> Minutes {
        match kind {
            NodeKind::Pickup { .. } => 1,
            NodeKind::Dropoff { .. } => -1,
            NodeKind::Depot | NodeKind::ShortBreak | NodeKind::LongBreak => 0,
        }
    }

    /// Elapsed-time transit of `from -> to`: travel plus service at `from`.
    #[must_use]
    pub fn time(&self, from: NodeId, to: NodeId) -> Option<Minutes> {
        let weight = self.graph.weight(from, to)?;
        Some(weight + self.service_time(from))
    }

    /// Drive transit of `from -> to`.
    #[must_use]
    pub fn drive(&self, from: NodeId, to: NodeId) -> Option<Minutes> {
        let weight = self.graph.weight(from, to)?;
        let kind = self.graph.kind(from)?;
        Some(weight + self.drive_adjustment(kind))
    }

    /// Short-break transit of `from -> to`.
    #[must_use]
    pub fn short_break(&self, from: NodeId, to: NodeId) -> Option<Minutes> {
        let weight = self.graph.weight(from, to)?;
        let kind = self.graph.kind(from)?;
        Some(weight + self.short_break_adjustment(kind))
    }

    /// Load transit of `from -> to`.
    #[must_use]
    pub fn load(&self, from: NodeId, to: NodeId) -> Option<Minutes> {
        self.graph.weight(from, to)?;
        self.graph.kind(from).map(Self::load_delta)
    }

    /// Evaluate every callback over every edge of the graph.
    #[must_use]
    pub fn build(&self) -> DimensionTables {
        let table = |callback: fn(&Self, NodeId, NodeId) -> Option<Minutes>| {
            TransitTable::from_arcs(
                self.graph
                    .edges()
                    .filter_map(|(from, to, _)| Some(((from, to), callback(self, from, to)?))),
            )
        };
        let tables = DimensionTables {
            time: table(Self::time),
            drive: table(Self::drive),
            short_break: table(Self::short_break),
            load: table(Self::load),
        };
        debug!("dimension tables built over {} arcs", tables.time.len());
        tables
    }

    fn demand(&self, id: DemandId) -> Option<&DemandRecord> {
        let slot = self
            .demands
            .binary_search_by_key(&id, |record| record.id)
            .ok()?;
        self.demands.get(slot)
    }
}
