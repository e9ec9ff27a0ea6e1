//! Insert Hours-of-Service break nodes into every leg of the graph.
//!
//! A leg is planned first as a list of breaks whose anchors are positions in
//! the chain rather than ids. Ids are then issued in chain order and a
//! finalization pass resolves every anchor, so no node is touched after it
//! has been built.
//!
//! For a leg of `T` minutes the chain holds, for each of
//! `max(1, ceil(T / long.period))` cycles, a short break followed by a long
//! break, and optionally one trailing short break:
//!
//! ```text
//! from --S0--> L0 --S1--> L1 ... Ln --[T]--> to
//! ```
//!
//! Each long break `Li` splits what is left of the leg at the long period;
//! each short break `Si` splits the stretch up to `Li` at the short period.

use hosroute_core::{
    BreakKind, BreakNode, BreakNodeIndex, GraphError, HosRules, Minutes, NodeId, NodeIdAllocator,
    PrepConfig, SolverSpaceGraph,
};
use log::{debug, info};

/// A position a planned break is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    LegStart,
    LegEnd,
    Slot(usize),
}

/// A break before ids are known.
///
/// `to == None` marks an anchor that resolves to the next long break in the
/// chain.
#[derive(Debug, Clone, Copy)]
struct PlannedBreak {
    kind: BreakKind,
    split: (Minutes, Minutes),
    from: Anchor,
    to: Option<Anchor>,
}

/// Splits legs into break chains and records them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakGraphAugmenter {
    rules: HosRules,
    max_breaks_per_leg: usize,
}

impl BreakGraphAugmenter {
    /// Augmenter for `rules`, refusing legs that need more than
    /// `max_breaks_per_leg` nodes.
    #[must_use]
    pub const fn new(rules: HosRules, max_breaks_per_leg: usize) -> Self {
        Self {
            rules,
            max_breaks_per_leg,
        }
    }

    /// Augmenter configured from `config`.
    #[must_use]
    pub const fn from_config(config: &PrepConfig) -> Self {
        Self::new(config.rules, config.max_breaks_per_leg)
    }

    /// Number of break nodes a leg of `leg_minutes` receives.
    #[must_use]
    pub fn breaks_needed(&self, leg_minutes: Minutes) -> usize {
        if leg_minutes <= self.rules.short.period {
            return 0;
        }
        let cycles = self.cycles(leg_minutes);
        let trailing = usize::from(self.needs_trailing_short(leg_minutes, cycles));
        usize::try_from(cycles)
            .unwrap_or(usize::MAX)
            .saturating_mul(2)
            .saturating_add(trailing)
    }

    /// Build the break chain for the leg `anchor_from -> anchor_to`.
    ///
    /// Returns the nodes in driving order, ids issued from `ids` in the same
    /// order. A leg no longer than the short period gets no breaks and uses
    /// no ids.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::GraphSizeExceeded`] before issuing any id when
    /// the chain would exceed the per-leg limit, and
    /// [`GraphError::UnresolvedAnchor`] if a pending anchor cannot be
    /// resolved.
    ///
    /// # Examples
    ///
    /// ```
    /// use hosroute_core::{BreakKind, HosRules, NodeId, NodeIdAllocator};
    /// use hosroute_graph::BreakGraphAugmenter;
    ///
    /// # fn main() -> Result<(), hosroute_core::GraphError> {
    /// let augmenter = BreakGraphAugmenter::new(HosRules::default(), 100);
    /// let mut ids = NodeIdAllocator::starting_at(NodeId(30));
    /// let chain = augmenter.split_leg_with_breaks(NodeId(1), NodeId(2), 900, &mut ids)?;
    /// let kinds: Vec<_> = chain.iter().map(|node| node.kind).collect();
    /// assert_eq!(kinds, [BreakKind::Short, BreakKind::Long, BreakKind::Short, BreakKind::Long]);
    /// assert_eq!(chain[1].leg_time_before, 660);
    /// # Ok(())
    /// # }
    /// ```
    pub fn split_leg_with_breaks(
        &self,
        anchor_from: NodeId,
        anchor_to: NodeId,
        leg_minutes: Minutes,
        ids: &mut NodeIdAllocator,
    ) -> Result<Vec<BreakNode>, GraphError> {
        let required = self.breaks_needed(leg_minutes);
        if required > self.max_breaks_per_leg {
            return Err(GraphError::GraphSizeExceeded {
                from: anchor_from,
                to: anchor_to,
                leg_minutes,
                required,
                limit: self.max_breaks_per_leg,
            });
        }
        let plan = self.plan(leg_minutes);
        let issued: Vec<NodeId> = plan.iter().map(|_| ids.next_id()).collect();
        self.finalize((anchor_from, anchor_to), &plan, &issued)
    }

    /// Split every leg of `graph` and wire the breaks in.
    ///
    /// Legs are taken from a snapshot in `(from, to)` order, so breaks never
    /// split legs created by other breaks. Self-loops are skipped.
    ///
    /// # Errors
    ///
    /// Propagates any [`GraphError`] from splitting or from the graph.
    pub fn augment(
        &self,
        graph: &mut SolverSpaceGraph,
        ids: &mut NodeIdAllocator,
    ) -> Result<BreakNodeIndex, GraphError> {
        let legs: Vec<_> = graph.edges().filter(|(from, to, _)| from != to).collect();
        let mut index = BreakNodeIndex::new();
        for (from, to, minutes) in legs {
            let chain = self.split_leg_with_breaks(from, to, minutes, ids)?;
            if chain.is_empty() {
                continue;
            }
            debug!("leg {from}->{to} ({minutes} min): {} break nodes", chain.len());
            attach(graph, &chain)?;
            index.insert_chain((from, to), chain)?;
        }
        info!(
            "augmented {} legs with {} break nodes",
            index.legs().count(),
            index.len()
        );
        Ok(index)
    }

    const fn cycles(&self, leg_minutes: Minutes) -> Minutes {
        let stints = self.rules.long.stints(leg_minutes);
        if stints < 1 { 1 } else { stints }
    }

    /// Whether driving left after the last long break needs a short one.
    ///
    /// `cycles` rounds up, so the last long break always absorbs the rest of
    /// the leg and this never fires for positive periods.
    const fn needs_trailing_short(&self, leg_minutes: Minutes, cycles: Minutes) -> bool {
        let after_last_long = leg_minutes - cycles * self.rules.long.period;
        after_last_long > self.rules.short.period
    }

    fn plan(&self, leg_minutes: Minutes) -> Vec<PlannedBreak> {
        if leg_minutes <= self.rules.short.period {
            return Vec::new();
        }
        let HosRules { long, short } = self.rules;
        let mut plan = Vec::new();
        let mut cursor = Anchor::LegStart;
        let mut remaining = leg_minutes;
        for _ in 0..self.cycles(leg_minutes) {
            let long_split = long.split(remaining);
            plan.push(PlannedBreak {
                kind: BreakKind::Short,
                split: short.split(long_split.0),
                from: cursor,
                to: None,
            });
            let long_slot = plan.len();
            plan.push(PlannedBreak {
                kind: BreakKind::Long,
                split: long_split,
                from: cursor,
                to: Some(Anchor::LegEnd),
            });
            cursor = Anchor::Slot(long_slot);
            remaining = long_split.1;
        }
        // Unreachable with rounded-up cycles; see `needs_trailing_short`.
        if remaining > short.period {
            plan.push(PlannedBreak {
                kind: BreakKind::Short,
                split: short.split(remaining),
                from: cursor,
                to: Some(Anchor::LegEnd),
            });
        }
        plan
    }

    fn finalize(
        &self,
        leg: (NodeId, NodeId),
        plan: &[PlannedBreak],
        issued: &[NodeId],
    ) -> Result<Vec<BreakNode>, GraphError> {
        let unresolved = |node: NodeId| GraphError::UnresolvedAnchor {
            node,
            from: leg.0,
            to: leg.1,
        };
        let resolve = |anchor: Anchor, node: NodeId| match anchor {
            Anchor::LegStart => Ok(leg.0),
            Anchor::LegEnd => Ok(leg.1),
            Anchor::Slot(slot) => issued.get(slot).copied().ok_or_else(|| unresolved(node)),
        };
        plan.iter()
            .zip(issued)
            .enumerate()
            .map(|(slot, (planned, &id))| {
                let to = match planned.to {
                    Some(anchor) => anchor,
                    None => next_long(plan, slot).ok_or_else(|| unresolved(id))?,
                };
                let anchors = (resolve(planned.from, id)?, resolve(to, id)?);
                let rule = self.rules.rule(planned.kind);
                Ok(BreakNode::new(
                    planned.kind,
                    rule,
                    id,
                    leg,
                    anchors,
                    planned.split,
                ))
            })
            .collect()
    }
}

/// Slot of the first long break after `slot`.
fn next_long(plan: &[PlannedBreak], slot: usize) -> Option<Anchor> {
    plan.iter()
        .enumerate()
        .skip(slot.saturating_add(1))
        .find(|(_, planned)| planned.kind == BreakKind::Long)
        .map(|(found, _)| Anchor::Slot(found))
}

/// Register `chain` in `graph` with its approach, dwell and departure edges.
fn attach(graph: &mut SolverSpaceGraph, chain: &[BreakNode]) -> Result<(), GraphError> {
    for node in chain {
        graph.add_node(node.id, node.node_kind())?;
    }
    for node in chain {
        graph.add_edge(node.anchor_from, node.id, node.leg_time_before)?;
        graph.add_edge(node.id, node.id, 0)?;
        graph.add_edge(node.id, node.anchor_to, node.leg_time_after)?;
    }
    Ok(())
}
