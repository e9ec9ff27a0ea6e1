//! One vehicle's greedy walk through the augmented graph.

use hosroute_core::{BreakKind, BreakNode, HosRules, Minutes, NodeId, NodeKind, RouteError};
use log::debug;

use super::InitialRouteConstructor;

/// Driving minutes counted against each Hours-of-Service period.
///
/// Readings may go negative after a long break credits the short
/// accumulator; only the upper side is bounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accumulators {
    /// Minutes counted against the short period.
    pub short: Minutes,
    /// Minutes counted against the long period.
    pub long: Minutes,
}

impl Accumulators {
    /// Fresh clocks.
    pub const ZERO: Self = Self { short: 0, long: 0 };

    /// Whether driving `minutes` more keeps both readings strictly under
    /// their periods.
    #[must_use]
    pub const fn admits(self, rules: &HosRules, minutes: Minutes) -> bool {
        self.short + minutes < rules.short.period && self.long + minutes < rules.long.period
    }

    /// Readings after driving `minutes`.
    #[must_use]
    pub const fn driven(self, minutes: Minutes) -> Self {
        Self {
            short: self.short + minutes,
            long: self.long + minutes,
        }
    }

    /// Readings after resting at a break of `kind`.
    #[must_use]
    pub const fn rested(self, kind: BreakKind, rules: &HosRules) -> Self {
        match kind {
            BreakKind::Short => Self {
                short: self.short + rules.short.restore_delta(),
                long: self.long,
            },
            BreakKind::Long => Self {
                short: self.short + rules.long_break_short_credit(),
                long: self.long + rules.long.restore_delta(),
            },
        }
    }

    /// Whether both readings are strictly under their periods.
    #[must_use]
    pub const fn within(self, rules: &HosRules) -> bool {
        self.admits(rules, 0)
    }

    /// Whether neither reading exceeds its period.
    ///
    /// A break may be reached with a clock exactly at its period.
    #[must_use]
    pub const fn fits(self, rules: &HosRules) -> bool {
        self.short <= rules.short.period && self.long <= rules.long.period
    }
}

/// Which goal of the origin, destination, depot cycle the walk is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Driving from the depot to the pickup.
    ToOrigin,
    /// Driving loaded to the dropoff.
    ToDestination,
    /// Returning to the depot.
    ToDepot,
    /// Back at the depot.
    Done,
}

impl Stage {
    const fn next(self) -> Self {
        match self {
            Self::ToOrigin => Self::ToDestination,
            Self::ToDestination => Self::ToDepot,
            Self::ToDepot | Self::Done => Self::Done,
        }
    }
}

/// A node the walk moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// The node reached.
    pub node: NodeId,
    /// Its tag.
    pub kind: NodeKind,
    /// Readings on arrival, before any rest is taken.
    pub accumulators: Accumulators,
}

/// Outcome of a single [`WalkState::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The goal was reached; the walk now heads for the next one.
    GoalReached(Stage),
    /// The vehicle moved to a new node.
    Moved(Visit),
    /// The vehicle is back at the depot.
    Finished,
}

/// Position and clocks of a walk in progress.
///
/// Each [`step`](Self::step) reaches a goal, drives straight to it, or
/// takes the next break of the current leg's chain. Chains are finite and
/// only ever advance, so repeated stepping always reaches
/// [`Step::Finished`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkState {
    position: NodeId,
    goal: NodeId,
    stage: Stage,
    origin: NodeId,
    destination: NodeId,
    accumulators: Accumulators,
    chain_cursor: usize,
    last_break: Option<BreakKind>,
}

impl WalkState {
    /// A walk leaving the depot for `origin`, then `destination`.
    #[must_use]
    pub const fn new(origin: NodeId, destination: NodeId) -> Self {
        Self {
            position: NodeId::DEPOT,
            goal: origin,
            stage: Stage::ToOrigin,
            origin,
            destination,
            accumulators: Accumulators::ZERO,
            chain_cursor: 0,
            last_break: None,
        }
    }

    /// Where the vehicle stands.
    #[must_use]
    pub const fn position(&self) -> NodeId {
        self.position
    }

    /// Current stage of the goal cycle.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Current readings.
    #[must_use]
    pub const fn accumulators(&self) -> Accumulators {
        self.accumulators
    }

    /// Advance the walk by one decision.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoBreakOpportunity`] when carried driving forces
    /// a break on a leg without a chain, or when the next break of the chain
    /// would be reached past a period. Returns [`RouteError::ChainConsistency`]
    /// when the chain does not offer the required kind within one skip, and
    /// [`RouteError::MissingEdge`] when a move has no edge.
    pub fn step(&mut self, walker: &InitialRouteConstructor<'_>) -> Result<Step, RouteError> {
        if self.stage == Stage::Done {
            return Ok(Step::Finished);
        }
        if self.position == self.goal {
            return Ok(self.advance());
        }
        let direct = walker.graph.weight(self.position, self.goal);
        if !walker.use_breaks {
            let minutes = direct.ok_or(RouteError::MissingEdge {
                from: self.position,
                to: self.goal,
            })?;
            return Ok(self.drive_to(walker, self.goal, minutes));
        }
        match direct {
            Some(minutes) if self.accumulators.admits(&walker.rules, minutes) => {
                Ok(self.drive_to(walker, self.goal, minutes))
            }
            _ => self.take_break(walker),
        }
    }

    fn advance(&mut self) -> Step {
        self.chain_cursor = 0;
        self.stage = self.stage.next();
        match self.stage {
            Stage::ToDestination => self.goal = self.destination,
            Stage::ToDepot => self.goal = NodeId::DEPOT,
            Stage::ToOrigin | Stage::Done => return Step::Finished,
        }
        Step::GoalReached(self.stage)
    }

    fn drive_to(
        &mut self,
        walker: &InitialRouteConstructor<'_>,
        node: NodeId,
        minutes: Minutes,
    ) -> Step {
        self.accumulators = self.accumulators.driven(minutes);
        self.position = node;
        Step::Moved(Visit {
            node,
            kind: walker.graph.kind(node).unwrap_or(NodeKind::Depot),
            accumulators: self.accumulators,
        })
    }

    fn take_break(&mut self, walker: &InitialRouteConstructor<'_>) -> Result<Step, RouteError> {
        let anchor = walker.breaks.anchor_of(self.position);
        let chain = walker.breaks.chain(anchor, self.goal);
        if chain.is_empty() {
            let (from, to) = (self.position, self.goal);
            return Err(if walker.graph.has_edge(from, to) {
                RouteError::NoBreakOpportunity { from, to }
            } else {
                RouteError::MissingEdge { from, to }
            });
        }
        let expected = self.required_kind(walker);
        let (slot, node) = self.pick(walker, chain, expected)?;
        let minutes = walker
            .graph
            .weight(self.position, node.id)
            .ok_or(RouteError::MissingEdge {
                from: self.position,
                to: node.id,
            })?;
        // Chain offsets start from a fresh clock; driving carried into the
        // leg can push the arrival past a period.
        if !self.accumulators.driven(minutes).fits(&walker.rules) {
            return Err(RouteError::NoBreakOpportunity {
                from: anchor,
                to: self.goal,
            });
        }
        debug!(
            "{:?} break {} after {minutes} min from {}",
            node.kind, node.id, self.position
        );
        let arrived = self.drive_to(walker, node.id, minutes);
        self.accumulators = self.accumulators.rested(node.kind, &walker.rules);
        self.chain_cursor = slot.saturating_add(1);
        self.last_break = Some(node.kind);
        Ok(arrived)
    }

    /// Kind the alternation asks for next.
    ///
    /// Standing on a break, the other kind; elsewhere, the other kind of the
    /// last break taken, or short when none has been.
    fn required_kind(&self, walker: &InitialRouteConstructor<'_>) -> BreakKind {
        walker
            .graph
            .kind(self.position)
            .and_then(NodeKind::break_kind)
            .or(self.last_break)
            .map_or(BreakKind::Short, BreakKind::alternate)
    }

    /// The chain node at the cursor, or the one after it when the cursor's
    /// node is of the wrong kind.
    fn pick<'w>(
        &self,
        walker: &'w InitialRouteConstructor<'_>,
        chain: &[NodeId],
        expected: BreakKind,
    ) -> Result<(usize, &'w BreakNode), RouteError> {
        let mut slot = self.chain_cursor;
        let mut skipped = false;
        loop {
            let found = chain.get(slot).and_then(|&id| walker.breaks.get(id));
            match found {
                Some(node) if node.kind == expected => return Ok((slot, node)),
                Some(_) if !skipped => {
                    skipped = true;
                    slot = slot.saturating_add(1);
                }
                _ => {
                    return Err(RouteError::ChainConsistency {
                        position: self.position,
                        goal: self.goal,
                        expected,
                        found: found.map(|node| node.kind),
                        cursor: slot,
                    });
                }
            }
        }
    }
}
