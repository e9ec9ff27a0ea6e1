//! Greedy seed routes that respect the break chains.
//!
//! Each feasible demand, in order, gets its own vehicle until the fleet runs
//! out. The vehicle leaves the depot, collects at the origin, delivers at the
//! destination and returns, taking breaks from the leg's chain whenever the
//! next stretch would push an accumulator to its period.

mod walk;

pub use walk::{Accumulators, Stage, Step, Visit, WalkState};

use hosroute_core::{
    BreakNodeIndex, DemandRecord, HosRules, InitialRoute, NodeId, PrepConfig, RouteError,
    SolverSpaceGraph,
};
use log::{debug, info, warn};

/// Builds and validates one seed route per vehicle.
#[derive(Debug, Clone, Copy)]
pub struct InitialRouteConstructor<'a> {
    graph: &'a SolverSpaceGraph,
    breaks: &'a BreakNodeIndex,
    rules: HosRules,
    use_breaks: bool,
}

impl<'a> InitialRouteConstructor<'a> {
    /// Constructor walking `graph` with the chains in `breaks`.
    ///
    /// With `use_breaks` off every move is direct.
    #[must_use]
    pub const fn new(
        graph: &'a SolverSpaceGraph,
        breaks: &'a BreakNodeIndex,
        rules: HosRules,
        use_breaks: bool,
    ) -> Self {
        Self {
            graph,
            breaks,
            rules,
            use_breaks,
        }
    }

    /// Constructor using the rules and break switch of `config`.
    #[must_use]
    pub const fn from_config(
        graph: &'a SolverSpaceGraph,
        breaks: &'a BreakNodeIndex,
        config: &PrepConfig,
    ) -> Self {
        Self::new(graph, breaks, config.rules, config.use_breaks)
    }

    /// Every move of the walk depot, `origin`, `destination`, depot.
    ///
    /// The final visit is the depot.
    ///
    /// # Errors
    ///
    /// Propagates the first [`RouteError`] from [`WalkState::step`].
    pub fn walk(&self, origin: NodeId, destination: NodeId) -> Result<Vec<Visit>, RouteError> {
        let mut state = WalkState::new(origin, destination);
        let mut visits = Vec::new();
        loop {
            match state.step(self)? {
                Step::Moved(visit) => visits.push(visit),
                Step::GoalReached(_) => {}
                Step::Finished => return Ok(visits),
            }
        }
    }

    /// Node sequence for serving `origin -> destination`, depot omitted.
    ///
    /// # Errors
    ///
    /// As for [`walk`](Self::walk).
    pub fn route_for(
        &self,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Vec<NodeId>, RouteError> {
        Ok(self
            .walk(origin, destination)?
            .into_iter()
            .map(|visit| visit.node)
            .filter(|node| !node.is_depot())
            .collect())
    }

    /// Seed routes for the feasible demands, one vehicle each.
    ///
    /// A demand whose walk runs out of break opportunities is skipped and
    /// its vehicle slot goes to the next demand.
    ///
    /// # Errors
    ///
    /// Returns any non-recoverable [`RouteError`], including a seed that
    /// fails [`validate_route`].
    pub fn construct(
        &self,
        demands: &[DemandRecord],
        vehicle_count: usize,
    ) -> Result<Vec<InitialRoute>, RouteError> {
        let mut routes = Vec::new();
        for record in demands {
            if routes.len() >= vehicle_count {
                break;
            }
            let Some((origin, destination)) = record.node_pair() else {
                continue;
            };
            let nodes = match self.route_for(origin, destination) {
                Ok(nodes) => nodes,
                Err(err) if err.is_recoverable() => {
                    warn!("no seed route for demand {}: {err}", record.id);
                    continue;
                }
                Err(err) => return Err(err),
            };
            validate_route(self.graph, &nodes)?;
            debug!("vehicle {} seeded with demand {}: {nodes:?}", routes.len(), record.id);
            routes.push(InitialRoute {
                vehicle: routes.len(),
                demand: record.id,
                nodes,
            });
        }
        info!("seeded {} of {vehicle_count} vehicles", routes.len());
        Ok(routes)
    }
}

/// Check that `depot -> route -> depot` only uses edges of `graph`.
///
/// # Errors
///
/// Returns [`RouteError::MissingEdge`] for the first hop with no edge.
///
/// # Examples
///
/// ```
/// use hosroute_core::{NodeId, RouteError, SolverSpaceGraph};
/// use hosroute_prep::validate_route;
///
/// let graph = SolverSpaceGraph::new();
/// assert_eq!(validate_route(&graph, &[]), Ok(()));
/// assert_eq!(
///     validate_route(&graph, &[NodeId(1)]),
///     Err(RouteError::MissingEdge { from: NodeId::DEPOT, to: NodeId(1) })
/// );
/// ```
pub fn validate_route(graph: &SolverSpaceGraph, route: &[NodeId]) -> Result<(), RouteError> {
    if route.is_empty() {
        return Ok(());
    }
    let stops = || {
        std::iter::once(NodeId::DEPOT)
            .chain(route.iter().copied())
            .chain(std::iter::once(NodeId::DEPOT))
    };
    stops()
        .zip(stops().skip(1))
        .find(|&(from, to)| !graph.has_edge(from, to))
        .map_or(Ok(()), |(from, to)| Err(RouteError::MissingEdge { from, to }))
}
