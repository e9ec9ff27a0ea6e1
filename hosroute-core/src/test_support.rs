//! Deterministic fixtures shared by unit, property and regression tests.

use crate::{
    AssignedRoute, Assignment, DemandRequest, MapNodeId, Minutes, RoutingSolver, SolveError,
    SolverHandoff, TravelTimeSource,
};

/// Travel times between points on a straight road.
///
/// Map node `n` sits at position `n`; driving between two nodes takes
/// `minutes_per_step` for every position crossed. Nodes listed in
/// `unreachable` can be neither left nor reached.
#[derive(Debug, Clone, Default)]
pub struct LineTravelTimes {
    /// Driving minutes between adjacent positions.
    pub minutes_per_step: Minutes,
    /// Nodes cut off from the network.
    pub unreachable: Vec<MapNodeId>,
}

impl LineTravelTimes {
    /// Road with `minutes_per_step` between neighbours.
    #[must_use]
    pub const fn new(minutes_per_step: Minutes) -> Self {
        Self {
            minutes_per_step,
            unreachable: Vec::new(),
        }
    }

    /// Cut `node` off from the network.
    #[must_use]
    pub fn without(mut self, node: MapNodeId) -> Self {
        self.unreachable.push(node);
        self
    }
}

impl TravelTimeSource for LineTravelTimes {
    fn travel_time(&self, from: MapNodeId, to: MapNodeId) -> Option<Minutes> {
        if from != to && (self.unreachable.contains(&from) || self.unreachable.contains(&to)) {
            return None;
        }
        Some(Minutes::from(from.0.abs_diff(to.0)) * self.minutes_per_step)
    }
}

/// Shorthand for a request with default dwell times.
#[must_use]
pub const fn demand(from: u32, to: u32, early: Minutes, late: Minutes) -> DemandRequest {
    DemandRequest::new(MapNodeId(from), MapNodeId(to), early, late)
}

/// Three demands that exercise short, multi-break and unreachable legs on a
/// [`LineTravelTimes`] road with one hour per step.
#[must_use]
pub fn sample_demands() -> Vec<DemandRequest> {
    vec![
        demand(2, 4, 0, 600),
        demand(3, 20, 60, 2000),
        demand(5, 9, 0, 100),
    ]
}

/// Two demands on a [`LineTravelTimes`] road with one hour per step.
///
/// The first carries four hours of driving into a return leg too short for
/// a break chain. The second collects at the depot's own location, so its
/// ten-hour legs start on fresh clocks and alternate short and long breaks.
#[must_use]
pub fn yard_demands() -> Vec<DemandRequest> {
    vec![demand(2, 4, 0, 600), demand(0, 10, 0, 600)]
}

/// Solver that answers with the handoff's seed routes.
///
/// Useful for checking that a handoff is self-consistent without a real
/// search engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaySolver;

impl RoutingSolver for ReplaySolver {
    fn solve(&self, handoff: &SolverHandoff) -> Result<Assignment, SolveError> {
        if handoff.initial_routes.is_empty() {
            return Err(SolveError::NoSolution);
        }
        let routes: Vec<_> = handoff
            .initial_routes
            .iter()
            .map(|route| AssignedRoute {
                vehicle: route.vehicle,
                nodes: route.nodes.clone(),
            })
            .collect();
        let vehicles = i64::try_from(routes.len()).unwrap_or(i64::MAX);
        Ok(Assignment {
            routes,
            objective: vehicles.saturating_mul(handoff.fleet.fixed_cost),
        })
    }
}
