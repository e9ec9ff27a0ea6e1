//! The contract with the external routing solver.
//!
//! Everything the pipeline produces is bundled into a [`SolverHandoff`]. A
//! [`RoutingSolver`] turns a handoff into an [`Assignment`]; how it searches
//! is its own business.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
    BreakNodeIndex, DemandId, DemandRecord, DimensionTables, Minutes, NodeId, SolverSpaceGraph,
    TimeWindow,
};

/// A pickup node and its dropoff, served by the same vehicle in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupDelivery {
    /// The demand this pair serves.
    pub demand: DemandId,
    /// Solver-space pickup node.
    pub pickup: NodeId,
    /// Solver-space dropoff node.
    pub dropoff: NodeId,
    /// When loading may start.
    pub pickup_window: TimeWindow,
    /// When unloading may start.
    pub dropoff_window: TimeWindow,
}

/// Where the drive and short-break dimensions must stay below their limits.
///
/// Both dimensions start at `baseline`. At every node in
/// `constrained_nodes`, and at every vehicle end, the drive cumulative must
/// lie in `[baseline, drive_ceiling]` and the short-break cumulative in
/// `[baseline, short_ceiling]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatorBounds {
    /// Starting value of both dimensions.
    pub baseline: Minutes,
    /// Largest admissible drive reading.
    pub drive_ceiling: Minutes,
    /// Largest admissible short-break reading.
    pub short_ceiling: Minutes,
    /// Pickups and dropoffs the bounds apply to.
    pub constrained_nodes: Vec<NodeId>,
}

/// The homogeneous fleet the solver may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetSpec {
    /// Vehicles available.
    pub vehicle_count: usize,
    /// Loads each vehicle carries at once.
    pub capacity: i64,
    /// Cost of using a vehicle.
    pub fixed_cost: i64,
    /// When vehicles may be on the road.
    pub window: TimeWindow,
    /// Where every route starts and ends.
    pub depot: NodeId,
}

/// A seeded route for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialRoute {
    /// Vehicle slot the route is for.
    pub vehicle: usize,
    /// The demand the route serves.
    pub demand: DemandId,
    /// Visited nodes in order, depot omitted at both ends.
    pub nodes: Vec<NodeId>,
}

/// Everything the routing solver needs.
#[derive(Debug, Clone)]
pub struct SolverHandoff {
    /// Solver-space graph with break nodes inserted.
    pub graph: SolverSpaceGraph,
    /// Break nodes and their chains.
    pub breaks: BreakNodeIndex,
    /// Transit tables driving each dimension.
    pub dimensions: DimensionTables,
    /// Screening outcome for every input demand, in input order.
    pub demands: Vec<DemandRecord>,
    /// Pickup and delivery pairs of the feasible demands.
    pub pairs: Vec<PickupDelivery>,
    /// When each break node may be visited.
    pub break_windows: BTreeMap<NodeId, TimeWindow>,
    /// Cost of leaving each optional node unvisited.
    pub drop_penalties: BTreeMap<NodeId, i64>,
    /// Limits on the accumulator dimensions.
    pub accumulator_bounds: AccumulatorBounds,
    /// Fleet description.
    pub fleet: FleetSpec,
    /// Seed routes, validated against `graph`.
    pub initial_routes: Vec<InitialRoute>,
}

impl SolverHandoff {
    /// Hand the problem to `solver`.
    ///
    /// # Errors
    ///
    /// Propagates the solver's [`SolveError`].
    pub fn solve_with(&self, solver: &dyn RoutingSolver) -> Result<Assignment, SolveError> {
        solver.solve(self)
    }

    /// Demands that survived screening.
    pub fn feasible_demands(&self) -> impl Iterator<Item = &DemandRecord> + '_ {
        self.demands.iter().filter(|record| record.is_feasible())
    }
}

/// One vehicle's route in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRoute {
    /// Vehicle slot.
    pub vehicle: usize,
    /// Visited nodes in order, depot omitted.
    pub nodes: Vec<NodeId>,
}

/// A solution returned by a [`RoutingSolver`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Non-empty routes.
    pub routes: Vec<AssignedRoute>,
    /// Solver objective value.
    pub objective: i64,
}

/// Errors reported by a [`RoutingSolver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The search finished without a solution.
    #[error("solver found no solution")]
    NoSolution,
    /// The solver refused the handoff.
    #[error("solver rejected the handoff: {reason}")]
    InvalidHandoff {
        /// What the solver objected to.
        reason: String,
    },
    /// The solver backend failed.
    #[error("solver backend failed: {message}")]
    Backend {
        /// Backend message.
        message: String,
    },
}

/// A routing engine that can consume a [`SolverHandoff`].
///
/// Implementations must be thread-safe so a handoff can be solved from a
/// worker thread.
pub trait RoutingSolver: Send + Sync {
    /// Search for an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::NoSolution`] when no assignment exists and other
    /// variants when the handoff or backend is at fault.
    fn solve(&self, handoff: &SolverHandoff) -> Result<Assignment, SolveError>;
}
