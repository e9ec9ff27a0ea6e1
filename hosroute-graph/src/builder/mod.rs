//! Translate demands and map-space travel times into the solver-space graph.
//!
//! Every feasible demand becomes a pickup node and a dropoff node with fresh
//! ids, joined to the depot and to each other. Dropoffs are also joined to
//! the pickups of other demands a vehicle could plausibly chain onto.

use hosroute_core::{
    DemandId, DemandRecord, DemandRequest, Feasibility, GraphError, NodeId, NodeIdAllocator,
    NodeKind, PrepConfig, SolverSpaceGraph, TravelTimeSource,
};
use log::{debug, info, warn};

use crate::feasibility::{estimate_timing, judge, trip_legs};

/// Solver-space graph together with the screening outcome of every demand.
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    /// Depot, pickups, dropoffs and the legs between them.
    pub graph: SolverSpaceGraph,
    /// One record per input demand, in input order.
    pub demands: Vec<DemandRecord>,
}

impl BuiltGraph {
    /// Records of the demands that passed screening.
    pub fn feasible(&self) -> impl Iterator<Item = &DemandRecord> + '_ {
        self.demands.iter().filter(|record| record.is_feasible())
    }
}

/// Builds the solver-space graph from a travel-time source.
///
/// # Examples
///
/// ```
/// use hosroute_core::test_support::{LineTravelTimes, demand};
/// use hosroute_core::{NodeId, NodeIdAllocator, PrepConfig};
/// use hosroute_graph::SolverSpaceGraphBuilder;
///
/// # fn main() -> Result<(), hosroute_core::GraphError> {
/// let config = PrepConfig::default();
/// let builder = SolverSpaceGraphBuilder::new(LineTravelTimes::new(60), &config);
/// let mut ids = NodeIdAllocator::new();
/// let built = builder.build(&[demand(2, 4, 0, 600)], &mut ids)?;
/// assert_eq!(built.graph.weight(NodeId::DEPOT, NodeId(1)), Some(120));
/// assert_eq!(built.graph.weight(NodeId(1), NodeId(2)), Some(120));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SolverSpaceGraphBuilder<'a, T> {
    travel: T,
    config: &'a PrepConfig,
}

impl<'a, T> SolverSpaceGraphBuilder<'a, T>
where
    T: TravelTimeSource,
{
    /// Builder reading travel times from `travel`.
    pub const fn new(travel: T, config: &'a PrepConfig) -> Self {
        Self { travel, config }
    }

    /// Screen one demand without allocating any ids.
    #[must_use]
    pub fn screen(&self, id: DemandId, request: DemandRequest) -> DemandRecord {
        let mut record = DemandRecord {
            id,
            request,
            legs: None,
            timing: None,
            feasibility: Feasibility::Feasible,
            origin_id: None,
            destination_id: None,
        };
        match trip_legs(&self.travel, self.config.depot, &request) {
            Ok(legs) => {
                let timing = estimate_timing(self.config, &request, legs);
                record.feasibility = judge(self.config, &request, &timing);
                record.legs = Some(legs);
                record.timing = Some(timing);
            }
            Err(reason) => record.feasibility = Feasibility::Infeasible(reason),
        }
        record
    }

    /// Screen every demand and build the graph over the feasible ones.
    ///
    /// Origins take ids first, in demand order, followed by destinations in
    /// the same order, so with `n` feasible demands and a fresh allocator the
    /// pickups are `1..=n` and the dropoffs `n+1..=2n`.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if the allocator hands out an id the graph
    /// already holds with another role.
    pub fn build(
        &self,
        demands: &[DemandRequest],
        ids: &mut NodeIdAllocator,
    ) -> Result<BuiltGraph, GraphError> {
        let mut records: Vec<_> = (0_u32..)
            .map(DemandId)
            .zip(demands)
            .map(|(id, request)| self.screen(id, *request))
            .collect();

        for record in &records {
            if let Some(reason) = record.reason() {
                warn!("demand {} dropped: {reason}", record.id);
            }
        }

        for record in records.iter_mut().filter(|r| r.is_feasible()) {
            record.origin_id = Some(ids.next_id());
        }
        for record in records.iter_mut().filter(|r| r.is_feasible()) {
            record.destination_id = Some(ids.next_id());
        }

        let mut graph = SolverSpaceGraph::new();
        for record in &records {
            self.add_demand(&mut graph, record)?;
        }
        let cross_legs = self.add_cross_legs(&mut graph, &records)?;

        let feasible = records.iter().filter(|r| r.is_feasible()).count();
        info!(
            "solver-space graph: {feasible} of {} demands feasible, {} nodes, {} edges, {cross_legs} cross legs",
            records.len(),
            graph.node_count(),
            graph.edge_count(),
        );
        Ok(BuiltGraph {
            graph,
            demands: records,
        })
    }

    fn add_demand(
        &self,
        graph: &mut SolverSpaceGraph,
        record: &DemandRecord,
    ) -> Result<(), GraphError> {
        let (Some((origin, destination)), Some(legs)) = (record.node_pair(), record.legs) else {
            return Ok(());
        };
        graph.add_node(origin, NodeKind::Pickup { demand: record.id })?;
        graph.add_node(destination, NodeKind::Dropoff { demand: record.id })?;
        graph.add_edge(origin, origin, 0)?;
        graph.add_edge(destination, destination, 0)?;
        graph.add_edge(NodeId::DEPOT, origin, legs.depot_to_origin)?;
        graph.add_edge(origin, destination, legs.origin_to_destination)?;
        graph.add_edge(destination, NodeId::DEPOT, legs.destination_to_depot)?;
        debug!(
            "demand {} -> pickup {origin}, dropoff {destination} ({} min loaded)",
            record.id, legs.origin_to_destination
        );
        Ok(())
    }

    /// Join each dropoff to the pickups of other demands it could reach in
    /// time. Returns the number of legs added.
    fn add_cross_legs(
        &self,
        graph: &mut SolverSpaceGraph,
        records: &[DemandRecord],
    ) -> Result<usize, GraphError> {
        let mut added = 0;
        for first in records {
            let (Some((_, dropoff)), Some(timing)) = (first.node_pair(), first.timing) else {
                continue;
            };
            for next in records.iter().filter(|r| r.id != first.id) {
                let Some((pickup, _)) = next.node_pair() else {
                    continue;
                };
                let Some(minutes) = self.travel.travel_time(first.request.to, next.request.from)
                else {
                    continue;
                };
                let arrival = timing.earliest_destination + minutes;
                if arrival <= self.config.horizon && arrival <= next.request.late {
                    graph.add_edge(dropoff, pickup, minutes)?;
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests;
