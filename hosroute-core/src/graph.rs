//! The sparse, append-only solver-space graph.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GraphError, Minutes, NodeId, NodeKind};

/// Directed weighted graph over solver-space ids.
///
/// Nodes and edges are only ever added. Re-adding an identical node or edge
/// is a no-op and re-adding a conflicting one is an error, so any fact read
/// from the graph stays true for the rest of its life. The depot is present
/// from construction.
///
/// # Examples
///
/// ```
/// use hosroute_core::{DemandId, NodeId, NodeKind, SolverSpaceGraph};
///
/// # fn main() -> Result<(), hosroute_core::GraphError> {
/// let mut graph = SolverSpaceGraph::new();
/// graph.add_node(NodeId(1), NodeKind::Pickup { demand: DemandId(0) })?;
/// graph.add_edge(NodeId::DEPOT, NodeId(1), 90)?;
/// assert_eq!(graph.weight(NodeId::DEPOT, NodeId(1)), Some(90));
/// assert_eq!(graph.weight(NodeId(1), NodeId::DEPOT), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverSpaceGraph {
    kinds: BTreeMap<NodeId, NodeKind>,
    edges: BTreeMap<NodeId, BTreeMap<NodeId, Minutes>>,
}

impl SolverSpaceGraph {
    /// Graph holding only the depot.
    #[must_use]
    pub fn new() -> Self {
        let mut kinds = BTreeMap::new();
        kinds.insert(NodeId::DEPOT, NodeKind::Depot);
        Self {
            kinds,
            edges: BTreeMap::new(),
        }
    }

    /// Register `node` with its tag.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeConflict`] if `node` is already registered
    /// with a different tag.
    pub fn add_node(&mut self, node: NodeId, kind: NodeKind) -> Result<(), GraphError> {
        match self.kinds.entry(node) {
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == kind => Ok(()),
            Entry::Occupied(slot) => Err(GraphError::NodeConflict {
                node,
                existing: *slot.get(),
                proposed: kind,
            }),
        }
    }

    /// Add the edge `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if either end is unregistered,
    /// [`GraphError::NegativeWeight`] for a negative weight and
    /// [`GraphError::EdgeConflict`] if the edge exists with another weight.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        minutes: Minutes,
    ) -> Result<(), GraphError> {
        for node in [from, to] {
            if !self.kinds.contains_key(&node) {
                return Err(GraphError::UnknownNode { node });
            }
        }
        if minutes < 0 {
            return Err(GraphError::NegativeWeight { from, to, minutes });
        }
        match self.edges.entry(from).or_default().entry(to) {
            Entry::Vacant(slot) => {
                slot.insert(minutes);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == minutes => Ok(()),
            Entry::Occupied(slot) => Err(GraphError::EdgeConflict {
                from,
                to,
                existing: *slot.get(),
                proposed: minutes,
            }),
        }
    }

    /// Weight of `from -> to`, or `None` when the pair is unreachable.
    #[must_use]
    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<Minutes> {
        self.edges.get(&from)?.get(&to).copied()
    }

    /// Whether `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.weight(from, to).is_some()
    }

    /// Tag of `node`, if registered.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.kinds.get(&node).copied()
    }

    /// Whether `node` is registered.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.kinds.contains_key(&node)
    }

    /// Registered nodes with their tags, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, NodeKind)> + '_ {
        self.kinds.iter().map(|(id, kind)| (*id, *kind))
    }

    /// Edges leaving `from`, in target order.
    pub fn successors(&self, from: NodeId) -> impl Iterator<Item = (NodeId, Minutes)> + '_ {
        self.edges
            .get(&from)
            .into_iter()
            .flat_map(|row| row.iter().map(|(to, w)| (*to, *w)))
    }

    /// Every edge as `(from, to, weight)`, ordered by `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, Minutes)> + '_ {
        self.edges
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(to, w)| (*from, *to, *w)))
    }

    /// Number of registered nodes, depot included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Number of edges, self-loops included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }
}

impl Default for SolverSpaceGraph {
    fn default() -> Self {
        Self::new()
    }
}
