//! Lookup from break ids and legs to the synthetic break nodes.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::{BreakNode, GraphError, NodeId};

/// Every break node by id, plus the ordered chain of breaks on each leg.
///
/// Chains are keyed by the full leg `(leg_from, leg_to)` and list their nodes
/// in driving order, alternating short and long. The index is filled once
/// during augmentation and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakNodeIndex {
    nodes: BTreeMap<NodeId, BreakNode>,
    chains: BTreeMap<(NodeId, NodeId), Vec<NodeId>>,
}

impl BreakNodeIndex {
    /// Empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            chains: BTreeMap::new(),
        }
    }

    /// Record the chain for `leg`, in driving order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateChain`] if `leg` already has a chain.
    pub fn insert_chain(
        &mut self,
        leg: (NodeId, NodeId),
        chain: Vec<BreakNode>,
    ) -> Result<(), GraphError> {
        let Entry::Vacant(slot) = self.chains.entry(leg) else {
            return Err(GraphError::DuplicateChain {
                from: leg.0,
                to: leg.1,
            });
        };
        slot.insert(chain.iter().map(|node| node.id).collect());
        self.nodes.extend(chain.into_iter().map(|node| (node.id, node)));
        Ok(())
    }

    /// Break node with id `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&BreakNode> {
        self.nodes.get(&id)
    }

    /// Whether `id` is a break node.
    #[must_use]
    pub fn is_break(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ids of the breaks on `from -> to`, empty when the leg has none.
    #[must_use]
    pub fn chain(&self, from: NodeId, to: NodeId) -> &[NodeId] {
        self.chains.get(&(from, to)).map_or(&[], Vec::as_slice)
    }

    /// Break nodes on `from -> to`, in driving order.
    pub fn chain_nodes(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = &BreakNode> + '_ {
        self.chain(from, to)
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    /// The leg start a chain lookup should use for `node`.
    ///
    /// A break resolves to the start of the leg it sits on, and any other
    /// node to itself.
    #[must_use]
    pub fn anchor_of(&self, node: NodeId) -> NodeId {
        self.nodes.get(&node).map_or(node, |brk| brk.leg.0)
    }

    /// Legs that carry a chain, in key order.
    pub fn legs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.chains.keys().copied()
    }

    /// All break nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BreakNode> + '_ {
        self.nodes.values()
    }

    /// Number of break nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no breaks were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BreakKind, BreakRule};
    use rstest::{fixture, rstest};

    const LEG: (NodeId, NodeId) = (NodeId(1), NodeId(2));

    #[fixture]
    fn index() -> BreakNodeIndex {
        let short = BreakNode::new(
            BreakKind::Short,
            BreakRule::SHORT,
            NodeId(7),
            LEG,
            (NodeId(1), NodeId(8)),
            (480, 100),
        );
        let long = BreakNode::new(
            BreakKind::Long,
            BreakRule::LONG,
            NodeId(8),
            LEG,
            (NodeId(1), NodeId(2)),
            (580, 0),
        );
        let mut index = BreakNodeIndex::new();
        index
            .insert_chain(LEG, vec![short, long])
            .expect("fresh chain");
        index
    }

    #[rstest]
    fn chain_preserves_driving_order(index: BreakNodeIndex) {
        assert_eq!(index.chain(NodeId(1), NodeId(2)), &[NodeId(7), NodeId(8)]);
        let kinds: Vec<_> = index.chain_nodes(NodeId(1), NodeId(2)).map(|n| n.kind).collect();
        assert_eq!(kinds, vec![BreakKind::Short, BreakKind::Long]);
    }

    #[rstest]
    fn missing_chain_is_empty(index: BreakNodeIndex) {
        assert!(index.chain(NodeId(2), NodeId(1)).is_empty());
    }

    #[rstest]
    fn anchor_of_maps_breaks_to_leg_start(index: BreakNodeIndex) {
        assert_eq!(index.anchor_of(NodeId(8)), NodeId(1));
        assert_eq!(index.anchor_of(NodeId(2)), NodeId(2));
    }

    #[rstest]
    fn duplicate_chain_is_refused(mut index: BreakNodeIndex) {
        let err = index.insert_chain(LEG, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateChain {
                from: NodeId(1),
                to: NodeId(2)
            }
        );
        assert_eq!(index.len(), 2);
    }
}
