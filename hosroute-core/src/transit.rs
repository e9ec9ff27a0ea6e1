//! Per-arc transit tables handed to the routing solver.

use std::collections::BTreeMap;

use crate::{Minutes, NodeId};

/// Transit reported for an arc the graph does not contain.
///
/// Large enough that no solver will choose it, small enough that summing a
/// route of them cannot overflow.
pub const UNREACHABLE_TRANSIT: Minutes = 1_000_000;

/// Sparse `(from, to) -> transit` table for one solver dimension.
///
/// # Examples
///
/// ```
/// use hosroute_core::{NodeId, TransitTable, UNREACHABLE_TRANSIT};
///
/// let table = TransitTable::from_arcs([((NodeId(0), NodeId(1)), 75)]);
/// assert_eq!(table.lookup(NodeId(0), NodeId(1)), Some(75));
/// assert_eq!(table.evaluate(NodeId(1), NodeId(0)), UNREACHABLE_TRANSIT);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitTable {
    arcs: BTreeMap<(NodeId, NodeId), Minutes>,
}

impl TransitTable {
    /// Table from `((from, to), transit)` pairs.
    pub fn from_arcs<I>(arcs: I) -> Self
    where
        I: IntoIterator<Item = ((NodeId, NodeId), Minutes)>,
    {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Transit for `from -> to`, or `None` when the arc is missing.
    #[must_use]
    pub fn lookup(&self, from: NodeId, to: NodeId) -> Option<Minutes> {
        self.arcs.get(&(from, to)).copied()
    }

    /// Transit for `from -> to`, with missing arcs mapped to
    /// [`UNREACHABLE_TRANSIT`].
    ///
    /// This is the form a solver callback wants: total, and never an error.
    #[must_use]
    pub fn evaluate(&self, from: NodeId, to: NodeId) -> Minutes {
        self.lookup(from, to).unwrap_or(UNREACHABLE_TRANSIT)
    }

    /// Arcs in `(from, to)` order.
    pub fn iter(&self) -> impl Iterator<Item = ((NodeId, NodeId), Minutes)> + '_ {
        self.arcs.iter().map(|(arc, transit)| (*arc, *transit))
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Whether the table has no arcs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

/// Which cumulative quantity a table drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Elapsed minutes, service included.
    Time,
    /// Driving since the last long rest.
    Drive,
    /// Driving since the last short break.
    ShortBreak,
    /// Loads on board.
    Load,
}

/// The four transit tables, one per [`Dimension`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionTables {
    /// Travel plus service at the arc's start.
    pub time: TransitTable,
    /// Travel, less the drive credit of a long rest.
    pub drive: TransitTable,
    /// Travel, less the short-break credit of a break.
    pub short_break: TransitTable,
    /// Load change at the arc's start.
    pub load: TransitTable,
}

impl DimensionTables {
    /// The table for `dimension`.
    #[must_use]
    pub const fn table(&self, dimension: Dimension) -> &TransitTable {
        match dimension {
            Dimension::Time => &self.time,
            Dimension::Drive => &self.drive,
            Dimension::ShortBreak => &self.short_break,
            Dimension::Load => &self.load,
        }
    }

    /// Cumulative value of `dimension` along `route`, starting from zero.
    ///
    /// Missing arcs contribute [`UNREACHABLE_TRANSIT`].
    #[must_use]
    pub fn cumulative(&self, dimension: Dimension, route: &[NodeId]) -> Vec<Minutes> {
        let table = self.table(dimension);
        route
            .windows(2)
            .scan(0, |total, pair| {
                if let [from, to] = pair {
                    *total += table.evaluate(*from, *to);
                }
                Some(*total)
            })
            .collect()
    }
}
