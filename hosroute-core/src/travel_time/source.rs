//! Travel-time source trait and a sparse in-memory implementation.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MapNodeId, Minutes};

use super::error::TravelTimeError;

/// Look up driving minutes between two map-space nodes.
///
/// Implementations return `None` for pairs with no route and `Some(0)` when
/// `from == to`.
///
/// # Examples
///
/// ```rust
/// use hosroute_core::{MapNodeId, Minutes, TravelTimeSource};
///
/// struct Manhattan;
///
/// impl TravelTimeSource for Manhattan {
///     fn travel_time(&self, from: MapNodeId, to: MapNodeId) -> Option<Minutes> {
///         Some(Minutes::from(from.0.abs_diff(to.0)) * 60)
///     }
/// }
///
/// assert_eq!(Manhattan.travel_time(MapNodeId(2), MapNodeId(5)), Some(180));
/// ```
pub trait TravelTimeSource {
    /// Minutes from `from` to `to`, or `None` if unreachable.
    fn travel_time(&self, from: MapNodeId, to: MapNodeId) -> Option<Minutes>;
}

impl<T: TravelTimeSource + ?Sized> TravelTimeSource for &T {
    fn travel_time(&self, from: MapNodeId, to: MapNodeId) -> Option<Minutes> {
        (**self).travel_time(from, to)
    }
}

/// Sparse directed travel-time table.
///
/// Only pairs that were inserted are reachable, apart from the implicit zero
/// on the diagonal.
///
/// # Examples
///
/// ```
/// use hosroute_core::{MapNodeId, TravelTimeGraph, TravelTimeSource};
///
/// # fn main() -> Result<(), hosroute_core::TravelTimeError> {
/// let graph = TravelTimeGraph::from_entries([
///     (MapNodeId(0), MapNodeId(7), 120),
///     (MapNodeId(7), MapNodeId(9), 300),
/// ])?;
/// assert_eq!(graph.travel_time(MapNodeId(0), MapNodeId(7)), Some(120));
/// assert_eq!(graph.travel_time(MapNodeId(9), MapNodeId(7)), None);
/// assert_eq!(graph.travel_time(MapNodeId(9), MapNodeId(9)), Some(0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TravelTimeGraph {
    times: BTreeMap<MapNodeId, BTreeMap<MapNodeId, Minutes>>,
}

impl TravelTimeGraph {
    /// Empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            times: BTreeMap::new(),
        }
    }

    /// Build a table from `(from, to, minutes)` triples.
    ///
    /// Later duplicates overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`TravelTimeError::NegativeTime`] for the first negative entry.
    pub fn from_entries<I>(entries: I) -> Result<Self, TravelTimeError>
    where
        I: IntoIterator<Item = (MapNodeId, MapNodeId, Minutes)>,
    {
        let mut graph = Self::new();
        for (from, to, minutes) in entries {
            graph.insert(from, to, minutes)?;
        }
        Ok(graph)
    }

    /// Set the travel time for `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`TravelTimeError::NegativeTime`] when `minutes < 0`.
    pub fn insert(
        &mut self,
        from: MapNodeId,
        to: MapNodeId,
        minutes: Minutes,
    ) -> Result<(), TravelTimeError> {
        if minutes < 0 {
            return Err(TravelTimeError::NegativeTime { from, to, minutes });
        }
        self.times.entry(from).or_default().insert(to, minutes);
        Ok(())
    }

    /// Number of explicit pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.values().map(BTreeMap::len).sum()
    }

    /// Whether the table has no explicit pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.values().all(BTreeMap::is_empty)
    }
}

impl TravelTimeSource for TravelTimeGraph {
    fn travel_time(&self, from: MapNodeId, to: MapNodeId) -> Option<Minutes> {
        let explicit = self.times.get(&from).and_then(|row| row.get(&to)).copied();
        explicit.or_else(|| (from == to).then_some(0))
    }
}
