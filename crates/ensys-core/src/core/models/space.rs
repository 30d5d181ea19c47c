use super::ids::{LinkageId, LocationId};
use serde::{Deserialize, Serialize};

/// A spatial node at which operations can be balanced and commodities held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A directed spatial edge between two locations.
///
/// Linkages are the domain of transport-style operations, the way locations
/// are the domain of processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linkage {
    pub name: String,
    pub source: LocationId,
    pub sink: LocationId,
}

impl Linkage {
    pub fn new(name: impl Into<String>, source: LocationId, sink: LocationId) -> Self {
        Self {
            name: name.into(),
            source,
            sink,
        }
    }
}

/// The universal spatial key: either a location or a linkage.
///
/// Used wherever bookkeeping is indexed by "the space an operation is
/// balanced at", so that node-domain and edge-domain operations share the
/// same bound and disposition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Space {
    Location(LocationId),
    Linkage(LinkageId),
}

impl Space {
    /// Whether this space is a node rather than an edge.
    pub fn is_location(&self) -> bool {
        matches!(self, Space::Location(_))
    }
}

impl From<LocationId> for Space {
    fn from(id: LocationId) -> Self {
        Space::Location(id)
    }
}

impl From<LinkageId> for Space {
    fn from(id: LinkageId) -> Self {
        Space::Linkage(id)
    }
}
