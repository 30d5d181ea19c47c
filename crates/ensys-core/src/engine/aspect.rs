use crate::core::models::ids::{OperationId, PeriodsId};
use crate::core::models::space::Space;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Spaces at which an operation's decision variable already carries a bound
/// constraint.
///
/// The lower-bound set is tracked but never populated by the engine's bound
/// checks; it exists for external bounding paths.
#[derive(Debug, Default, Clone)]
pub struct BoundSpaces {
    pub ub: IndexSet<Space>,
    pub lb: IndexSet<Space>,
}

/// One declared domain of an aspect: the aspect's variable is defined for
/// this operation at this space and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub operation: OperationId,
    pub space: Space,
    pub time: PeriodsId,
}

/// A named family of decision variables ("capacity", "operate") with the
/// process-wide bookkeeping shared by every operation of a model.
#[derive(Debug)]
pub struct Aspect {
    name: String,
    /// Which spaces already carry bound constraints, per operation.
    bound_spaces: HashMap<OperationId, BoundSpaces>,
    /// At which (space, time) pairs the variable is actually defined, per
    /// operation.
    dispositions: HashMap<OperationId, IndexMap<Space, IndexSet<PeriodsId>>>,
    /// Declaration log, in declaration order. Scanned by `locate`.
    domains: Vec<Domain>,
}

impl Aspect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound_spaces: HashMap::new(),
            dispositions: HashMap::new(),
            domains: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound table for an operation, lazily initialized with empty sets.
    /// Idempotent and side-effect-free when the entry already exists.
    pub fn bounds_mut(&mut self, operation: OperationId) -> &mut BoundSpaces {
        self.bound_spaces.entry(operation).or_default()
    }

    pub fn bounds(&self, operation: OperationId) -> Option<&BoundSpaces> {
        self.bound_spaces.get(&operation)
    }

    pub fn is_bounded_above(&self, operation: OperationId, space: Space) -> bool {
        self.bound_spaces
            .get(&operation)
            .is_some_and(|b| b.ub.contains(&space))
    }

    /// Records a domain declaration and its disposition.
    pub fn record(&mut self, operation: OperationId, space: Space, time: PeriodsId) {
        self.domains.push(Domain {
            operation,
            space,
            time,
        });
        self.dispositions
            .entry(operation)
            .or_default()
            .entry(space)
            .or_default()
            .insert(time);
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Times at which the variable is defined for an operation at a space.
    pub fn disposition(
        &self,
        operation: OperationId,
        space: Space,
    ) -> Option<&IndexSet<PeriodsId>> {
        self.dispositions.get(&operation)?.get(&space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::LocationId;
    use slotmap::KeyData;

    fn op(n: u64) -> OperationId {
        OperationId::from(KeyData::from_ffi(n))
    }

    fn space(n: u64) -> Space {
        Space::Location(LocationId::from(KeyData::from_ffi(n)))
    }

    fn time(n: u64) -> PeriodsId {
        PeriodsId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bound_table_initialization_is_idempotent() {
        let mut aspect = Aspect::new("operate");
        aspect.bounds_mut(op(1)).ub.insert(space(1));

        // re-entry must not clear what is already recorded
        let again = aspect.bounds_mut(op(1));
        assert!(again.ub.contains(&space(1)));
        assert!(again.lb.is_empty());

        // the read accessors take the handle by value
        assert!(aspect.bounds(op(1)).is_some());
        assert!(aspect.bounds(op(2)).is_none());
        assert!(aspect.is_bounded_above(op(1), space(1)));
        assert!(!aspect.is_bounded_above(op(1), space(2)));
    }

    #[test]
    fn record_tracks_domains_and_dispositions() {
        let mut aspect = Aspect::new("operate");
        aspect.record(op(1), space(1), time(1));
        aspect.record(op(1), space(1), time(2));
        aspect.record(op(1), space(2), time(1));

        assert_eq!(aspect.domains().len(), 3);
        let times = aspect.disposition(op(1), space(1)).unwrap();
        assert_eq!(times.len(), 2);
        assert!(aspect.disposition(op(2), space(1)).is_none());
    }

    #[test]
    fn duplicate_dispositions_collapse() {
        let mut aspect = Aspect::new("capacity");
        aspect.record(op(1), space(1), time(1));
        aspect.record(op(1), space(1), time(1));

        assert_eq!(aspect.disposition(op(1), space(1)).unwrap().len(), 1);
        // the declaration log itself keeps both entries
        assert_eq!(aspect.domains().len(), 2);
    }
}
