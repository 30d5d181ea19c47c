use crate::core::models::ids::{CommodityId, OperationId, PeriodsId};
use crate::core::models::space::Space;
use serde::Serialize;

/// Relational sense of a bounding constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    Leq,
    Eq,
}

/// Direction of a commodity flow term in a balance constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowDirection {
    /// Commodity is produced by operating.
    Produce,
    /// Commodity is expended by operating.
    Expend,
    /// Commodity is released when capacity is disposed.
    Dispose,
    /// Commodity is used up when capacity is built.
    Use,
}

/// A declared decision variable: the aspect is defined for this operation at
/// this space and time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub aspect: String,
    pub operation: OperationId,
    pub space: Space,
    pub time: PeriodsId,
}

/// A bounding constraint linking a decision variable to a normalized limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundConstraint {
    pub aspect: String,
    pub operation: OperationId,
    pub space: Space,
    pub time: PeriodsId,
    pub sense: Sense,
    pub rhs: f64,
}

/// One commodity flow term of a structural balance constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceTerm {
    pub commodity: CommodityId,
    /// Which interchangeable mode of the conversion this term belongs to.
    pub mode: usize,
    /// Magnitude of the conversion coefficient; the sign lives in `direction`.
    pub coefficient: f64,
    pub direction: FlowDirection,
    /// Produced terms of a lagged conversion carry a shifted time.
    pub time: PeriodsId,
}

/// A structural balance constraint tying an operation's decision variable to
/// its commodity flows at one (space, time) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceConstraint {
    pub aspect: String,
    pub operation: OperationId,
    pub space: Space,
    pub time: PeriodsId,
    pub resource: Option<CommodityId>,
    pub terms: Vec<BalanceTerm>,
}

/// The solver-facing constraint sink.
///
/// The engine never evaluates anything: every relational expression issued
/// through a [`Sample`] and every conversion write lands here as a record for
/// an external solver backend to translate. Records are append-only and kept
/// in emission order.
#[derive(Debug, Default)]
pub struct Program {
    variables: Vec<VariableDecl>,
    bounds: Vec<BoundConstraint>,
    balances: Vec<BalanceConstraint>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// The callable variable accessor: `sample(space, time)` yields a handle
    /// usable in relational expressions, which register constraints as a side
    /// effect.
    pub fn sample(
        &mut self,
        aspect: &str,
        operation: OperationId,
        space: Space,
        time: PeriodsId,
    ) -> Sample<'_> {
        Sample {
            program: self,
            aspect: aspect.to_string(),
            operation,
            space,
            time,
        }
    }

    /// Records that a decision variable is defined over the given domain.
    pub fn declare(
        &mut self,
        aspect: &str,
        operation: OperationId,
        space: Space,
        time: PeriodsId,
    ) {
        self.variables.push(VariableDecl {
            aspect: aspect.to_string(),
            operation,
            space,
            time,
        });
    }

    pub(crate) fn push_balance(&mut self, constraint: BalanceConstraint) {
        self.balances.push(constraint);
    }

    pub fn variables(&self) -> &[VariableDecl] {
        &self.variables
    }

    pub fn bounds(&self) -> &[BoundConstraint] {
        &self.bounds
    }

    pub fn balances(&self) -> &[BalanceConstraint] {
        &self.balances
    }

    /// Number of bounding constraints attributed to an operation under one
    /// aspect.
    pub fn bounds_for(&self, aspect: &str, operation: OperationId) -> usize {
        self.bounds
            .iter()
            .filter(|b| b.aspect == aspect && b.operation == operation)
            .count()
    }

    /// Number of structural balance constraints attributed to an operation at
    /// a space, across all aspects.
    pub fn balances_for(&self, operation: OperationId, space: Space) -> usize {
        self.balances
            .iter()
            .filter(|b| b.operation == operation && b.space == space)
            .count()
    }
}

/// A comparable variable handle for one (aspect, operation, space, time).
///
/// The relational methods consume the sample, register the constraint with
/// the program, and return its descriptor. The engine only relies on the
/// registration side effect, never on the descriptor's value.
#[derive(Debug)]
pub struct Sample<'p> {
    program: &'p mut Program,
    aspect: String,
    operation: OperationId,
    space: Space,
    time: PeriodsId,
}

impl Sample<'_> {
    pub fn leq(self, rhs: f64) -> BoundConstraint {
        self.bind(Sense::Leq, rhs)
    }

    pub fn eq(self, rhs: f64) -> BoundConstraint {
        self.bind(Sense::Eq, rhs)
    }

    fn bind(self, sense: Sense, rhs: f64) -> BoundConstraint {
        let constraint = BoundConstraint {
            aspect: self.aspect,
            operation: self.operation,
            space: self.space,
            time: self.time,
            sense,
            rhs,
        };
        self.program.bounds.push(constraint.clone());
        constraint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn fake_operation() -> OperationId {
        OperationId::from(KeyData::from_ffi(1))
    }

    fn fake_space() -> Space {
        Space::Location(crate::core::models::ids::LocationId::from(
            KeyData::from_ffi(7),
        ))
    }

    fn fake_time() -> PeriodsId {
        PeriodsId::from(KeyData::from_ffi(3))
    }

    #[test]
    fn relational_expressions_register_bounds() {
        let mut program = Program::new();
        let op = fake_operation();
        let bound = program.sample("operate", op, fake_space(), fake_time()).leq(1.0);

        assert_eq!(bound.sense, Sense::Leq);
        assert_eq!(bound.rhs, 1.0);
        assert_eq!(program.bounds().len(), 1);
        assert_eq!(program.bounds_for("operate", op), 1);
        assert_eq!(program.bounds_for("capacity", op), 0);

        let pinned = program.sample("capacity", op, fake_space(), fake_time()).eq(1.0);
        assert_eq!(pinned.sense, Sense::Eq);
        assert_eq!(program.bounds_for("capacity", op), 1);
    }

    #[test]
    fn declarations_are_recorded_in_order() {
        let mut program = Program::new();
        let op = fake_operation();
        program.declare("operate", op, fake_space(), fake_time());
        program.declare("capacity", op, fake_space(), fake_time());

        assert_eq!(program.variables().len(), 2);
        assert_eq!(program.variables()[0].aspect, "operate");
        assert_eq!(program.variables()[1].aspect, "capacity");
    }
}
