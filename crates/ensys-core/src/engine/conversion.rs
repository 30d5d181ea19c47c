use crate::core::models::ids::{CommodityId, OperationId, PeriodsId};
use crate::core::models::periods::Lag;
use crate::core::models::space::Space;
use crate::core::models::system::System;
use crate::engine::error::ModelError;
use crate::engine::program::{BalanceConstraint, BalanceTerm, FlowDirection, Program};
use indexmap::{IndexMap, IndexSet};

/// A raw interconversion specification as supplied by the user: one map of
/// signed coefficients per interchangeable mode, plus an optional basis
/// commodity and temporal lag. Folded into an operation's conversions at
/// registration.
#[derive(Debug, Clone, Default)]
pub struct ConversionSpec {
    pub resource: Option<CommodityId>,
    pub modes: Vec<IndexMap<CommodityId, f64>>,
    pub lag: Option<Lag>,
}

impl ConversionSpec {
    pub fn single_mode(mode: IndexMap<CommodityId, f64>) -> Self {
        Self {
            resource: None,
            modes: vec![mode],
            lag: None,
        }
    }
}

/// The interconversion attached to one aspect of an operation.
///
/// Positive coefficients flow in `pos`, negative in `neg`; the operate
/// conversion produces and expends, the capacity conversion disposes and
/// uses. Coefficients stay signed in `modes` until [`Conversion::write`]
/// splits them into directed terms.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Name of the operation this conversion belongs to, for diagnostics.
    owner: String,
    /// Name of the aspect whose variable this conversion scales.
    aspect: String,
    pos: FlowDirection,
    neg: FlowDirection,
    resource: Option<CommodityId>,
    modes: Vec<IndexMap<CommodityId, f64>>,
    lag: Option<Lag>,
    /// Capacity-style conversions are evaluated at the horizon regardless of
    /// the time they are written at.
    at_horizon: bool,
    balanced: bool,
}

impl Conversion {
    /// The operational conversion: produced and expended commodity flows per
    /// unit of operating.
    pub fn operate(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            aspect: "operate".to_string(),
            pos: FlowDirection::Produce,
            neg: FlowDirection::Expend,
            resource: None,
            modes: Vec::new(),
            lag: None,
            at_horizon: false,
            balanced: false,
        }
    }

    /// The capacity conversion: commodity flows tied to setting up and
    /// disposing of capacity, evaluated at the horizon.
    pub fn capacity(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            aspect: "capacity".to_string(),
            pos: FlowDirection::Dispose,
            neg: FlowDirection::Use,
            resource: None,
            modes: Vec::new(),
            lag: None,
            at_horizon: true,
            balanced: false,
        }
    }

    pub fn aspect(&self) -> &str {
        &self.aspect
    }

    pub(crate) fn set_aspect(&mut self, aspect: impl Into<String>) {
        self.aspect = aspect.into();
    }

    pub fn resource(&self) -> Option<CommodityId> {
        self.resource
    }

    pub fn lag(&self) -> Option<Lag> {
        self.lag
    }

    /// Declares the basis commodity. Last write wins; every mode that does
    /// not already map the resource gets it at coefficient 1.0, while modes
    /// that do keep their own value.
    pub fn set_resource(&mut self, commodity: CommodityId, lag: Option<Lag>) {
        self.resource = Some(commodity);
        if let Some(lag) = lag {
            self.lag = Some(lag);
        }
        if self.modes.is_empty() {
            self.modes.push(IndexMap::new());
        }
        for mode in &mut self.modes {
            mode.entry(commodity).or_insert(1.0);
        }
        // a balanced conversion gains a key; it must be re-leveled
        self.balanced = false;
    }

    /// Folds a raw specification in, mode by mode: the spec's coefficients
    /// override, extra modes are appended.
    pub fn merge(&mut self, spec: &ConversionSpec) {
        for (index, mode) in spec.modes.iter().enumerate() {
            if index < self.modes.len() {
                for (&commodity, &coefficient) in mode {
                    self.modes[index].insert(commodity, coefficient);
                }
            } else {
                self.modes.push(mode.clone());
            }
        }
        if self.lag.is_none() {
            self.lag = spec.lag;
        }
        self.balanced = false;
    }

    /// Levels the modes: validates every referenced commodity against the
    /// system registry, then gives every mode the full union of keys with
    /// 0.0 filled in where a mode is silent. Idempotent.
    pub fn balancer(&mut self, system: &System) -> Result<(), ModelError> {
        if self.balanced {
            return Ok(());
        }
        for (index, mode) in self.modes.iter().enumerate() {
            for &commodity in mode.keys() {
                if !system.contains_commodity(commodity) {
                    return Err(ModelError::InconsistentModes {
                        operation: self.owner.clone(),
                        mode: index,
                    });
                }
            }
        }
        let union: IndexSet<CommodityId> = self
            .modes
            .iter()
            .flat_map(|mode| mode.keys().copied())
            .collect();
        for mode in &mut self.modes {
            for &commodity in &union {
                mode.entry(commodity).or_insert(0.0);
            }
        }
        self.balanced = true;
        Ok(())
    }

    /// The normalized per-mode coefficient view.
    pub fn balance(&self) -> &[IndexMap<CommodityId, f64>] {
        &self.modes
    }

    /// Emits exactly one structural balance constraint for the given
    /// (space, time) pair. A conversion with no modes emits nothing.
    /// Duplicate suppression is the caller's job.
    pub fn write(
        &self,
        program: &mut Program,
        operation: OperationId,
        space: Space,
        time: PeriodsId,
        horizon: PeriodsId,
    ) {
        if self.modes.is_empty() {
            return;
        }
        let effective = if self.at_horizon { horizon } else { time };
        let mut terms = Vec::new();
        for (index, mode) in self.modes.iter().enumerate() {
            for (&commodity, &coefficient) in mode {
                if coefficient == 0.0 {
                    continue;
                }
                let (direction, term_time) = if coefficient > 0.0 {
                    // produced flows of a lagged conversion land at the lag's
                    // discretization
                    let shifted = self.lag.map_or(effective, |lag| lag.periods);
                    (self.pos, shifted)
                } else {
                    (self.neg, effective)
                };
                terms.push(BalanceTerm {
                    commodity,
                    mode: index,
                    coefficient: coefficient.abs(),
                    direction,
                    time: term_time,
                });
            }
        }
        program.push_balance(BalanceConstraint {
            aspect: self.aspect.clone(),
            operation,
            space,
            time: effective,
            resource: self.resource,
            terms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::commodity::Commodity;
    use crate::core::models::ids::LocationId;
    use crate::core::models::periods::Periods;
    use slotmap::KeyData;

    fn create_test_system() -> (System, Vec<CommodityId>) {
        let mut system = System::new("network", "horizon");
        let power = system.add_commodity(Commodity::new("power")).unwrap();
        let gas = system.add_commodity(Commodity::new("gas")).unwrap();
        let heat = system.add_commodity(Commodity::new("heat")).unwrap();
        (system, vec![power, gas, heat])
    }

    fn op(n: u64) -> OperationId {
        OperationId::from(KeyData::from_ffi(n))
    }

    fn space(n: u64) -> Space {
        Space::Location(LocationId::from(KeyData::from_ffi(n)))
    }

    #[test]
    fn set_resource_leaves_existing_coefficient_alone() {
        let (_, ids) = create_test_system();
        let mut conv = Conversion::operate("boiler");
        let mut mode = IndexMap::new();
        mode.insert(ids[0], 2.5);
        conv.merge(&ConversionSpec::single_mode(mode));

        conv.set_resource(ids[0], None);
        assert_eq!(conv.balance()[0][&ids[0]], 2.5);

        conv.set_resource(ids[1], None);
        assert_eq!(conv.balance()[0][&ids[1]], 1.0);
        assert_eq!(conv.resource(), Some(ids[1]));
    }

    #[test]
    fn balancer_levels_heterogeneous_modes() {
        let (system, ids) = create_test_system();
        let mut conv = Conversion::operate("chp");
        let mut first = IndexMap::new();
        first.insert(ids[0], 1.0);
        first.insert(ids[1], -2.0);
        let mut second = IndexMap::new();
        second.insert(ids[2], 0.8);
        conv.merge(&ConversionSpec {
            resource: None,
            modes: vec![first, second],
            lag: None,
        });

        conv.balancer(&system).unwrap();
        for mode in conv.balance() {
            assert_eq!(mode.len(), 3);
        }
        assert_eq!(conv.balance()[0][&ids[2]], 0.0);
        assert_eq!(conv.balance()[1][&ids[0]], 0.0);
    }

    #[test]
    fn balancer_is_idempotent() {
        let (system, ids) = create_test_system();
        let mut conv = Conversion::operate("boiler");
        let mut mode = IndexMap::new();
        mode.insert(ids[0], 1.0);
        conv.merge(&ConversionSpec::single_mode(mode));

        conv.balancer(&system).unwrap();
        let snapshot = conv.balance().to_vec();
        conv.balancer(&system).unwrap();
        assert_eq!(conv.balance(), snapshot.as_slice());
    }

    #[test]
    fn balancer_rejects_foreign_commodity() {
        let (system, _) = create_test_system();
        let mut conv = Conversion::operate("boiler");
        let mut mode = IndexMap::new();
        mode.insert(CommodityId::from(KeyData::from_ffi(99)), 1.0);
        conv.merge(&ConversionSpec::single_mode(mode));

        let err = conv.balancer(&system).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InconsistentModes { mode: 0, .. }
        ));
    }

    #[test]
    fn write_splits_signed_coefficients_into_directed_terms() {
        let (mut system, ids) = create_test_system();
        let day = system
            .add_periods(Periods::new("day", 365))
            .unwrap();
        let horizon = system.horizon();

        let mut conv = Conversion::operate("boiler");
        let mut mode = IndexMap::new();
        mode.insert(ids[0], 1.0);
        mode.insert(ids[1], -1.8);
        mode.insert(ids[2], 0.0);
        conv.merge(&ConversionSpec::single_mode(mode));

        let mut program = Program::new();
        conv.write(&mut program, op(1), space(1), day, horizon);

        let balances = program.balances();
        assert_eq!(balances.len(), 1);
        let constraint = &balances[0];
        assert_eq!(constraint.time, day);
        // zero coefficients never become terms
        assert_eq!(constraint.terms.len(), 2);
        assert!(constraint.terms.iter().any(|t| {
            t.commodity == ids[0] && t.direction == FlowDirection::Produce && t.coefficient == 1.0
        }));
        assert!(constraint.terms.iter().any(|t| {
            t.commodity == ids[1] && t.direction == FlowDirection::Expend && t.coefficient == 1.8
        }));
    }

    #[test]
    fn empty_conversions_write_nothing() {
        let (system, _) = create_test_system();
        let horizon = system.horizon();

        let mut conv = Conversion::capacity("boiler");
        let mut program = Program::new();
        conv.balancer(&system).unwrap();
        conv.write(&mut program, op(1), space(1), horizon, horizon);

        assert!(program.balances().is_empty());
    }

    #[test]
    fn lagged_production_lands_at_the_lag_periods() {
        let (mut system, ids) = create_test_system();
        let day = system.add_periods(Periods::new("day", 365)).unwrap();
        let week = system.add_periods(Periods::new("week", 52)).unwrap();
        let horizon = system.horizon();

        let mut conv = Conversion::operate("digester");
        let mut mode = IndexMap::new();
        mode.insert(ids[0], 1.0);
        mode.insert(ids[1], -1.0);
        conv.merge(&ConversionSpec {
            resource: None,
            modes: vec![mode],
            lag: Some(Lag::new(week, 2)),
        });

        let mut program = Program::new();
        conv.write(&mut program, op(1), space(1), day, horizon);

        let constraint = &program.balances()[0];
        let produced = constraint
            .terms
            .iter()
            .find(|t| t.direction == FlowDirection::Produce)
            .unwrap();
        let expended = constraint
            .terms
            .iter()
            .find(|t| t.direction == FlowDirection::Expend)
            .unwrap();
        assert_eq!(produced.time, week);
        assert_eq!(expended.time, day);
    }

    #[test]
    fn capacity_conversion_writes_at_the_horizon() {
        let (mut system, ids) = create_test_system();
        let day = system
            .add_periods(Periods::new("day", 365))
            .unwrap();
        let horizon = system.horizon();

        let mut conv = Conversion::capacity("boiler");
        let mut mode = IndexMap::new();
        mode.insert(ids[1], -4.0);
        conv.merge(&ConversionSpec::single_mode(mode));

        let mut program = Program::new();
        conv.write(&mut program, op(1), space(1), day, horizon);

        let constraint = &program.balances()[0];
        assert_eq!(constraint.time, horizon);
        assert_eq!(constraint.terms[0].direction, FlowDirection::Use);
    }
}
