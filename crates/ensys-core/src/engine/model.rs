use crate::core::models::ids::{CommodityId, OperationId, PeriodsId};
use crate::core::models::periods::Lag;
use crate::core::models::space::Space;
use crate::core::models::system::System;
use crate::engine::aspect::Aspect;
use crate::engine::config::ModelConfig;
use crate::engine::error::ModelError;
use crate::engine::operation::Operation;
use crate::engine::program::{BoundConstraint, Program};
use slotmap::SlotMap;
use tracing::{debug, info, warn};

/// The constraint-generating model.
///
/// Owns the component registry, the constraint program, the aspect
/// bookkeeping, and every registered operation. All shared mutable state of
/// the generation pass lives here; the model is single-writer by design and
/// must be externally serialized if ever driven from multiple threads.
#[derive(Debug)]
pub struct Model {
    config: ModelConfig,
    system: System,
    program: Program,
    aspects: Vec<Aspect>,
    operations: SlotMap<OperationId, Operation>,
}

impl Model {
    pub fn new(config: ModelConfig) -> Self {
        let system = System::new(&config.network_name, &config.horizon_name);
        let aspects = vec![
            Aspect::new(config.operate_aspect.clone()),
            Aspect::new(config.capacity_aspect.clone()),
        ];
        Self {
            config,
            system,
            program: Program::new(),
            aspects,
            operations: SlotMap::with_key(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut System {
        &mut self.system
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn operation(&self, id: OperationId) -> Option<&Operation> {
        self.operations.get(id)
    }

    pub fn aspect(&self, name: &str) -> Result<&Aspect, ModelError> {
        let index = self.aspect_index(name)?;
        Ok(&self.aspects[index])
    }

    /// Pure name-to-slot lookup for aspects.
    fn aspect_index(&self, name: &str) -> Result<usize, ModelError> {
        self.aspects
            .iter()
            .position(|aspect| aspect.name() == name)
            .ok_or_else(|| ModelError::UnknownAspect {
                name: name.to_string(),
            })
    }

    /// Attaches an operation to this model: a one-time transition that hands
    /// ownership of the operation over, registers its name, resolves its
    /// aspect slots, and, iff exactly one raw conversion spec was supplied,
    /// merges that spec into the operate conversion and adopts its resource.
    /// Zero or several specs leave the resource unset; bind it through
    /// [`Model::bind_resource`].
    pub fn register(&mut self, mut operation: Operation) -> Result<OperationId, ModelError> {
        if operation.attached {
            return Err(ModelError::AlreadyAttached {
                operation: operation.name.clone(),
            });
        }
        operation.operate_aspect = Some(self.aspect_index(&self.config.operate_aspect)?);
        operation.capacity_aspect = Some(self.aspect_index(&self.config.capacity_aspect)?);
        if let Some(conversion) = operation.operate.as_mut() {
            conversion.set_aspect(&self.config.operate_aspect);
        }
        if let Some(conversion) = operation.capacity.as_mut() {
            conversion.set_aspect(&self.config.capacity_aspect);
        }

        if operation.conversions.len() == 1 {
            if let Some(conversion) = operation.operate.as_mut() {
                let spec = &operation.conversions[0];
                conversion.merge(spec);
                if let Some(resource) = spec.resource {
                    conversion.set_resource(resource, spec.lag);
                }
            }
        }

        operation.attached = true;
        let name = operation.name.clone();
        let id = self.operations.insert(operation);
        if let Err(err) = self.system.register_operation(&name, id) {
            self.operations.remove(id);
            return Err(err);
        }
        info!(operation = %name, "registered operation");
        Ok(id)
    }

    /// Declares the commodity an operation is denominated in. Re-invocable;
    /// the last write wins.
    pub fn bind_resource(
        &mut self,
        id: OperationId,
        commodity: CommodityId,
        lag: Option<Lag>,
    ) -> Result<(), ModelError> {
        let operation = self
            .operations
            .get_mut(id)
            .ok_or(ModelError::UnknownOperation)?;
        match operation.operate.as_mut() {
            Some(conversion) => {
                conversion.set_resource(commodity, lag);
                Ok(())
            }
            None => Err(ModelError::MissingConversion {
                operation: operation.name.clone(),
            }),
        }
    }

    /// Records that an aspect's decision variable is defined for an operation
    /// at a (space, time) pair, and declares the variable in the program.
    /// This is the write path that fills dispositions; `locate` only reads.
    pub fn declare(
        &mut self,
        aspect: &str,
        id: OperationId,
        space: Space,
        time: PeriodsId,
    ) -> Result<(), ModelError> {
        let index = self.aspect_index(aspect)?;
        if !self.operations.contains_key(id) {
            return Err(ModelError::UnknownOperation);
        }
        self.aspects[index].record(id, space, time);
        self.program.declare(aspect, id, space, time);
        Ok(())
    }

    /// Ensures the capacity variable is upper-bounded at most once per
    /// (operation, space) pair, always at the horizon. Returns `None` when
    /// the bound was already in place.
    pub fn check_capacity_bound(
        &mut self,
        id: OperationId,
        space: Space,
    ) -> Result<Option<BoundConstraint>, ModelError> {
        let slot = self.resolved_slot(id, |op| op.capacity_aspect, "capacity")?;
        self.check_bound(id, space, slot, true)
    }

    /// The operate variant: the bound lands at the finest disposition time
    /// recorded for that space, or at the horizon when no disposition exists.
    pub fn check_operate_bound(
        &mut self,
        id: OperationId,
        space: Space,
    ) -> Result<Option<BoundConstraint>, ModelError> {
        let slot = self.resolved_slot(id, |op| op.operate_aspect, "operate")?;
        self.check_bound(id, space, slot, false)
    }

    fn resolved_slot(
        &self,
        id: OperationId,
        pick: impl Fn(&Operation) -> Option<usize>,
        role: &str,
    ) -> Result<usize, ModelError> {
        let operation = self.operations.get(id).ok_or(ModelError::UnknownOperation)?;
        pick(operation).ok_or_else(|| ModelError::UnknownAspect {
            name: role.to_string(),
        })
    }

    fn check_bound(
        &mut self,
        id: OperationId,
        space: Space,
        slot: usize,
        at_horizon: bool,
    ) -> Result<Option<BoundConstraint>, ModelError> {
        let Model {
            aspects,
            program,
            system,
            ..
        } = self;
        let aspect = &mut aspects[slot];
        let time = if at_horizon {
            system.horizon()
        } else {
            aspect
                .disposition(id, space)
                .and_then(|times| system.finest(times.iter().copied()))
                .unwrap_or_else(|| system.horizon())
        };
        let name = aspect.name().to_string();
        let bounds = aspect.bounds_mut(id);
        if bounds.ub.contains(&space) {
            return Ok(None);
        }
        // the relational side effect: registering a bound records the space
        let constraint = program.sample(&name, id, space, time).leq(1.0);
        bounds.ub.insert(space);
        Ok(Some(constraint))
    }

    /// Expands an operation into concrete spaces and writes its constraints.
    ///
    /// Empty input defaults to the network-wide space. Per space, in order:
    /// capacity bound check, operate bound check, then a scan of the operate
    /// aspect's declared domains for that exact space, collecting the
    /// (space, time) pairs to balance. The collected pairs go to operate
    /// writing; when a capacity conversion exists, every pair the operation
    /// has ever accumulated goes to capacity writing. Returns the processed
    /// spaces for chaining.
    pub fn locate(&mut self, id: OperationId, spaces: &[Space]) -> Result<Vec<Space>, ModelError> {
        let (kind, name, operate_slot) = {
            let operation = self.operations.get(id).ok_or(ModelError::UnknownOperation)?;
            (operation.kind, operation.name.clone(), operation.operate_aspect)
        };
        let targets: Vec<Space> = if spaces.is_empty() {
            vec![self.system.network()]
        } else {
            spaces.to_vec()
        };
        for &space in &targets {
            if !kind.accepts(space) {
                return Err(ModelError::IncompatibleSpace {
                    operation: name.clone(),
                    space: self.system.space_name(space).to_string(),
                });
            }
        }

        let mut pairs: Vec<(Space, PeriodsId)> = Vec::new();
        for &space in &targets {
            self.check_capacity_bound(id, space)?;
            self.check_operate_bound(id, space)?;
            if let Some(slot) = operate_slot {
                // domain filtering is by space equality only
                for domain in self.aspects[slot].domains() {
                    if domain.space == space && !pairs.contains(&(space, domain.time)) {
                        pairs.push((space, domain.time));
                    }
                }
            }
        }
        debug!(operation = %name, pairs = pairs.len(), "collected operate pairs");

        self.write_operate_conversion(id, &pairs)?;
        let operation = self.operations.get(id).ok_or(ModelError::UnknownOperation)?;
        let capacity_pairs = operation
            .capacity
            .is_some()
            .then(|| operation.space_times.clone());
        if let Some(pairs) = capacity_pairs {
            self.write_capacity_conversion(id, &pairs)?;
        }
        Ok(targets)
    }

    /// Writes one operate balance per pair whose space is not already in the
    /// operation's space domain. A missing operate conversion is a warning,
    /// not an error: the operation is legal but inert.
    pub fn write_operate_conversion(
        &mut self,
        id: OperationId,
        pairs: &[(Space, PeriodsId)],
    ) -> Result<(), ModelError> {
        let Model {
            operations,
            program,
            system,
            ..
        } = self;
        let operation = operations.get_mut(id).ok_or(ModelError::UnknownOperation)?;
        let Operation {
            name,
            operate,
            spaces,
            space_times,
            ..
        } = operation;
        let Some(conversion) = operate.as_mut() else {
            warn!(operation = %name, "no operate conversion configured, nothing to write");
            return Ok(());
        };
        // balance once per call, not per pair
        conversion.balancer(system)?;
        for &(space, time) in pairs {
            if spaces.contains(&space) {
                continue;
            }
            conversion.write(program, id, space, time, system.horizon());
            spaces.push(space);
            space_times.push((space, time));
        }
        Ok(())
    }

    /// Writes one capacity balance per pair whose space is not already
    /// capacity-balanced. Dedup is keyed by space, like the operate path.
    pub fn write_capacity_conversion(
        &mut self,
        id: OperationId,
        pairs: &[(Space, PeriodsId)],
    ) -> Result<(), ModelError> {
        let Model {
            operations,
            program,
            system,
            ..
        } = self;
        let operation = operations.get_mut(id).ok_or(ModelError::UnknownOperation)?;
        let Operation {
            capacity,
            capacity_spaces,
            ..
        } = operation;
        let Some(conversion) = capacity.as_mut() else {
            return Ok(());
        };
        conversion.balancer(system)?;
        for &(space, time) in pairs {
            if capacity_spaces.contains(&space) {
                continue;
            }
            conversion.write(program, id, space, time, system.horizon());
            capacity_spaces.push(space);
        }
        Ok(())
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}
