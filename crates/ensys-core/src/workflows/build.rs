use crate::core::models::commodity::Commodity;
use crate::core::models::ids::{CommodityId, PeriodsId};
use crate::core::models::periods::Periods;
use crate::core::models::space::{Location, Space};
use crate::core::models::system::{ComponentRef, System};
use crate::engine::config::ModelConfig;
use crate::engine::conversion::ConversionSpec;
use crate::engine::error::ModelError;
use crate::engine::model::Model;
use crate::engine::operation::Operation;
use indexmap::IndexMap;
use tracing::{info, instrument};

/// A declarative, name-based description of one modeling scenario.
///
/// Everything is referred to by name: the workflow resolves names to typed
/// handles as it builds, so a specification can be assembled without touching
/// the registry.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSpec {
    pub config: ModelConfig,
    pub commodities: Vec<String>,
    /// (name, tiles per horizon) for every extra time discretization.
    pub periods: Vec<(String, u32)>,
    pub locations: Vec<String>,
    pub processes: Vec<ProcessSpec>,
}

/// One process of a scenario.
#[derive(Debug, Clone, Default)]
pub struct ProcessSpec {
    pub name: String,
    /// Per-mode coefficient maps, commodity name to signed coefficient.
    pub modes: Vec<Vec<(String, f64)>>,
    /// The commodity the process is denominated in.
    pub resource: Option<String>,
    /// (location, periods) pairs at which the operate variable is defined.
    pub domains: Vec<(String, String)>,
    /// Locations to balance the process at; empty means the network space.
    pub at: Vec<String>,
}

fn commodity_id(system: &System, name: &str) -> Result<CommodityId, ModelError> {
    match system.resolve(name)? {
        ComponentRef::Commodity(id) => Ok(id),
        _ => Err(ModelError::UnknownComponent {
            name: name.to_string(),
        }),
    }
}

fn space_of(system: &System, name: &str) -> Result<Space, ModelError> {
    match system.resolve(name)? {
        ComponentRef::Location(id) => Ok(Space::Location(id)),
        ComponentRef::Linkage(id) => Ok(Space::Linkage(id)),
        _ => Err(ModelError::UnknownComponent {
            name: name.to_string(),
        }),
    }
}

fn periods_of(system: &System, name: &str) -> Result<PeriodsId, ModelError> {
    match system.resolve(name)? {
        ComponentRef::Periods(id) => Ok(id),
        _ => Err(ModelError::UnknownComponent {
            name: name.to_string(),
        }),
    }
}

/// Builds the model a scenario describes and generates all of its
/// constraints.
///
/// Components are registered in specification order, then every process is
/// registered, its operate domains declared, and finally located at its
/// target spaces. The returned model carries the populated constraint
/// program.
#[instrument(skip_all, name = "build_workflow")]
pub fn run(spec: &ScenarioSpec) -> Result<Model, ModelError> {
    info!(
        commodities = spec.commodities.len(),
        processes = spec.processes.len(),
        "building scenario"
    );
    let mut model = Model::new(spec.config.clone());

    for name in &spec.commodities {
        model.system_mut().add_commodity(Commodity::new(name))?;
    }
    for (name, per_horizon) in &spec.periods {
        model
            .system_mut()
            .add_periods(Periods::new(name, *per_horizon))?;
    }
    for name in &spec.locations {
        model.system_mut().add_location(Location::new(name))?;
    }

    let operate_aspect = model.config().operate_aspect.clone();
    for process in &spec.processes {
        let mut modes = Vec::with_capacity(process.modes.len());
        for mode in &process.modes {
            let mut coefficients = IndexMap::new();
            for (commodity, coefficient) in mode {
                coefficients.insert(commodity_id(model.system(), commodity)?, *coefficient);
            }
            modes.push(coefficients);
        }
        let resource = process
            .resource
            .as_deref()
            .map(|name| commodity_id(model.system(), name))
            .transpose()?;
        let conversion = ConversionSpec {
            resource,
            modes,
            lag: None,
        };

        let id = model.register(Operation::process(process.name.clone(), vec![conversion]))?;
        for (location, periods) in &process.domains {
            let space = space_of(model.system(), location)?;
            let time = periods_of(model.system(), periods)?;
            model.declare(&operate_aspect, id, space, time)?;
        }

        let mut targets = Vec::with_capacity(process.at.len());
        for location in &process.at {
            targets.push(space_of(model.system(), location)?);
        }
        let located = model.locate(id, &targets)?;
        info!(process = %process.name, spaces = located.len(), "located process");
    }

    Ok(model)
}
