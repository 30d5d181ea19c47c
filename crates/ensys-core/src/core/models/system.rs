use super::commodity::Commodity;
use super::ids::{CommodityId, LinkageId, LocationId, OperationId, PeriodsId};
use super::periods::Periods;
use super::space::{Linkage, Location, Space};
use crate::engine::error::ModelError;
use indexmap::IndexMap;
use slotmap::SlotMap;

/// A reference to any registered model component, as resolved by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentRef {
    Commodity(CommodityId),
    Location(LocationId),
    Linkage(LinkageId),
    Periods(PeriodsId),
    Operation(OperationId),
}

/// The resource-task-network registry.
///
/// Owns every commodity, space, and time discretization of a model, plus the
/// name and alias registry that resolves user-facing short names to typed
/// handles. Two components are created implicitly at construction: the
/// network-wide location (the default space when an operation is located
/// without arguments) and the horizon (the coarsest period).
#[derive(Debug)]
pub struct System {
    commodities: SlotMap<CommodityId, Commodity>,
    locations: SlotMap<LocationId, Location>,
    linkages: SlotMap<LinkageId, Linkage>,
    periods: SlotMap<PeriodsId, Periods>,
    /// Canonical name -> component.
    names: IndexMap<String, ComponentRef>,
    /// Alias -> canonical name. Disjoint from `names` by construction.
    aliases: IndexMap<String, String>,
    network: LocationId,
    horizon: PeriodsId,
}

impl System {
    pub fn new(network_name: &str, horizon_name: &str) -> Self {
        let mut locations = SlotMap::with_key();
        let mut periods = SlotMap::with_key();
        let network = locations.insert(Location::new(network_name));
        let horizon = periods.insert(Periods::new(horizon_name, 1));

        let mut names = IndexMap::new();
        names.insert(network_name.to_string(), ComponentRef::Location(network));
        names.insert(horizon_name.to_string(), ComponentRef::Periods(horizon));

        Self {
            commodities: SlotMap::with_key(),
            locations,
            linkages: SlotMap::with_key(),
            periods,
            names,
            aliases: IndexMap::new(),
            network,
            horizon,
        }
    }

    /// The implicit network-wide space.
    pub fn network(&self) -> Space {
        Space::Location(self.network)
    }

    /// The coarsest time period.
    pub fn horizon(&self) -> PeriodsId {
        self.horizon
    }

    pub fn add_commodity(&mut self, commodity: Commodity) -> Result<CommodityId, ModelError> {
        self.check_name_free(&commodity.name)?;
        let name = commodity.name.clone();
        let id = self.commodities.insert(commodity);
        self.names.insert(name, ComponentRef::Commodity(id));
        Ok(id)
    }

    pub fn add_location(&mut self, location: Location) -> Result<LocationId, ModelError> {
        self.check_name_free(&location.name)?;
        let name = location.name.clone();
        let id = self.locations.insert(location);
        self.names.insert(name, ComponentRef::Location(id));
        Ok(id)
    }

    pub fn add_linkage(&mut self, linkage: Linkage) -> Result<LinkageId, ModelError> {
        self.check_name_free(&linkage.name)?;
        let name = linkage.name.clone();
        let id = self.linkages.insert(linkage);
        self.names.insert(name, ComponentRef::Linkage(id));
        Ok(id)
    }

    pub fn add_periods(&mut self, periods: Periods) -> Result<PeriodsId, ModelError> {
        self.check_name_free(&periods.name)?;
        let name = periods.name.clone();
        let id = self.periods.insert(periods);
        self.names.insert(name, ComponentRef::Periods(id));
        Ok(id)
    }

    /// Registers the canonical name of an operation. Called by the model when
    /// an operation is attached; operations themselves live on the model.
    pub(crate) fn register_operation(
        &mut self,
        name: &str,
        id: OperationId,
    ) -> Result<(), ModelError> {
        self.check_name_free(name)?;
        self.names
            .insert(name.to_string(), ComponentRef::Operation(id));
        Ok(())
    }

    pub fn commodity(&self, id: CommodityId) -> Option<&Commodity> {
        self.commodities.get(id)
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn linkage(&self, id: LinkageId) -> Option<&Linkage> {
        self.linkages.get(id)
    }

    pub fn periods(&self, id: PeriodsId) -> Option<&Periods> {
        self.periods.get(id)
    }

    pub fn contains_commodity(&self, id: CommodityId) -> bool {
        self.commodities.contains_key(id)
    }

    /// Human-readable name of a space, for diagnostics.
    pub fn space_name(&self, space: Space) -> &str {
        match space {
            Space::Location(id) => self.locations.get(id).map(|l| l.name.as_str()),
            Space::Linkage(id) => self.linkages.get(id).map(|l| l.name.as_str()),
        }
        .unwrap_or("<unknown space>")
    }

    /// The finest discretization among the given periods, i.e. the one with
    /// the largest tile count. Unknown handles are skipped.
    pub fn finest(&self, times: impl IntoIterator<Item = PeriodsId>) -> Option<PeriodsId> {
        times
            .into_iter()
            .filter(|&t| self.periods.contains_key(t))
            .max_by_key(|&t| self.periods[t].per_horizon)
    }

    /// Registers `alias` as an alternative name for the component registered
    /// under `canonical`. Aliases share one global namespace with canonical
    /// names; a collision with either is rejected at registration time.
    pub fn alias(&mut self, alias: &str, canonical: &str) -> Result<(), ModelError> {
        if !self.names.contains_key(canonical) {
            return Err(ModelError::UnknownComponent {
                name: canonical.to_string(),
            });
        }
        self.check_name_free(alias)?;
        self.aliases
            .insert(alias.to_string(), canonical.to_string());
        Ok(())
    }

    /// Resolves a canonical name or alias to its component.
    pub fn resolve(&self, name: &str) -> Result<ComponentRef, ModelError> {
        if let Some(&component) = self.names.get(name) {
            return Ok(component);
        }
        if let Some(canonical) = self.aliases.get(name) {
            if let Some(&component) = self.names.get(canonical) {
                return Ok(component);
            }
        }
        Err(ModelError::UnknownComponent {
            name: name.to_string(),
        })
    }

    fn check_name_free(&self, name: &str) -> Result<(), ModelError> {
        let existing = if self.names.contains_key(name) {
            Some(name.to_string())
        } else {
            self.aliases.get(name).cloned()
        };
        match existing {
            Some(existing) => Err(ModelError::DuplicateAlias {
                alias: name.to_string(),
                existing,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_system() -> System {
        System::new("network", "horizon")
    }

    #[test]
    fn implicit_components_are_resolvable() {
        let system = create_test_system();
        assert_eq!(
            system.resolve("network").unwrap(),
            ComponentRef::Location(match system.network() {
                Space::Location(id) => id,
                Space::Linkage(_) => unreachable!(),
            })
        );
        assert_eq!(
            system.resolve("horizon").unwrap(),
            ComponentRef::Periods(system.horizon())
        );
        assert!(system.periods(system.horizon()).unwrap().is_horizon());
    }

    #[test]
    fn registration_and_lookup() {
        let mut system = create_test_system();
        let power = system.add_commodity(Commodity::new("power")).unwrap();
        let l1 = system.add_location(Location::new("l1")).unwrap();

        assert_eq!(
            system.resolve("power").unwrap(),
            ComponentRef::Commodity(power)
        );
        assert_eq!(system.resolve("l1").unwrap(), ComponentRef::Location(l1));
        assert!(matches!(
            system.resolve("gas"),
            Err(ModelError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn aliases_resolve_to_the_same_component() {
        let mut system = create_test_system();
        let power = system.add_commodity(Commodity::new("power")).unwrap();
        system.alias("elec", "power").unwrap();

        assert_eq!(
            system.resolve("elec").unwrap(),
            ComponentRef::Commodity(power)
        );
    }

    #[test]
    fn alias_collisions_are_rejected() {
        let mut system = create_test_system();
        system.add_commodity(Commodity::new("power")).unwrap();
        system.add_commodity(Commodity::new("gas")).unwrap();
        system.alias("p", "power").unwrap();

        // an alias cannot shadow a canonical name
        assert!(matches!(
            system.alias("gas", "power"),
            Err(ModelError::DuplicateAlias { .. })
        ));
        // nor an existing alias
        assert!(matches!(
            system.alias("p", "gas"),
            Err(ModelError::DuplicateAlias { .. })
        ));
        // nor can a component take a name an alias holds
        assert!(matches!(
            system.add_commodity(Commodity::new("p")),
            Err(ModelError::DuplicateAlias { .. })
        ));
        // aliasing an unknown canonical name is a distinct condition
        assert!(matches!(
            system.alias("h", "hydrogen"),
            Err(ModelError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn finest_picks_the_largest_tile_count() {
        let mut system = create_test_system();
        let day = system.add_periods(Periods::new("day", 365)).unwrap();
        let week = system.add_periods(Periods::new("week", 52)).unwrap();
        let horizon = system.horizon();

        assert_eq!(system.finest([horizon, week, day]), Some(day));
        assert_eq!(system.finest([week, horizon]), Some(week));
        assert_eq!(system.finest([]), None);
    }
}
