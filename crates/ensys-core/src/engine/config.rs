use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Model-level naming configuration.
///
/// The defaults give the conventional component names; models that embed
/// several submodels in one namespace can rename them through the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Name of the coarsest time period, created at model construction.
    pub horizon_name: String,
    /// Name of the implicit network-wide location.
    pub network_name: String,
    /// Name of the aspect governing operation scheduling.
    pub operate_aspect: String,
    /// Name of the aspect governing installed capacity.
    pub capacity_aspect: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            horizon_name: "horizon".to_string(),
            network_name: "network".to_string(),
            operate_aspect: "operate".to_string(),
            capacity_aspect: "capacity".to_string(),
        }
    }
}

#[derive(Default)]
pub struct ModelConfigBuilder {
    horizon_name: Option<String>,
    network_name: Option<String>,
    operate_aspect: Option<String>,
    capacity_aspect: Option<String>,
}

impl ModelConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn horizon_name(mut self, name: impl Into<String>) -> Self {
        self.horizon_name = Some(name.into());
        self
    }
    pub fn network_name(mut self, name: impl Into<String>) -> Self {
        self.network_name = Some(name.into());
        self
    }
    pub fn operate_aspect(mut self, name: impl Into<String>) -> Self {
        self.operate_aspect = Some(name.into());
        self
    }
    pub fn capacity_aspect(mut self, name: impl Into<String>) -> Self {
        self.capacity_aspect = Some(name.into());
        self
    }

    pub fn build(self) -> Result<ModelConfig, ConfigError> {
        let defaults = ModelConfig::default();
        let config = ModelConfig {
            horizon_name: self.horizon_name.unwrap_or(defaults.horizon_name),
            network_name: self.network_name.unwrap_or(defaults.network_name),
            operate_aspect: self.operate_aspect.unwrap_or(defaults.operate_aspect),
            capacity_aspect: self.capacity_aspect.unwrap_or(defaults.capacity_aspect),
        };
        if config.horizon_name.is_empty() {
            return Err(ConfigError::MissingParameter("horizon_name"));
        }
        if config.network_name.is_empty() {
            return Err(ConfigError::MissingParameter("network_name"));
        }
        if config.operate_aspect.is_empty() {
            return Err(ConfigError::MissingParameter("operate_aspect"));
        }
        if config.capacity_aspect.is_empty() {
            return Err(ConfigError::MissingParameter("capacity_aspect"));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_defaults() {
        let config = ModelConfigBuilder::new()
            .horizon_name("year")
            .build()
            .unwrap();
        assert_eq!(config.horizon_name, "year");
        assert_eq!(config.network_name, "network");
        assert_eq!(config.operate_aspect, "operate");
        assert_eq!(config.capacity_aspect, "capacity");
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = ModelConfigBuilder::new().operate_aspect("").build();
        assert_eq!(err, Err(ConfigError::MissingParameter("operate_aspect")));
    }
}
