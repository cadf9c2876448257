//! Lineage configuration, loaded from YAML

use crate::dataset::{DatasetFactoryRegistry, UriDatasetFactory};
use crate::lineage::HookLineageCollector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Lineage collection settings.
///
/// ```yaml
/// enabled: true
/// passthrough_schemes: [file, s3]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    /// When false, collectors built from this config record nothing
    pub enabled: bool,
    /// Schemes whose datasets are identified by their URI as-is
    pub passthrough_schemes: Vec<String>,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            passthrough_schemes: vec!["file".to_string()],
        }
    }
}

impl LineageConfig {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Register `UriDatasetFactory` for each passthrough scheme.
    ///
    /// Schemes that already have a factory keep it.
    pub fn register_into(&self, registry: &DatasetFactoryRegistry) {
        for scheme in &self.passthrough_schemes {
            if !registry.contains(scheme) {
                registry.register(scheme, UriDatasetFactory);
            }
        }
    }

    /// A fresh registry holding the passthrough factories
    pub fn build_registry(&self) -> DatasetFactoryRegistry {
        let registry = DatasetFactoryRegistry::new();
        self.register_into(&registry);
        registry
    }

    /// A collector over a fresh registry built from this config
    pub fn build_collector(&self) -> HookLineageCollector {
        HookLineageCollector::with_config(Arc::new(self.build_registry()), self)
    }
}
