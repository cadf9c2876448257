//! URI → Dataset resolution
//!
//! `try_resolve` reports why a URI could not be resolved. `resolve` is the
//! form lineage collection uses: every failure becomes `None` and is only
//! logged, so it can never reach the storage call that triggered it.

use super::factory::FactoryError;
use super::registry::DatasetFactoryRegistry;
use super::types::{parse_scheme, Dataset, Extra};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Why a URI could not be turned into a dataset
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("No dataset factory registered for scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Dataset factory failed: {0}")]
    Factory(#[from] FactoryError),
}

/// Resolves URIs through a factory registry
#[derive(Debug, Clone)]
pub struct DatasetResolver {
    registry: Arc<DatasetFactoryRegistry>,
}

impl DatasetResolver {
    pub fn new(registry: Arc<DatasetFactoryRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve a URI, reporting the failure reason
    pub fn try_resolve(&self, uri: &str, extra: Option<&Extra>) -> Result<Dataset, ResolveError> {
        let scheme = parse_scheme(uri).ok_or_else(|| ResolveError::InvalidUri(uri.to_string()))?;
        let factory = self
            .registry
            .get(&scheme)
            .ok_or(ResolveError::UnsupportedScheme(scheme))?;
        Ok(factory.create(uri, extra)?)
    }

    /// Resolve a URI, or `None` if it cannot be resolved
    pub fn resolve(&self, uri: &str, extra: Option<&Extra>) -> Option<Dataset> {
        match self.try_resolve(uri, extra) {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                debug!(uri, error = %e, "Skipping lineage for unresolvable dataset");
                None
            }
        }
    }
}
