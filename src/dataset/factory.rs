//! Per-scheme dataset factories

use super::types::{Dataset, Extra};
use thiserror::Error;

/// Errors a factory may return when it cannot build a dataset
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("{0}")]
    Other(String),
}

/// Result type for factory calls
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Turns a URI plus optional extras into a `Dataset`.
///
/// Implemented for plain closures so providers can register a function
/// without defining a type.
///
/// Factories must not panic. Failures are reported by returning a
/// `FactoryError`, which callers on the I/O path swallow; a panic instead
/// unwinds through whatever file operation triggered resolution.
pub trait DatasetFactory: Send + Sync {
    fn create(&self, uri: &str, extra: Option<&Extra>) -> FactoryResult<Dataset>;
}

impl<F> DatasetFactory for F
where
    F: Fn(&str, Option<&Extra>) -> FactoryResult<Dataset> + Send + Sync,
{
    fn create(&self, uri: &str, extra: Option<&Extra>) -> FactoryResult<Dataset> {
        self(uri, extra)
    }
}

/// Builds a dataset whose identity is exactly the given URI and extras.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriDatasetFactory;

impl DatasetFactory for UriDatasetFactory {
    fn create(&self, uri: &str, extra: Option<&Extra>) -> FactoryResult<Dataset> {
        if uri.trim().is_empty() {
            return Err(FactoryError::InvalidUri(uri.to_string()));
        }
        Ok(Dataset::new(uri).with_extra(extra.cloned().unwrap_or_default()))
    }
}
