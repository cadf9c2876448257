//! Dataset identities and the scheme-keyed factories that produce them
//!
//! A `Dataset` is an immutable value keyed by URI plus extras. Factories are
//! registered per URI scheme in a `DatasetFactoryRegistry`; the
//! `DatasetResolver` turns a URI into a `Dataset` through that registry.

mod factory;
mod registry;
mod resolver;
mod types;

pub use factory::{DatasetFactory, FactoryError, FactoryResult, UriDatasetFactory};
pub use registry::DatasetFactoryRegistry;
pub use resolver::{DatasetResolver, ResolveError};
pub use types::{Dataset, Extra};

pub(crate) use types::parse_scheme;
