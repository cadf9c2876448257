//! Hook lineage: transparent dataset lineage for storage I/O
//!
//! Records which datasets a logical execution (one task run, one test) read
//! and wrote, without the code doing the I/O having to report anything.
//!
//! # Core Concepts
//!
//! - **Dataset**: immutable identity of an external resource, keyed by URI
//! - **Factory registry**: maps URI schemes to the factories that build datasets
//! - **Collector**: deduplicated, ordered inputs and outputs for one execution
//! - **Storage path**: a URI on an object store whose files report lineage on close
//!
//! # Example
//!
//! ```
//! use hook_lineage::{
//!     DatasetFactoryRegistry, HookLineageCollector, MemoryFileSystem, StoragePath,
//!     UriDatasetFactory,
//! };
//! use std::sync::Arc;
//!
//! let registry = DatasetFactoryRegistry::new();
//! registry.register("mem", UriDatasetFactory);
//! let collector = HookLineageCollector::new(Arc::new(registry));
//!
//! let path = StoragePath::new(Arc::new(MemoryFileSystem::new()), "mem://reports/daily.csv")
//!     .with_collector(collector.clone());
//! path.write_bytes("date,total\n").unwrap();
//!
//! assert_eq!(collector.get_outputs().len(), 1);
//! ```

pub mod config;
pub mod dataset;
pub mod lineage;
pub mod storage;

pub use config::{ConfigError, ConfigResult, LineageConfig};
pub use dataset::{
    Dataset, DatasetFactory, DatasetFactoryRegistry, DatasetResolver, Extra, FactoryError,
    FactoryResult, ResolveError, UriDatasetFactory,
};
pub use lineage::{
    get_hook_lineage_collector, reset_hook_lineage_collector, set_hook_lineage_collector,
    DatasetLineageInfo, HookLineage, HookLineageCollector, LineageDirection,
};
pub use storage::{
    LocalFileSystem, MemoryFileSystem, ObjectStore, OpenMode, StorageError, StorageHandle,
    StoragePath, StorageResult, TrackedFile,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
