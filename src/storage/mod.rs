//! Storage backends and lineage-instrumented paths
//!
//! Backends implement the `ObjectStore` trait. `StoragePath` wraps a store
//! and a URI; files opened through it are `TrackedFile`s, which report the
//! datasets they read and write to a `HookLineageCollector`.

mod local;
mod memory;
mod mode;
mod path;
mod tracked;
mod traits;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;
pub use mode::OpenMode;
pub use path::StoragePath;
pub use tracked::{TrackedFile, STORAGE_REPORTER};
pub use traits::{ObjectStore, StorageError, StorageHandle, StorageResult};
