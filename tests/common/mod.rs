//! Shared helpers for integration tests
//!
//! Tests touching the process-wide default collector must hold the guard
//! from `lineage_scope()` for their whole body.

#![allow(dead_code)]

use hook_lineage::{
    reset_hook_lineage_collector, DatasetFactoryRegistry, LocalFileSystem, UriDatasetFactory,
};
use parking_lot::{const_mutex, Mutex, MutexGuard};
use std::path::Path;

static DEFAULT_COLLECTOR_LOCK: Mutex<()> = const_mutex(());

/// Exclusive use of the default collector, like a fresh task run.
///
/// Registers the `file` scheme on the global registry and starts from an
/// empty collector; the collector is reset again when the scope ends.
pub struct LineageScope {
    _guard: MutexGuard<'static, ()>,
}

impl Drop for LineageScope {
    fn drop(&mut self) {
        reset_hook_lineage_collector();
    }
}

pub fn lineage_scope() -> LineageScope {
    let guard = DEFAULT_COLLECTOR_LOCK.lock();
    DatasetFactoryRegistry::global().register("file", UriDatasetFactory);
    reset_hook_lineage_collector();
    LineageScope { _guard: guard }
}

/// A `file://` URI for a fresh name inside `dir`
pub fn unique_file_uri(dir: &Path) -> String {
    let path = dir.join(uuid::Uuid::new_v4().to_string());
    LocalFileSystem::path_to_uri(&path).expect("tempdir paths are absolute")
}
