//! Process-wide default collector
//!
//! Convenience for single-threaded hosts: call sites deep inside storage
//! wrappers can reach a collector without it being passed in. The default
//! mixes events from every logical execution in the process, so hosts
//! running executions concurrently should inject a collector per execution
//! instead (`StoragePath::with_collector`).
//!
//! The lifecycle manager of the host calls `reset_hook_lineage_collector()`
//! at execution boundaries, never mid-operation.

use super::collector::HookLineageCollector;
use crate::dataset::DatasetFactoryRegistry;
use parking_lot::{const_mutex, Mutex};

static DEFAULT_COLLECTOR: Mutex<Option<HookLineageCollector>> = const_mutex(None);

/// Current default collector, created on first use against
/// `DatasetFactoryRegistry::global()`.
pub fn get_hook_lineage_collector() -> HookLineageCollector {
    DEFAULT_COLLECTOR
        .lock()
        .get_or_insert_with(|| HookLineageCollector::new(DatasetFactoryRegistry::global()))
        .clone()
}

/// Discard the default collector; the next accessor call builds a fresh one.
///
/// Handles obtained before the reset keep pointing at the old state.
pub fn reset_hook_lineage_collector() {
    DEFAULT_COLLECTOR.lock().take();
}

/// Install `collector` as the default, returning the previous one
pub fn set_hook_lineage_collector(collector: HookLineageCollector) -> Option<HookLineageCollector> {
    DEFAULT_COLLECTOR.lock().replace(collector)
}
