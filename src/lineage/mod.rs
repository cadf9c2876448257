//! Hook lineage collection: which datasets a logical execution read and wrote.

mod collector;
mod global;
mod types;

pub use collector::HookLineageCollector;
pub use global::{
    get_hook_lineage_collector, reset_hook_lineage_collector, set_hook_lineage_collector,
};
pub use types::{DatasetLineageInfo, HookLineage, LineageDirection};
