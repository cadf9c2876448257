//! HookLineageCollector: deduplicated, ordered input/output accumulation

use super::types::{DatasetLineageInfo, HookLineage, LineageDirection};
use crate::config::LineageConfig;
use crate::dataset::{Dataset, DatasetFactoryRegistry, DatasetResolver, Extra};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Insertion-ordered set of observed datasets.
///
/// `index` maps each dataset to its position in `entries`, so a repeat
/// observation only bumps the count.
#[derive(Debug, Default)]
struct LineageSet {
    entries: Vec<DatasetLineageInfo>,
    index: HashMap<Dataset, usize>,
}

impl LineageSet {
    /// Record an observation. Returns true if the dataset was new.
    fn observe(&mut self, dataset: Dataset, reporter: Option<&str>) -> bool {
        if let Some(&pos) = self.index.get(&dataset) {
            self.entries[pos].count += 1;
            return false;
        }
        self.index.insert(dataset.clone(), self.entries.len());
        self.entries.push(DatasetLineageInfo {
            dataset,
            count: 1,
            first_seen: Utc::now(),
            reporter: reporter.map(str::to_string),
        });
        true
    }

    fn datasets(&self) -> Vec<Dataset> {
        self.entries.iter().map(|e| e.dataset.clone()).collect()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[derive(Debug, Default)]
struct CollectorState {
    inputs: LineageSet,
    outputs: LineageSet,
}

impl CollectorState {
    fn set_mut(&mut self, direction: LineageDirection) -> &mut LineageSet {
        match direction {
            LineageDirection::Input => &mut self.inputs,
            LineageDirection::Output => &mut self.outputs,
        }
    }
}

/// Collects the datasets read and written during one logical execution.
///
/// Cloning yields another handle to the same state, so a collector can be
/// injected into any number of storage paths. Resolution failures are
/// swallowed: an `add_*` call whose URI cannot be resolved records nothing.
///
/// A disabled collector (no resolver) ignores every event.
#[derive(Debug, Clone)]
pub struct HookLineageCollector {
    resolver: Option<DatasetResolver>,
    state: Arc<Mutex<CollectorState>>,
}

impl HookLineageCollector {
    /// Create an empty collector resolving through `registry`
    pub fn new(registry: Arc<DatasetFactoryRegistry>) -> Self {
        Self {
            resolver: Some(DatasetResolver::new(registry)),
            state: Arc::new(Mutex::new(CollectorState::default())),
        }
    }

    /// Create a collector that records nothing
    pub fn disabled() -> Self {
        Self {
            resolver: None,
            state: Arc::new(Mutex::new(CollectorState::default())),
        }
    }

    /// Create a collector honoring `config.enabled`
    pub fn with_config(registry: Arc<DatasetFactoryRegistry>, config: &LineageConfig) -> Self {
        if config.enabled {
            Self::new(registry)
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn add_input(&self, uri: &str, extra: Option<&Extra>) {
        self.add(LineageDirection::Input, None, uri, extra);
    }

    pub fn add_output(&self, uri: &str, extra: Option<&Extra>) {
        self.add(LineageDirection::Output, None, uri, extra);
    }

    /// `add_input`, naming the component making the observation
    pub fn add_input_from(&self, reporter: &str, uri: &str, extra: Option<&Extra>) {
        self.add(LineageDirection::Input, Some(reporter), uri, extra);
    }

    /// `add_output`, naming the component making the observation
    pub fn add_output_from(&self, reporter: &str, uri: &str, extra: Option<&Extra>) {
        self.add(LineageDirection::Output, Some(reporter), uri, extra);
    }

    fn add(
        &self,
        direction: LineageDirection,
        reporter: Option<&str>,
        uri: &str,
        extra: Option<&Extra>,
    ) {
        let Some(resolver) = &self.resolver else {
            return;
        };
        // Resolve before locking; factories are user code.
        let Some(dataset) = resolver.resolve(uri, extra) else {
            return;
        };
        let is_new = self.state.lock().set_mut(direction).observe(dataset, reporter);
        trace!(%direction, uri, is_new, "Lineage event recorded");
    }

    /// Input datasets in first-seen order
    pub fn get_inputs(&self) -> Vec<Dataset> {
        self.state.lock().inputs.datasets()
    }

    /// Output datasets in first-seen order
    pub fn get_outputs(&self) -> Vec<Dataset> {
        self.state.lock().outputs.datasets()
    }

    /// Snapshot of everything collected, with observation counts
    pub fn collected(&self) -> HookLineage {
        let state = self.state.lock();
        HookLineage {
            inputs: state.inputs.entries.clone(),
            outputs: state.outputs.entries.clone(),
        }
    }

    pub fn has_collected(&self) -> bool {
        let state = self.state.lock();
        !state.inputs.is_empty() || !state.outputs.is_empty()
    }

    /// Empty the collected state in place. Every handle sees the change.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.inputs.clear();
        state.outputs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{FactoryError, FactoryResult, UriDatasetFactory};

    fn file_collector() -> HookLineageCollector {
        let registry = DatasetFactoryRegistry::new();
        registry.register("file", UriDatasetFactory);
        HookLineageCollector::new(Arc::new(registry))
    }

    #[test]
    fn new_collector_is_empty() {
        let collector = file_collector();
        assert!(collector.get_inputs().is_empty());
        assert!(collector.get_outputs().is_empty());
        assert!(!collector.has_collected());
        assert!(collector.collected().is_empty());
        assert!(collector.is_enabled());
    }

    #[test]
    fn repeated_output_is_recorded_once() {
        let collector = file_collector();
        collector.add_output("file:///tmp/x", None);
        collector.add_output("file:///tmp/x", None);
        assert_eq!(collector.get_outputs(), vec![Dataset::new("file:///tmp/x")]);
        assert!(collector.get_inputs().is_empty());
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let collector = file_collector();
        for uri in ["file:///c", "file:///a", "file:///c", "file:///b", "file:///a"] {
            collector.add_input(uri, None);
        }
        let uris: Vec<String> = collector
            .get_inputs()
            .iter()
            .map(|d| d.uri().to_string())
            .collect();
        assert_eq!(uris, vec!["file:///c", "file:///a", "file:///b"]);
    }

    #[test]
    fn inputs_and_outputs_are_independent() {
        let collector = file_collector();
        collector.add_input("file:///tmp/x", None);
        collector.add_output("file:///tmp/x", None);
        assert_eq!(collector.get_inputs().len(), 1);
        assert_eq!(collector.get_outputs().len(), 1);
    }

    #[test]
    fn observations_are_counted() {
        let collector = file_collector();
        collector.add_input("file:///tmp/x", None);
        collector.add_input("file:///tmp/x", None);
        collector.add_input("file:///tmp/x", None);
        collector.add_input("file:///tmp/y", None);

        let lineage = collector.collected();
        assert_eq!(lineage.inputs.len(), 2);
        assert_eq!(lineage.inputs[0].count, 3);
        assert_eq!(lineage.inputs[1].count, 1);
        assert!(lineage.outputs.is_empty());
    }

    #[test]
    fn first_seen_is_fixed_by_first_observation() {
        let collector = file_collector();
        let before = Utc::now();
        collector.add_output("file:///tmp/x", None);
        let after = Utc::now();

        let first = collector.collected().outputs[0].first_seen;
        assert!(before <= first && first <= after);

        std::thread::sleep(std::time::Duration::from_millis(5));
        collector.add_output("file:///tmp/x", None);
        let entry = &collector.collected().outputs[0];
        assert_eq!(entry.count, 2);
        assert_eq!(entry.first_seen, first);
    }

    #[test]
    fn reporter_of_first_observation_is_kept() {
        let collector = file_collector();
        collector.add_output_from("storage-path", "file:///tmp/x", None);
        collector.add_output_from("other", "file:///tmp/x", None);
        collector.add_output("file:///tmp/y", None);

        let lineage = collector.collected();
        assert_eq!(lineage.outputs[0].reporter.as_deref(), Some("storage-path"));
        assert_eq!(lineage.outputs[1].reporter, None);
    }

    #[test]
    fn extras_distinguish_entries() {
        let collector = file_collector();
        let mut extra = Extra::new();
        extra.insert("partition".to_string(), "2024-01-01".to_string());
        collector.add_output("file:///tmp/x", None);
        collector.add_output("file:///tmp/x", Some(&extra));
        collector.add_output("file:///tmp/x", Some(&extra));
        assert_eq!(collector.get_outputs().len(), 2);
    }

    #[test]
    fn unregistered_scheme_is_silently_ignored() {
        let collector = file_collector();
        collector.add_input("s3://bucket/key", None);
        collector.add_output("not a uri", None);
        assert!(!collector.has_collected());
    }

    #[test]
    fn failing_factory_is_silently_ignored() {
        let registry = DatasetFactoryRegistry::new();
        registry.register("broken", |_: &str, _: Option<&Extra>| -> FactoryResult<Dataset> {
            Err(FactoryError::Other("boom".to_string()))
        });
        let collector = HookLineageCollector::new(Arc::new(registry));
        collector.add_input("broken://x", None);
        assert!(collector.get_inputs().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let collector = file_collector();
        let handle = collector.clone();
        handle.add_input("file:///tmp/x", None);
        assert_eq!(collector.get_inputs().len(), 1);
    }

    #[test]
    fn clear_empties_all_handles() {
        let collector = file_collector();
        let handle = collector.clone();
        collector.add_input("file:///tmp/x", None);
        collector.add_output("file:///tmp/y", None);
        assert!(!collector.collected().is_empty());
        handle.clear();
        assert!(!collector.has_collected());
        assert!(collector.collected().is_empty());

        collector.add_input("file:///tmp/x", None);
        assert_eq!(collector.collected().inputs[0].count, 1);
    }

    #[test]
    fn disabled_collector_records_nothing() {
        let collector = HookLineageCollector::disabled();
        collector.add_input("file:///tmp/x", None);
        collector.add_output("file:///tmp/x", None);
        assert!(!collector.is_enabled());
        assert!(!collector.has_collected());
    }

    #[test]
    fn config_can_disable_collection() {
        let registry = Arc::new(DatasetFactoryRegistry::new());
        registry.register("file", UriDatasetFactory);

        let config = LineageConfig {
            enabled: false,
            ..LineageConfig::default()
        };
        assert!(!HookLineageCollector::with_config(registry.clone(), &config).is_enabled());
        assert!(HookLineageCollector::with_config(registry, &LineageConfig::default()).is_enabled());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let collector = file_collector();
        collector.add_input_from("storage-path", "file:///tmp/in", None);
        collector.add_output("file:///tmp/out", None);

        let json = serde_json::to_value(collector.collected()).unwrap();
        assert_eq!(json["inputs"][0]["dataset"]["uri"], "file:///tmp/in");
        assert_eq!(json["inputs"][0]["reporter"], "storage-path");
        assert_eq!(json["outputs"][0]["count"], 1);
        assert!(json["outputs"][0].get("reporter").is_none());
    }

    #[test]
    fn concurrent_adds_keep_one_entry_per_dataset() {
        let collector = file_collector();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = collector.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        c.add_output(&format!("file:///tmp/{}", i % 5), None);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let lineage = collector.collected();
        assert_eq!(lineage.outputs.len(), 5);
        assert_eq!(lineage.outputs.iter().map(|e| e.count).sum::<u64>(), 400);
    }
}
