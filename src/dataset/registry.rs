//! Scheme → factory registry

use super::factory::DatasetFactory;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// Maps URI schemes to the factories that build datasets for them.
///
/// Schemes are stored lowercase, matching how `Url` normalizes them.
/// Thread-safe; providers may register while lineage is being collected.
#[derive(Default)]
pub struct DatasetFactoryRegistry {
    factories: DashMap<String, Arc<dyn DatasetFactory>>,
}

impl DatasetFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the default collector.
    ///
    /// Starts empty; providers register their schemes into it.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<DatasetFactoryRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Register a factory for a scheme, returning the one it replaced
    pub fn register(
        &self,
        scheme: &str,
        factory: impl DatasetFactory + 'static,
    ) -> Option<Arc<dyn DatasetFactory>> {
        self.register_arc(scheme, Arc::new(factory))
    }

    /// Register an already shared factory
    pub fn register_arc(
        &self,
        scheme: &str,
        factory: Arc<dyn DatasetFactory>,
    ) -> Option<Arc<dyn DatasetFactory>> {
        self.factories.insert(scheme.to_ascii_lowercase(), factory)
    }

    /// Remove the factory for a scheme. Returns whether one was registered.
    pub fn unregister(&self, scheme: &str) -> bool {
        self.factories.remove(&scheme.to_ascii_lowercase()).is_some()
    }

    pub fn get(&self, scheme: &str) -> Option<Arc<dyn DatasetFactory>> {
        self.factories
            .get(&scheme.to_ascii_lowercase())
            .map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.factories.contains_key(&scheme.to_ascii_lowercase())
    }

    /// Registered schemes, sorted
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.factories.iter().map(|r| r.key().clone()).collect();
        schemes.sort();
        schemes
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for DatasetFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetFactoryRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
