//! StoragePath: a URI on an object store with lineage-instrumented I/O

use super::mode::OpenMode;
use super::traits::{ObjectStore, StorageError, StorageResult};
use super::tracked::TrackedFile;
use crate::dataset::parse_scheme;
use crate::lineage::{get_hook_lineage_collector, HookLineageCollector};
use std::sync::Arc;
use tracing::debug;

/// A path into an object store.
///
/// Files opened through a `StoragePath` report their lineage to a collector:
/// the one bound with `with_collector`, or else the process-wide default as
/// it is at `open` time.
#[derive(Debug, Clone)]
pub struct StoragePath {
    store: Arc<dyn ObjectStore>,
    uri: String,
    collector: Option<HookLineageCollector>,
}

impl StoragePath {
    pub fn new(store: Arc<dyn ObjectStore>, uri: impl Into<String>) -> Self {
        Self {
            store,
            uri: uri.into(),
            collector: None,
        }
    }

    /// Report to `collector` instead of the process-wide default
    pub fn with_collector(mut self, collector: HookLineageCollector) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn scheme(&self) -> Option<String> {
        parse_scheme(&self.uri)
    }

    fn collector(&self) -> HookLineageCollector {
        self.collector
            .clone()
            .unwrap_or_else(get_hook_lineage_collector)
    }

    /// Open with a mode string such as `"r"`, `"wb"` or `"a+"`
    pub fn open(&self, mode: &str) -> StorageResult<TrackedFile> {
        self.open_with(mode.parse()?)
    }

    pub fn open_with(&self, mode: OpenMode) -> StorageResult<TrackedFile> {
        let inner = self.store.open(&self.uri, mode)?;
        Ok(TrackedFile::new(inner, self.uri.clone(), mode, self.collector()))
    }

    /// Open, run `f` on the file, and close it whatever `f` returns.
    ///
    /// An error from `f` takes precedence over an error from closing.
    pub fn with_open<T, E, F>(&self, mode: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut TrackedFile) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut file = self.open(mode)?;
        let result = f(&mut file);
        let closed = file.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Read the whole object
    pub fn read_bytes(&self) -> StorageResult<Vec<u8>> {
        self.with_open("rb", |f| f.read())
    }

    /// Replace the object with `data`
    pub fn write_bytes(&self, data: impl AsRef<[u8]>) -> StorageResult<usize> {
        self.with_open("wb", |f| f.write(data))
    }

    /// Delete the object.
    ///
    /// Deletion is not reported as lineage; datasets already collected for
    /// this URI are left as they are.
    pub fn unlink(&self, missing_ok: bool) -> StorageResult<()> {
        self.store.unlink(&self.uri, missing_ok)?;
        debug!(uri = %self.uri, "Deleted object; no lineage recorded for deletes");
        Ok(())
    }

    pub fn exists(&self) -> StorageResult<bool> {
        self.store.exists(&self.uri)
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, DatasetFactoryRegistry, UriDatasetFactory};
    use crate::storage::MemoryFileSystem;

    const URI: &str = "mem://warehouse/orders.parquet";

    fn setup() -> (StoragePath, MemoryFileSystem, HookLineageCollector) {
        let registry = DatasetFactoryRegistry::new();
        registry.register("mem", UriDatasetFactory);
        let collector = HookLineageCollector::new(Arc::new(registry));
        let fs = MemoryFileSystem::new();
        let path = StoragePath::new(Arc::new(fs.clone()), URI).with_collector(collector.clone());
        (path, fs, collector)
    }

    #[test]
    fn scoped_read_reports_without_explicit_close() {
        let (path, fs, collector) = setup();
        fs.insert(URI, "rows");
        let data = path.with_open("r", |f| f.read()).unwrap();
        assert_eq!(data, b"rows");
        assert_eq!(collector.get_inputs(), vec![Dataset::new(URI)]);
    }

    #[test]
    fn scoped_error_still_closes_and_reports() {
        #[derive(Debug)]
        #[allow(dead_code)]
        enum TaskError {
            Storage(StorageError),
            Validation,
        }

        impl From<StorageError> for TaskError {
            fn from(e: StorageError) -> Self {
                Self::Storage(e)
            }
        }

        let (path, fs, collector) = setup();
        let result: Result<(), TaskError> = path.with_open("w", |f| -> Result<(), TaskError> {
            f.write("partial")?;
            Err(TaskError::Validation)
        });

        assert!(matches!(result, Err(TaskError::Validation)));
        assert_eq!(collector.get_outputs(), vec![Dataset::new(URI)]);
        assert_eq!(fs.contents(URI).unwrap(), b"partial");
    }

    #[test]
    fn open_failure_propagates_and_reports_nothing() {
        let (path, _fs, collector) = setup();
        assert!(matches!(path.open("r"), Err(StorageError::NotFound(_))));
        assert!(matches!(path.open("rw"), Err(StorageError::InvalidMode(_))));
        assert!(!collector.has_collected());
    }

    #[test]
    fn unlink_does_not_touch_collected_lineage() {
        let (path, _fs, collector) = setup();
        path.write_bytes("x").unwrap();
        path.unlink(false).unwrap();
        path.unlink(true).unwrap();

        assert!(!path.exists().unwrap());
        assert_eq!(collector.get_outputs(), vec![Dataset::new(URI)]);
        assert!(collector.get_inputs().is_empty());
    }

    #[test]
    fn unlink_alone_records_nothing() {
        let (path, fs, collector) = setup();
        fs.insert(URI, "x");
        path.unlink(false).unwrap();
        assert!(!collector.has_collected());
    }

    #[test]
    fn unlink_missing_propagates_error() {
        let (path, _fs, _collector) = setup();
        assert!(matches!(path.unlink(false), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn read_and_write_helpers_round_trip() {
        let (path, _fs, collector) = setup();
        assert_eq!(path.write_bytes("abc").unwrap(), 3);
        assert_eq!(path.read_bytes().unwrap(), b"abc");
        assert_eq!(collector.get_inputs().len(), 1);
        assert_eq!(collector.get_outputs().len(), 1);
    }

    #[test]
    fn scheme_and_display() {
        let (path, _fs, _collector) = setup();
        assert_eq!(path.scheme().as_deref(), Some("mem"));
        assert_eq!(path.to_string(), URI);
    }
}
