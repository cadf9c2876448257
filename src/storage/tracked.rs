//! TrackedFile: a storage handle that reports dataset lineage
//!
//! Reads and writes only mark the handle; the collector is called from
//! `close`. A handle therefore produces at most one input and one output
//! event however many I/O calls it serves. Operations that fail mark
//! nothing.

use super::mode::OpenMode;
use super::traits::{StorageError, StorageHandle, StorageResult};
use crate::lineage::HookLineageCollector;
use tracing::{debug, warn};

/// Reporter name attached to events from storage paths
pub const STORAGE_REPORTER: &str = "storage-path";

/// Instrumented file handle returned by `StoragePath::open`.
///
/// Owns the underlying handle. Dropping an unclosed `TrackedFile` closes it,
/// so lineage is reported even when the caller bails out early with an
/// error. A handle dropped while its thread panics is closed but reports
/// nothing.
pub struct TrackedFile {
    inner: Box<dyn StorageHandle>,
    uri: String,
    mode: OpenMode,
    collector: HookLineageCollector,
    pending_input: bool,
    pending_output: bool,
    closed: bool,
}

impl TrackedFile {
    pub(crate) fn new(
        inner: Box<dyn StorageHandle>,
        uri: String,
        mode: OpenMode,
        collector: HookLineageCollector,
    ) -> Self {
        Self {
            inner,
            uri,
            mode,
            collector,
            pending_input: false,
            pending_output: false,
            closed: false,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed(self.uri.clone()));
        }
        Ok(())
    }

    /// Read the remaining content
    pub fn read(&mut self) -> StorageResult<Vec<u8>> {
        self.ensure_open()?;
        let data = self.inner.read()?;
        self.pending_input = true;
        Ok(data)
    }

    /// Read the remaining content as UTF-8
    pub fn read_to_string(&mut self) -> StorageResult<String> {
        let data = self.read()?;
        String::from_utf8(data)
            .map_err(|e| StorageError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Write `data`, returning the number of bytes written
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> StorageResult<usize> {
        self.ensure_open()?;
        let written = self.inner.write(data.as_ref())?;
        self.pending_output = true;
        Ok(written)
    }

    /// Close the underlying handle and report pending lineage.
    ///
    /// Lineage for completed reads and writes is reported even if the
    /// underlying close fails; that error is still returned. Calling
    /// `close` again is a no-op.
    pub fn close(&mut self) -> StorageResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.inner.close();
        self.report_lineage();
        result
    }

    fn close_without_lineage(&mut self) -> StorageResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.pending_input || self.pending_output {
            debug!(uri = %self.uri, "Dropped during a panic; lineage not reported");
        }
        self.pending_input = false;
        self.pending_output = false;
        self.inner.close()
    }

    fn report_lineage(&mut self) {
        if std::mem::take(&mut self.pending_input) {
            self.collector
                .add_input_from(STORAGE_REPORTER, &self.uri, None);
        }
        if std::mem::take(&mut self.pending_output) {
            self.collector
                .add_output_from(STORAGE_REPORTER, &self.uri, None);
        }
    }
}

impl Drop for TrackedFile {
    fn drop(&mut self) {
        // Lineage resolution runs provider code; a second panic while
        // unwinding would abort, so only the handle is closed.
        let result = if std::thread::panicking() {
            self.close_without_lineage()
        } else {
            self.close()
        };
        if let Err(e) = result {
            warn!(uri = %self.uri, error = %e, "Failed to close file on drop");
        }
    }
}

impl std::fmt::Debug for TrackedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedFile")
            .field("uri", &self.uri)
            .field("mode", &self.mode)
            .field("closed", &self.closed)
            .finish()
    }
}
