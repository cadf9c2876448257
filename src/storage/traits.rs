//! Storage trait definitions

use super::mode::OpenMode;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid open mode: {0}")]
    InvalidMode(String),

    #[error("Handle not opened for reading: {0}")]
    NotReadable(String),

    #[error("Handle not opened for writing: {0}")]
    NotWritable(String),

    #[error("I/O operation on closed handle: {0}")]
    Closed(String),

    #[error("Unsupported URI: {0}")]
    UnsupportedUri(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An open file-like handle on a storage backend
pub trait StorageHandle: Send {
    /// Read from the current position to the end
    fn read(&mut self) -> StorageResult<Vec<u8>>;

    /// Write `data` at the current position, returning the bytes written
    fn write(&mut self, data: &[u8]) -> StorageResult<usize>;

    /// Flush and release the handle
    fn close(&mut self) -> StorageResult<()>;
}

/// Trait for object storage backends
///
/// Implementations must be thread-safe (Send + Sync); one store is shared
/// by every path that points into it.
pub trait ObjectStore: std::fmt::Debug + Send + Sync {
    /// Open the object at `uri`
    fn open(&self, uri: &str, mode: OpenMode) -> StorageResult<Box<dyn StorageHandle>>;

    /// Delete the object at `uri`
    ///
    /// A missing object is an error unless `missing_ok` is set.
    fn unlink(&self, uri: &str, missing_ok: bool) -> StorageResult<()>;

    /// Check whether an object exists
    fn exists(&self, uri: &str) -> StorageResult<bool>;
}
