//! Local filesystem object store for `file://` URIs

use super::mode::OpenMode;
use super::traits::{ObjectStore, StorageError, StorageHandle, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// Object store over the host filesystem.
///
/// Accepts `file://` URIs and plain filesystem paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Convert a `file://` URI (or a bare path) to a filesystem path
    pub fn uri_to_path(uri: &str) -> StorageResult<PathBuf> {
        match Url::parse(uri) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_err(|()| StorageError::UnsupportedUri(uri.to_string())),
            Ok(_) => Err(StorageError::UnsupportedUri(uri.to_string())),
            Err(_) => Ok(PathBuf::from(uri)),
        }
    }

    /// Convert a filesystem path to a `file://` URI, resolving relative
    /// paths against the working directory
    pub fn path_to_uri(path: &Path) -> StorageResult<String> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Url::from_file_path(&absolute)
            .map(String::from)
            .map_err(|()| StorageError::UnsupportedUri(absolute.display().to_string()))
    }
}

/// Map the io error kinds that have a dedicated variant
fn io_error(uri: &str, err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::NotFound(uri.to_string()),
        ErrorKind::AlreadyExists => StorageError::AlreadyExists(uri.to_string()),
        _ => StorageError::Io(err),
    }
}

impl ObjectStore for LocalFileSystem {
    fn open(&self, uri: &str, mode: OpenMode) -> StorageResult<Box<dyn StorageHandle>> {
        let path = Self::uri_to_path(uri)?;
        let mut options = OpenOptions::new();
        options.read(mode.readable());
        if mode.is_append() {
            options.append(true);
        } else {
            options.write(mode.writable());
        }
        options.truncate(mode.truncates());
        if mode.is_exclusive() {
            options.create_new(true);
        } else {
            options.create(mode.creates());
        }

        let file = options.open(&path).map_err(|e| io_error(uri, e))?;
        Ok(Box::new(LocalHandle {
            file: Some(file),
            uri: uri.to_string(),
            mode,
        }))
    }

    fn unlink(&self, uri: &str, missing_ok: bool) -> StorageResult<()> {
        let path = Self::uri_to_path(uri)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound && missing_ok => Ok(()),
            Err(e) => Err(io_error(uri, e)),
        }
    }

    fn exists(&self, uri: &str) -> StorageResult<bool> {
        Ok(Self::uri_to_path(uri)?.exists())
    }
}

struct LocalHandle {
    /// `None` once closed
    file: Option<File>,
    uri: String,
    mode: OpenMode,
}

impl LocalHandle {
    fn file(&mut self) -> StorageResult<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| StorageError::Closed(self.uri.clone()))
    }
}

impl StorageHandle for LocalHandle {
    fn read(&mut self) -> StorageResult<Vec<u8>> {
        if !self.mode.readable() {
            return Err(StorageError::NotReadable(self.uri.clone()));
        }
        let mut data = Vec::new();
        self.file()?.read_to_end(&mut data)?;
        Ok(data)
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<usize> {
        if !self.mode.writable() {
            return Err(StorageError::NotWritable(self.uri.clone()));
        }
        self.file()?.write_all(data)?;
        Ok(data.len())
    }

    fn close(&mut self) -> StorageResult<()> {
        match self.file.take() {
            Some(mut file) => {
                file.flush()?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}
