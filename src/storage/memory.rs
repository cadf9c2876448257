//! In-memory object store
//!
//! Objects live in a shared map keyed by URI. Writes go to a per-handle
//! buffer and are published on `close`, like a buffered file.

use super::mode::OpenMode;
use super::traits::{ObjectStore, StorageError, StorageHandle, StorageResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Object store backed by process memory. Clones share the same objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    objects: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly, bypassing handles
    pub fn insert(&self, uri: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.insert(uri.into(), data.into());
    }

    /// Current content of an object
    pub fn contents(&self, uri: &str) -> Option<Vec<u8>> {
        self.objects.get(uri).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for MemoryFileSystem {
    fn open(&self, uri: &str, mode: OpenMode) -> StorageResult<Box<dyn StorageHandle>> {
        let buffer = match self.objects.entry(uri.to_string()) {
            Entry::Occupied(_) if mode.is_exclusive() => {
                return Err(StorageError::AlreadyExists(uri.to_string()));
            }
            Entry::Occupied(mut entry) => {
                if mode.truncates() {
                    entry.get_mut().clear();
                }
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                if !mode.creates() {
                    return Err(StorageError::NotFound(uri.to_string()));
                }
                entry.insert(Vec::new());
                Vec::new()
            }
        };
        let pos = if mode.is_append() { buffer.len() } else { 0 };

        Ok(Box::new(MemoryHandle {
            objects: Arc::clone(&self.objects),
            uri: uri.to_string(),
            mode,
            buffer,
            pos,
            dirty: false,
            closed: false,
        }))
    }

    fn unlink(&self, uri: &str, missing_ok: bool) -> StorageResult<()> {
        match self.objects.remove(uri) {
            Some(_) => Ok(()),
            None if missing_ok => Ok(()),
            None => Err(StorageError::NotFound(uri.to_string())),
        }
    }

    fn exists(&self, uri: &str) -> StorageResult<bool> {
        Ok(self.objects.contains_key(uri))
    }
}

struct MemoryHandle {
    objects: Arc<DashMap<String, Vec<u8>>>,
    uri: String,
    mode: OpenMode,
    buffer: Vec<u8>,
    pos: usize,
    dirty: bool,
    closed: bool,
}

impl MemoryHandle {
    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed(self.uri.clone()));
        }
        Ok(())
    }
}

impl StorageHandle for MemoryHandle {
    fn read(&mut self) -> StorageResult<Vec<u8>> {
        self.ensure_open()?;
        if !self.mode.readable() {
            return Err(StorageError::NotReadable(self.uri.clone()));
        }
        let start = self.pos.min(self.buffer.len());
        let data = self.buffer[start..].to_vec();
        self.pos = self.buffer.len();
        Ok(data)
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<usize> {
        self.ensure_open()?;
        if !self.mode.writable() {
            return Err(StorageError::NotWritable(self.uri.clone()));
        }
        if self.mode.is_append() {
            self.pos = self.buffer.len();
        }
        let end = self.pos + data.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.pos..end].copy_from_slice(data);
        self.pos = end;
        self.dirty = true;
        Ok(data.len())
    }

    fn close(&mut self) -> StorageResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.dirty {
            self.objects
                .insert(self.uri.clone(), std::mem::take(&mut self.buffer));
        }
        Ok(())
    }
}
