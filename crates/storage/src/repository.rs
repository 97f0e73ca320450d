use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable home of the single progress blob.
///
/// Implementations replace the blob atomically: a reader sees either the
/// previous blob or the new one, never a mix.
pub trait StateRepository: Send + Sync {
    /// Read the stored blob, `None` when nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn read_blob(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be written.
    fn write_blob(&self, blob: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the store flushed.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blob: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<usize>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-seeded with a blob, as if written by an earlier run.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let repo = Self::new();
        if let Ok(mut guard) = repo.blob.lock() {
            *guard = Some(blob.into());
        }
        repo
    }

    /// Current blob, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|guard| *guard).unwrap_or(0)
    }
}

impl StateRepository for InMemoryRepository {
    fn read_blob(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    fn write_blob(&self, blob: &str) -> Result<(), StorageError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(blob.to_owned());
        let mut writes = self
            .writes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *writes += 1;
        Ok(())
    }
}
