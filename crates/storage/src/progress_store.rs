use std::fmt;
use std::sync::Arc;

use drill_core::model::{BlockId, BlockProgress, ProgressBook, ProgressStats};

use crate::mapping::{decode_blob, encode_blob};
use crate::repository::{StateRepository, StorageError};

/// Per-block progress, flushed to its repository after every change.
///
/// Persistence is best effort: a failed read yields an empty store and a
/// failed write is logged, never returned to the caller.
pub struct ProgressStore {
    book: ProgressBook,
    repo: Arc<dyn StateRepository>,
}

impl ProgressStore {
    /// Load the stored progress.
    ///
    /// Missing, unreadable, or malformed state yields an empty store, which is
    /// written back so the next run starts from a valid blob.
    #[must_use]
    pub fn load(repo: Arc<dyn StateRepository>) -> Self {
        let loaded = match repo.read_blob() {
            Ok(Some(raw)) => match decode_blob(&raw) {
                Ok(book) => Some(book),
                Err(err) => {
                    tracing::warn!(error = %err, "progress state is corrupt, starting fresh");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("no progress state yet, starting fresh");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "progress state unreadable, starting fresh");
                None
            }
        };

        let seeded = loaded.is_none();
        let store = Self {
            book: loaded.unwrap_or_default(),
            repo,
        };
        if seeded {
            store.flush_best_effort();
        }
        store
    }

    #[must_use]
    pub fn book(&self) -> &ProgressBook {
        &self.book
    }

    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockProgress> {
        self.book.get(id)
    }

    /// Apply `update` to the record of `id` (created with defaults if absent),
    /// then flush the whole store.
    pub fn upsert<F>(&mut self, id: BlockId, update: F) -> BlockProgress
    where
        F: FnOnce(&mut BlockProgress),
    {
        let entry = self.book.entry(id);
        update(entry);
        let updated = entry.clone();
        self.flush_best_effort();
        updated
    }

    #[must_use]
    pub fn stats(&self, total: usize) -> ProgressStats {
        self.book.stats(total)
    }

    #[must_use]
    pub fn all_validated(&self, total: usize) -> bool {
        self.book.all_validated(total)
    }

    /// Write the whole store to the repository.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or writing fails.
    pub fn flush(&self) -> Result<(), StorageError> {
        let blob = encode_blob(&self.book)?;
        self.repo.write_blob(&blob)
    }

    fn flush_best_effort(&self) {
        if let Err(err) = self.flush() {
            tracing::warn!(error = %err, "failed to persist progress");
        }
    }
}

impl fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressStore")
            .field("entries", &self.book.len())
            .finish_non_exhaustive()
    }
}
