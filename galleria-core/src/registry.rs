//! In-memory image metadata registry
//!
//! Append-only, ordered, and lives as long as the process. Nothing is
//! persisted; a restart starts from an empty registry.

use parking_lot::RwLock;

use crate::record::{ImageRecord, NewImage};

/// Thread-safe ordered store of [`ImageRecord`]s.
#[derive(Default)]
pub struct ImageRegistry {
    records: RwLock<Vec<ImageRecord>>,
}

impl ImageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stored image and return the record with its id.
    ///
    /// The id is the record's 1-based position (`len + 1`), computed under the
    /// same write lock as the push. Ids are derived from the length, so they
    /// would stop being unique if removal were ever supported.
    pub fn append(&self, image: NewImage) -> ImageRecord {
        let mut records = self.records.write();
        let id = records.len() as u64 + 1;
        let record = image.into_record(id);
        records.push(record.clone());
        record
    }

    /// Snapshot of every record in insertion order.
    pub fn list_all(&self) -> Vec<ImageRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl std::fmt::Debug for ImageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRegistry")
            .field("records", &self.len())
            .finish()
    }
}
