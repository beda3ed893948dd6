//! Store interface shared by every record collection backend.

use crate::error::{StoreError, StoreResult};
use crate::model::record::{Record, RecordMap};
use crate::model::variant::Variant;

/// Lifecycle state of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// `load()` has not completed yet.
    Unloaded,
    /// The collection reflects the durable file (or it had no file).
    Loaded,
}

/// Repository interface for the keyed record collection.
pub trait RecordStore {
    /// Live collection, shared rather than copied.
    fn all(&self) -> &RecordMap;
    /// Mutable live collection, used for field updates and removals.
    fn all_mut(&mut self) -> &mut RecordMap;
    /// Inserts a freshly constructed record under its key and returns the key.
    ///
    /// An existing entry under the same key is overwritten.
    fn register(&mut self, record: Record) -> String;
    /// Writes the whole collection to durable storage.
    fn flush(&self) -> StoreResult<()>;
    /// Replaces the collection with the durable content, if any exists.
    fn load(&mut self) -> StoreResult<()>;

    fn lookup_variant(&self, name: &str) -> StoreResult<Variant> {
        Variant::lookup(name)
    }

    fn get(&self, key: &str) -> StoreResult<&Record> {
        self.all()
            .get(key)
            .ok_or_else(|| StoreError::RecordNotFound(key.to_string()))
    }

    /// Touches the record under `key`, then flushes.
    ///
    /// A failed flush restores the previous `updated_at`.
    fn save(&mut self, key: &str) -> StoreResult<()> {
        let record = self
            .all_mut()
            .get_mut(key)
            .ok_or_else(|| StoreError::RecordNotFound(key.to_string()))?;
        let previous = record.clone();
        record.touch();
        if let Err(err) = self.flush() {
            self.all_mut().insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }

    /// Removes the record under `key`, then flushes.
    ///
    /// A failed flush puts the record back.
    fn destroy(&mut self, key: &str) -> StoreResult<Record> {
        let removed = self
            .all_mut()
            .remove(key)
            .ok_or_else(|| StoreError::RecordNotFound(key.to_string()))?;
        if let Err(err) = self.flush() {
            self.all_mut().insert(key.to_string(), removed);
            return Err(err);
        }
        Ok(removed)
    }
}
