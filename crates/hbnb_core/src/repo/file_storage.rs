//! JSON file-backed record store.
//!
//! # Responsibility
//! - Hold the live keyed collection for one durable file.
//! - Flush the whole collection on every mutation and reload it on start.
//!
//! # Invariants
//! - Flush overwrites the file wholesale through a sibling temp file and a
//!   rename, so readers never observe a partial write.
//! - Load replaces the collection (no merge); a missing file leaves it as-is.
//! - A failed load leaves the live collection untouched.

use crate::config::CoreConfig;
use crate::error::StoreResult;
use crate::model::record::{Record, RecordMap};
use crate::repo::record_store::{RecordStore, StoreState};
use crate::serializer;
use log::{error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Record store persisted as one JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    objects: RecordMap,
    state: StoreState,
}

impl FileStorage {
    /// Creates an empty, unloaded store for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: RecordMap::new(),
            state: StoreState::Unloaded,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.file_path.clone())
    }

    /// Creates a store and immediately loads the durable file.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut storage = Self::new(path);
        storage.load()?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomically(&self, text: &str) -> StoreResult<()> {
        let temp_path = self.temp_path();
        fs::write(&temp_path, text)?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }
}

impl RecordStore for FileStorage {
    fn all(&self) -> &RecordMap {
        &self.objects
    }

    fn all_mut(&mut self) -> &mut RecordMap {
        &mut self.objects
    }

    fn register(&mut self, record: Record) -> String {
        let key = record.key();
        if self.objects.insert(key.clone(), record).is_some() {
            warn!("event=record_register module=repo status=overwrite");
        }
        key
    }

    fn flush(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = serializer::encode(&self.objects).and_then(|text| self.write_atomically(&text));
        match &result {
            Ok(()) => info!(
                "event=store_flush module=repo status=ok records={} duration_ms={}",
                self.objects.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_flush module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn load(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        info!("event=store_load module=repo status=start");

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.state = StoreState::Loaded;
                info!(
                    "event=store_load module=repo status=ok file_present=false records={}",
                    self.objects.len()
                );
                return Ok(());
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        match serializer::decode(&text) {
            Ok(objects) => {
                self.objects = objects;
                self.state = StoreState::Loaded;
                info!(
                    "event=store_load module=repo status=ok file_present=true records={} duration_ms={}",
                    self.objects.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=decode_failed duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FileStorage;
    use std::path::PathBuf;

    #[test]
    fn temp_path_is_a_sibling_of_the_durable_file() {
        let storage = FileStorage::new("/data/file.json");
        assert_eq!(storage.temp_path(), PathBuf::from("/data/file.json.tmp"));
    }
}
