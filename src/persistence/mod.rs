//! Best-score persistence
//!
//! The game keeps one durable integer, the best score, under a fixed key.
//! Storage sits behind `KeyValueStore` so hosts can back it with anything;
//! an in-memory store and a JSON file store are provided.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "bestscore";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("storage data is malformed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Durable integer key-value storage
pub trait KeyValueStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, PersistenceError>;
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PersistenceError>;

    /// Stored best score; absent or negative values read as 0
    fn best_score(&self) -> Result<u32, PersistenceError> {
        let value = self.get_int(BEST_SCORE_KEY)?.unwrap_or(0);
        Ok(u32::try_from(value).unwrap_or(if value < 0 { 0 } else { u32::MAX }))
    }

    fn set_best_score(&mut self, best: u32) -> Result<(), PersistenceError> {
        self.set_int(BEST_SCORE_KEY, i64::from(best))
    }
}

/// Volatile store, mostly for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: i64) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_owned(), value);
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, PersistenceError> {
        Ok(self.values.get(key).copied())
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PersistenceError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every set
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, i64>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, PersistenceError> {
        Ok(self.read_map()?.get(key).copied())
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PersistenceError> {
        let mut map = self.read_map()?;
        map.insert(key.to_owned(), value);
        let json = serde_json::to_string_pretty(&map)?;

        // Write-then-rename so a crash never leaves half a file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
