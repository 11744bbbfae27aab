use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::catalog::Level;
use super::error::StoreError;

pub const CURRENT_LEVEL_KEY: &str = "current-level";
pub const LEVELS_KEY: &str = "levels";
const BEST_TRY_PREFIX: &str = "best-try-";
const FILE_EXTENSION: &str = "json";

pub fn best_try_key(level: u8) -> String {
    format!("{}{}", BEST_TRY_PREFIX, level)
}

/// Flat string key-value medium behind [`ProgressStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key).with_extension(FILE_EXTENSION)
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        write_atomic(&self.path_for(key), value)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Everything persisted across sessions. Absent fields mean "use defaults".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Progress {
    pub current_level: Option<u8>,
    pub levels: Option<Vec<Level>>,
    pub best_tries: BTreeMap<u8, u32>,
}

/// JSON encoding of [`Progress`] over a [`KeyValueStore`].
#[derive(Debug)]
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("Could not read {:?}, using default: {}", key, err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Ignoring corrupt value for {:?}: {}", key, err);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    /// Reads the saved state, looking up best tries for `level_numbers`.
    pub fn load(&self, level_numbers: impl IntoIterator<Item = u8>) -> Progress {
        let best_tries = level_numbers
            .into_iter()
            .filter_map(|n| Some((n, self.best_try(n)?)))
            .collect();
        Progress {
            current_level: self.read(CURRENT_LEVEL_KEY),
            levels: self.read(LEVELS_KEY),
            best_tries,
        }
    }

    pub fn best_try(&self, level: u8) -> Option<u32> {
        self.read(&best_try_key(level))
    }

    pub fn save_current_level(&mut self, level: u8) -> Result<(), StoreError> {
        self.write(CURRENT_LEVEL_KEY, &level)
    }

    pub fn save_unlocks(&mut self, levels: &[Level]) -> Result<(), StoreError> {
        self.write(LEVELS_KEY, levels)
    }

    /// Stores `attempts` when no best exists yet or it beats the stored one.
    /// `attempts` is the finished round's pair count as is; the counter is
    /// already bumped when the final pair's second tile turns over.
    /// Returns whether anything was written.
    pub fn record_best(&mut self, level: u8, attempts: u32) -> Result<bool, StoreError> {
        if self.best_try(level).is_some_and(|best| best <= attempts) {
            return Ok(false);
        }
        self.write(&best_try_key(level), &attempts)?;
        Ok(true)
    }

    /// Irreversible.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }
}
