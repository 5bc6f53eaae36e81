//! Key-value state stores.
//!
//! Decision state, the bookmark and the jump ticket all go through a
//! [`StateStore`]. [`MemoryStore`] backs tests; [`FileStore`] rewrites a JSON
//! file on every mutation so each write is durable on return.

pub mod types;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PlaybackError;
use crate::storager::types::StoreFile;

pub trait StateStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()>;
    fn delete(&mut self, key: &str) -> anyhow::Result<()>;
    fn keys(&self) -> Vec<String>;
}

pub type SharedStore = Rc<RefCell<dyn StateStore>>;

pub fn shared<S: StateStore + 'static>(store: S) -> SharedStore {
    Rc::new(RefCell::new(store))
}

/// Typed read. A value of the wrong shape is reported and read as absent.
pub fn read<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("{}", PlaybackError::Persistence(format!("key '{}': {}", key, e)));
            None
        }
    }
}

pub fn write<T: Serialize>(store: &mut dyn StateStore, key: &str, value: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(value)
        .with_context(|| format!("Failed to encode value for '{}'", key))?;
    store.set(key, value)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: FxHashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        self.map.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> anyhow::Result<()> {
        self.map.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store, and so is an
    /// unreadable one (reported, then overwritten on the next write).
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::read_file(&path) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("{}", PlaybackError::Persistence(format!("{:?}: {:#}", path, e)));
                BTreeMap::new()
            }
        };
        log::info!("State store at {:?} ({} keys)", path, entries.len());
        Self { path, entries }
    }

    /// Store file inside the configured save directory.
    pub fn in_dir(dir: impl AsRef<Path>, filename: &str) -> Self {
        let dir = dir.as_ref();
        if !dir.exists() {
            if let Err(e) = fs::create_dir_all(dir) {
                log::warn!("Failed to create save dir {:?}: {}", dir, e);
            }
        }
        Self::open(dir.join(filename))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> anyhow::Result<BTreeMap<String, Value>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let save: StoreFile = serde_json::from_reader(reader)?;
        Ok(save.entries)
    }

    fn persist(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create state file {:?}", self.path))?;
        let mut writer = BufWriter::new(file);
        let save = StoreFile { entries: self.entries.clone() };
        serde_json::to_writer_pretty(&mut writer, &save)?;
        writer.flush()?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    fn delete(&mut self, key: &str) -> anyhow::Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
