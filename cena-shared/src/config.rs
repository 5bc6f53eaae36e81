//! Process-wide configuration table.
//!
//! The launcher reads `config.toml` once at startup; every crate then pulls its
//! own section with [`get`], falling back to the section's `Default` when the
//! section is missing or malformed.

use std::sync::RwLock;
use std::path::Path;
use std::fs;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use toml::Table;

static GLOBAL_CONFIG: OnceCell<RwLock<Table>> = OnceCell::new();

/// Parse a TOML document into a table. Syntax errors yield an empty table.
pub fn parse_table(content: &str) -> Table {
    toml::from_str(content).unwrap_or_else(|e| {
        log::error!("Config syntax error: {}, using empty config.", e);
        Table::new()
    })
}

pub fn init<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();

    let content = if path.exists() {
        log::info!("Loading config from {:?}", path);
        fs::read_to_string(path)?
    } else {
        log::warn!("Config file not found at {:?}, using defaults.", path);
        String::new()
    };

    GLOBAL_CONFIG.set(RwLock::new(parse_table(&content)))
        .map_err(|_| anyhow::anyhow!("Config already initialized"))?;

    Ok(())
}

/// Read one section out of a table.
pub fn section<T: DeserializeOwned + Default>(table: &Table, key: &str) -> T {
    match table.get(key) {
        Some(value) => value.clone().try_into().unwrap_or_else(|e| {
            log::warn!("Config section '[{}]' mismatch: {}. Using default.", key, e);
            T::default()
        }),
        None => T::default(),
    }
}

/// Read one section of the global config. Uninitialised config reads as empty.
pub fn get<T: DeserializeOwned + Default>(key: &str) -> T {
    let Some(store) = GLOBAL_CONFIG.get() else {
        log::warn!("Config not initialized, section '[{}]' uses defaults.", key);
        return T::default();
    };
    match store.read() {
        Ok(table) => section(&table, key),
        Err(_) => T::default(),
    }
}
