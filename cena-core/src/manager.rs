use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;
use log::info;
use anyhow::{Result, Context};
use rustc_hash::FxHashMap;

use cenascript_core::{parse_source, ScriptLine};
use crate::error::{PlaybackError, PlaybackResult};

pub const SCRIPT_EXTENSION: &str = "csv";

/// Script store: parses every script resource once and hands out shared,
/// read-only line sequences by script id.
#[derive(Debug, Default)]
pub struct ScriptManager {
    scripts: FxHashMap<String, Arc<[ScriptLine]>>,
    // script id -> file it came from, for collision reports
    sources: HashMap<String, PathBuf>,
}

impl ScriptManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root_dir` recursively for `*.csv` scripts, keyed by file stem.
    pub fn load_project(&mut self, root_dir: impl AsRef<Path>) -> Result<()> {
        let root = root_dir.as_ref();
        info!("Scanning script project at: {:?}", root);

        let mut loaded_count = 0;
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|e| e == SCRIPT_EXTENSION) {
                self.load_file(path)?;
                loaded_count += 1;
            }
        }

        info!("Project loaded. Files: {}", loaded_count);
        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {:?}", path))?;
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .with_context(|| format!("Script path has no file name: {:?}", path))?;

        if let Some(existing) = self.sources.get(&id) {
            anyhow::bail!(
                "Script id collision detected!\n  '{}' is defined in:\n    1. {:?}\n    2. {:?}",
                id, existing, path
            );
        }
        self.sources.insert(id.clone(), path.to_path_buf());
        self.insert_source(&id, &content);
        Ok(())
    }

    /// Parse and register script text under `id`, replacing any previous
    /// script of that id. Returns the number of rows that were skipped.
    pub fn insert_source(&mut self, id: &str, source: &str) -> usize {
        let parsed = parse_source(source);
        for err in &parsed.errors {
            let err = PlaybackError::Parse { script: id.to_string(), row: err.row, msg: err.msg.clone() };
            log::warn!("{}", err);
        }
        log::debug!("Script '{}': {} lines", id, parsed.script.len());
        self.scripts.insert(id.to_string(), Arc::from(parsed.script.lines));
        parsed.errors.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scripts.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }

    pub fn load(&self, id: &str) -> PlaybackResult<Arc<[ScriptLine]>> {
        self.scripts
            .get(id)
            .cloned()
            .ok_or_else(|| PlaybackError::ResourceNotFound(id.to_string()))
    }

    /// Like [`load`](Self::load), but a missing script is logged and played as empty.
    pub fn load_or_empty(&self, id: &str) -> Arc<[ScriptLine]> {
        self.load(id).unwrap_or_else(|e| {
            log::error!("{}, playing it as empty", e);
            Arc::from(Vec::<ScriptLine>::new())
        })
    }
}
