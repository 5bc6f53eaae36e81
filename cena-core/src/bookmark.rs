//! Saving the playback position and deciding where a boot starts.

use std::sync::Arc;
use serde_json::Value;

use crate::config::CoreConfig;
use crate::decision::DecisionStore;
use crate::error::{PlaybackError, PlaybackResult};
use crate::executor::Executor;
use crate::manager::ScriptManager;
use crate::runtime::Ctx;
use crate::storager::types::{keys, Bookmark, JumpTicket};
use crate::storager::{self, SharedStore, StateStore};

/// Which of the three boot paths was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPath {
    JumpResume,
    Continue,
    Fresh,
}

impl Bookmark {
    pub fn save(&self, store: &mut dyn StateStore) -> anyhow::Result<()> {
        store.set(keys::BOOKMARK_SCENE, Value::from(self.scene.as_str()))?;
        store.set(keys::BOOKMARK_SCRIPT_INDEX, Value::from(self.script_index))?;
        store.set(keys::BOOKMARK_LINE, Value::from(self.line))?;
        store.set(keys::SAVE_EXISTS, Value::from(true))
    }

    pub fn load(store: &dyn StateStore) -> PlaybackResult<Self> {
        if !has_save(store) {
            return Err(PlaybackError::Persistence("no save".into()));
        }
        let missing = |key: &str| PlaybackError::Persistence(format!("bookmark key '{}' missing or corrupt", key));
        Ok(Self {
            scene: storager::read(store, keys::BOOKMARK_SCENE).ok_or_else(|| missing(keys::BOOKMARK_SCENE))?,
            script_index: storager::read(store, keys::BOOKMARK_SCRIPT_INDEX)
                .ok_or_else(|| missing(keys::BOOKMARK_SCRIPT_INDEX))?,
            line: storager::read(store, keys::BOOKMARK_LINE).ok_or_else(|| missing(keys::BOOKMARK_LINE))?,
        })
    }
}

pub fn has_save(store: &dyn StateStore) -> bool {
    storager::read(store, keys::SAVE_EXISTS).unwrap_or(false)
}

/// Ask the next boot to resume from the bookmark.
pub fn request_continue(store: &mut dyn StateStore) -> anyhow::Result<()> {
    store.set(keys::CONTINUE_REQUESTED, Value::from(true))
}

fn take_continue(store: &mut dyn StateStore) -> bool {
    let requested = storager::read(store, keys::CONTINUE_REQUESTED).unwrap_or(false);
    if let Err(e) = store.delete(keys::CONTINUE_REQUESTED) {
        log::error!("Failed to clear continue flag: {:#}", e);
    }
    requested
}

/// Build the executor for a (re)booted scene and show its first line.
///
/// Priority: a pending jump ticket, then a requested continue, then a fresh
/// game. A continue with an unusable bookmark starts fresh.
pub fn boot(
    ctx: &mut Ctx,
    manager: Arc<ScriptManager>,
    store: SharedStore,
    config: &CoreConfig,
) -> (Executor, BootPath) {
    let ticket = JumpTicket::take(&mut *store.borrow_mut());
    if let Some(ticket) = ticket {
        log::info!("Boot: resuming jump into scene '{}'", ticket.scene);
        let mut exe = Executor::new(manager, store, config.clone(), &ticket.scene);
        exe.resume_jump(ctx, ticket);
        return (exe, BootPath::JumpResume);
    }

    let continue_requested = take_continue(&mut *store.borrow_mut());
    if continue_requested {
        let bookmark = Bookmark::load(&*store.borrow()).and_then(|b| validate(&b, config).map(|_| b));
        match bookmark {
            Ok(b) => {
                log::info!("Boot: continuing at {}:{}:{}", b.scene, b.script_index, b.line);
                let mut exe = Executor::new(manager, store, config.clone(), &b.scene);
                exe.start(ctx, b.script_index, b.line);
                return (exe, BootPath::Continue);
            }
            Err(e) => log::warn!("Boot: cannot continue ({}), starting fresh", e),
        }
    }

    log::info!("Boot: new game in scene '{}'", config.playback.start_scene);
    DecisionStore::new(store.clone()).reset_all();
    let mut exe = Executor::new(manager, store, config.clone(), &config.playback.start_scene);
    exe.start(ctx, 0, 0);
    (exe, BootPath::Fresh)
}

fn validate(bookmark: &Bookmark, config: &CoreConfig) -> PlaybackResult<()> {
    match config.playback.sequence(&bookmark.scene) {
        Some(seq) if bookmark.script_index < seq.len() => Ok(()),
        Some(_) => Err(PlaybackError::Persistence(format!(
            "script index {} out of range for scene '{}'",
            bookmark.script_index, bookmark.scene
        ))),
        None => Err(PlaybackError::Persistence(format!("unknown scene '{}'", bookmark.scene))),
    }
}
