#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use cena_core::config::CoreConfig;
use cena_core::event::LineStyle;
use cena_core::storager::{self, MemoryStore, SharedStore};
use cena_core::{Ctx, Executor, OutputEvent, ScriptManager};

pub const HEADER: &str = "speaker,text,command\n";

/// Instant reveal, no auto-advance, scenes as given.
pub fn config(scenes: &[(&str, &[&str])]) -> CoreConfig {
    let mut config = CoreConfig::default();
    config.playback.reveal_cps = 0.0;
    config.playback.choice_auto_advance_secs = None;
    config.playback.start_scene = scenes.first().map(|(s, _)| s.to_string()).unwrap_or_default();
    config.playback.scenes = scenes
        .iter()
        .map(|(scene, scripts)| (scene.to_string(), scripts.iter().map(|s| s.to_string()).collect()))
        .collect::<BTreeMap<_, _>>();
    config
}

/// Scripts given as rows without the header line.
pub fn manager(scripts: &[(&str, &str)]) -> Arc<ScriptManager> {
    let mut manager = ScriptManager::new();
    for (id, rows) in scripts {
        manager.insert_source(id, &format!("{HEADER}{rows}"));
    }
    Arc::new(manager)
}

pub fn memory() -> SharedStore {
    storager::shared(MemoryStore::new())
}

pub struct Harness {
    pub exe: Executor,
    pub ctx: Ctx,
    pub store: SharedStore,
}

impl Harness {
    pub fn new(scripts: &[(&str, &str)], config: CoreConfig) -> Self {
        Self::with_store(scripts, config, memory())
    }

    pub fn with_store(scripts: &[(&str, &str)], config: CoreConfig, store: SharedStore) -> Self {
        let scene = config.playback.start_scene.clone();
        let exe = Executor::new(manager(scripts), store.clone(), config, &scene);
        Self { exe, ctx: Ctx::default(), store }
    }

    /// Single scene "main" playing `scripts` in order.
    pub fn scene(scripts: &[(&str, &str)]) -> Self {
        let ids: Vec<&str> = scripts.iter().map(|(id, _)| *id).collect();
        Self::new(scripts, config(&[("main", ids.as_slice())]))
    }

    pub fn start(&mut self) -> Vec<OutputEvent> {
        self.exe.start(&mut self.ctx, 0, 0);
        self.ctx.drain()
    }

    pub fn advance(&mut self) -> Vec<OutputEvent> {
        self.exe.advance(&mut self.ctx);
        self.ctx.drain()
    }

    pub fn choose(&mut self, index: usize) -> Vec<OutputEvent> {
        self.exe.select_choice(&mut self.ctx, index);
        self.ctx.drain()
    }

    pub fn tick(&mut self, dt: f32) -> Vec<OutputEvent> {
        self.exe.tick(&mut self.ctx, dt);
        self.ctx.drain()
    }
}

/// Texts of every `ShowLine` in `events`.
pub fn shown(events: &[OutputEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            OutputEvent::ShowLine { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// The single `ShowLine` in `events`.
pub fn line(events: &[OutputEvent]) -> (Option<String>, String, LineStyle) {
    let lines: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            OutputEvent::ShowLine { speaker, text, style, .. } => Some((speaker.clone(), text.clone(), style.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 1, "expected one line in {:?}", events);
    lines.into_iter().next().unwrap()
}
