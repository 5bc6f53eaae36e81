mod setup;
mod config_gen;

use std::env;
use std::path::Path;
use std::sync::Arc;

use cena_core::bookmark;
use cena_core::config::CoreConfig;
use cena_core::renderer::driver::Driver;
use cena_core::storager::{self, FileStore};
use cena_core::{Ctx, ScriptManager, TerminalRenderer};

const STATE_FILE: &str = "state.json";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let arg_continue = args.iter().any(|a| a == "--continue");
    let arg_new = args.iter().any(|a| a == "--new");

    setup::init();
    log::info!(">>> Cena Launcher Started (continue: {}) <<<", arg_continue);

    let config = CoreConfig {
        system: cena_shared::config::get("system"),
        playback: cena_shared::config::get("playback"),
        transition: cena_shared::config::get("transition"),
    };

    let script_path = &config.system.script_path;
    log::info!("Loading scripts from: {}", script_path);
    if !Path::new(script_path).exists() {
        anyhow::bail!("Script directory '{}' not found. Please check config.toml.", script_path);
    }

    let mut manager = ScriptManager::new();
    manager.load_project(script_path)?;
    for scene in config.playback.scenes.values() {
        for id in scene.iter().filter(|id| !manager.contains(id)) {
            log::warn!("Scene script '{}' has no file under {}", id, script_path);
        }
    }

    let file_store = FileStore::in_dir(&config.system.save_path, STATE_FILE);
    log::info!("Save file: {:?}", file_store.path());
    let store = storager::shared(file_store);
    if arg_continue && !arg_new {
        if bookmark::has_save(&*store.borrow()) {
            bookmark::request_continue(&mut *store.borrow_mut())?;
        } else {
            println!("No saved game found, starting a new one.");
        }
    }

    let mut ctx = Ctx::default();
    let mut driver = Driver::new(&mut ctx, Arc::new(manager), store, config, TerminalRenderer::new()).realtime(true);
    log::info!("Boot path: {:?}", driver.boot_path());
    driver.run(&mut ctx);

    log::info!("Lines seen this session: {}", ctx.dialogue_history.len());
    Ok(())
}
