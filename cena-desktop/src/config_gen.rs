use std::fs;
use std::path::Path;
use serde::Serialize;
use cena_core::config::{PlaybackConfig, SystemConfig, TransitionConfig};

#[derive(Serialize, Default)]
struct FullConfig {
    system: SystemConfig,
    playback: PlaybackConfig,
    transition: TransitionConfig,
}

pub fn ensure_config_exists(path: &str) {
    if Path::new(path).exists() {
        return;
    }

    println!("Creating default configuration at '{}'...", path);

    let toml_str = match toml::to_string_pretty(&FullConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to serialize default config: {}", e);
            return;
        }
    };

    if let Err(e) = fs::write(path, toml_str) {
        eprintln!("Failed to write config file: {}", e);
    } else {
        println!("Config file created successfully.");
    }
}
