use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub script_path: String,
    pub save_path:   String,
    pub log_path:    String,
    pub log_level:   String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub start_scene: String,
    /// Characters per second of the text reveal, 0 shows lines at once.
    pub reveal_cps: f32,
    /// Presentation slots available for choice options.
    pub choice_slots: usize,
    /// Delay before a shown choice answer advances on its own.
    pub choice_auto_advance_secs: Option<f32>,
    pub moral_choice_id: String,
    pub moral_truth_opt: String,
    pub intercept_start_action: String,
    pub intercept_result_action: String,
    pub intercept_win_text: String,
    pub intercept_loss_text: String,
    pub minigame_win_affinity: i64,
    pub minigame_loss_affinity: i64,
    /// Scene id -> ordered script ids played in that scene.
    pub scenes: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStyle {
    /// Fade to opaque, reload, fade back in.
    Fade,
    /// Crossfade from a snapshot of the old scene, no opaque hold.
    Crossfade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub style: HandoffStyle,
    pub jump_delay_secs: f32,
    pub fade_out_secs: f32,
    pub fade_in_secs: f32,
    pub crossfade_secs: f32,
}

/// Everything the core needs, handed to the executor by value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub system: SystemConfig,
    pub playback: PlaybackConfig,
    pub transition: TransitionConfig,
}

impl PlaybackConfig {
    pub fn sequence(&self, scene: &str) -> Option<&[String]> {
        self.scenes.get(scene).map(Vec::as_slice)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            script_path: "game/".into(),
            save_path:   "saves/".into(),
            log_path:    "logs/".into(),
            log_level:   "info".into(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        let mut scenes = BTreeMap::new();
        scenes.insert("main".to_string(), vec!["intro".to_string()]);
        Self {
            start_scene: "main".into(),
            reveal_cps: 40.0,
            choice_slots: 4,
            choice_auto_advance_secs: Some(3.0),
            moral_choice_id: "VERDADE".into(),
            moral_truth_opt: "TOTAL".into(),
            intercept_start_action: "INTERCEPT_START".into(),
            intercept_result_action: "INTERCEPT_RESULT".into(),
            intercept_win_text: "The intercept worked.".into(),
            intercept_loss_text: "The intercept failed.".into(),
            minigame_win_affinity: 1,
            minigame_loss_affinity: 0,
            scenes,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            style: HandoffStyle::Fade,
            jump_delay_secs: 0.5,
            fade_out_secs: 1.0,
            fade_in_secs: 1.0,
            crossfade_secs: 0.8,
        }
    }
}
