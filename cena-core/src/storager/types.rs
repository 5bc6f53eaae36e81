use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

/// Persisted keys. Every piece of state that survives a scene reload lives here.
pub mod keys {
    pub const SAVE_EXISTS: &str = "save.exists";
    pub const CONTINUE_REQUESTED: &str = "save.continue";

    pub const BOOKMARK_SCENE: &str = "bookmark.scene";
    pub const BOOKMARK_SCRIPT_INDEX: &str = "bookmark.script_index";
    pub const BOOKMARK_LINE: &str = "bookmark.line";

    pub const JUMP_ACTIVE: &str = "jump.active";
    pub const JUMP_SCRIPT: &str = "jump.script";
    pub const JUMP_LINE: &str = "jump.line";
    pub const JUMP_SCENE: &str = "jump.scene";
    pub const JUMP_FADE_IN: &str = "jump.fade_in";
    pub const JUMP_CARRY_AUDIO: &str = "jump.carry_audio";

    pub const AFFINITY: &str = "decision.affinity";
    pub const LAST_CHOICE_ID: &str = "decision.last_choice_id";
    pub const LAST_CHOICE_OPT: &str = "decision.last_choice_opt";
    pub const MINIGAME_RESULT: &str = "decision.minigame_result";
    pub const MORAL_TRUTH: &str = "decision.moral_truth";

    pub const DECISION_KEYS: [&str; 5] = [AFFINITY, LAST_CHOICE_ID, LAST_CHOICE_OPT, MINIGAME_RESULT, MORAL_TRUTH];
    pub const JUMP_KEYS: [&str; 6] = [JUMP_ACTIVE, JUMP_SCRIPT, JUMP_LINE, JUMP_SCENE, JUMP_FADE_IN, JUMP_CARRY_AUDIO];
}

/// Saved playback position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub scene: String,
    pub script_index: usize,
    pub line: usize,
}

/// Where to pick playback up after an external scene reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpTicket {
    pub scene: String,
    pub script: String,
    /// Raw `JUMP_LINE` value, resolved once the target script is loaded.
    pub line: String,
    pub fade_in: bool,
    pub carry_audio: bool,
}

/// On-disk layout of a [`FileStore`](super::FileStore).
#[derive(Serialize, Deserialize, Default)]
pub struct StoreFile {
    pub entries: BTreeMap<String, serde_json::Value>,
}
