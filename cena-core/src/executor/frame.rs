use std::sync::Arc;
use serde::{Deserialize, Serialize};
use cenascript_core::ScriptLine;

/// The cursor into the running program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPosition {
    pub script_id: String,
    pub line_index: usize,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub script: String,
    pub lines: Arc<[ScriptLine]>,
    pub pc: usize,
}

impl Frame {
    pub fn new(script: impl Into<String>, lines: Arc<[ScriptLine]>, pc: usize) -> Self {
        Self { script: script.into(), lines, pc }
    }

    pub fn empty() -> Self {
        Self::new(String::new(), Arc::from(Vec::<ScriptLine>::new()), 0)
    }

    pub fn current(&self) -> Option<&ScriptLine> {
        self.lines.get(self.pc)
    }

    pub fn advance(&mut self) {
        self.pc += 1;
    }

    pub fn position(&self) -> PlaybackPosition {
        PlaybackPosition { script_id: self.script.clone(), line_index: self.pc }
    }
}
