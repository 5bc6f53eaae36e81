//! Parsed representation of a tabular script.
//!
//! A script is an ordered program of [`ScriptLine`]s. The speaker column either
//! names a character or holds one of the reserved directive tokens that change
//! how the line is interpreted (see [`LineKind`]).

use crate::command::CommandSet;

/// The root node of every parsed script.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Script {
    pub lines: Vec<ScriptLine>,
}

impl Script {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One row of a script resource.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ScriptLine {
    pub speaker: String,
    pub text: String,
    pub command: String,
    /// 1-based row in the source resource, header included.
    pub row: usize,
}

impl ScriptLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            command: command.into(),
            row: 0,
        }
    }

    pub fn kind(&self) -> LineKind {
        LineKind::from_speaker(&self.speaker)
    }

    /// Decode the command column into typed commands.
    pub fn commands(&self) -> CommandSet {
        CommandSet::decode(&self.command)
    }
}

/// How a line is interpreted, decided by its speaker column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A line spoken by a named character.
    Dialogue,
    /// `NARRADOR` or an empty speaker.
    Narrator,
    /// Blocks until the player confirms.
    Wait,
    /// A player-confirmed micro action carrying `ACT=<id>`.
    Act,
    /// Switches script, possibly across an external scene.
    Jump,
    /// Opens a block gated on the last recorded choice.
    Branch,
    /// Closes a run of branch blocks.
    BranchEnd,
    /// Opens a multi-way choice; following rows are its options.
    Choice,
}

impl LineKind {
    pub fn from_speaker(speaker: &str) -> Self {
        let speaker = speaker.trim();
        if speaker.is_empty() {
            return Self::Narrator;
        }
        match speaker.to_ascii_uppercase().as_str() {
            "NARRADOR" => Self::Narrator,
            "WAIT" => Self::Wait,
            "ACT" => Self::Act,
            "JUMP" => Self::Jump,
            "BRANCH" => Self::Branch,
            "BRANCH_END" => Self::BranchEnd,
            "CHOICE" => Self::Choice,
            _ => Self::Dialogue,
        }
    }
}
