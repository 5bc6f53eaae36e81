//! Failure taxonomy of the playback core.
//!
//! None of these stop playback. Each is logged where it happens and the caller
//! falls back to a safe default: an empty script, the current position or a
//! fresh start.

use thiserror::Error;

pub type PlaybackResult<T> = Result<T, PlaybackError>;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A malformed script row; the row is skipped.
    #[error("script '{script}' row {row}: {msg}")]
    Parse { script: String, row: usize, msg: String },

    /// A script resource that does not exist; an empty script stands in.
    #[error("script resource '{0}' not found")]
    ResourceNotFound(String),

    /// A jump target outside the scene with no external scene to fall back on.
    #[error("jump target '{target}' is not part of scene '{scene}'")]
    Reference { target: String, scene: String },

    /// An operation that the current playback mode does not allow.
    #[error("{op} refused while {mode}")]
    State { op: &'static str, mode: String },

    /// Missing or corrupt persisted state.
    #[error("persisted state unusable: {0}")]
    Persistence(String),
}
