pub mod bookmark;
pub mod config;
pub mod decision;
pub mod error;
pub mod event;
pub mod executor;
pub mod manager;
pub mod renderer;
pub mod runtime;
pub mod storager;
pub mod transition;

pub use runtime::Ctx;
pub use executor::{Executor, PlaybackMode, PlaybackPosition};
pub use manager::ScriptManager;
pub use renderer::terminal::TerminalRenderer;
pub use event::{InputEvent, OutputEvent};
pub use error::{PlaybackError, PlaybackResult};
