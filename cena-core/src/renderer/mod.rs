pub mod terminal;
pub mod driver;

use crate::event::{InputEvent, OutputEvent};
use crate::runtime::Ctx;

/// Presentation side of the engine: consumes output events, answers with input.
pub trait Renderer {
    fn render(&mut self, out: &OutputEvent, ctx: &mut Ctx) -> Option<InputEvent>;

    /// Called when a frame produced no events, so a renderer can poll for input.
    fn idle(&mut self, _ctx: &mut Ctx) -> Option<InputEvent> {
        None
    }
}
