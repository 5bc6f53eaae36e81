use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use crate::event::OutputEvent;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Ctx {
    pub dialogue_history: Vec<DialogueRecord>,
    #[serde(skip)]
    pub event_queue: VecDeque<OutputEvent>,
}

impl Ctx {
    pub fn push(&mut self, event: OutputEvent) {
        self.event_queue.push_back(event);
    }
    pub fn drain(&mut self) -> Vec<OutputEvent> {
        self.event_queue.drain(..).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub speaker: Option<String>,
    pub text: String,
}
