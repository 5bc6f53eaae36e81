pub mod ctx;

pub use ctx::{Ctx, DialogueRecord};
