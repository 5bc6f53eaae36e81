/// A one-shot countdown driven by host ticks. Dropping it cancels it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    remaining: f32,
}

impl Timer {
    pub fn new(secs: f32) -> Self {
        Self { remaining: secs.max(0.0) }
    }

    /// Returns true once the countdown has run out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt.max(0.0);
        self.remaining <= 0.0
    }
}
