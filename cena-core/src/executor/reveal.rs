/// Timing side of the typewriter effect: how many characters of the current
/// line are visible. Drawing them is the renderer's job.
#[derive(Debug, Clone)]
pub struct Reveal {
    total: usize,
    visible: usize,
    progress: f32,
    speed: f32,
    finished: bool,
}

impl Reveal {
    pub fn new(chars_per_sec: f32) -> Self {
        Self { total: 0, visible: 0, progress: 0.0, speed: chars_per_sec.max(0.0), finished: true }
    }

    /// Start revealing `text`. Returns whether the reveal is progressive.
    pub fn start(&mut self, text: &str) -> bool {
        self.total = text.chars().count();
        self.progress = 0.0;
        self.finished = self.speed <= 0.0 || self.total == 0;
        self.visible = if self.finished { self.total } else { 0 };
        !self.finished
    }

    /// Advance by `dt` seconds. Returns the new visible count when it changed.
    pub fn update(&mut self, dt: f32) -> Option<usize> {
        if self.finished {
            return None;
        }
        self.progress += self.speed * dt;
        let visible = (self.progress as usize).min(self.total);
        if visible >= self.total {
            self.finished = true;
        }
        if visible != self.visible {
            self.visible = visible;
            Some(visible)
        } else {
            None
        }
    }

    /// Show everything at once. Returns false when there was nothing left to show.
    pub fn skip(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.progress = self.total as f32;
        self.visible = self.total;
        self.finished = true;
        true
    }

    pub fn is_active(&self) -> bool {
        !self.finished
    }

    /// Seconds until the reveal completes on its own, 0 when it is not running.
    pub fn remaining_secs(&self) -> f32 {
        if self.finished || self.speed <= 0.0 {
            return 0.0;
        }
        (self.total as f32 - self.progress).max(0.0) / self.speed
    }
}
