use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::bookmark::{self, BootPath};
use crate::config::CoreConfig;
use crate::event::{InputEvent, OutputEvent};
use crate::executor::Executor;
use crate::manager::ScriptManager;
use crate::renderer::Renderer;
use crate::runtime::Ctx;
use crate::storager::SharedStore;

const FRAME: Duration = Duration::from_millis(16);

/// Pumps executor output into a renderer, feeds the answers back and keeps
/// time moving. A `LoadScene` request reboots the executor in-process.
pub struct Driver<R: Renderer> {
    exe: Executor,
    manager: Arc<ScriptManager>,
    store: SharedStore,
    config: CoreConfig,
    renderer: R,
    frame: Duration,
    realtime: bool,
    boot_path: BootPath,
}

impl<R: Renderer> Driver<R> {
    pub fn new(ctx: &mut Ctx, manager: Arc<ScriptManager>, store: SharedStore, config: CoreConfig, renderer: R) -> Self {
        let (exe, boot_path) = bookmark::boot(ctx, manager.clone(), store.clone(), &config);
        Self { exe, manager, store, config, renderer, frame: FRAME, realtime: false, boot_path }
    }

    /// Sleep between idle frames instead of running time as fast as possible.
    pub fn realtime(mut self, on: bool) -> Self {
        self.realtime = on;
        self
    }

    pub fn executor(&self) -> &Executor {
        &self.exe
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn boot_path(&self) -> BootPath {
        self.boot_path
    }

    pub fn run(&mut self, ctx: &mut Ctx) {
        self.run_frames(ctx, usize::MAX);
    }

    /// Run at most `max_frames` frames. Stops early on `Exit` or `End`.
    /// Returns the number of frames run.
    pub fn run_frames(&mut self, ctx: &mut Ctx, max_frames: usize) -> usize {
        let dt = self.frame.as_secs_f32();
        for frame in 0..max_frames {
            let events = ctx.drain();
            let mut inputs = Vec::new();
            let mut reload = false;
            let mut ended = false;

            for ev in &events {
                match ev {
                    OutputEvent::LoadScene { .. } => reload = true,
                    OutputEvent::End => ended = true,
                    _ => {}
                }
                if let Some(input) = self.renderer.render(ev, ctx) {
                    inputs.push(input);
                }
            }
            if ended {
                log::info!("Playback ended");
                return frame + 1;
            }
            if reload {
                // the old scene is gone; anything it still wanted is void
                let (exe, path) = bookmark::boot(ctx, self.manager.clone(), self.store.clone(), &self.config);
                self.exe = exe;
                self.boot_path = path;
                continue;
            }

            if events.is_empty() {
                if let Some(input) = self.renderer.idle(ctx) {
                    inputs.push(input);
                }
            }
            for input in inputs {
                if input == InputEvent::Exit {
                    log::info!("Exit requested");
                    return frame + 1;
                }
                self.exe.feed(ctx, input);
            }

            if ctx.event_queue.is_empty() {
                self.exe.tick(ctx, dt);
                if self.realtime {
                    thread::sleep(self.frame);
                }
            }
        }
        max_frames
    }
}
