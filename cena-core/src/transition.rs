//! Jump orchestration.
//!
//! A jump inside the current scene switches scripts on the spot. A jump into
//! an external scene runs a timed hand-off (delay, fade or crossfade, audio
//! migration), writes a [`JumpTicket`] to the state store and asks the host to
//! load the scene; the boot of the new scene picks the ticket up again
//! (see [`crate::bookmark::boot`]). Once started, a hand-off cannot be
//! cancelled, and the executor refuses input until it is over.

use cenascript_core::{CommandSet, JumpLine};
use serde_json::Value;

use crate::config::HandoffStyle;
use crate::error::PlaybackError;
use crate::event::OutputEvent;
use crate::executor::{Executor, Frame, PlaybackMode, Timer};
use crate::runtime::Ctx;
use crate::storager::types::{keys, JumpTicket};
use crate::storager::{self, StateStore};

#[derive(Debug, Clone, PartialEq)]
pub struct JumpRequest {
    pub target_script: String,
    pub target_line: JumpLine,
    pub external_scene: Option<String>,
    pub skip_audio_fade: bool,
}

impl JumpRequest {
    pub fn from_commands(cmds: &CommandSet) -> Self {
        Self {
            target_script: cmds.jump_scene().unwrap_or_default().to_string(),
            target_line: cmds.jump_line(),
            external_scene: cmds.external_scene().map(str::to_string),
            skip_audio_fade: cmds.skip_music_fade(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum JumpSequence {
    Delay { timer: Timer, request: JumpRequest },
    FadeOut { timer: Timer, request: JumpRequest },
    /// Waiting for the host to tear this scene down.
    Reloading,
    FadeIn { timer: Timer },
}

impl JumpTicket {
    pub fn save(&self, store: &mut dyn StateStore) -> anyhow::Result<()> {
        store.set(keys::JUMP_SCENE, Value::from(self.scene.as_str()))?;
        store.set(keys::JUMP_SCRIPT, Value::from(self.script.as_str()))?;
        store.set(keys::JUMP_LINE, Value::from(self.line.as_str()))?;
        store.set(keys::JUMP_FADE_IN, Value::from(self.fade_in))?;
        store.set(keys::JUMP_CARRY_AUDIO, Value::from(self.carry_audio))?;
        // last, so a half-written ticket is never seen as active
        store.set(keys::JUMP_ACTIVE, Value::from(true))
    }

    /// Consume a pending ticket. It is cleared whether or not it is usable.
    pub fn take(store: &mut dyn StateStore) -> Option<Self> {
        let active: bool = storager::read(store, keys::JUMP_ACTIVE).unwrap_or(false);
        let ticket = if active {
            let scene: Option<String> = storager::read(store, keys::JUMP_SCENE);
            let script: Option<String> = storager::read(store, keys::JUMP_SCRIPT);
            match (scene, script) {
                (Some(scene), Some(script)) => Some(Self {
                    scene,
                    script,
                    line: storager::read(store, keys::JUMP_LINE).unwrap_or_default(),
                    fade_in: storager::read(store, keys::JUMP_FADE_IN).unwrap_or(false),
                    carry_audio: storager::read(store, keys::JUMP_CARRY_AUDIO).unwrap_or(false),
                }),
                _ => {
                    log::error!("{}", PlaybackError::Persistence("jump ticket without target".into()));
                    None
                }
            }
        } else {
            None
        };
        for key in keys::JUMP_KEYS {
            if let Err(e) = store.delete(key) {
                log::error!("Failed to clear '{}': {:#}", key, e);
            }
        }
        ticket
    }
}

impl Executor {
    /// Start a jump. Returns true when playback should go on displaying lines
    /// right away, false when the hand-off owns the executor now.
    pub(crate) fn begin_jump(&mut self, ctx: &mut Ctx, request: JumpRequest) -> bool {
        self.auto_advance = None;
        self.pending_choice = None;

        let Some(scene) = request.external_scene.clone() else {
            return self.jump_in_scene(ctx, &request);
        };
        log::info!("Jump to '{}' in external scene '{}'", request.target_script, scene);
        self.mode = PlaybackMode::Jumping;
        self.jump = Some(JumpSequence::Delay { timer: Timer::new(self.config.transition.jump_delay_secs), request });
        self.tick_jump(ctx, 0.0);
        false
    }

    fn jump_in_scene(&mut self, ctx: &mut Ctx, request: &JumpRequest) -> bool {
        let Some(index) = self.sequence.iter().position(|s| *s == request.target_script) else {
            let err = PlaybackError::Reference { target: request.target_script.clone(), scene: self.scene.clone() };
            log::error!("{}, continuing in '{}'", err, self.frame.script);
            self.frame.advance();
            return true;
        };
        self.mode = PlaybackMode::Jumping;
        let script = request.target_script.clone();
        let lines = self.manager.load_or_empty(&script);
        let line = request.target_line.resolve(lines.len());
        log::info!("Jump to '{}' line {}", script, line);
        self.script_index = index;
        self.frame = Frame::new(script.clone(), lines, line);
        ctx.push(OutputEvent::ScriptEnter { script });
        self.mode = PlaybackMode::Narrating;
        true
    }

    pub(crate) fn tick_jump(&mut self, ctx: &mut Ctx, dt: f32) {
        let mut dt = dt;
        // stages whose timer is already spent run in the same tick
        loop {
            let Some(stage) = self.jump.take() else {
                return;
            };
            match stage {
                JumpSequence::Delay { mut timer, request } => {
                    if !timer.tick(dt) {
                        self.jump = Some(JumpSequence::Delay { timer, request });
                        return;
                    }
                    self.start_handoff(ctx, request);
                }
                JumpSequence::FadeOut { mut timer, request } => {
                    if !timer.tick(dt) {
                        self.jump = Some(JumpSequence::FadeOut { timer, request });
                        return;
                    }
                    self.hand_off(ctx, &request, true);
                }
                JumpSequence::Reloading => {
                    self.jump = Some(JumpSequence::Reloading);
                    return;
                }
                JumpSequence::FadeIn { mut timer } => {
                    if !timer.tick(dt) {
                        self.jump = Some(JumpSequence::FadeIn { timer });
                        return;
                    }
                    self.mode = PlaybackMode::Narrating;
                    self.display_current(ctx);
                    return;
                }
            }
            dt = 0.0;
        }
    }

    fn start_handoff(&mut self, ctx: &mut Ctx, request: JumpRequest) {
        match self.config.transition.style {
            HandoffStyle::Fade => {
                let secs = self.config.transition.fade_out_secs;
                ctx.push(OutputEvent::FadeOut { secs });
                push_audio(ctx, &request, secs);
                self.jump = Some(JumpSequence::FadeOut { timer: Timer::new(secs), request });
            }
            HandoffStyle::Crossfade => {
                let secs = self.config.transition.crossfade_secs;
                push_audio(ctx, &request, secs);
                ctx.push(OutputEvent::Crossfade { secs });
                self.hand_off(ctx, &request, false);
            }
        }
    }

    // Ticket first: the host may tear the process down on LoadScene.
    fn hand_off(&mut self, ctx: &mut Ctx, request: &JumpRequest, fade_in: bool) {
        let Some(scene) = request.external_scene.clone() else {
            return;
        };
        let ticket = JumpTicket {
            scene: scene.clone(),
            script: request.target_script.clone(),
            line: request.target_line.to_raw(),
            fade_in,
            carry_audio: request.skip_audio_fade,
        };
        let saved = ticket.save(&mut *self.store.borrow_mut());
        if let Err(e) = saved {
            log::error!("{}, staying in '{}'", PlaybackError::Persistence(format!("{:#}", e)), self.frame.script);
            let _ = JumpTicket::take(&mut *self.store.borrow_mut());
            self.mode = PlaybackMode::Narrating;
            self.frame.advance();
            self.display_current(ctx);
            return;
        }
        log::info!("Loading scene '{}'", scene);
        self.jump = Some(JumpSequence::Reloading);
        ctx.push(OutputEvent::LoadScene { scene });
    }

    /// Re-establish playback in a freshly booted scene from a consumed ticket.
    pub(crate) fn resume_jump(&mut self, ctx: &mut Ctx, ticket: JumpTicket) {
        let index = match self.sequence.iter().position(|s| *s == ticket.script) {
            Some(index) => index,
            None => {
                log::warn!("Script '{}' is not in scene '{}', playing it first", ticket.script, self.scene);
                self.sequence.push(ticket.script.clone());
                self.sequence.len() - 1
            }
        };
        let lines = self.manager.load_or_empty(&ticket.script);
        let line = JumpLine::parse(&ticket.line).resolve(lines.len());
        log::info!("Resuming jump at '{}' line {}", ticket.script, line);
        self.script_index = index;
        self.frame = Frame::new(ticket.script.clone(), lines, line);
        ctx.push(OutputEvent::ScriptEnter { script: ticket.script });
        if ticket.carry_audio {
            ctx.push(OutputEvent::RestoreAudio);
        }

        if ticket.fade_in {
            let secs = self.config.transition.fade_in_secs;
            self.mode = PlaybackMode::Jumping;
            ctx.push(OutputEvent::FadeIn { secs });
            self.jump = Some(JumpSequence::FadeIn { timer: Timer::new(secs) });
            self.tick_jump(ctx, 0.0);
        } else {
            self.mode = PlaybackMode::Narrating;
            self.display_current(ctx);
        }
    }
}

fn push_audio(ctx: &mut Ctx, request: &JumpRequest, secs: f32) {
    if request.skip_audio_fade {
        ctx.push(OutputEvent::MigrateAudio);
    } else {
        ctx.push(OutputEvent::FadeAudio { secs });
    }
}
