mod frame;
mod reveal;
mod scanner;
mod timer;
mod walk;

use std::fmt;
use std::sync::Arc;

use crate::config::CoreConfig;
use crate::decision::DecisionStore;
use crate::error::{PlaybackError, PlaybackResult};
use crate::event::{InputEvent, LineStyle, OutputEvent};
use crate::manager::ScriptManager;
use crate::runtime::{Ctx, DialogueRecord};
use crate::storager::SharedStore;
use crate::storager::types::Bookmark;
use crate::transition::JumpSequence;
use walk::{walk_line, Display, NextAction, WalkEnv};

pub use frame::{Frame, PlaybackPosition};
pub use reveal::Reveal;
pub use scanner::{PendingChoice, Scanner};
pub use timer::Timer;

// Upper bound on lines passed through without showing anything in one display pass.
const MAX_SILENT_HOPS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackMode {
    Narrating,
    Waiting,
    Acting { action: String, awaiting_minigame: bool },
    ChoicePending,
    BranchScanning,
    Jumping,
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrating => write!(f, "narrating"),
            Self::Waiting => write!(f, "waiting"),
            Self::Acting { action, awaiting_minigame: false } => write!(f, "acting '{}'", action),
            Self::Acting { action, awaiting_minigame: true } => write!(f, "awaiting minigame '{}'", action),
            Self::ChoicePending => write!(f, "choice pending"),
            Self::BranchScanning => write!(f, "scanning branches"),
            Self::Jumping => write!(f, "jumping"),
        }
    }
}

/// The playback state machine. One cursor over the scripts of one scene.
pub struct Executor {
    pub(crate) manager: Arc<ScriptManager>,
    pub(crate) store: SharedStore,
    pub(crate) decisions: DecisionStore,
    pub(crate) config: CoreConfig,
    pub(crate) scene: String,
    pub(crate) sequence: Vec<String>,
    pub(crate) script_index: usize,
    pub(crate) frame: Frame,
    pub(crate) mode: PlaybackMode,
    pub(crate) reveal: Reveal,
    pub(crate) pending_choice: Option<PendingChoice>,
    pub(crate) auto_advance: Option<Timer>,
    // set while a choice answer is on screen: where the next advance lands
    pub(crate) answer_resume: Option<usize>,
    pub(crate) jump: Option<JumpSequence>,
}

impl Executor {
    pub fn new(manager: Arc<ScriptManager>, store: SharedStore, config: CoreConfig, scene: &str) -> Self {
        let sequence = match config.playback.sequence(scene) {
            Some(seq) => seq.to_vec(),
            None => {
                log::warn!("Scene '{}' has no configured script sequence", scene);
                Vec::new()
            }
        };
        Executor {
            decisions: DecisionStore::new(store.clone()),
            reveal: Reveal::new(config.playback.reveal_cps),
            manager,
            store,
            config,
            scene: scene.to_string(),
            sequence,
            script_index: 0,
            frame: Frame::empty(),
            mode: PlaybackMode::Narrating,
            pending_choice: None,
            auto_advance: None,
            answer_resume: None,
            jump: None,
        }
    }

    /// Start at `line` of the `script_index`-th script of the scene and show it.
    /// `line` is kept as given; past the end playback moves to the next script.
    pub fn start(&mut self, ctx: &mut Ctx, script_index: usize, line: usize) {
        if self.sequence.is_empty() {
            log::warn!("Scene '{}' has nothing to play", self.scene);
            ctx.push(OutputEvent::End);
            return;
        }
        let index = script_index.min(self.sequence.len() - 1);
        self.enter_script(ctx, index, line);
        self.display_current(ctx);
    }

    pub fn feed(&mut self, ctx: &mut Ctx, ev: InputEvent) {
        match ev {
            InputEvent::Continue => self.advance(ctx),
            InputEvent::ChoiceMade { index } => self.select_choice(ctx, index),
            InputEvent::MinigameFinished { success } => self.minigame_finished(ctx, success),
            InputEvent::SaveRequest => {
                if let Err(e) = self.save_bookmark() {
                    log::error!("Save failed: {}", e);
                }
            }
            InputEvent::Exit => {}
        }
    }

    /// Player confirm. Completes a running reveal first; otherwise moves on.
    pub fn advance(&mut self, ctx: &mut Ctx) {
        match &self.mode {
            PlaybackMode::ChoicePending
            | PlaybackMode::Jumping
            | PlaybackMode::BranchScanning
            | PlaybackMode::Acting { awaiting_minigame: true, .. } => {
                log::debug!("{}", PlaybackError::State { op: "advance", mode: self.mode.to_string() });
                return;
            }
            _ => {}
        }
        // any confirm counts as manual input, even one that only completes the reveal
        self.auto_advance = None;
        if self.reveal.skip() {
            ctx.push(OutputEvent::RevealFinished);
            return;
        }
        self.answer_resume = None;

        if let PlaybackMode::Acting { action, .. } = &self.mode {
            let action = action.clone();
            if action.eq_ignore_ascii_case(&self.config.playback.intercept_start_action) {
                log::info!("Handing over to minigame '{}'", action);
                self.mode = PlaybackMode::Acting { action: action.clone(), awaiting_minigame: true };
                ctx.push(OutputEvent::StartMinigame { action });
                return;
            }
            ctx.push(OutputEvent::ActionConfirmed { action });
        }

        self.mode = PlaybackMode::Narrating;
        self.frame.advance();
        self.display_current(ctx);
    }

    pub fn select_choice(&mut self, ctx: &mut Ctx, index: usize) {
        if self.mode != PlaybackMode::ChoicePending {
            log::debug!("{}", PlaybackError::State { op: "choice selection", mode: self.mode.to_string() });
            return;
        }
        let Some(choice) = self.pending_choice.as_ref() else {
            return;
        };
        let Some(option) = choice.options.get(index).cloned() else {
            log::debug!("Choice index {} out of range ({} options)", index, choice.options.len());
            return;
        };
        let resume_at = choice.resume_at;
        self.pending_choice = None;

        let cmds = option.commands();
        let playback = &self.config.playback;
        if let Some(id) = cmds.choice_id() {
            let opt = cmds.choice_opt().unwrap_or_default();
            log::info!("Choice {} = {}", id, opt);
            self.decisions.set_last_choice(id, opt);
            if id.eq_ignore_ascii_case(&playback.moral_choice_id) {
                self.decisions.set_moral_flag(opt.eq_ignore_ascii_case(&playback.moral_truth_opt));
            }
        }
        if let Some(delta) = cmds.affinity() {
            self.decisions.add_affinity(delta);
            ctx.push(OutputEvent::AffinityDelta { delta });
        }
        if !option.command.is_empty() {
            ctx.push(OutputEvent::CharacterDirective { raw: option.command.clone() });
        }

        self.mode = PlaybackMode::Narrating;
        if option.text.is_empty() {
            self.frame.pc = resume_at;
            self.display_current(ctx);
            return;
        }
        // the next advance lands exactly on the resume point
        self.frame.pc = resume_at - 1;
        self.answer_resume = Some(resume_at);
        ctx.push(OutputEvent::DefocusAll);
        self.present(ctx, Display { speaker: None, text: option.text, style: LineStyle::Narration });
        self.auto_advance = self.config.playback.choice_auto_advance_secs
            .filter(|secs| *secs > 0.0)
            .map(Timer::new);
    }

    pub fn minigame_finished(&mut self, ctx: &mut Ctx, success: bool) {
        if !matches!(self.mode, PlaybackMode::Acting { awaiting_minigame: true, .. }) {
            log::debug!("Stale minigame result ignored while {}", self.mode);
            return;
        }
        log::info!("Minigame finished: {}", if success { "won" } else { "lost" });
        self.decisions.set_minigame_result(success);
        let delta = if success {
            self.config.playback.minigame_win_affinity
        } else {
            self.config.playback.minigame_loss_affinity
        };
        if delta != 0 {
            self.decisions.add_affinity(delta);
            ctx.push(OutputEvent::AffinityDelta { delta });
        }
        self.mode = PlaybackMode::Narrating;
        self.frame.advance();
        self.display_current(ctx);
    }

    /// Drive every pending timed operation by `dt` seconds.
    pub fn tick(&mut self, ctx: &mut Ctx, dt: f32) {
        let reveal_left = self.reveal.remaining_secs();
        if let Some(visible) = self.reveal.update(dt) {
            ctx.push(OutputEvent::RevealProgress { visible });
            if !self.reveal.is_active() {
                ctx.push(OutputEvent::RevealFinished);
            }
        }
        if !self.reveal.is_active() {
            // the auto-advance only gets the part of the frame after the reveal ended
            let elapsed = (dt - reveal_left).max(0.0);
            if let Some(timer) = self.auto_advance.as_mut() {
                if timer.tick(elapsed) {
                    self.auto_advance = None;
                    log::debug!("Choice auto-advance fired");
                    self.advance(ctx);
                }
            }
        }
        self.tick_jump(ctx, dt);
    }

    /// Persist the current position. Refused while a jump or the minigame is in flight.
    pub fn save_bookmark(&self) -> PlaybackResult<()> {
        if matches!(self.mode, PlaybackMode::Jumping | PlaybackMode::Acting { awaiting_minigame: true, .. }) {
            return Err(PlaybackError::State { op: "save", mode: self.mode.to_string() });
        }
        let line = self.answer_resume.unwrap_or(self.frame.pc);
        let bookmark = Bookmark { scene: self.scene.clone(), script_index: self.script_index, line };
        bookmark
            .save(&mut *self.store.borrow_mut())
            .map_err(|e| PlaybackError::Persistence(format!("{:#}", e)))?;
        log::info!("Saved bookmark {}:{}:{}", bookmark.scene, self.frame.script, bookmark.line);
        Ok(())
    }

    pub fn position(&self) -> PlaybackPosition {
        self.frame.position()
    }

    pub fn mode(&self) -> &PlaybackMode {
        &self.mode
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn script_index(&self) -> usize {
        self.script_index
    }

    pub fn decisions(&self) -> &DecisionStore {
        &self.decisions
    }

    pub fn pending_choice(&self) -> Option<&PendingChoice> {
        self.pending_choice.as_ref()
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_active()
    }

    pub(crate) fn enter_script(&mut self, ctx: &mut Ctx, index: usize, line: usize) {
        let script = self.sequence[index].clone();
        let lines = self.manager.load_or_empty(&script);
        log::info!("Entering script '{}' at line {} ({} lines)", script, line, lines.len());
        self.script_index = index;
        self.frame = Frame::new(script.clone(), lines, line);
        ctx.push(OutputEvent::ScriptEnter { script });
    }

    fn next_script(&mut self, ctx: &mut Ctx) {
        let next = (self.script_index + 1) % self.sequence.len();
        self.enter_script(ctx, next, 0);
    }

    /// Run lines from the cursor until one needs the player (or a jump takes over).
    pub(crate) fn display_current(&mut self, ctx: &mut Ctx) {
        let mut wraps = 0;
        let mut hops = 0;
        loop {
            if self.frame.current().is_none() {
                wraps += 1;
                if self.sequence.is_empty() || wraps > self.sequence.len() {
                    log::warn!("Nothing left to show in scene '{}'", self.scene);
                    self.mode = PlaybackMode::Narrating;
                    ctx.push(OutputEvent::End);
                    return;
                }
                self.next_script(ctx);
                continue;
            }
            hops += 1;
            if hops > MAX_SILENT_HOPS {
                log::error!("Script '{}' loops without showing anything, stopping", self.frame.script);
                self.mode = PlaybackMode::Narrating;
                ctx.push(OutputEvent::End);
                return;
            }

            let effect = {
                let env = WalkEnv { decisions: &self.decisions, config: &self.config.playback };
                walk_line(&env, &self.frame.lines, self.frame.pc)
            };
            ctx.event_queue.extend(effect.events);

            match effect.next {
                NextAction::Continue => self.frame.advance(),
                NextAction::SkipTo(idx) => {
                    self.mode = PlaybackMode::BranchScanning;
                    log::debug!("Branch skipped from line {} to {}", self.frame.pc, idx);
                    self.frame.pc = idx;
                }
                NextAction::Show { display, mode } => {
                    self.mode = mode;
                    self.present(ctx, display);
                    return;
                }
                NextAction::WaitChoice(choice) => {
                    self.auto_advance = None;
                    ctx.push(OutputEvent::ShowChoice { prompt: choice.prompt.clone(), options: choice.labels() });
                    self.pending_choice = Some(choice);
                    self.mode = PlaybackMode::ChoicePending;
                    return;
                }
                NextAction::Jump(request) => {
                    if !self.begin_jump(ctx, request) {
                        return;
                    }
                }
            }
        }
    }

    fn present(&mut self, ctx: &mut Ctx, display: Display) {
        let progressive = self.reveal.start(&display.text);
        ctx.dialogue_history.push(DialogueRecord { speaker: display.speaker.clone(), text: display.text.clone() });
        ctx.push(OutputEvent::ShowLine {
            speaker: display.speaker,
            text: display.text,
            style: display.style,
            progressive,
        });
        if !progressive {
            ctx.push(OutputEvent::RevealFinished);
        }
    }
}
