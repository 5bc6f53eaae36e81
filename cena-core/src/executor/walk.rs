use cenascript_core::{LineKind, ScriptLine};
use crate::config::PlaybackConfig;
use crate::decision::DecisionStore;
use crate::event::{LineStyle, OutputEvent};
use crate::executor::PlaybackMode;
use crate::executor::scanner::{PendingChoice, Scanner};
use crate::transition::JumpRequest;

pub(crate) struct WalkEnv<'a> {
    pub decisions: &'a DecisionStore,
    pub config: &'a PlaybackConfig,
}

/// Text to put on screen once a line settles.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Display {
    pub speaker: Option<String>,
    pub text: String,
    pub style: LineStyle,
}

#[derive(Debug, Clone)]
pub(crate) struct LineEffect {
    pub events: Vec<OutputEvent>,
    pub next: NextAction,
}

#[derive(Debug, Clone)]
pub(crate) enum NextAction {
    /// Show text and wait for input in `mode`.
    Show { display: Display, mode: PlaybackMode },
    /// Nothing to show, move to the next line.
    Continue,
    /// Branch scan result: resume at this index.
    SkipTo(usize),
    WaitChoice(PendingChoice),
    Jump(JumpRequest),
}

pub(crate) fn walk_line(env: &WalkEnv, lines: &[ScriptLine], pc: usize) -> LineEffect {
    let line = &lines[pc];
    log::trace!("walk_line {}: {:?}", pc, line);
    let cmds = line.commands();
    let mut events = Vec::new();

    let next = match line.kind() {
        kind @ (LineKind::Dialogue | LineKind::Narrator) => {
            let speaker = if kind == LineKind::Dialogue {
                events.push(OutputEvent::Focus { speaker: line.speaker.clone() });
                Some(line.speaker.clone())
            } else {
                events.push(OutputEvent::DefocusAll);
                None
            };
            if !line.command.is_empty() {
                events.push(OutputEvent::CharacterDirective { raw: line.command.clone() });
            }
            match cmds.wait() {
                Some(wait) => {
                    if cmds.wait_hide() {
                        events.push(OutputEvent::HideCharacters);
                    }
                    NextAction::Show {
                        display: Display { speaker, text: line.text.clone(), style: LineStyle::Aside(wait.to_string()) },
                        mode: PlaybackMode::Waiting,
                    }
                }
                None => {
                    let style = if kind == LineKind::Dialogue { LineStyle::Dialogue } else { LineStyle::Narration };
                    NextAction::Show {
                        display: Display { speaker, text: line.text.clone(), style },
                        mode: PlaybackMode::Narrating,
                    }
                }
            }
        }
        LineKind::Wait => {
            if cmds.wait_hide() {
                events.push(OutputEvent::HideCharacters);
            }
            let wait = cmds.wait().unwrap_or_default().to_string();
            NextAction::Show {
                display: Display { speaker: None, text: line.text.clone(), style: LineStyle::Aside(wait) },
                mode: PlaybackMode::Waiting,
            }
        }
        LineKind::Act => {
            if cmds.wait_hide() {
                events.push(OutputEvent::HideCharacters);
            }
            let aside = LineStyle::Aside("act".into());
            match cmds.act() {
                Some(id) if id.eq_ignore_ascii_case(&env.config.intercept_result_action) => {
                    let text = if env.decisions.minigame_result() {
                        env.config.intercept_win_text.clone()
                    } else {
                        env.config.intercept_loss_text.clone()
                    };
                    NextAction::Show {
                        display: Display { speaker: None, text, style: aside },
                        mode: PlaybackMode::Waiting,
                    }
                }
                Some(id) => NextAction::Show {
                    display: Display { speaker: None, text: line.text.clone(), style: aside },
                    mode: PlaybackMode::Acting { action: id.to_string(), awaiting_minigame: false },
                },
                None => {
                    log::warn!("ACT line at row {} has no ACT id, playing it as a wait", line.row);
                    NextAction::Show {
                        display: Display { speaker: None, text: line.text.clone(), style: aside },
                        mode: PlaybackMode::Waiting,
                    }
                }
            }
        }
        LineKind::Jump => NextAction::Jump(JumpRequest::from_commands(&cmds)),
        LineKind::Branch => {
            let last = env.decisions.last_choice();
            let exit = Scanner::branch_exit(lines, pc, last.as_ref());
            if exit == pc + 1 { NextAction::Continue } else { NextAction::SkipTo(exit) }
        }
        LineKind::BranchEnd => NextAction::Continue,
        LineKind::Choice => {
            if line.text.is_empty() {
                NextAction::Continue
            } else {
                let choice = Scanner::collect_choice(lines, pc, env.config.choice_slots);
                if choice.options.is_empty() {
                    log::warn!("CHOICE at row {} has no options", line.row);
                    NextAction::Continue
                } else {
                    NextAction::WaitChoice(choice)
                }
            }
        }
    };
    LineEffect { events, next }
}
