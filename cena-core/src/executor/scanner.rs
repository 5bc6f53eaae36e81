use cenascript_core::{LineKind, ScriptLine};
use crate::decision::LastChoice;

/// Options gathered for a `CHOICE` line.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChoice {
    pub prompt: String,
    pub options: Vec<ScriptLine>,
    /// Index just past the collected options.
    pub resume_at: usize,
}

impl PendingChoice {
    /// Slot label of each option: the speaker column, or the text when that is empty.
    pub fn labels(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|o| if o.speaker.is_empty() { o.text.clone() } else { o.speaker.clone() })
            .collect()
    }
}

pub struct Scanner;

impl Scanner {
    /// Collect the rows after the `CHOICE` at `pc` until the next `CHOICE`,
    /// the end of the script or `slots` options.
    pub fn collect_choice(lines: &[ScriptLine], pc: usize, slots: usize) -> PendingChoice {
        let prompt = lines.get(pc).map(|l| l.text.clone()).unwrap_or_default();
        let mut options = Vec::new();
        let mut idx = pc + 1;

        while idx < lines.len() && options.len() < slots {
            let line = &lines[idx];
            if line.kind() == LineKind::Choice {
                break;
            }
            options.push(line.clone());
            idx += 1;
        }
        PendingChoice { prompt, options, resume_at: idx }
    }

    /// Where playback continues after the `BRANCH` at `pc`: inside the first
    /// matching branch body, or just past the next `BRANCH_END`. The end of the
    /// script closes an unterminated branch run.
    pub fn branch_exit(lines: &[ScriptLine], pc: usize, last: Option<&LastChoice>) -> usize {
        if lines.get(pc).is_some_and(|l| branch_matches(l, last)) {
            return pc + 1;
        }
        for (idx, line) in lines.iter().enumerate().skip(pc + 1) {
            match line.kind() {
                LineKind::Branch if branch_matches(line, last) => return idx + 1,
                LineKind::BranchEnd => return idx + 1,
                _ => {}
            }
        }
        lines.len()
    }
}

fn branch_matches(line: &ScriptLine, last: Option<&LastChoice>) -> bool {
    let cmds = line.commands();
    match (cmds.choice_id(), last) {
        (Some(id), Some(last)) => last.matches(id, cmds.choice_opt().unwrap_or("")),
        _ => false,
    }
}
