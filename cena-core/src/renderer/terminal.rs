use crate::event::{InputEvent, LineStyle, OutputEvent};
use crate::renderer::Renderer;
use crate::runtime::Ctx;
use std::io::{stdin, stdout, Write};

#[derive(Default)]
pub struct TerminalRenderer {
    // a save was just requested; ask for the pending confirm again
    reprompt: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, out: &OutputEvent, _ctx: &mut Ctx) -> Option<InputEvent> {
        match out {
            OutputEvent::ShowLine { speaker, text, style, .. } => {
                match (style, speaker) {
                    (LineStyle::Aside(kind), _) if !kind.is_empty() => println!("  ({}) {}", kind, text),
                    (LineStyle::Aside(_), _) => println!("  ({})", text),
                    (_, Some(name)) => println!("[{}] {}", name, text),
                    (_, None) => println!("{}", text),
                }
                None
            }
            OutputEvent::RevealFinished => self.wait_continue(),
            OutputEvent::ShowChoice { prompt, options } => {
                println!("--- {} ---", prompt);
                for (i, o) in options.iter().enumerate() {
                    println!("  [{}] {}", i + 1, o);
                }
                self.wait_choice(options.len())
            }
            OutputEvent::StartMinigame { action } => {
                println!("[Minigame] {} - did you win? (y/n)", action);
                Some(InputEvent::MinigameFinished { success: self.wait_yes_no() })
            }
            OutputEvent::AffinityDelta { delta } => {
                println!("[Affinity] {:+}", delta);
                None
            }
            OutputEvent::FadeOut { secs } => {
                println!("[FadeOut] {:.1}s", secs);
                None
            }
            OutputEvent::FadeIn { secs } => {
                println!("[FadeIn] {:.1}s", secs);
                None
            }
            OutputEvent::LoadScene { scene } => {
                println!("[LoadScene] {}", scene);
                None
            }
            OutputEvent::End => {
                println!("[End]");
                None
            }
            _ => None,
        }
    }

    fn idle(&mut self, _ctx: &mut Ctx) -> Option<InputEvent> {
        if self.reprompt {
            self.reprompt = false;
            return self.wait_continue();
        }
        None
    }
}

impl TerminalRenderer {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = stdout().flush();
        let mut buf = String::new();
        match stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf.trim().to_string()),
        }
    }

    fn wait_continue(&mut self) -> Option<InputEvent> {
        loop {
            let Some(line) = self.read_line("> ") else {
                return Some(InputEvent::Exit);
            };
            if line.is_empty() {
                return Some(InputEvent::Continue);
            }
            if line.eq_ignore_ascii_case("exit") {
                return Some(InputEvent::Exit);
            }
            if line.eq_ignore_ascii_case(":save") {
                self.reprompt = true;
                return Some(InputEvent::SaveRequest);
            }
            println!("invalid (enter, :save, exit)");
        }
    }

    fn wait_choice(&mut self, len: usize) -> Option<InputEvent> {
        loop {
            let line = self.read_line("Select> ")?;
            if let Ok(n) = line.parse::<usize>() {
                if n >= 1 && n <= len {
                    return Some(InputEvent::ChoiceMade { index: n - 1 });
                }
            }
            if line.eq_ignore_ascii_case("exit") {
                return Some(InputEvent::Exit);
            }
            println!("invalid");
        }
    }

    fn wait_yes_no(&mut self) -> bool {
        loop {
            match self.read_line("y/n> ").as_deref() {
                Some("y") | Some("Y") => return true,
                Some("n") | Some("N") | None => return false,
                _ => println!("invalid"),
            }
        }
    }
}
