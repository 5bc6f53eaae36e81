//! The `KEY=VALUE;KEY=VALUE` command column.
//!
//! Keys are matched case-insensitively and the first occurrence of a key wins.
//! Absence is never an error: lookups return an empty string and callers pick
//! their own default.

pub const SEPARATOR: char = ';';

/// Value of the first `key=` token in `command`, trimmed. Empty when absent.
pub fn parse(command: &str, key: &str) -> String {
    tokens(command)
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.to_string())
        .unwrap_or_default()
}

/// Iterate the `(key, value)` pairs of a command column.
///
/// Tokens without `=` are skipped.
pub fn tokens(command: &str) -> impl Iterator<Item = (&str, &str)> {
    command
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
}

fn truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Target line of a jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpLine {
    End,
    Index(i64),
    Unset,
}

impl JumpLine {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("END") {
            Self::End
        } else {
            raw.parse().map(Self::Index).unwrap_or(Self::Unset)
        }
    }

    /// Resolve against a script of `len` lines. Always in range (0 for an empty script).
    pub fn resolve(self, len: usize) -> usize {
        let last = len.saturating_sub(1);
        match self {
            Self::End => last,
            Self::Index(i) if i <= 0 => 0,
            Self::Index(i) => usize::try_from(i).map_or(last, |i| i.min(last)),
            Self::Unset => 0,
        }
    }

    pub fn to_raw(self) -> String {
        match self {
            Self::End => "END".into(),
            Self::Index(i) => i.to_string(),
            Self::Unset => String::new(),
        }
    }
}

/// A decoded command token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Wait(String),
    WaitHide(bool),
    Act(String),
    JumpScene(String),
    JumpLine(JumpLine),
    JumpExternalScene(String),
    SkipMusicFade(bool),
    ChoiceId(String),
    ChoiceOpt(String),
    /// `AFF_DAMIAO`; `None` when the value is not an integer.
    Affinity(Option<i64>),
    Unrecognized { key: String, value: String },
}

impl Command {
    pub fn decode(key: &str, value: &str) -> Self {
        match key.to_ascii_uppercase().as_str() {
            "WAIT" => Self::Wait(value.to_string()),
            "WAIT_HIDE" => Self::WaitHide(truthy(value)),
            "ACT" => Self::Act(value.to_string()),
            "JUMP_SCENE" => Self::JumpScene(value.to_string()),
            "JUMP_LINE" => Self::JumpLine(JumpLine::parse(value)),
            "JUMP_UNITY_SCENE" => Self::JumpExternalScene(value.to_string()),
            "SKIP_MUSIC_FADE" => Self::SkipMusicFade(truthy(value)),
            "CHOICE_ID" => Self::ChoiceId(value.to_string()),
            "CHOICE_OPT" => Self::ChoiceOpt(value.to_string()),
            "AFF_DAMIAO" => Self::Affinity(value.parse().ok()),
            _ => Self::Unrecognized { key: key.to_string(), value: value.to_string() },
        }
    }
}

/// All commands of one line, decoded once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSet {
    commands: Vec<Command>,
}

macro_rules! find_text {
    ($self:ident, $variant:ident) => {
        $self.commands.iter().find_map(|c| match c {
            Command::$variant(v) if !v.is_empty() => Some(v.as_str()),
            _ => None,
        })
    };
}

impl CommandSet {
    pub fn decode(raw: &str) -> Self {
        let mut seen: Vec<String> = Vec::new();
        let mut commands = Vec::new();
        for (key, value) in tokens(raw) {
            let upper = key.to_ascii_uppercase();
            if seen.contains(&upper) {
                continue;
            }
            seen.push(upper);
            commands.push(Command::decode(key, value));
        }
        Self { commands }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// `Some` when a `WAIT` key is present, even with an empty type.
    pub fn wait(&self) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            Command::Wait(v) => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn wait_hide(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::WaitHide(true)))
    }

    pub fn act(&self) -> Option<&str> {
        find_text!(self, Act)
    }

    pub fn jump_scene(&self) -> Option<&str> {
        find_text!(self, JumpScene)
    }

    pub fn jump_line(&self) -> JumpLine {
        self.commands
            .iter()
            .find_map(|c| match c {
                Command::JumpLine(l) => Some(*l),
                _ => None,
            })
            .unwrap_or(JumpLine::Unset)
    }

    pub fn external_scene(&self) -> Option<&str> {
        find_text!(self, JumpExternalScene)
    }

    pub fn skip_music_fade(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::SkipMusicFade(true)))
    }

    pub fn choice_id(&self) -> Option<&str> {
        find_text!(self, ChoiceId)
    }

    pub fn choice_opt(&self) -> Option<&str> {
        find_text!(self, ChoiceOpt)
    }

    pub fn affinity(&self) -> Option<i64> {
        self.commands.iter().find_map(|c| match c {
            Command::Affinity(delta) => *delta,
            _ => None,
        })
    }
}
