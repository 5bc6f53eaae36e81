#[derive(Debug, Clone, PartialEq)]
pub enum LineStyle {
    Dialogue,
    Narration,
    /// Styled text of a blocking line; carries the `WAIT` type, `act` for actions.
    Aside(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// `speaker` is `None` when the name must not be shown.
    ShowLine { speaker: Option<String>, text: String, style: LineStyle, progressive: bool },
    RevealProgress { visible: usize },
    RevealFinished,
    CharacterDirective { raw: String },
    Focus { speaker: String },
    DefocusAll,
    HideCharacters,
    ShowChoice { prompt: String, options: Vec<String> },

    ActionConfirmed { action: String },
    StartMinigame { action: String },
    AffinityDelta { delta: i64 },

    ScriptEnter { script: String },
    FadeOut { secs: f32 },
    FadeIn { secs: f32 },
    Crossfade { secs: f32 },
    FadeAudio { secs: f32 },
    MigrateAudio,
    RestoreAudio,
    LoadScene { scene: String },

    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Continue,
    ChoiceMade { index: usize },
    MinigameFinished { success: bool },
    SaveRequest,
    Exit,
}
