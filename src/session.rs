use crate::parser::WordList;

/// Seconds each word stays on screen.
pub const WORD_DURATION_SECS: u32 = 15;
/// First value shown by the pre-session countdown.
pub const COUNTDOWN_FROM: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Phase {
    #[default]
    Idle,
    Countdown,
    Running,
    Completed,
}

impl Phase {
    /// Phases that an interrupt can cut short.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Countdown | Phase::Running)
    }
}

/// State of the one session the controller owns.
///
/// `current_index` and `time_remaining` only mean something in
/// `Running`/`Completed`, `countdown_remaining` only in `Countdown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    pub words: WordList,
    pub current_index: usize,
    pub time_remaining: u32,
    pub countdown_remaining: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            words: WordList::default(),
            current_index: 0,
            time_remaining: WORD_DURATION_SECS,
            countdown_remaining: COUNTDOWN_FROM,
        }
    }
}

impl Session {
    pub(crate) fn with_words(words: WordList) -> Self {
        Self {
            phase: Phase::Countdown,
            words,
            ..Self::default()
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        match self.phase {
            Phase::Running | Phase::Completed => self.words.get(self.current_index),
            _ => None,
        }
    }

    pub fn is_last_word(&self) -> bool {
        self.current_index + 1 >= self.words.len()
    }

    /// 1-based position for display, e.g. `(2, 5)` for "2 / 5".
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index + 1, self.words.len())
    }
}
