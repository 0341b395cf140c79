use tracing::{debug, info, warn};

use crate::clock::{ClockId, SessionClock, Tick, TickScheduler};
use crate::error::ValidationError;
use crate::parser::parse_word_list;
use crate::session::{Phase, Session, WORD_DURATION_SECS};
use crate::tone::ToneSignal;

/// What a delivered tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick came from a stopped or replaced clock and was dropped.
    Stale,
    /// Countdown moved on; carries the value now showing.
    Countdown(u32),
    /// Countdown hit zero and the first word is up.
    Started,
    /// Current word keeps showing; carries the seconds left.
    Remaining(u32),
    /// Moved on to the word at this index.
    NextWord(usize),
    /// Last word's window ended.
    Completed,
}

/// Drives one session at a time: countdown, word timing, and cues.
///
/// All mutation goes through `start`, `on_tick`, `interrupt` and `reset`;
/// callers only ever see the session through [`SessionController::session`].
#[derive(Debug)]
pub struct SessionController<S: TickScheduler, T: ToneSignal> {
    session: Session,
    clock: SessionClock<S>,
    tone: T,
}

impl<S: TickScheduler, T: ToneSignal> SessionController<S, T> {
    pub fn new(scheduler: S, tone: T) -> Self {
        Self {
            session: Session::default(),
            clock: SessionClock::new(scheduler),
            tone,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Owned copy of the current state, for display.
    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Id of the clock whose ticks are currently accepted.
    pub fn active_clock(&self) -> Option<ClockId> {
        self.clock.active()
    }

    /// Parses `raw_text` and begins the countdown.
    ///
    /// Leaves the session untouched when the text holds no words or a
    /// session is already underway.
    pub fn start(&mut self, raw_text: &str) -> Result<(), ValidationError> {
        if self.session.phase != Phase::Idle {
            warn!(phase = %self.session.phase, "start rejected, session in progress");
            return Err(ValidationError::SessionActive);
        }

        let words = parse_word_list(raw_text);
        if words.is_empty() {
            warn!("start rejected, no words in input");
            return Err(ValidationError::EmptyWordList);
        }

        info!(words = words.len(), "session starting");
        self.session = Session::with_words(words);
        self.clock.start();
        Ok(())
    }

    pub fn on_tick(&mut self, tick: Tick) -> TickOutcome {
        if !self.clock.accepts(tick) {
            debug!(clock = tick.clock.raw(), "dropping stale tick");
            return TickOutcome::Stale;
        }

        match self.session.phase {
            Phase::Countdown => self.countdown_tick(),
            Phase::Running => self.running_tick(),
            // the clock is stopped on every way into these phases
            Phase::Idle | Phase::Completed => {
                self.clock.stop();
                TickOutcome::Stale
            }
        }
    }

    fn countdown_tick(&mut self) -> TickOutcome {
        self.tone.emit();
        self.session.countdown_remaining = self.session.countdown_remaining.saturating_sub(1);

        if self.session.countdown_remaining > 0 {
            debug!(remaining = self.session.countdown_remaining, "countdown");
            return TickOutcome::Countdown(self.session.countdown_remaining);
        }

        self.tone.emit();
        self.session.phase = Phase::Running;
        self.session.current_index = 0;
        self.session.time_remaining = WORD_DURATION_SECS;
        self.clock.start();
        info!("countdown finished, showing first word");
        TickOutcome::Started
    }

    fn running_tick(&mut self) -> TickOutcome {
        if self.session.time_remaining > 1 {
            self.session.time_remaining -= 1;
            return TickOutcome::Remaining(self.session.time_remaining);
        }

        self.tone.emit();

        if self.session.is_last_word() {
            self.session.phase = Phase::Completed;
            self.session.time_remaining = 0;
            self.clock.stop();
            info!(words = self.session.words.len(), "session completed");
            return TickOutcome::Completed;
        }

        self.session.current_index += 1;
        self.session.time_remaining = WORD_DURATION_SECS;
        debug!(index = self.session.current_index, "next word");
        TickOutcome::NextWord(self.session.current_index)
    }

    /// Abandons a counting-down or running session.
    ///
    /// The caller is expected to have confirmed this with the user.
    /// Returns false (and does nothing) outside those phases.
    pub fn interrupt(&mut self) -> bool {
        if !self.session.phase.is_active() {
            return false;
        }

        self.clock.stop();
        info!(
            phase = %self.session.phase,
            index = self.session.current_index,
            "session interrupted"
        );
        self.session = Session::default();
        true
    }

    /// Clears a finished session back to idle.
    ///
    /// Active sessions are left alone; those end through `interrupt`.
    pub fn reset(&mut self) {
        if self.session.phase.is_active() {
            debug!(phase = %self.session.phase, "reset ignored during active session");
            return;
        }

        self.clock.stop();
        self.session = Session::default();
    }
}
