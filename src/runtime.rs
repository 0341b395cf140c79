use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::clock::{ClockId, Tick, TickScheduler};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum WatEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Clock(Tick),
    /// Nothing arrived within the refresh interval
    Refresh,
}

/// Source of app events (keyboard, resize, clock ticks)
pub trait WatEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<WatEvent, RecvTimeoutError>;
}

/// Channel every producer (terminal reader, clock threads) sends into.
pub fn event_channel() -> (Sender<WatEvent>, ChannelEventSource) {
    let (tx, rx) = mpsc::channel();
    (tx, ChannelEventSource::new(rx))
}

/// Forwards crossterm input into the event channel from a reader thread.
pub fn spawn_terminal_reader(tx: Sender<WatEvent>) {
    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(CtEvent::Key(key)) => WatEvent::Key(key),
            Ok(CtEvent::Paste(text)) => WatEvent::Paste(text),
            Ok(CtEvent::Resize(_, _)) => WatEvent::Resize,
            Ok(_) => continue,
            Err(err) => {
                tracing::error!(%err, "terminal input failed");
                break;
            }
        };

        if tx.send(evt).is_err() {
            break;
        }
    });
}

/// Event source backed by an mpsc receiver; used in production and tests.
pub struct ChannelEventSource {
    rx: Receiver<WatEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<WatEvent>) -> Self {
        Self { rx }
    }
}

impl WatEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WatEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Delivers clock ticks into the event channel, one thread per subscription.
///
/// Cancelling flips the subscription's flag; the thread notices on its next
/// wake-up and exits. A tick it already sent stays in the channel and is
/// rejected by the session clock.
pub struct ChannelScheduler {
    tx: Sender<WatEvent>,
    running: HashMap<ClockId, Arc<AtomicBool>>,
}

impl ChannelScheduler {
    pub fn new(tx: Sender<WatEvent>) -> Self {
        Self {
            tx,
            running: HashMap::new(),
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.running.len()
    }
}

impl TickScheduler for ChannelScheduler {
    fn schedule(&mut self, clock: ClockId, period: Duration) {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.running.insert(clock, Arc::clone(&cancelled));

        let tx = self.tx.clone();
        thread::spawn(move || {
            let mut next = Instant::now() + period;
            loop {
                thread::sleep(next.saturating_duration_since(Instant::now()));
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                if tx.send(WatEvent::Clock(Tick::new(clock))).is_err() {
                    break;
                }
                next += period;
            }
        });
    }

    fn cancel(&mut self, clock: ClockId) {
        if let Some(flag) = self.running.remove(&clock) {
            flag.store(true, Ordering::Release);
        }
    }
}

impl Drop for ChannelScheduler {
    fn drop(&mut self) {
        for flag in self.running.values() {
            flag.store(true, Ordering::Release);
        }
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: WatEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: WatEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the refresh interval and returns the next event.
    ///
    /// `Ok(Refresh)` on timeout; `Err(Disconnected)` once every producer is gone.
    pub fn step(&self) -> Result<WatEvent, RecvTimeoutError> {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => Ok(ev),
            Err(RecvTimeoutError::Timeout) => Ok(WatEvent::Refresh),
            Err(err @ RecvTimeoutError::Disconnected) => Err(err),
        }
    }
}
