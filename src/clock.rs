use std::time::Duration;

/// Spacing between ticks of every session clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identity of one clock subscription.
///
/// Each call to [`SessionClock::start`] hands out a new id, so ticks that
/// were produced for an older subscription can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockId(u64);

impl ClockId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One elapsed period, stamped with the clock that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub clock: ClockId,
}

impl Tick {
    pub fn new(clock: ClockId) -> Self {
        Self { clock }
    }
}

/// Environment hook that actually delivers ticks.
///
/// `schedule` should arrange for `Tick { clock }` to be delivered every
/// `period` until `cancel(clock)` is called. Delivery may lag behind
/// cancellation; [`SessionClock::accepts`] filters what slips through.
pub trait TickScheduler {
    fn schedule(&mut self, clock: ClockId, period: Duration);
    fn cancel(&mut self, clock: ClockId);
}

impl<T: TickScheduler + ?Sized> TickScheduler for Box<T> {
    fn schedule(&mut self, clock: ClockId, period: Duration) {
        (**self).schedule(clock, period)
    }

    fn cancel(&mut self, clock: ClockId) {
        (**self).cancel(clock)
    }
}

/// Scheduler that never delivers anything. Ticks are fed by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualScheduler;

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, _clock: ClockId, _period: Duration) {}
    fn cancel(&mut self, _clock: ClockId) {}
}

/// Owns the single active tick subscription.
#[derive(Debug)]
pub struct SessionClock<S: TickScheduler> {
    scheduler: S,
    next_id: u64,
    active: Option<ClockId>,
}

impl<S: TickScheduler> SessionClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            next_id: 0,
            active: None,
        }
    }

    /// Cancels whatever is running and starts a fresh subscription.
    pub fn start(&mut self) -> ClockId {
        self.stop();

        self.next_id += 1;
        let id = ClockId(self.next_id);
        self.active = Some(id);
        self.scheduler.schedule(id, TICK_PERIOD);
        tracing::debug!(clock = id.raw(), "clock started");
        id
    }

    pub fn stop(&mut self) {
        if let Some(id) = self.active.take() {
            self.scheduler.cancel(id);
            tracing::debug!(clock = id.raw(), "clock stopped");
        }
    }

    pub fn active(&self) -> Option<ClockId> {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// True only for ticks of the current subscription.
    pub fn accepts(&self, tick: Tick) -> bool {
        self.active == Some(tick.clock)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
