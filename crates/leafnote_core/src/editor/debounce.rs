//! Debounced persistence timer.
//!
//! The editor is single-threaded, so the timer is a deadline polled by the
//! owner (`EditorSession::tick`) rather than a background task. Time comes
//! from an injectable [`Clock`].

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Default quiet period before a typed change is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Wall-clock [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced [`Clock`] for deterministic timing.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Cancellable single-shot deadline that is pushed back on every `schedule`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)starts the quiet period from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drops the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the deadline when it has passed at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, Debouncer, ManualClock};
    use std::time::Duration;

    #[test]
    fn reschedule_pushes_deadline_back() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(clock.now());
        clock.advance(Duration::from_millis(400));
        debouncer.schedule(clock.now());
        clock.advance(Duration::from_millis(400));
        assert!(!debouncer.fire_if_due(clock.now()));

        clock.advance(Duration::from_millis(100));
        assert!(debouncer.fire_if_due(clock.now()));
        assert!(!debouncer.fire_if_due(clock.now()));
    }

    #[test]
    fn cancel_reports_pending_state() {
        let mut debouncer = Debouncer::default();
        assert!(!debouncer.cancel());
        debouncer.schedule(ManualClock::new().now());
        assert!(debouncer.cancel());
        assert!(!debouncer.is_pending());
    }
}
