//! Time sources for the rate limiter and token checks.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of wall-clock time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same instant, so a test (or the replay command) can hold one handle while
/// the guard owns another and advance time for both. The guard is single-threaded, so the
/// shared cell is not `Send`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Rc::new(Cell::new(start)),
        }
    }

    /// Move forward by `duration`, pinning at the latest representable instant.
    pub fn advance(&self, duration: Duration) {
        let next = self
            .checked_advance(duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.current.set(next);
    }

    /// Move forward by `duration`, or leave the clock untouched and return `None` when the
    /// result would fall outside chrono's range.
    pub fn checked_advance(&self, duration: Duration) -> Option<DateTime<Utc>> {
        let step = chrono::Duration::from_std(duration).ok()?;
        let next = self.current.get().checked_add_signed(step)?;
        self.current.set(next);
        Some(next)
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.current.set(instant);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_772_442_000_000).expect("valid timestamp")
    }

    #[test]
    fn manual_clock_advances_all_clones() {
        let clock = ManualClock::new(start());
        let handle = clock.clone();

        handle.advance(Duration::from_millis(1_500));
        assert_eq!(clock.now_millis(), 1_772_442_001_500);

        clock.set(start());
        assert_eq!(handle.now(), start());
    }

    #[test]
    fn oversized_steps_do_not_overflow() {
        let clock = ManualClock::new(start());
        assert_eq!(clock.checked_advance(Duration::from_millis(u64::MAX)), None);
        assert_eq!(clock.now(), start());

        clock.advance(Duration::from_millis(u64::MAX));
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn system_clock_reports_current_time() {
        let before = Utc::now();
        let observed = SystemClock::new().now();
        assert!(observed >= before);
    }
}
