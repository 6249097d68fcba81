//! Quiet-period buffering for values edited in rapid bursts.

use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Holds the latest value until no new value has arrived for `quiet`.
///
/// Time is passed in explicitly so callers decide what "now" is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounced<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    value: T,
    last_change: Instant,
}

impl<T> Debounced<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Buffers `value` and restarts the quiet window.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            last_change: now,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the buffered value once the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let settled = self
            .pending
            .as_ref()
            .is_some_and(|pending| now.saturating_duration_since(pending.last_change) >= self.quiet);

        if settled {
            self.pending.take().map(|pending| pending.value)
        } else {
            None
        }
    }

    /// Releases the buffered value immediately, regardless of the window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }
}

impl<T> Default for Debounced<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn holds_value_until_quiet_period_elapses() {
        let start = Instant::now();
        let mut debounced = Debounced::new(ms(500));

        debounced.set("m", start);

        assert_eq!(debounced.poll(start + ms(499)), None);
        assert!(debounced.is_pending());
        assert_eq!(debounced.poll(start + ms(500)), Some("m"));
        assert!(!debounced.is_pending());
    }

    #[test]
    fn rapid_changes_release_only_the_final_value_once() {
        let start = Instant::now();
        let mut debounced = Debounced::new(ms(500));
        let mut released = Vec::new();

        for (offset, value) in [(0, "m"), (120, "ma"), (250, "mar"), (400, "mari")] {
            debounced.set(value, start + ms(offset));
            released.extend(debounced.poll(start + ms(offset + 50)));
        }

        for tick in (500..1500).step_by(100) {
            released.extend(debounced.poll(start + ms(tick)));
        }

        assert_eq!(released, vec!["mari"]);
    }

    #[test]
    fn each_change_restarts_the_window() {
        let start = Instant::now();
        let mut debounced = Debounced::new(ms(500));

        debounced.set(1, start);
        debounced.set(2, start + ms(400));

        assert_eq!(debounced.poll(start + ms(800)), None);
        assert_eq!(debounced.poll(start + ms(900)), Some(2));
    }

    #[test]
    fn flush_bypasses_the_window() {
        let start = Instant::now();
        let mut debounced = Debounced::new(ms(500));

        debounced.set(7, start);
        assert_eq!(debounced.flush(), Some(7));
        assert!(!debounced.is_pending());
        assert_eq!(debounced.poll(start + ms(10_000)), None);
    }
}
