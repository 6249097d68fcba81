use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::infra::{
    config::AppConfig,
    contracts::{Clock, ConfigAdapter},
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter {
    pub config: AppConfig,
}

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(self.config.clone())
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    wall_start: DateTime<Local>,
    elapsed: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            wall_start: Local::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }

    fn wall_time(&self) -> DateTime<Local> {
        self.wall_start
            + chrono::Duration::from_std(self.elapsed.get()).unwrap_or(chrono::Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_config_returns_given_config() {
        let adapter = StubConfigAdapter::default();
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::default();
        let first = clock.now();

        assert_eq!(clock.now(), first);
        clock.advance(Duration::from_millis(500));

        assert_eq!(clock.now() - first, Duration::from_millis(500));
        assert!(clock.wall_time() > clock.wall_start);

        let shared = clock.clone();
        shared.advance(Duration::from_millis(100));
        assert_eq!(clock.now() - first, Duration::from_millis(600));
    }
}
