use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::infra::config::AppConfig;

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Time source for debounce windows and message timestamps.
pub trait Clock {
    fn now(&self) -> Instant;

    fn wall_time(&self) -> DateTime<Local>;
}
