//! Infrastructure layer: config, logging, storage paths and OS integrations.

pub mod clock;
pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod secrets;
pub mod storage_layout;
#[cfg(test)]
pub mod stubs;
