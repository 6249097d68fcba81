//! HTTP access to the Credibot backend.

pub mod blocking;
pub mod client;
pub mod dispatcher;
pub mod dto;
pub mod error;
pub mod query;
