//! Smoke commands

pub mod api;
pub mod load;
pub mod mobile;

use std::time::Duration;

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub request_timeout: Option<Duration>,
}
