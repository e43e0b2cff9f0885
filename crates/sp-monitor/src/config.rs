//! Monitor configuration.

use std::time::Duration;

use crate::{MonitorError, MonitorResult};

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Tolerance in seconds on either side of an expected check-in time.
    pub check_in_window_secs: u32,

    /// Period of the overdue watchdog.
    pub poll_interval: Duration,

    /// Identifier used in liveness messages.
    pub client_id: String,

    /// Capacity of the monitor's command channel.
    pub command_buffer: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_in_window_secs: 30,
            poll_interval:        Duration::from_secs(1),
            client_id:            "circuit-handler".into(),
            command_buffer:       64,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> MonitorResult<()> {
        if self.poll_interval.is_zero() {
            return Err(MonitorError::Config("poll_interval must be non-zero".into()));
        }
        if self.command_buffer == 0 {
            return Err(MonitorError::Config("command_buffer must be at least 1".into()));
        }
        if self.client_id.is_empty() {
            return Err(MonitorError::Config("client_id must not be empty".into()));
        }
        Ok(())
    }
}
