//! Line server settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default delay between line-count checks in `wait_for_lines`
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Line server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Sleep between length checks while waiting for lines
    pub poll_interval: Duration,
    /// Maximum accepted line length in bytes (`None` = unbounded)
    pub max_line_length: Option<usize>,
    /// Drop a `\r` immediately preceding the `\n` terminator
    pub strip_carriage_return: bool,
}

impl ServerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_line_length: None,
            strip_carriage_return: true,
        }
    }

    /// Set the poll interval used by `wait_for_lines`
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Cap the length of a single line
    #[must_use]
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = Some(max);
        self
    }

    /// Keep or drop the carriage return of CRLF-terminated lines
    #[must_use]
    pub fn strip_carriage_return(mut self, strip: bool) -> Self {
        self.strip_carriage_return = strip;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
