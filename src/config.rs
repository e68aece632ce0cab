//! Client configuration.

use std::time::Duration;

/// Controller address used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable consulted for the controller address.
pub const BASE_URL_ENV: &str = "DFS_CONTROLLER_URL";

/// Default interval between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a [`crate::DfsClient`] and its components.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller base address, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Interval between scheduler ticks.
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given controller address.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Read the controller address from `DFS_CONTROLLER_URL`, falling back
    /// to the fixed local default when unset or empty.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Override the poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
