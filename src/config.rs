//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_ENTRY_TTL: u64 = 300;
const DEFAULT_SWEEP_INTERVAL: u64 = 1;
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime of an entry after its last write, in seconds
    pub entry_ttl: u64,
    /// Background sweeper interval in seconds
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ENTRY_TTL` - Entry TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// Unparsable values and zero durations fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            entry_ttl: positive_var("ENTRY_TTL").unwrap_or(DEFAULT_ENTRY_TTL),
            sweep_interval: positive_var("SWEEP_INTERVAL").unwrap_or(DEFAULT_SWEEP_INTERVAL),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Entry TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.entry_ttl)
    }

    /// Sweeper tick as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

fn positive_var(name: &str) -> Option<u64> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_ttl: DEFAULT_ENTRY_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}
