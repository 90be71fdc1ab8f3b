//! Queue configuration loaded from environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Sign queue configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Pending request queue configuration
    #[serde(default)]
    pub queue: QueueConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// How long a waiter blocks before the request is timed out
    #[serde(default = "default_completion_timeout", with = "humantime_serde")]
    pub completion_timeout: Duration,

    /// Capacity of the event queue feeding observers
    #[serde(default = "default_notification_buffer")]
    pub notification_buffer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level or filter directives, used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LogConfig {
    /// Subscriber filter: `RUST_LOG` if set, otherwise the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

// Default implementations
impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            completion_timeout: default_completion_timeout(),
            notification_buffer: default_notification_buffer(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_completion_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_notification_buffer() -> usize {
    256
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys use `__`, e.g. `QUEUE__COMPLETION_TIMEOUT=30s`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(config::Environment::default().separator("__"))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
