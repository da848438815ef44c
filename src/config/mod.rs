//! Configuration management for the bridge client
//!
//! Handles loading and validating the optional YAML configuration file.
//! Everything has a default, so running without a file is the normal case.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;
use tracing::warn;

use crate::protocol::SERIAL_NUMBER_PROPERTY;

/// Port the bridge listens on unless told otherwise
pub const DEFAULT_PORT: u16 = 7708;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Property requested per headset/controller by the `props` action
    #[serde(default = "default_property_name")]
    pub property_name: String,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Timer configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Delay before the first connection attempt
    #[serde(default = "default_startup_delay")]
    pub startup_delay_ms: u64,
    /// Connection check period
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval_ms: u64,
    /// Analog/pose refresh period
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Start the poll loop without waiting for a user action
    #[serde(default)]
    pub poll_on_start: bool,
}

/// Terminal output configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Print analog and pose snapshots on every poll
    #[serde(default)]
    pub show_streams: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            property_name: default_property_name(),
            timing: TimingConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: default_startup_delay(),
            reconnect_interval_ms: default_reconnect_interval(),
            poll_interval_ms: default_poll_interval(),
            poll_on_start: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for correctness
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("host cannot be empty");
        }
        if self.port == 0 {
            anyhow::bail!("port must be between 1 and 65535");
        }
        if self.property_name.is_empty() {
            anyhow::bail!("property_name cannot be empty");
        }
        if self.timing.reconnect_interval_ms == 0 {
            anyhow::bail!("timing.reconnect_interval_ms must be greater than 0");
        }
        if self.timing.poll_interval_ms == 0 {
            anyhow::bail!("timing.poll_interval_ms must be greater than 0");
        }
        Ok(())
    }

    /// Bridge WebSocket URL
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.timing.startup_delay_ms)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.timing.reconnect_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timing.poll_interval_ms)
    }
}

/// Parse a user-supplied port, falling back to [`DEFAULT_PORT`] when it is not a number
pub fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw else {
        return DEFAULT_PORT;
    };
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            warn!("Invalid port '{}', using {}", raw, DEFAULT_PORT);
            DEFAULT_PORT
        },
    }
}

fn default_host() -> String { "localhost".to_string() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_property_name() -> String { SERIAL_NUMBER_PROPERTY.to_string() }
fn default_startup_delay() -> u64 { 1000 }
fn default_reconnect_interval() -> u64 { 5000 }
fn default_poll_interval() -> u64 { 100 }
