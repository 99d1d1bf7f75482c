//! Configuration schema definitions.
//!
//! Every section derives serde with `#[serde(default)]`, so a config file
//! only needs the keys it changes.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial port configuration
    pub serial: SerialConfig,
    /// TUI configuration
    pub tui: TuiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.read_buffer_size == 0 {
            return Err(ConfigError::validation(
                "serial.read_buffer_size",
                "must be at least 1 byte",
            ));
        }
        if !(1..=240).contains(&self.tui.refresh_rate_hz) {
            return Err(ConfigError::validation(
                "tui.refresh_rate_hz",
                format!("{} is outside 1..=240", self.tui.refresh_rate_hz),
            ));
        }
        Ok(())
    }
}

/// Serial port configuration section.
///
/// The baud rate is fixed by the device firmware and deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port highlighted first in the port picker
    pub preferred_port: Option<String>,
    /// Bytes requested per read
    pub read_buffer_size: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            preferred_port: None,
            read_buffer_size: 256,
        }
    }
}

/// TUI configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Theme name: "dark", "light", "solarized", "dracula", "nord"
    pub theme: String,
    /// Redraw rate in Hz
    pub refresh_rate_hz: u32,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            refresh_rate_hz: 30,
        }
    }
}

impl TuiConfig {
    /// Get refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.refresh_rate_hz.max(1)))
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file path. Without one, logging is disabled so the TUI is not
    /// overwritten.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive, e.g. "info" or "keypad_lock_monitor=debug"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Multi-line human readable format
    Pretty,
    /// Single-line format
    #[default]
    Compact,
}
