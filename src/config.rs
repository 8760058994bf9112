//! Persistent defaults for the CLI
//!
//! Stored as TOML in `~/.config/hyperx-battery/config.toml`. Every field is
//! optional in the file; command-line flags override file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cloud3s_transport::{ReportLengths, PRODUCT_ID, VENDOR_ID};
use serde::{Deserialize, Serialize};

use crate::charging::DEFAULT_STALE_THRESHOLD;
use crate::error::ConfigError;
use crate::query::{timing, QueryOptions};

fn default_vid() -> u16 {
    VENDOR_ID
}

fn default_pid() -> u16 {
    PRODUCT_ID
}

fn default_timeout_ms() -> u64 {
    timing::REPLY_TIMEOUT_MS
}

fn default_interval_ms() -> u64 {
    timing::WATCH_INTERVAL_MS
}

fn default_charging_stale_ms() -> u64 {
    DEFAULT_STALE_THRESHOLD.as_millis() as u64
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// USB vendor ID of the dongle
    #[serde(default = "default_vid")]
    pub vid: u16,
    /// USB product ID of the dongle
    #[serde(default = "default_pid")]
    pub pid: u16,
    /// Explicit HID path, skips interface selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Battery reply deadline
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pause between watch cycles
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Charging reports older than this display as unknown
    #[serde(default = "default_charging_stale_ms")]
    pub charging_stale_ms: u64,
    /// Input report size override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_len: Option<usize>,
    /// Output report size override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_len: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vid: default_vid(),
            pid: default_pid(),
            path: None,
            timeout_ms: default_timeout_ms(),
            interval_ms: default_interval_ms(),
            charging_stale_ms: default_charging_stale_ms(),
            input_len: None,
            output_len: None,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub path: Option<String>,
    pub timeout_ms: Option<u64>,
    pub interval_ms: Option<u64>,
    pub charging_stale_ms: Option<u64>,
    pub input_len: Option<usize>,
    pub output_len: Option<usize>,
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hyperx-battery")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply command-line overrides
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(vid) = overrides.vid {
            self.vid = vid;
        }
        if let Some(pid) = overrides.pid {
            self.pid = pid;
        }
        if overrides.path.is_some() {
            self.path = overrides.path;
        }
        if let Some(ms) = overrides.timeout_ms {
            self.timeout_ms = ms;
        }
        if let Some(ms) = overrides.interval_ms {
            self.interval_ms = ms;
        }
        if let Some(ms) = overrides.charging_stale_ms {
            self.charging_stale_ms = ms;
        }
        if overrides.input_len.is_some() {
            self.input_len = overrides.input_len;
        }
        if overrides.output_len.is_some() {
            self.output_len = overrides.output_len;
        }
        self
    }

    pub fn report_lengths(&self) -> ReportLengths {
        ReportLengths {
            input: self.input_len,
            output: self.output_len,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Query options for an interface with the given report sizes
    pub fn query_options(&self, input_len: usize, output_len: usize) -> QueryOptions {
        QueryOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            stale_threshold: Duration::from_millis(self.charging_stale_ms),
            input_len,
            output_len,
            ..QueryOptions::default()
        }
    }
}
