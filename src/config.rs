//! Inspector configuration
//!
//! Stored in `~/.config/mavinspect/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (applied by `main`)
//! 2. Environment variables (`MAVINSPECT_TICK_MS`, `MAVINSPECT_SMOOTHING`)
//! 3. Config file
//! 4. Defaults
//!
//! Out-of-range values are clamped by [`InspectorConfig::normalized`], never
//! rejected.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{InspectorError, Result};
use crate::store::{DEFAULT_SMOOTHING, DEFAULT_STATUS_CAPACITY};

pub const MIN_TICK_MS: u64 = 16;
pub const MAX_TICK_MS: u64 = 5_000;
pub const MAX_STATUS_ROWS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InspectorConfig {
    /// Rebuild and redraw period in milliseconds
    pub tick_ms: u64,

    /// Smoothing factor of the frequency estimate, in (0, 1]
    pub smoothing: f64,

    /// How many status messages are retained
    pub status_capacity: usize,

    /// How many status messages the bottom panel shows
    pub status_rows: usize,

    pub show_status_panel: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            smoothing: DEFAULT_SMOOTHING,
            status_capacity: DEFAULT_STATUS_CAPACITY,
            status_rows: 5,
            show_status_panel: true,
        }
    }
}

impl InspectorConfig {
    /// Returns `~/.config/mavinspect/` on Unix, `%APPDATA%/mavinspect/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mavinspect")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file gives the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| InspectorError::Config {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| InspectorError::Config {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Merge with environment variables.
    ///
    /// Empty or unparsable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Some(tick_ms) = env_value("MAVINSPECT_TICK_MS") {
            self.tick_ms = tick_ms;
        }
        if let Some(smoothing) = env_value("MAVINSPECT_SMOOTHING") {
            self.smoothing = smoothing;
        }
        self
    }

    /// Clamp every value into its valid range
    pub fn normalized(mut self) -> Self {
        self.tick_ms = self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS);
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            self.smoothing = if self.smoothing > 1.0 {
                1.0
            } else {
                DEFAULT_SMOOTHING
            };
        }
        self.status_capacity = self.status_capacity.max(1);
        self.status_rows = self.status_rows.clamp(1, MAX_STATUS_ROWS);
        self
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}
