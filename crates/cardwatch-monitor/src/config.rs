//! Monitoring session configuration.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! duration_secs = 30
//! dedup = "suppress_repeats"
//! idle_interval_ms = 100
//!
//! [port]
//! port = "/dev/ttyUSB0"
//! baud_rate = 9600
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::Path;
use std::time::Duration;

use cardwatch_core::constants::{
    DEFAULT_FRAME_GAP_MS, DEFAULT_IDLE_INTERVAL_MS, DEFAULT_MAX_FRAME_BYTES, MIN_FRAME_LENGTH,
};
use cardwatch_transport::{FrameReader, PortSettings};
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// What to do with a frame whose text equals the previous delivered one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Deliver every accepted frame, so a card held against the reader
    /// twice is reported twice.
    #[default]
    Off,

    /// Drop a frame whose decoded text equals the immediately preceding
    /// delivered frame.
    SuppressRepeats,
}

impl DedupPolicy {
    pub fn is_enabled(&self) -> bool {
        matches!(self, DedupPolicy::SuppressRepeats)
    }
}

/// Settings for one monitoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Transport endpoint settings.
    pub port: PortSettings,

    /// Stop after this many seconds. `None` runs until cancelled.
    pub duration_secs: Option<u64>,

    pub dedup: DedupPolicy,

    /// Pause between poll attempts, in milliseconds.
    pub idle_interval_ms: u64,

    /// Wait between drains while reassembling one frame, in milliseconds.
    pub frame_gap_ms: u64,

    /// Largest frame the reader will assemble.
    pub max_frame_bytes: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            port: PortSettings::default(),
            duration_secs: None,
            dedup: DedupPolicy::Off,
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
            frame_gap_ms: DEFAULT_FRAME_GAP_MS,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl MonitorConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Config` if the text is not valid TOML or does
    /// not match the configuration schema.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MonitorError::Config(format!("invalid TOML: {}", e)))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MonitorError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MonitorError::Config(e.to_string()))
    }

    /// Check the configuration before starting a session.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Config` for an empty port name, a zero baud
    /// rate, a zero idle interval or duration, or a frame cap below the
    /// minimum frame length.
    pub fn validate(&self) -> Result<()> {
        self.port
            .validate()
            .map_err(|e| MonitorError::Config(e.to_string()))?;

        if self.idle_interval_ms == 0 {
            return Err(MonitorError::Config(
                "idle_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.duration_secs == Some(0) {
            return Err(MonitorError::Config(
                "duration_secs must be non-zero when set".to_string(),
            ));
        }
        if self.max_frame_bytes < MIN_FRAME_LENGTH {
            return Err(MonitorError::Config(format!(
                "max_frame_bytes must be at least {}",
                MIN_FRAME_LENGTH
            )));
        }
        Ok(())
    }

    pub fn with_port(mut self, port: PortSettings) -> Self {
        self.port = port;
        self
    }

    /// Bound the session length.
    ///
    /// The bound is kept in whole seconds; a fractional part rounds up, so
    /// any non-zero duration stays valid.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
        self.duration_secs = Some(secs);
        self
    }

    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::from_secs)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn frame_gap(&self) -> Duration {
        Duration::from_millis(self.frame_gap_ms)
    }

    pub fn frame_reader(&self) -> FrameReader {
        FrameReader::new(self.frame_gap(), self.max_frame_bytes)
    }
}
