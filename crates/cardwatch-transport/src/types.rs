//! Transport settings.

use std::time::Duration;

use cardwatch_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransportError};

/// Port name used when none is configured.
pub const DEFAULT_PORT: &str = "COM3";

/// Settings for opening a serial card reader.
///
/// Frames are always 8 data bits, no parity, one stop bit, without flow
/// control; only the port, the rate and the read timeout are configurable.
///
/// # Examples
///
/// ```
/// use cardwatch_transport::PortSettings;
///
/// let settings = PortSettings::new("/dev/ttyUSB0").with_baud_rate(19200);
/// assert_eq!(settings.baud_rate, 19200);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortSettings {
    /// Port identifier (`COM3`, `/dev/ttyUSB0`, ...).
    pub port: String,

    /// Line rate in bits per second.
    pub baud_rate: u32,

    /// Read timeout in milliseconds.
    pub read_timeout_ms: u64,
}

impl PortSettings {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Check the settings before opening a port.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Configuration` for an empty port name or a
    /// zero baud rate.
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(TransportError::configuration("port name is empty"));
        }
        if self.baud_rate == 0 {
            return Err(TransportError::configuration("baud rate must be non-zero"));
        }
        Ok(())
    }
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reader() {
        let settings = PortSettings::default();
        assert_eq!(settings.port, "COM3");
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.read_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(PortSettings::new("  ").validate().is_err());
        assert!(PortSettings::new("COM4").with_baud_rate(0).validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let settings: PortSettings = serde_json::from_str(r#"{"port": "/dev/ttyACM0"}"#).unwrap();
        assert_eq!(settings.port, "/dev/ttyACM0");
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.read_timeout_ms, 1000);
    }
}
