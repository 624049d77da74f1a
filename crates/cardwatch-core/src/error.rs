use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{SENTINEL_CONVERSION_ERROR, SENTINEL_INVALID_HEX_FORMAT};

#[derive(Error, Debug)]
pub enum Error {
    // Frame errors
    #[error("Frame too short: {length} bytes (minimum {minimum})")]
    FrameTooShort { length: usize, minimum: usize },

    // National ID errors
    #[error("Invalid national ID: {message}")]
    InvalidNationalId { message: String },

    #[error("National ID cannot start with 0")]
    LeadingZero,

    // Monitor errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to derive the decimal representation of a card.
///
/// Conversion failures never abort a record: the affected card carries
/// [`ConversionError::sentinel`] as its decimal string instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionError {
    /// The text contains characters outside `[0-9A-Fa-f]`.
    #[error("Not a hexadecimal value: {value:?}")]
    NotHex { value: String },

    /// The hex dump does not split into whole bytes.
    #[error("Malformed hex dump: {message}")]
    Malformed { message: String },
}

impl ConversionError {
    pub fn not_hex(value: impl Into<String>) -> Self {
        Self::NotHex {
            value: value.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Decimal string shown in place of a failed conversion.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::NotHex { .. } => SENTINEL_CONVERSION_ERROR,
            Self::Malformed { .. } => SENTINEL_INVALID_HEX_FORMAT,
        }
    }
}
