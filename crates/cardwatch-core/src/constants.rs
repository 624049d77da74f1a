//! Core constants for card frame acquisition and classification.
//!
//! This module centralizes the numeric limits, timing defaults, and
//! sentinel strings used across the cardwatch crates. Keeping them in
//! one place ensures the frame reader, the classifier, and the monitor
//! loop agree on the same boundaries.
//!
//! # Frame Boundaries
//!
//! A reader delivers one card presentation as a short burst of bytes,
//! usually the card number followed by a line terminator:
//!
//! ```text
//! C  A  B  9  E  A  F  2  \r \n
//! 43 41 42 39 45 41 46 32 0D 0A
//! ```
//!
//! Bursts shorter than [`MIN_FRAME_LENGTH`] are treated as noise.
//!
//! # Usage
//!
//! ```
//! use cardwatch_core::constants::*;
//!
//! fn is_frame_sized(captured: &[u8]) -> bool {
//!     captured.len() >= MIN_FRAME_LENGTH
//! }
//!
//! assert!(!is_frame_sized(b"1234567"));
//! assert!(is_frame_sized(b"12345678"));
//! ```

// ============================================================================
// Frame Acquisition
// ============================================================================

/// Minimum number of bytes a capture must contain to become a frame.
///
/// Anything shorter is an incomplete read or line noise and is discarded
/// by the frame reader instead of being surfaced as a malformed frame.
pub const MIN_FRAME_LENGTH: usize = 8;

/// Default upper bound on the bytes coalesced into a single frame.
///
/// A device that streams without pause would otherwise keep the frame
/// reader accumulating forever.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 4 * 1024; // 4 KB

/// Pause between pending-byte checks while coalescing one frame (milliseconds).
///
/// Bridges the transmission gaps between chunks of a single tag presentation.
pub const DEFAULT_FRAME_GAP_MS: u64 = 10;

/// Pause between poll attempts of the monitor loop (milliseconds).
///
/// Bounds CPU usage while no card is on the reader.
pub const DEFAULT_IDLE_INTERVAL_MS: u64 = 100;

// ============================================================================
// Transport Defaults
// ============================================================================

/// Default baud rate for serial card readers.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default read timeout for serial card readers (milliseconds).
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

// ============================================================================
// Card Shapes
// ============================================================================

/// Digits in a national identity number.
pub const NATIONAL_ID_LENGTH: usize = 11;

/// Characters in a standard RFID card number.
pub const STANDARD_RFID_LENGTH: usize = 10;

/// Minimum digits in a long-format RFID card number.
pub const LONG_FORMAT_MIN_LENGTH: usize = 16;

/// Minimum characters in a hexadecimal RFID card number.
pub const HEX_RFID_MIN_LENGTH: usize = 8;

/// Length of a "short" card number.
pub const SHORT_FORMAT_LENGTH: usize = 8;

/// Length of an "extended" card number.
pub const EXTENDED_FORMAT_LENGTH: usize = 16;

// ============================================================================
// Conversion Sentinels
// ============================================================================

/// Decimal string reported when the card text is not valid hexadecimal.
pub const SENTINEL_CONVERSION_ERROR: &str = "Conversion error";

/// Decimal string reported when the hex dump has an odd digit count.
pub const SENTINEL_INVALID_HEX_FORMAT: &str = "Invalid hex format";
