//! Complete per-presentation card records.
//!
//! A [`CardInfo`] is built once for every accepted frame by running the
//! whole pipeline over it:
//!
//! ```text
//! RawFrame ─► decode ─► classify ─► parse/validate ─► hex dump ─► decimal
//! ```
//!
//! and is immutable afterwards.

use std::fmt;

use cardwatch_core::{CardVariant, ConversionError, DecodedText, RawFrame};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classifier::classify;
use crate::convert::{decimal_string, hex_dump};
use crate::record::ParsedRecord;

/// One card presentation, ready for delivery to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardInfo {
    /// Position in the session's delivery order, starting at 1.
    pub sequence: u64,

    /// When the frame was captured.
    pub timestamp: DateTime<Utc>,

    pub variant: CardVariant,

    /// Decoded card text.
    pub text: DecodedText,

    /// Space-separated hex dump of the raw frame.
    pub hex: String,

    /// Decimal representation, or a sentinel if conversion failed.
    pub decimal: String,

    /// Why the decimal representation could not be derived, if it couldn't.
    pub conversion_error: Option<ConversionError>,

    pub record: ParsedRecord,

    /// Frame bytes exactly as captured.
    #[serde(skip)]
    pub raw: RawFrame,
}

impl CardInfo {
    /// Create a builder that runs the card pipeline over `raw`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardwatch_core::{CardVariant, RawFrame};
    /// use cardwatch_protocol::CardInfo;
    ///
    /// let frame = RawFrame::new(b"CAB9EAF2\r\n".to_vec()).unwrap();
    /// let card = CardInfo::builder(frame).sequence(1).build();
    ///
    /// assert_eq!(card.variant, CardVariant::HexadecimalRfid);
    /// assert_eq!(card.decimal, "3401181938");
    /// ```
    pub fn builder(raw: RawFrame) -> CardInfoBuilder {
        CardInfoBuilder::new(raw)
    }

    /// Length of the decoded text in characters.
    pub fn length(&self) -> usize {
        self.text.char_count()
    }

    /// Decimal string, only if conversion succeeded.
    ///
    /// Sinks that forward the decimal value (for example as typed input)
    /// use this to skip sentinel values.
    pub fn decimal_for_output(&self) -> Option<&str> {
        match self.conversion_error {
            None => Some(&self.decimal),
            Some(_) => None,
        }
    }
}

impl fmt::Display for CardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Card Type: {}", self.variant)?;
        writeln!(f, "Raw Data: {}", self.text)?;
        writeln!(f, "Hex Data: {}", self.hex)?;
        writeln!(f, "Decimal Data: {}", self.decimal)?;
        writeln!(f, "Data Length: {} characters", self.length())?;
        writeln!(f, "Timestamp: {}", self.timestamp.to_rfc3339())?;

        match &self.record {
            ParsedRecord::NationalId(id) => {
                let check = &id.check;
                writeln!(f, "National ID Details:")?;
                writeln!(f, "  Full Number: {}", id.number)?;
                writeln!(f, "  Valid: {}", if check.valid { "Yes" } else { "No" })?;
                writeln!(
                    f,
                    "  Check Digit 10: {} (Actual: {})",
                    check.check10, check.actual10
                )?;
                writeln!(
                    f,
                    "  Check Digit 11: {} (Actual: {})",
                    check.check11, check.actual11
                )?;
            }
            ParsedRecord::StandardRfid(rfid)
            | ParsedRecord::LongFormatRfid(rfid)
            | ParsedRecord::HexadecimalRfid(rfid) => {
                writeln!(f, "RFID Card Details:")?;
                writeln!(f, "  Card Number: {}", rfid.card_number)?;
                writeln!(f, "  Format: {}", rfid.format)?;
                writeln!(f, "  Numeric Only: {}", rfid.numeric_only)?;
                writeln!(f, "  Alpha-Numeric: {}", rfid.alphanumeric)?;
            }
            ParsedRecord::Unknown => {}
        }
        Ok(())
    }
}

/// Builder for [`CardInfo`].
///
/// The sequence number defaults to 0 and the timestamp to the time
/// `build()` is called.
#[derive(Debug, Clone)]
pub struct CardInfoBuilder {
    raw: RawFrame,
    sequence: u64,
    timestamp: Option<DateTime<Utc>>,
}

impl CardInfoBuilder {
    pub fn new(raw: RawFrame) -> Self {
        Self {
            raw,
            sequence: 0,
            timestamp: None,
        }
    }

    /// Set the delivery sequence number.
    pub fn sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set a custom capture timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Run decode, classify, parse and convert, and assemble the record.
    ///
    /// Never fails: a conversion failure is recorded on the card as a
    /// sentinel decimal string plus `conversion_error`.
    pub fn build(self) -> CardInfo {
        let text = self.raw.decode();
        let variant = classify(&text);
        let record = ParsedRecord::parse(variant, text.as_str());
        let hex = hex_dump(self.raw.as_bytes());

        let (decimal, conversion_error) = match decimal_string(variant, text.as_str(), &hex) {
            Ok(decimal) => (decimal, None),
            Err(error) => (error.sentinel().to_string(), Some(error)),
        };

        CardInfo {
            sequence: self.sequence,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            variant,
            text,
            hex,
            decimal,
            conversion_error,
            record,
            raw: self.raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn card(bytes: &[u8]) -> CardInfo {
        CardInfo::builder(RawFrame::new(bytes.to_vec()).unwrap())
            .sequence(7)
            .build()
    }

    #[test]
    fn test_hex_card_pipeline() {
        let info = card(b"CAB9EAF2\r\n");
        assert_eq!(info.sequence, 7);
        assert_eq!(info.variant, CardVariant::HexadecimalRfid);
        assert_eq!(info.text.as_str(), "CAB9EAF2");
        assert_eq!(info.hex, "43 41 42 39 45 41 46 32 0D 0A");
        assert_eq!(info.decimal, "3401181938");
        assert_eq!(info.decimal_for_output(), Some("3401181938"));
        assert_eq!(info.record.variant(), info.variant);
    }

    #[test]
    fn test_national_id_pipeline() {
        let info = card(b"10000000146");
        assert_eq!(info.variant, CardVariant::NationalId);
        assert!(info.record.as_national_id().unwrap().check.valid);
        assert_eq!(info.decimal, "59464927668338406817084470");
    }

    #[test]
    fn test_invalid_national_id_still_builds() {
        let info = card(b"11111111111\r\n");
        assert_eq!(info.variant, CardVariant::NationalId);
        assert!(!info.record.as_national_id().unwrap().check.valid);
        assert!(info.conversion_error.is_none());
    }

    #[test]
    fn test_unknown_card_pipeline() {
        let info = card(b"\r\n\r\n\r\n\r\n");
        assert_eq!(info.variant, CardVariant::Unknown);
        assert!(info.text.is_empty());
        assert_eq!(info.record, ParsedRecord::Unknown);
        // The dump is still a valid number.
        assert_eq!(info.decimal_for_output(), Some(info.decimal.as_str()));
    }

    #[test]
    fn test_custom_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap();
        let info = CardInfo::builder(RawFrame::new(b"12345678".to_vec()).unwrap())
            .timestamp(at)
            .build();
        assert_eq!(info.timestamp, at);
        assert_eq!(info.sequence, 0);
    }

    #[test]
    fn test_detailed_display() {
        let rendered = card(b"10000000146").to_string();
        assert!(rendered.contains("Card Type: National ID Card"));
        assert!(rendered.contains("Valid: Yes"));
        assert!(rendered.contains("Check Digit 10: 4 (Actual: 4)"));

        let rendered = card(b"CAB9EAF2").to_string();
        assert!(rendered.contains("Format: short"));
        assert!(rendered.contains("Decimal Data: 3401181938"));
    }

    #[test]
    fn test_serializes_without_raw_bytes() {
        let json = serde_json::to_value(card(b"CAB9EAF2")).unwrap();
        assert_eq!(json["variant"], "hexadecimal_rfid");
        assert_eq!(json["decimal"], "3401181938");
        assert!(json.get("raw").is_none());
    }
}
