use crate::{
    Result,
    constants::{EXTENDED_FORMAT_LENGTH, MIN_FRAME_LENGTH, SHORT_FORMAT_LENGTH, STANDARD_RFID_LENGTH},
    error::Error,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// One complete byte capture from the transport (at least 8 bytes).
///
/// Frames are immutable once built; shorter captures never become frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawFrame(Bytes);

impl RawFrame {
    /// Create a frame from captured bytes.
    ///
    /// # Errors
    /// Returns `Error::FrameTooShort` if fewer than [`MIN_FRAME_LENGTH`] bytes were captured.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() < MIN_FRAME_LENGTH {
            return Err(Error::FrameTooShort {
                length: bytes.len(),
                minimum: MIN_FRAME_LENGTH,
            });
        }
        Ok(RawFrame(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the frame as card text.
    #[must_use]
    pub fn decode(&self) -> DecodedText {
        DecodedText::decode(&self.0)
    }
}

impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Frame content as text, with control characters stripped.
///
/// Decoding drops invalid UTF-8 sequences entirely (they are not replaced
/// by U+FFFD), removes every `\r`, `\n` and NUL, then trims surrounding
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodedText(String);

impl DecodedText {
    /// Decode raw bytes into card text.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut text = String::with_capacity(bytes.len());
        for chunk in bytes.utf8_chunks() {
            text.extend(
                chunk
                    .valid()
                    .chars()
                    .filter(|c| !matches!(c, '\r' | '\n' | '\0')),
            );
        }
        DecodedText(text.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Uppercased copy of the text, the form classification works on.
    #[must_use]
    pub fn to_uppercase(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for DecodedText {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DecodedText {
    fn from(text: &str) -> Self {
        DecodedText::decode(text.as_bytes())
    }
}

/// Card family assigned to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardVariant {
    /// 11-digit national identity number with check digits.
    NationalId,
    /// 10-character alphanumeric RFID card.
    StandardRfid,
    /// RFID card number of 16 or more digits.
    LongFormatRfid,
    /// RFID card number written in hexadecimal.
    HexadecimalRfid,
    Unknown,
}

impl CardVariant {
    /// Human-readable name for display.
    pub fn label(&self) -> &'static str {
        match self {
            CardVariant::NationalId => "National ID Card",
            CardVariant::StandardRfid => "Standard RFID Card",
            CardVariant::LongFormatRfid => "Long Format RFID Card",
            CardVariant::HexadecimalRfid => "Hexadecimal RFID Card",
            CardVariant::Unknown => "Unknown Card Type",
        }
    }

    /// Check if this variant is one of the RFID families.
    pub fn is_rfid(&self) -> bool {
        matches!(
            self,
            CardVariant::StandardRfid | CardVariant::LongFormatRfid | CardVariant::HexadecimalRfid
        )
    }
}

impl fmt::Display for CardVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Format of an RFID card number, derived from its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatLabel {
    /// 8 characters.
    Short,
    /// 10 characters.
    Standard,
    /// 16 characters.
    Extended,
    /// Any other length.
    Custom(usize),
}

impl FormatLabel {
    pub fn from_length(length: usize) -> Self {
        match length {
            SHORT_FORMAT_LENGTH => FormatLabel::Short,
            STANDARD_RFID_LENGTH => FormatLabel::Standard,
            EXTENDED_FORMAT_LENGTH => FormatLabel::Extended,
            other => FormatLabel::Custom(other),
        }
    }
}

impl fmt::Display for FormatLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatLabel::Short => f.write_str("short"),
            FormatLabel::Standard => f.write_str("standard"),
            FormatLabel::Extended => f.write_str("extended"),
            FormatLabel::Custom(length) => write!(f, "custom-{length}"),
        }
    }
}

impl Serialize for FormatLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identifier of one monitoring session, carried in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"CAB9EAF2\r\n".as_slice(), "CAB9EAF2")]
    #[case(b"  10000000146 \r\n".as_slice(), "10000000146")]
    #[case(b"\x00AB\r12\n34\x00".as_slice(), "AB1234")]
    #[case(b"\xffCAB9\xfeEAF2".as_slice(), "CAB9EAF2")]
    #[case(b"\r\n\r\n".as_slice(), "")]
    fn test_decoded_text(#[case] input: &[u8], #[case] expected: &str) {
        assert_eq!(DecodedText::decode(input).as_str(), expected);
    }

    #[test]
    fn test_raw_frame_minimum_length() {
        assert!(matches!(
            RawFrame::new(b"1234567".to_vec()),
            Err(Error::FrameTooShort {
                length: 7,
                minimum: 8
            })
        ));

        let frame = RawFrame::new(b"12345678".to_vec()).unwrap();
        assert_eq!(frame.len(), 8);
        assert_eq!(frame.decode().as_str(), "12345678");
    }

    #[rstest]
    #[case(8, "short")]
    #[case(10, "standard")]
    #[case(16, "extended")]
    #[case(12, "custom-12")]
    #[case(0, "custom-0")]
    fn test_format_label(#[case] length: usize, #[case] expected: &str) {
        assert_eq!(FormatLabel::from_length(length).to_string(), expected);
    }

    #[test]
    fn test_format_label_serializes_as_string() {
        let json = serde_json::to_string(&FormatLabel::Custom(20)).unwrap();
        assert_eq!(json, "\"custom-20\"");
    }

    #[test]
    fn test_card_variant_labels() {
        assert_eq!(CardVariant::NationalId.to_string(), "National ID Card");
        assert_eq!(CardVariant::Unknown.to_string(), "Unknown Card Type");
        assert!(CardVariant::HexadecimalRfid.is_rfid());
        assert!(!CardVariant::NationalId.is_rfid());
        assert!(!CardVariant::Unknown.is_rfid());
    }

    #[test]
    fn test_card_variant_serialization() {
        let json = serde_json::to_string(&CardVariant::LongFormatRfid).unwrap();
        assert_eq!(json, "\"long_format_rfid\"");
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
