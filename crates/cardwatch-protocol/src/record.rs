//! Variant-specific payloads parsed from card text.

use cardwatch_core::{CardVariant, FormatLabel};
use serde::Serialize;

use crate::national_id::{NationalIdCheck, parse_national_id, validate_national_id};

/// Parsed payload of a national ID card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NationalIdRecord {
    /// The full 11-digit number.
    pub number: String,
    pub check: NationalIdCheck,
}

/// Parsed payload of an RFID card of any family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfidRecord {
    /// Card number as read, uppercased.
    pub card_number: String,
    /// Only the digits of the card number.
    pub numeric_only: String,
    /// Only the alphanumeric characters of the card number.
    pub alphanumeric: String,
    pub format: FormatLabel,
}

impl RfidRecord {
    fn from_text(upper: &str) -> Self {
        Self {
            card_number: upper.to_string(),
            numeric_only: upper.chars().filter(char::is_ascii_digit).collect(),
            alphanumeric: upper.chars().filter(|c| c.is_alphanumeric()).collect(),
            format: FormatLabel::from_length(upper.chars().count()),
        }
    }
}

/// Variant-tagged payload of a card.
///
/// The tag always matches the [`CardVariant`] the record was parsed for;
/// see [`ParsedRecord::variant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedRecord {
    NationalId(NationalIdRecord),
    StandardRfid(RfidRecord),
    LongFormatRfid(RfidRecord),
    HexadecimalRfid(RfidRecord),
    Unknown,
}

impl ParsedRecord {
    /// Parse card text for an already classified variant.
    ///
    /// A national ID whose text is not 11 digits (possible only when the
    /// variant did not come from [`classify`](crate::classify)) yields
    /// `Unknown`, since no payload can be extracted.
    pub fn parse(variant: CardVariant, text: &str) -> Self {
        let upper = text.to_uppercase();
        match variant {
            CardVariant::NationalId => match parse_national_id(&upper) {
                Ok(digits) => ParsedRecord::NationalId(NationalIdRecord {
                    number: upper,
                    check: validate_national_id(&digits),
                }),
                Err(_) => ParsedRecord::Unknown,
            },
            CardVariant::StandardRfid => ParsedRecord::StandardRfid(RfidRecord::from_text(&upper)),
            CardVariant::LongFormatRfid => {
                ParsedRecord::LongFormatRfid(RfidRecord::from_text(&upper))
            }
            CardVariant::HexadecimalRfid => {
                ParsedRecord::HexadecimalRfid(RfidRecord::from_text(&upper))
            }
            CardVariant::Unknown => ParsedRecord::Unknown,
        }
    }

    /// The card variant this record belongs to.
    pub fn variant(&self) -> CardVariant {
        match self {
            ParsedRecord::NationalId(_) => CardVariant::NationalId,
            ParsedRecord::StandardRfid(_) => CardVariant::StandardRfid,
            ParsedRecord::LongFormatRfid(_) => CardVariant::LongFormatRfid,
            ParsedRecord::HexadecimalRfid(_) => CardVariant::HexadecimalRfid,
            ParsedRecord::Unknown => CardVariant::Unknown,
        }
    }

    pub fn as_national_id(&self) -> Option<&NationalIdRecord> {
        match self {
            ParsedRecord::NationalId(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_rfid(&self) -> Option<&RfidRecord> {
        match self {
            ParsedRecord::StandardRfid(record)
            | ParsedRecord::LongFormatRfid(record)
            | ParsedRecord::HexadecimalRfid(record) => Some(record),
            ParsedRecord::NationalId(_) | ParsedRecord::Unknown => None,
        }
    }
}
