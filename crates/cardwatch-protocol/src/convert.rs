//! Hexadecimal and decimal representations of a card.
//!
//! Two representations are derived from every frame:
//!
//! - the **hex dump**: two uppercase hex digits per frame byte, separated
//!   by single spaces (`"43 41 42 39"`);
//! - the **decimal string**: one unbounded integer rendered in base 10.
//!   For hexadecimal RFID cards the card text itself is the number
//!   (`"CAB9EAF2"` → `"3401181938"`); for every other variant the whole
//!   hex dump is read as one big-endian integer.
//!
//! Frames can be far wider than any native integer, so parsing goes
//! through [`BigUint`].

use cardwatch_core::{CardVariant, ConversionError};
use num_bigint::BigUint;

/// Render bytes as space-separated uppercase hex pairs.
///
/// # Examples
///
/// ```
/// use cardwatch_protocol::hex_dump;
///
/// assert_eq!(hex_dump(b"CA\r\n"), "43 41 0D 0A");
/// assert_eq!(hex_dump(&[]), "");
/// ```
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive the decimal string for a card.
///
/// # Errors
///
/// - `ConversionError::NotHex` if a hexadecimal card's text (or the dump)
///   contains characters outside `[0-9A-Fa-f]`.
/// - `ConversionError::Malformed` if the dump, spaces removed, is empty or
///   has an odd digit count.
///
/// # Examples
///
/// ```
/// use cardwatch_core::CardVariant;
/// use cardwatch_protocol::decimal_string;
///
/// let decimal = decimal_string(CardVariant::HexadecimalRfid, "CAB9EAF2", "").unwrap();
/// assert_eq!(decimal, "3401181938");
///
/// let decimal = decimal_string(CardVariant::Unknown, "", "01 00").unwrap();
/// assert_eq!(decimal, "256");
/// ```
pub fn decimal_string(
    variant: CardVariant,
    text: &str,
    hex_dump: &str,
) -> Result<String, ConversionError> {
    match variant {
        CardVariant::HexadecimalRfid => parse_hex(text).map(|value| value.to_str_radix(10)),
        CardVariant::NationalId
        | CardVariant::StandardRfid
        | CardVariant::LongFormatRfid
        | CardVariant::Unknown => {
            let digits: String = hex_dump.chars().filter(|c| *c != ' ').collect();
            if digits.is_empty() {
                return Err(ConversionError::malformed("hex dump is empty"));
            }
            if digits.len() % 2 != 0 {
                return Err(ConversionError::malformed(format!(
                    "hex dump has an odd number of digits ({})",
                    digits.len()
                )));
            }
            parse_hex(&digits).map(|value| value.to_str_radix(10))
        }
    }
}

fn parse_hex(text: &str) -> Result<BigUint, ConversionError> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConversionError::not_hex(text));
    }
    BigUint::parse_bytes(text.as_bytes(), 16).ok_or_else(|| ConversionError::not_hex(text))
}
