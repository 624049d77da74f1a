//! Card classification by text shape.
//!
//! Readers deliver only the card number, without model metadata, so the
//! card family is inferred from the length and alphabet of the decoded
//! text. Classification works on the uppercased text and runs an ordered
//! chain of predicates where the first match wins:
//!
//! | Order | Shape                                   | Variant            |
//! |-------|-----------------------------------------|--------------------|
//! | 1     | exactly 11 characters, all digits       | `NationalId`       |
//! | 2     | exactly 10 characters, all alphanumeric | `StandardRfid`     |
//! | 3     | 16 or more characters, all digits       | `LongFormatRfid`   |
//! | 4     | 8 or more characters, all `[0-9A-F]`    | `HexadecimalRfid`  |
//! | 5     | anything else                           | `Unknown`          |
//!
//! The digit-only checks must precede the hexadecimal fallback: an 11-digit
//! number is also valid hexadecimal.
//!
//! # Examples
//!
//! ```
//! use cardwatch_core::CardVariant;
//! use cardwatch_protocol::classify_str;
//!
//! assert_eq!(classify_str("10000000146"), CardVariant::NationalId);
//! assert_eq!(classify_str("0012345678"), CardVariant::StandardRfid);
//! assert_eq!(classify_str("cab9eaf2"), CardVariant::HexadecimalRfid);
//! assert_eq!(classify_str("short"), CardVariant::Unknown);
//! ```

use cardwatch_core::{
    CardVariant, DecodedText,
    constants::{HEX_RFID_MIN_LENGTH, LONG_FORMAT_MIN_LENGTH, NATIONAL_ID_LENGTH, STANDARD_RFID_LENGTH},
};

/// Classify decoded frame text into a card variant.
///
/// Total and pure: every input maps to exactly one variant, `Unknown`
/// being the fallback.
pub fn classify(text: &DecodedText) -> CardVariant {
    classify_str(text.as_str())
}

/// Classify a plain string; see [`classify`].
pub fn classify_str(text: &str) -> CardVariant {
    let upper = text.to_uppercase();
    let length = upper.chars().count();

    if length == NATIONAL_ID_LENGTH && is_all_digits(&upper) {
        return CardVariant::NationalId;
    }

    if length == STANDARD_RFID_LENGTH && is_all_alphanumeric(&upper) {
        return CardVariant::StandardRfid;
    }

    if length >= LONG_FORMAT_MIN_LENGTH && is_all_digits(&upper) {
        return CardVariant::LongFormatRfid;
    }

    if length >= HEX_RFID_MIN_LENGTH && is_upper_hex(&upper) {
        return CardVariant::HexadecimalRfid;
    }

    CardVariant::Unknown
}

// Empty strings never satisfy these: every caller also checks a minimum length.
fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn is_all_alphanumeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphanumeric)
}

fn is_upper_hex(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10000000146", CardVariant::NationalId)]
    #[case("12345678901", CardVariant::NationalId)]
    #[case("00000000000", CardVariant::NationalId)]
    #[case("0012345678", CardVariant::StandardRfid)]
    #[case("AB12CD34EF", CardVariant::StandardRfid)]
    #[case("ab12xy34zz", CardVariant::StandardRfid)]
    #[case("1234567890123456", CardVariant::LongFormatRfid)]
    #[case("12345678901234567890", CardVariant::LongFormatRfid)]
    #[case("CAB9EAF2", CardVariant::HexadecimalRfid)]
    #[case("cab9eaf2", CardVariant::HexadecimalRfid)]
    #[case("123456789", CardVariant::HexadecimalRfid)]
    #[case("123456789012", CardVariant::HexadecimalRfid)]
    #[case("ABCDEF0123456789ABCD", CardVariant::HexadecimalRfid)]
    #[case("1234567", CardVariant::Unknown)]
    #[case("CAB9EAFG", CardVariant::Unknown)]
    #[case("AB12-CD34", CardVariant::Unknown)]
    #[case("", CardVariant::Unknown)]
    fn test_classify(#[case] input: &str, #[case] expected: CardVariant) {
        assert_eq!(classify_str(input), expected);
    }

    #[test]
    fn test_eleven_digits_prefer_national_id_over_hex() {
        // 11 digits also satisfy the hex predicate; ordering decides.
        assert_eq!(classify_str("98765432109"), CardVariant::NationalId);
    }

    #[test]
    fn test_ten_digits_are_standard_rfid() {
        assert_eq!(classify_str("3401181938"), CardVariant::StandardRfid);
    }

    #[test]
    fn test_sixteen_hex_letters_are_hex_not_long_format() {
        assert_eq!(
            classify_str("ABCDEF0123456789"),
            CardVariant::HexadecimalRfid
        );
    }

    #[test]
    fn test_classify_decoded_text() {
        let text = DecodedText::decode(b"CAB9EAF2\r\n");
        assert_eq!(classify(&text), CardVariant::HexadecimalRfid);
    }
}
