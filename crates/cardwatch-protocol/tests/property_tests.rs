//! Property-based tests for card interpretation.
//!
//! These tests use proptest to generate arbitrary inputs and verify that
//! the classifier, the checksum, and the converters hold their invariants
//! for the whole input space.

use cardwatch_core::CardVariant;
use cardwatch_protocol::{
    ParsedRecord, classify_str, decimal_string, hex_dump, parse_national_id, validate_national_id,
};
use num_bigint::BigUint;
use proptest::prelude::*;

/// Strategy for generating 11-digit arrays with every digit in 0-9.
fn national_id_digits() -> impl Strategy<Value = [u8; 11]> {
    prop::array::uniform11(0u8..=9u8)
}

/// Strategy for generating identity numbers with correct check digits.
fn valid_national_id() -> impl Strategy<Value = String> {
    prop::array::uniform9(0u8..=9u8).prop_map(|head| {
        let odd: i64 = [0, 2, 4, 6, 8].iter().map(|&i| i64::from(head[i])).sum();
        let even: i64 = [1, 3, 5, 7].iter().map(|&i| i64::from(head[i])).sum();
        let check10 = (odd * 7 - even).rem_euclid(10) as u8;
        let check11 = ((head.iter().map(|&d| u32::from(d)).sum::<u32>() + u32::from(check10)) % 10) as u8;

        head.iter()
            .chain([check10, check11].iter())
            .map(|d| char::from(b'0' + d))
            .collect()
    })
}

/// Strategy for generating card-like text: mostly hex and digits, some noise.
fn card_text() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[0-9]{0,24}").expect("digit regex"),
        prop::string::string_regex("[0-9A-Fa-f]{0,24}").expect("hex regex"),
        prop::string::string_regex("[0-9A-Za-z]{0,24}").expect("alnum regex"),
        any::<String>(),
    ]
}

proptest! {
    /// Property: the checksum is a pure function of the 11 digits.
    #[test]
    fn prop_checksum_is_deterministic(digits in national_id_digits()) {
        let first = validate_national_id(&digits);
        let second = validate_national_id(&digits.clone());

        prop_assert_eq!(first, second);
        prop_assert!(first.check10 <= 9);
        prop_assert!(first.check11 <= 9);
        prop_assert_eq!(first.actual10, digits[9]);
        prop_assert_eq!(first.actual11, digits[10]);
        prop_assert_eq!(
            first.valid,
            digits[9] == first.check10 && digits[10] == first.check11
        );
    }

    /// Property: numbers built with correct check digits always validate.
    #[test]
    fn prop_generated_ids_validate(number in valid_national_id()) {
        let digits = parse_national_id(&number).expect("generated IDs are 11 digits");
        prop_assert!(validate_national_id(&digits).valid);
        prop_assert_eq!(classify_str(&number), CardVariant::NationalId);
    }

    /// Property: changing only the last digit of a valid number invalidates it.
    #[test]
    fn prop_corrupted_last_digit_fails(number in valid_national_id(), bump in 1u8..=9u8) {
        let mut digits = parse_national_id(&number).expect("generated IDs are 11 digits");
        digits[10] = (digits[10] + bump) % 10;
        prop_assert!(!validate_national_id(&digits).valid);
    }

    /// Property: classification is total and idempotent, and the parsed
    /// record always carries the same variant.
    #[test]
    fn prop_classify_total_and_idempotent(text in card_text()) {
        let variant = classify_str(&text);
        prop_assert_eq!(classify_str(&text), variant);
        prop_assert_eq!(ParsedRecord::parse(variant, &text).variant(), variant);
    }

    /// Property: the hex dump has one uppercase pair per byte.
    #[test]
    fn prop_hex_dump_shape(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        let dump = hex_dump(&bytes);
        prop_assert_eq!(dump.len(), bytes.len() * 3 - 1);

        let pairs: Vec<&str> = dump.split(' ').collect();
        prop_assert_eq!(pairs.len(), bytes.len());
        for (pair, byte) in pairs.iter().zip(&bytes) {
            prop_assert_eq!(*pair, format!("{:02X}", byte));
        }
    }

    /// Property: the decimal string of a dump equals the bytes read as one
    /// big-endian unsigned integer.
    #[test]
    fn prop_decimal_roundtrip(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        let dump = hex_dump(&bytes);
        let decimal = decimal_string(CardVariant::Unknown, "", &dump)
            .expect("dumps are always well-formed");

        let reparsed = BigUint::parse_bytes(decimal.as_bytes(), 10)
            .expect("decimal output is base 10");
        let hex_value = BigUint::parse_bytes(dump.replace(' ', "").as_bytes(), 16)
            .expect("dump is base 16");

        prop_assert_eq!(&reparsed, &BigUint::from_bytes_be(&bytes));
        prop_assert_eq!(reparsed, hex_value);
    }
}
