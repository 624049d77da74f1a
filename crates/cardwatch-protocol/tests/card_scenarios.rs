//! End-to-end card interpretation scenarios.
//!
//! Each test feeds a frame exactly as a reader would deliver it and checks
//! the complete resulting record.

use cardwatch_core::{CardVariant, ConversionError, FormatLabel, RawFrame};
use cardwatch_protocol::{CardInfo, ParsedRecord};
use rstest::rstest;

fn read(bytes: &[u8]) -> CardInfo {
    let frame = RawFrame::new(bytes.to_vec()).expect("frame is long enough");
    CardInfo::builder(frame).sequence(1).build()
}

#[test]
fn test_hexadecimal_reader_output() {
    let card = read(b"CAB9EAF2\r\n");

    assert_eq!(card.variant, CardVariant::HexadecimalRfid);
    assert_eq!(card.text.as_str(), "CAB9EAF2");
    assert_eq!(card.length(), 8);
    assert_eq!(card.decimal, "3401181938");
    assert!(card.conversion_error.is_none());

    let rfid = card.record.as_rfid().expect("hex cards carry an RFID payload");
    assert_eq!(rfid.card_number, "CAB9EAF2");
    assert_eq!(rfid.numeric_only, "92");
    assert_eq!(rfid.format, FormatLabel::Short);
}

#[test]
fn test_lowercase_hex_card_is_normalized() {
    let card = read(b"cab9eaf2\r\n");
    assert_eq!(card.variant, CardVariant::HexadecimalRfid);
    assert_eq!(card.decimal, "3401181938");
    assert_eq!(card.record.as_rfid().unwrap().card_number, "CAB9EAF2");
}

#[test]
fn test_valid_national_id_card() {
    let card = read(b"10000000146\r\n");

    assert_eq!(card.variant, CardVariant::NationalId);
    let id = card.record.as_national_id().unwrap();
    assert_eq!(id.number, "10000000146");
    assert!(id.check.valid);
    assert_eq!(id.check.check10, 4);
    assert_eq!(id.check.check11, 6);

    // Decimal comes from the dump, terminator bytes included.
    assert_eq!(card.hex, "31 30 30 30 30 30 30 30 31 34 36 0D 0A");
    assert!(card.decimal_for_output().is_some());
}

#[rstest]
#[case(b"12345678901".as_slice())]
#[case(b"12345678910".as_slice())]
#[case(b"11111111111\r\n".as_slice())]
fn test_invalid_national_ids_are_still_reported(#[case] frame: &[u8]) {
    let card = read(frame);
    assert_eq!(card.variant, CardVariant::NationalId);
    assert!(!card.record.as_national_id().unwrap().check.valid);
}

#[rstest]
#[case(b"AB12CD34EF".as_slice(), CardVariant::StandardRfid, FormatLabel::Standard)]
#[case(b"1234567890123456\r\n".as_slice(), CardVariant::LongFormatRfid, FormatLabel::Extended)]
#[case(b"ABCDEF012345".as_slice(), CardVariant::HexadecimalRfid, FormatLabel::Custom(12))]
fn test_rfid_families(
    #[case] frame: &[u8],
    #[case] variant: CardVariant,
    #[case] format: FormatLabel,
) {
    let card = read(frame);
    assert_eq!(card.variant, variant);
    assert_eq!(card.record.as_rfid().unwrap().format, format);
}

#[test]
fn test_noise_frame_is_unknown_but_complete() {
    let card = read(b"\x00\x00 ?? \x00\x00\r\n");
    assert_eq!(card.variant, CardVariant::Unknown);
    assert_eq!(card.record, ParsedRecord::Unknown);
    assert_eq!(card.text.as_str(), "??");
    assert!(!card.hex.is_empty());
}

#[test]
fn test_invalid_utf8_is_dropped_before_classification() {
    let mut frame = b"CAB9".to_vec();
    frame.extend_from_slice(&[0xFF, 0xFE]);
    frame.extend_from_slice(b"EAF2\r\n");

    let card = read(&frame);
    assert_eq!(card.text.as_str(), "CAB9EAF2");
    assert_eq!(card.variant, CardVariant::HexadecimalRfid);
    assert_eq!(card.decimal, "3401181938");
}

#[test]
fn test_conversion_failure_keeps_classification() {
    // Parsed directly so the hex path sees non-hex text.
    let result = cardwatch_protocol::decimal_string(CardVariant::HexadecimalRfid, "XYZ12345", "");
    let error = result.unwrap_err();
    assert!(matches!(error, ConversionError::NotHex { .. }));
    assert_eq!(error.sentinel(), "Conversion error");
}
