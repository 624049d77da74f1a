//! National identity number checksum.
//!
//! An identity number has 11 digits `d[0..10]`; the last two are check
//! digits computed from the first nine and ten digits respectively:
//!
//! ```text
//! odd_sum  = d[0] + d[2] + d[4] + d[6] + d[8]
//! even_sum = d[1] + d[3] + d[5] + d[7]
//! check10  = (odd_sum * 7 - even_sum) mod 10    (floored, never negative)
//! check11  = (d[0] + ... + d[9]) mod 10
//! valid    = d[9] == check10 && d[10] == check11
//! ```
//!
//! The validator is purely arithmetic. The rule that an identity number
//! never starts with `0` is a separate precondition,
//! [`require_nonzero_leading_digit`], which callers apply when they want it.
//!
//! # Examples
//!
//! ```
//! use cardwatch_protocol::{parse_national_id, validate_national_id};
//!
//! let digits = parse_national_id("10000000146").unwrap();
//! let check = validate_national_id(&digits);
//! assert!(check.valid);
//! assert_eq!(check.check10, 4);
//! assert_eq!(check.check11, 6);
//! ```

use cardwatch_core::{Error, Result, constants::NATIONAL_ID_LENGTH};
use serde::Serialize;

/// Outcome of the national ID checksum.
///
/// A mismatch is a normal result (`valid == false`), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NationalIdCheck {
    /// Computed 10th digit.
    pub check10: u8,
    /// Computed 11th digit.
    pub check11: u8,
    /// 10th digit present in the number.
    pub actual10: u8,
    /// 11th digit present in the number.
    pub actual11: u8,
    pub valid: bool,
    /// Sum of the digits at even indexes 0, 2, 4, 6, 8.
    pub odd_sum: u32,
    /// Sum of the digits at odd indexes 1, 3, 5, 7.
    pub even_sum: u32,
    /// Sum of the first ten digits.
    pub first_ten_sum: u32,
}

/// Compute the check digits of an 11-digit identity number.
///
/// Each element of `digits` must be in `0..=9`; [`parse_national_id`]
/// produces arrays that satisfy this.
pub fn validate_national_id(digits: &[u8; NATIONAL_ID_LENGTH]) -> NationalIdCheck {
    let d = digits.map(u32::from);

    let odd_sum = d[0] + d[2] + d[4] + d[6] + d[8];
    let even_sum = d[1] + d[3] + d[5] + d[7];
    let first_ten_sum: u32 = d[..10].iter().sum();

    // The intermediate goes negative when even_sum outweighs 7 * odd_sum.
    let check10 = (i64::from(odd_sum) * 7 - i64::from(even_sum)).rem_euclid(10) as u8;
    let check11 = (first_ten_sum % 10) as u8;

    let actual10 = digits[9];
    let actual11 = digits[10];

    NationalIdCheck {
        check10,
        check11,
        actual10,
        actual11,
        valid: actual10 == check10 && actual11 == check11,
        odd_sum,
        even_sum,
        first_ten_sum,
    }
}

/// Split an identity number into its 11 digits.
///
/// # Errors
/// Returns `Error::InvalidNationalId` unless `text` is exactly 11 ASCII digits.
pub fn parse_national_id(text: &str) -> Result<[u8; NATIONAL_ID_LENGTH]> {
    let bytes = text.as_bytes();
    if bytes.len() != NATIONAL_ID_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(Error::InvalidNationalId {
            message: format!("National ID must be exactly {NATIONAL_ID_LENGTH} digits, got {text:?}"),
        });
    }

    let mut digits = [0u8; NATIONAL_ID_LENGTH];
    for (digit, byte) in digits.iter_mut().zip(bytes) {
        *digit = byte - b'0';
    }
    Ok(digits)
}

/// Optional precondition: identity numbers never start with `0`.
///
/// # Errors
/// Returns `Error::LeadingZero` if the first digit is zero.
pub fn require_nonzero_leading_digit(digits: &[u8; NATIONAL_ID_LENGTH]) -> Result<()> {
    if digits[0] == 0 {
        return Err(Error::LeadingZero);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn check(text: &str) -> NationalIdCheck {
        validate_national_id(&parse_national_id(text).unwrap())
    }

    #[rstest]
    #[case("10000000146", true)]
    #[case("12345678901", false)]
    #[case("12345678910", false)]
    #[case("11111111111", false)]
    #[case("00000000000", true)]
    fn test_known_vectors(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(check(input).valid, valid);
    }

    #[test]
    fn test_check_digits_for_valid_number() {
        let result = check("10000000146");
        assert_eq!(result.odd_sum, 2);
        assert_eq!(result.even_sum, 0);
        assert_eq!(result.first_ten_sum, 6);
        assert_eq!((result.check10, result.actual10), (4, 4));
        assert_eq!((result.check11, result.actual11), (6, 6));
    }

    #[test]
    fn test_check_digits_for_invalid_number() {
        let result = check("12345678901");
        assert_eq!(result.odd_sum, 25);
        assert_eq!(result.even_sum, 20);
        assert_eq!(result.check10, 5);
        assert_eq!(result.actual10, 0);
        assert_eq!(result.check11, 5);
        assert_eq!(result.actual11, 1);
    }

    #[test]
    fn test_negative_intermediate_uses_floored_modulo() {
        // odd_sum = 0, even_sum = 36: 0 * 7 - 36 = -36, floored mod 10 = 4.
        let result = check("09090909000");
        assert_eq!(result.odd_sum, 0);
        assert_eq!(result.even_sum, 36);
        assert_eq!(result.check10, 4);
    }

    #[rstest]
    #[case("1234567890")] // too short
    #[case("123456789012")] // too long
    #[case("1234567890A")] // non-digit
    #[case("")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            parse_national_id(input),
            Err(Error::InvalidNationalId { .. })
        ));
    }

    #[test]
    fn test_leading_zero_is_separate_precondition() {
        let digits = parse_national_id("00000000000").unwrap();

        // The checksum alone accepts it...
        assert!(validate_national_id(&digits).valid);
        // ...the precondition does not.
        assert!(matches!(
            require_nonzero_leading_digit(&digits),
            Err(Error::LeadingZero)
        ));

        let digits = parse_national_id("10000000146").unwrap();
        assert!(require_nonzero_leading_digit(&digits).is_ok());
    }
}
