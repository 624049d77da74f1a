//! Card frame interpretation.
//!
//! Turns a captured [`RawFrame`](cardwatch_core::RawFrame) into a
//! [`CardInfo`]: classification by text shape, national ID checksum
//! validation, RFID payload parsing, and hex/decimal representations.

pub mod card_info;
pub mod classifier;
pub mod convert;
pub mod national_id;
pub mod record;

pub use card_info::{CardInfo, CardInfoBuilder};
pub use classifier::{classify, classify_str};
pub use convert::{decimal_string, hex_dump};
pub use national_id::{
    NationalIdCheck, parse_national_id, require_nonzero_leading_digit, validate_national_id,
};
pub use record::{NationalIdRecord, ParsedRecord, RfidRecord};
