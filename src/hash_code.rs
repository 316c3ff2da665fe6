//! Content-address key derivation.
//!
//! The blob backing a record is stored in the source directory under a name
//! built from the record's four numeric fields, each rendered as zero-padded
//! uppercase hex at its natural width:
//!
//! ```text
//! value1 (8) | value2 (4) | value3 (4) | value4 (16)
//! ```

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::record::Record;

/// Length of a hash code in characters.
pub const HASH_CODE_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HashCode(String);

impl HashCode {
    pub fn from_fields(value1: u32, value2: u16, value3: u16, value4: u64) -> Self {
        // Big-endian bytes hex-encode most significant digit first.
        let mut bytes = [0u8; HASH_CODE_LEN / 2];
        BigEndian::write_u32(&mut bytes[0..4], value1);
        BigEndian::write_u16(&mut bytes[4..6], value2);
        BigEndian::write_u16(&mut bytes[6..8], value3);
        BigEndian::write_u64(&mut bytes[8..16], value4);
        HashCode(hex::encode_upper(bytes))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HashCode {
    fn as_ref(&self) -> &str { &self.0 }
}

impl AsRef<Path> for HashCode {
    fn as_ref(&self) -> &Path { Path::new(&self.0) }
}

impl Record {
    /// The source-side blob name for this record.
    pub fn hash_code(&self) -> HashCode {
        HashCode::from_fields(self.value1, self.value2, self.value3, self.value4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(value1: u32, value2: u16, value3: u16, value4: u64) -> Record {
        Record { filename: "x.cfg".into(), value1, value2, value3, value4 }
    }

    #[test]
    fn small_values_are_zero_padded() {
        assert_eq!(
            record(1, 2, 3, 4).hash_code().as_str(),
            "00000001000200030000000000000004",
        );
    }

    #[test]
    fn output_is_uppercase() {
        let code = record(0xDEAD_BEEF, 0xABCD, 0x00EF, 0x0123_4567_89AB_CDEF).hash_code();
        assert_eq!(code.to_string(), "DEADBEEFABCD00EF0123456789ABCDEF");
    }

    #[test]
    fn extremes() {
        assert_eq!(record(0, 0, 0, 0).hash_code().as_str(), "0".repeat(HASH_CODE_LEN));
        assert_eq!(
            record(u32::MAX, u16::MAX, u16::MAX, u64::MAX).hash_code().as_str(),
            "F".repeat(HASH_CODE_LEN),
        );
    }

    #[test]
    fn filename_does_not_affect_key() {
        let mut a = record(7, 8, 9, 10);
        let b = a.clone();
        a.filename = "other.cfg".into();
        assert_eq!(a.hash_code(), b.hash_code());
    }

    proptest! {
        #[test]
        fn matches_printf_layout(v1: u32, v2: u16, v3: u16, v4: u64) {
            let code = HashCode::from_fields(v1, v2, v3, v4);
            prop_assert_eq!(code.as_str().len(), HASH_CODE_LEN);
            prop_assert_eq!(code.as_str(), format!("{v1:08X}{v2:04X}{v3:04X}{v4:016X}"));
        }

        #[test]
        fn hex_decodes_back_to_fields(v1: u32, v2: u16, v3: u16, v4: u64) {
            let code = HashCode::from_fields(v1, v2, v3, v4);
            prop_assert!(code.as_str().chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

            let bytes = hex::decode(code.as_str()).unwrap();
            prop_assert_eq!(bytes.len(), HASH_CODE_LEN / 2);
            prop_assert_eq!(BigEndian::read_u32(&bytes[0..4]), v1);
            prop_assert_eq!(BigEndian::read_u16(&bytes[4..6]), v2);
            prop_assert_eq!(BigEndian::read_u16(&bytes[6..8]), v3);
            prop_assert_eq!(BigEndian::read_u64(&bytes[8..16]), v4);
        }
    }
}
