//! One fixed 160-byte container entry.
//!
//! # Layout
//!
//! | Offset | Size | Field      | Encoding                                  |
//! |--------|------|------------|-------------------------------------------|
//! | 0      | 144  | filename   | UTF-16LE, terminated by the first 0 unit  |
//! | 144    | 4    | `value1`   | u32 little-endian                         |
//! | 148    | 2    | `value2`   | u16 little-endian                         |
//! | 150    | 2    | `value3`   | u16 little-endian                         |
//! | 152    | 8    | `value4`   | u64 **big-endian**                        |
//!
//! `value4` is big-endian while every other field is little-endian.  That is
//! how the format is written on disk; do not "fix" it.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::Serialize;
use std::io::{self, Read, Write};

/// Encoded size of one record.
pub const RECORD_SIZE: usize = 160;
/// Size of the UTF-16LE filename field at the start of a record.
pub const FILENAME_SIZE: usize = 144;
/// Size of the trailing numeric field block.
pub const STRUCT_SIZE: usize = RECORD_SIZE - FILENAME_SIZE;
/// Maximum number of UTF-16 code units the filename field can hold.
pub const FILENAME_MAX_UNITS: usize = FILENAME_SIZE / 2;
/// Extension appended to every decoded filename.
pub const FILENAME_SUFFIX: &str = ".cfg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Destination file name, including the `.cfg` suffix.
    pub filename: String,
    pub value1:   u32,
    pub value2:   u16,
    pub value3:   u16,
    pub value4:   u64,
}

impl Record {
    /// Read exactly one record from `reader`.
    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut buf = [0u8; RECORD_SIZE];
        reader.read_exact(&mut buf)?;
        Ok(Self::from_bytes(&buf))
    }

    /// Decode a record from its raw on-disk bytes.  Never fails: malformed
    /// UTF-16 is replaced with U+FFFD rather than rejected.
    pub fn from_bytes(buf: &[u8; RECORD_SIZE]) -> Self {
        let (name_bytes, fields) = buf.split_at(FILENAME_SIZE);

        let mut filename = decode_filename(name_bytes);
        filename.push_str(FILENAME_SUFFIX);

        Self {
            filename,
            value1: LittleEndian::read_u32(&fields[0..4]),
            value2: LittleEndian::read_u16(&fields[4..6]),
            value3: LittleEndian::read_u16(&fields[6..8]),
            value4: BigEndian::read_u64(&fields[8..16]),
        }
    }

    /// Encode into the on-disk layout.  The `.cfg` suffix is stripped from
    /// `filename` first; the remaining name must fit in the filename field.
    pub fn to_bytes(&self) -> io::Result<[u8; RECORD_SIZE]> {
        let stem = self.filename
            .strip_suffix(FILENAME_SUFFIX)
            .unwrap_or(&self.filename);
        let units: Vec<u16> = stem.encode_utf16().collect();
        if units.len() > FILENAME_MAX_UNITS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("filename '{stem}' exceeds {FILENAME_MAX_UNITS} UTF-16 units"),
            ));
        }

        let mut buf = [0u8; RECORD_SIZE];
        LittleEndian::write_u16_into(&units, &mut buf[..units.len() * 2]);

        let fields = &mut buf[FILENAME_SIZE..];
        LittleEndian::write_u32(&mut fields[0..4], self.value1);
        LittleEndian::write_u16(&mut fields[4..6], self.value2);
        LittleEndian::write_u16(&mut fields[6..8], self.value3);
        BigEndian::write_u64(&mut fields[8..16], self.value4);
        Ok(buf)
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes()?)
    }
}

/// Collect little-endian code units up to the first zero unit (or the end of
/// the field) and decode them as UTF-16.
fn decode_filename(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}
