//! Container index decoding.
//!
//! A container is an 8-byte header followed by `N` fixed-size records (see
//! [`crate::record`] for the record layout):
//!
//! ```text
//! [ header (8 B) | record 0 (160 B) | record 1 (160 B) | ... ]
//! ```
//!
//! The header carries format/version bytes that this crate does not
//! interpret; it is skipped.  The only structural check is that the bytes
//! after the header are an exact multiple of the record size.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::record::{Record, RECORD_SIZE};

/// Size of the uninterpreted container header.
pub const HEADER_SIZE: u64 = 8;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("cannot open container {}: {source}", .path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file size is not a multiple of record size ({file_size} bytes total)")]
    NotRecordMultiple { file_size: u64 },
    #[error("record {index} is truncated: {source}")]
    Truncated {
        index:  usize,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Number of records in a container of `file_size` bytes.
pub fn record_count(file_size: u64) -> Result<usize, ContainerError> {
    let body = file_size
        .checked_sub(HEADER_SIZE)
        .ok_or(ContainerError::NotRecordMultiple { file_size })?;
    if body % RECORD_SIZE as u64 != 0 {
        return Err(ContainerError::NotRecordMultiple { file_size });
    }
    usize::try_from(body / RECORD_SIZE as u64)
        .map_err(|e| ContainerError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

// ── ContainerReader ──────────────────────────────────────────────────────────

/// A container positioned at its first record with a validated record count.
pub struct ContainerReader<R> {
    reader:       R,
    record_count: usize,
}

impl<R: Read + Seek> ContainerReader<R> {
    /// Size the stream, validate it, and seek past the header.
    pub fn new(mut reader: R) -> Result<Self, ContainerError> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        let record_count = record_count(file_size)?;
        reader.seek(SeekFrom::Start(HEADER_SIZE))?;
        debug!("container: {file_size} bytes, {record_count} record(s)");
        Ok(Self { reader, record_count })
    }
}

impl<R: Read> ContainerReader<R> {
    pub fn record_count(&self) -> usize { self.record_count }

    pub fn records(self) -> RecordIter<R> {
        RecordIter::new(self.reader, self.record_count)
    }
}

// ── RecordIter ───────────────────────────────────────────────────────────────

/// Streams up to `count` records from a reader positioned at a record
/// boundary.  After the first error the iterator is exhausted.
pub struct RecordIter<R> {
    reader: R,
    index:  usize,
    count:  usize,
    failed: bool,
}

impl<R: Read> RecordIter<R> {
    pub fn new(reader: R, count: usize) -> Self {
        Self { reader, index: 0, count, failed: false }
    }
}

impl<R: Read> Iterator for RecordIter<R> {
    type Item = Result<Record, ContainerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.index >= self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;

        match Record::read(&mut self.reader) {
            Ok(record) => {
                debug!("record {index}: {} <- {}", record.filename, record.hash_code());
                Some(Ok(record))
            }
            Err(source) => {
                self.failed = true;
                Some(Err(ContainerError::Truncated { index, source }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        (0, Some(self.count - self.index))
    }
}

// ── Convenience ──────────────────────────────────────────────────────────────

/// Decode every record from a seekable stream, in on-disk order.  Aborts on
/// the first failure without returning the records read so far.
pub fn read_records<R: Read + Seek>(reader: R) -> Result<Vec<Record>, ContainerError> {
    let container = ContainerReader::new(reader)?;
    let mut records = Vec::with_capacity(container.record_count());
    for record in container.records() {
        records.push(record?);
    }
    Ok(records)
}

/// Open and decode the container file at `path`.
pub fn read_container<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, ContainerError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|source| ContainerError::Open { path: path.to_owned(), source })?;
    read_records(BufReader::new(file))
}
