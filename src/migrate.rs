//! Blob-to-file migration.
//!
//! For every decoded [`Record`], in order, the blob named by the record's
//! [`HashCode`](crate::hash_code::HashCode) is copied from the source
//! directory to `<dest>/<record.filename>`.  Source and destination handles
//! are scoped to a single record and are closed before the next one starts.
//!
//! # Failure policy
//! By default the run stops at the first failing record and returns its
//! error.  Files already written stay in place.  With
//! [`MigrateOptions::continue_on_error`] every record is attempted and the
//! failures are collected in the [`MigrationReport`] instead.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;

use crate::record::Record;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("failed to open source file {}: {source}", .src.display())]
    SourceNotFound {
        src:    PathBuf,
        dst:    PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create destination file {}: {source}", .dst.display())]
    DestCreate {
        src:    PathBuf,
        dst:    PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy from {} to {}: {source}", .src.display(), .dst.display())]
    Copy {
        src:    PathBuf,
        dst:    PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create destination directory {}: {source}", .path.display())]
    CreateDestDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{failed} of {total} record(s) failed to migrate")]
    Incomplete { failed: usize, total: usize },
}

// ── Options ──────────────────────────────────────────────────────────────────

/// Configuration for [`migrate`].
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Attempt every record and report all failures instead of stopping at
    /// the first one.
    pub continue_on_error: bool,
    /// Create the destination directory (and parents) before copying.
    /// When unset, a missing directory surfaces as [`MigrateError::DestCreate`].
    pub create_dest_dir:   bool,
    /// Resolve paths and open each source, but write nothing.
    pub dry_run:           bool,
}

// ── Transfer / report ────────────────────────────────────────────────────────

/// One resolved source → destination pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub src:   PathBuf,
    pub dst:   PathBuf,
    /// Bytes copied; zero for a dry run.
    pub bytes: u64,
}

impl Transfer {
    pub fn resolve(record: &Record, source_dir: &Path, dest_dir: &Path) -> Self {
        Self {
            src:   source_dir.join(record.hash_code()),
            dst:   dest_dir.join(&record.filename),
            bytes: 0,
        }
    }
}

/// A per-record failure recorded in continue-on-error mode.
#[derive(Debug)]
pub struct Failure {
    /// Position of the record in decode order.
    pub index: usize,
    pub error: MigrateError,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub transferred: Vec<Transfer>,
    pub failures:    Vec<Failure>,
}

impl MigrationReport {
    pub fn total_bytes(&self) -> u64 {
        self.transferred.iter().map(|t| t.bytes).sum()
    }

    pub fn is_complete(&self) -> bool { self.failures.is_empty() }

    /// Convert a report with failures into [`MigrateError::Incomplete`].
    pub fn check(self) -> Result<Self, MigrateError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(MigrateError::Incomplete {
                failed: self.failures.len(),
                total:  self.failures.len() + self.transferred.len(),
            })
        }
    }
}

// ── Migration ────────────────────────────────────────────────────────────────

/// Copy the blob behind every record from `source_dir` into `dest_dir`.
///
/// # Arguments
/// * `records`: decoded container entries, processed in slice order.
/// * `source_dir`: directory holding blobs named by hash code.
/// * `dest_dir`: directory receiving `<filename>.cfg` files.  Must exist
///   unless `opts.create_dest_dir` is set.
/// * `progress`: optional callback, called with `(source, destination)` once
///   per record right before its bytes are copied.  Not called on a dry run.
pub fn migrate<F>(
    records:      &[Record],
    source_dir:   &Path,
    dest_dir:     &Path,
    opts:         &MigrateOptions,
    mut progress: Option<&mut F>,
) -> Result<MigrationReport, MigrateError>
where
    F: FnMut(&Path, &Path),
{
    if opts.create_dest_dir && !opts.dry_run {
        fs::create_dir_all(dest_dir).map_err(|source| MigrateError::CreateDestDir {
            path: dest_dir.to_owned(),
            source,
        })?;
    }

    let mut report = MigrationReport::default();

    for (index, record) in records.iter().enumerate() {
        let mut transfer = Transfer::resolve(record, source_dir, dest_dir);
        let result = if opts.dry_run {
            check_source(&transfer)
        } else {
            copy_blob(&mut transfer, progress.as_deref_mut())
        };

        match result {
            Ok(()) => report.transferred.push(transfer),
            Err(error) if opts.continue_on_error => {
                warn!("record {index} ({}): {error}", record.filename);
                report.failures.push(Failure { index, error });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(report)
}

/// Open source, create destination, copy.  Both handles drop when this
/// returns, on every path.
fn copy_blob<F>(transfer: &mut Transfer, progress: Option<&mut F>) -> Result<(), MigrateError>
where
    F: FnMut(&Path, &Path),
{
    let mut src_file = File::open(&transfer.src).map_err(|source| MigrateError::SourceNotFound {
        src: transfer.src.clone(),
        dst: transfer.dst.clone(),
        source,
    })?;

    let mut dst_file = File::create(&transfer.dst).map_err(|source| MigrateError::DestCreate {
        src: transfer.src.clone(),
        dst: transfer.dst.clone(),
        source,
    })?;

    if let Some(cb) = progress {
        cb(&transfer.src, &transfer.dst);
    }

    transfer.bytes = io::copy(&mut src_file, &mut dst_file).map_err(|source| MigrateError::Copy {
        src: transfer.src.clone(),
        dst: transfer.dst.clone(),
        source,
    })?;
    Ok(())
}

fn check_source(transfer: &Transfer) -> Result<(), MigrateError> {
    File::open(&transfer.src).map_err(|source| MigrateError::SourceNotFound {
        src: transfer.src.clone(),
        dst: transfer.dst.clone(),
        source,
    })?;
    Ok(())
}
