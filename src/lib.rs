pub mod record;
pub mod hash_code;
pub mod container;
pub mod migrate;

use std::path::Path;
use thiserror::Error;

pub use record::{Record, RECORD_SIZE};
pub use hash_code::HashCode;
pub use container::{read_container, read_records, ContainerError, ContainerReader, RecordIter};
pub use migrate::{migrate, MigrateError, MigrateOptions, MigrationReport, Transfer};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Migrate(#[from] MigrateError),
}

/// Decode the container at `container_path` and migrate every record.
pub fn run<F>(
    container_path: &Path,
    source_dir:     &Path,
    dest_dir:       &Path,
    opts:           &MigrateOptions,
    progress:       Option<&mut F>,
) -> Result<MigrationReport, Error>
where
    F: FnMut(&Path, &Path),
{
    let records = read_container(container_path)?;
    Ok(migrate(&records, source_dir, dest_dir, opts, progress)?)
}
