use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures surfaced by the storage layer. Ordinary sequencing mishaps
/// in the [Tracker](crate::tracker::Tracker) are not part of this
/// taxonomy, they degrade to fallback values instead of failing.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no database named {name:?} under {par_dir:?}")]
    DatabaseNotFound { name: String, par_dir: PathBuf },

    #[error("a database named {name:?} already exists under {par_dir:?}")]
    DatabaseAlreadyExists { name: String, par_dir: PathBuf },

    #[error("malformed metadata file: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("malformed log row: {0}")]
    Row(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
