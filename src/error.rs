use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode schedule: {0}")]
    Encode(#[from] csv::Error),
    #[error("unsupported schedule file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("legacy schedule files are read-only: {}", .0.display())]
    ReadOnlyFormat(PathBuf),
}

impl StorageError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Write {
            path: path.into(),
            source,
        }
    }
}
