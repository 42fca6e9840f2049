//! Error type shared by every tool in the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the dataset preparation passes.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("categories in {} differ from those of the first input", path.display())]
    CategoryMismatch { path: PathBuf },

    #[error("{count} referenced image(s) not found under any source directory")]
    MissingImages { count: usize },
}

impl PrepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        PrepError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
