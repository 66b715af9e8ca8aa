use std::path::PathBuf;

use thiserror::Error;

use crate::load::CatalogFormat;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("malformed {format} catalog: {message}")]
    Parse {
        format: CatalogFormat,
        message: String,
    },

    #[error("invalid filter at offset {position}: {message}")]
    Query { position: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    pub(crate) fn parse(format: CatalogFormat, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    pub(crate) fn query(position: usize, message: impl Into<String>) -> Self {
        Self::Query {
            position,
            message: message.into(),
        }
    }

    /// Returns `true` when the catalog source did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` when the catalog source was malformed.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
