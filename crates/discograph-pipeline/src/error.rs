//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by validation, rendering and transform steps.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or querying the catalog failed.
    #[error(transparent)]
    Catalog(#[from] discograph_core::Error),

    /// A validator could not run at all. A document that merely fails its
    /// schema is reported in a `ValidationReport`, not here.
    #[error("{validator} could not validate {}: {message}", .document.display())]
    Validation {
        validator: String,
        document: PathBuf,
        message: String,
    },

    /// A schema file is missing or cannot be compiled.
    #[error("unusable schema {}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    /// The external transform engine failed.
    #[error("transform with {} failed: {message}", .template.display())]
    Transform { template: PathBuf, message: String },

    /// A rendered text report could not be read back.
    #[error("malformed report at line {line}: {message}")]
    Report { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Returns `true` when an input file was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Catalog(inner) if inner.is_not_found())
    }

    /// Returns `true` when the external transform engine failed.
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Transform { .. })
    }

    /// Returns `true` when a validator could not run.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Schema { .. })
    }
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
