//! Error types for scrolltoc.
//!
//! Library crates use [`ScrollTocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all scrolltoc operations.
#[derive(Debug, thiserror::Error)]
pub enum ScrollTocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The content region to index headings from does not exist.
    #[error("content region not found: no element matches `{selector}`")]
    MissingContentRegion { selector: String },

    /// The element that should receive the generated list does not exist.
    #[error("TOC container not found: no element with id `{id}`")]
    MissingTocContainer { id: String },

    /// A TOC link expected for a heading is absent.
    #[error("no TOC link with id `{link_id}`")]
    LinkNotFound { link_id: String },

    /// HTML or selector parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (heading level out of range, bad geometry, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScrollTocError>;

impl ScrollTocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the page is misconfigured for a TOC at all.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::MissingContentRegion { .. } | Self::MissingTocContainer { .. }
        )
    }
}
