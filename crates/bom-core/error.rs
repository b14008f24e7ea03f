//! Error types for BOM detection and transcoding
//!
//! Provides the crate-wide [`BomError`] enum and [`Result`] alias. Errors are
//! terminal for the current operation; there are no retries anywhere. Lenient
//! mode in the transcode pipeline is the only policy lever that turns a
//! would-be [`BomError::IllegalBytes`] into forward progress.

use thiserror::Error;

use crate::catalog::BomType;

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, BomError>;

/// Main error type for BOM operations
///
/// The distinct variants map to distinct process exit conditions in the
/// command-line front end: expectation failures and illegal byte sequences
/// must be distinguishable from generic failures.
#[derive(Debug, Error)]
pub enum BomError {
    /// A requested BOM type name is not in the catalog
    #[error("unknown BOM type \"{0}\"")]
    UnknownType(String),

    /// The resolved BOM type is outside the caller's expected set
    #[error("unexpected BOM type {}", .0.name())]
    UnexpectedType(BomType),

    /// Strict-mode conversion hit an invalid or truncated byte sequence
    #[error("invalid {encoding} byte sequence at file offset {offset}")]
    IllegalBytes {
        /// Name of the source encoding being converted
        encoding: &'static str,
        /// Byte offset from stream start where the bad sequence begins
        offset: u64,
    },

    /// Read or write failure on the underlying stream
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Internal consistency violation (indicates a catalog or matcher defect)
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl BomError {
    /// Check if the error indicates a bug in the library rather than bad input
    #[must_use]
    pub const fn is_internal_bug(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
