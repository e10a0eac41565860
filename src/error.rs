//! Error taxonomy for the obfuscation pipeline.
//!
//! Every public pipeline operation returns [`Result<T>`]. Codec internals work in
//! `anyhow` and are classified into one of these variants at the stage boundary,
//! so callers can branch on [`ObfuscateError::kind`] without string matching.

use crate::io::cloud::CloudIOError;
use crate::request::Format;
use thiserror::Error;

/// Errors surfaced by [`crate::Obfuscator::process`] and the individual stages.
#[derive(Debug, Error)]
pub enum ObfuscateError {
    /// Malformed request, bad location or unsupported format tag.
    #[error("{0}")]
    InvalidInput(String),

    /// The object does not exist in storage.
    #[error("File not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Transport or authorization failure while talking to storage.
    #[error("Storage error reading {bucket}/{key}: {source}")]
    Storage {
        bucket: String,
        key: String,
        #[source]
        source: CloudIOError,
    },

    /// Fetched bytes could not be parsed as `format`.
    #[error("Error reading {format} file: {source:#}")]
    Decode {
        format: Format,
        #[source]
        source: anyhow::Error,
    },

    /// The table could not be serialized as `format`.
    #[error("Error writing {format} to bytes: {source:#}")]
    Encode {
        format: Format,
        #[source]
        source: anyhow::Error,
    },

    /// Output format outside the supported set (or compiled out).
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Anything not covered above.
    #[error("Error processing file: {0}")]
    Processing(String),
}

/// Fieldless tag for [`ObfuscateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    NotFound,
    Storage,
    Decode,
    Encode,
    UnsupportedFormat,
    Processing,
}

impl ObfuscateError {
    /// Shorthand for [`ObfuscateError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) => ErrorCategory::InvalidInput,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::Encode { .. } => ErrorCategory::Encode,
            Self::UnsupportedFormat(_) => ErrorCategory::UnsupportedFormat,
            Self::Processing(_) => ErrorCategory::Processing,
        }
    }
}

impl From<anyhow::Error> for ObfuscateError {
    fn from(err: anyhow::Error) -> Self {
        Self::Processing(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, ObfuscateError>;
