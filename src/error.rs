//! Error types for the canvas, content registry, persistence and settings.
//!
//! Most failures inside the core are recoverable and only logged (a skipped
//! layout record, a failed monitor scan). These types exist for the calls that
//! do hand an error back to the host.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the content registry or by a content provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    /// No factory is registered under this content-type id
    #[error("unknown content type: {0}")]
    UnknownType(String),

    /// A second registration tried to reuse an id
    #[error("content type already registered: {0}")]
    DuplicateType(String),

    /// The provider refused a saved or fresh config map
    #[error("config rejected by {content_type}: {reason}")]
    ConfigRejected {
        content_type: String,
        reason: String,
    },
}

impl ContentError {
    pub fn rejected(content_type: impl Into<String>, reason: impl Into<String>) -> Self {
        ContentError::ConfigRejected {
            content_type: content_type.into(),
            reason: reason.into(),
        }
    }
}

/// Why a single layout record was skipped during load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Another record earlier in the layout already used this id
    #[error("duplicate item id: {0}")]
    DuplicateId(Uuid),

    /// The record itself did not decode (wrong field type, bad id, ...)
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Errors from loading or saving persisted layout state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Atomic rename of the temp file failed
    #[error("failed to persist file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// The platform has no per-user config directory
    #[error("no config directory available")]
    NoConfigDir,
}

/// Error from loading or parsing the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Monitor enumeration failed on the platform side.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("monitor enumeration failed: {0}")]
pub struct MonitorError(pub String);

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;
