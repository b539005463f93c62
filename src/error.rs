//! Error types for account-file operations

use crate::core::record::TableKind;
use std::path::PathBuf;
use thiserror::Error;

/// Account operation result type
pub type Result<T> = std::result::Result<T, AccountError>;

/// Operation-level errors
///
/// Problems with a single decoded line never show up here; they are kept on
/// the record itself as [`RecordError`](crate::RecordError) values.
#[derive(Error, Debug)]
pub enum AccountError {
    /// A record failed encode-side validation
    #[error("attempting to save invalid entry: {0}")]
    InvalidEntry(String),

    /// A lookup or removal was attempted with an empty key
    #[error("must provide {0} to be removed")]
    EmptyKey(&'static str),

    /// The requested record or member does not exist
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// The exclusive lock on the target file could not be acquired
    #[error("failed to lock {} for writing: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload could not be written while holding the lock
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generating a password hash failed
    #[error("error generating password: {0}")]
    PasswordHash(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configured table file could not be listed
    #[error("failed to list {} ({table}): {source}", path.display())]
    ListFailed {
        table: TableKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AccountError {
    pub(crate) fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        AccountError::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// True for [`AccountError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, AccountError::NotFound { .. })
    }
}
