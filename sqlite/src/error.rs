//! Error types for directory storage operations.
//!
//! Provides a unified error type covering database access, connection,
//! validation, and lifecycle failures. Rows that a statement did not affect
//! are not errors; those surface as `bool` or
//! [`WriteOutcome`](crate::WriteOutcome) values.

use std::path::PathBuf;

use directory_core::{FieldError, PhoneError};
use thiserror::Error;

/// Errors that can occur during directory storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite statement failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// The database could not be opened.
    #[error("cannot open database '{}': {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Phone input failed validation.
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),

    /// Field name is not a directly updatable contact column.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// No contact row with the given id exists.
    #[error("contact {0} not found")]
    ContactNotFound(i64),

    /// A mutator was called on a contact that has been removed.
    #[error("contact does not exist (it was removed)")]
    ContactDeleted,

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// Schema creation or removal failed.
    #[error("migration error: {0}")]
    MigrationError(String),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
