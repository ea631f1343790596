//! Error types for SQLite migration operations.
//!
//! Provides a unified error type covering schema conflicts, permission and
//! connection failures, and general database errors. SQLite result codes
//! are classified into the taxonomy in the `From<rusqlite::Error>` impl so
//! callers can match on intent rather than on raw result codes.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur while applying or inspecting a change set.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// An existing column shares a declared name but has an incompatible type.
    #[error(
        "schema conflict on column '{column}': expected {expected} affinity, found {found}"
    )]
    SchemaConflict {
        /// The conflicting column name.
        column: String,
        /// Type affinity the change set expects.
        expected: String,
        /// Type affinity of the existing column.
        found: String,
    },

    /// The invoking principal lacks the privileges to modify the schema.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The database could not be reached or opened.
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// The target table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The change set failed structural validation before any SQL ran.
    #[error("invalid change set: {0}")]
    InvalidChangeSet(String),

    /// Any other SQLite failure, surfaced unmodified.
    #[error("database error: {0}")]
    DatabaseError(rusqlite::Error),
}

impl From<rusqlite::Error> for MigrateError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &err {
            let detail = message.clone().unwrap_or_else(|| code.to_string());
            match code.code {
                ErrorCode::ReadOnly
                | ErrorCode::PermissionDenied
                | ErrorCode::AuthorizationForStatementDenied => {
                    return MigrateError::PermissionDenied(detail);
                }
                ErrorCode::CannotOpen | ErrorCode::NotADatabase => {
                    return MigrateError::ConnectionError(detail);
                }
                _ => {}
            }
        }
        MigrateError::DatabaseError(err)
    }
}

/// Convenience alias for results with [`MigrateError`].
pub type Result<T> = std::result::Result<T, MigrateError>;
