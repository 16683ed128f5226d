// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types for store operations.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::column::ColumnType;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening, querying or mapping a store.
///
/// Everything except [`Error::Storage`] is a configuration error: a mistake
/// in how the store or a model was set up, which retrying will not fix.
/// Storage failures are expected outcomes (constraint violations, updates
/// matching nothing) that the manager has already rolled back and logged.
#[derive(Error, Debug)]
pub enum Error {
    /// CRUD or close called while no handle is open
    #[error("Database not opened")]
    NotOpen,

    /// Unknown open mode flag
    #[error("Invalid open mode: {0}")]
    InvalidOpenMode(String),

    /// Store version below 1
    #[error("Invalid store version {0}: must be at least 1")]
    InvalidVersion(u32),

    /// Unusable date-time pattern
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to close the open handle
    #[error("Failed to close database at '{path}': {source}")]
    DatabaseClose {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A column has no setter or field in the model's binding table
    #[error("No attribute '{attribute}' bound for column '{column}'")]
    NoSuchAttribute { column: String, attribute: String },

    /// A model declares a column the result set does not carry
    #[error("Column '{0}' not present in result set")]
    ColumnNotFound(String),

    /// Stored value does not match the declared semantic type
    #[error("Cannot decode column '{column}' as {expected}: found {found}")]
    Decode {
        column: String,
        expected: ColumnType,
        found: &'static str,
    },

    /// Decoded value does not fit the bound attribute's Rust type
    #[error("Attribute '{attribute}' cannot hold {found} decoded from column '{column}'")]
    AttributeType {
        column: String,
        attribute: String,
        found: &'static str,
    },

    /// Failed to read a configuration file
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file
    #[error("Failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A storage operation failed and was rolled back
    #[error(transparent)]
    Storage(#[from] StorageFailure),
}

impl Error {
    /// Whether this is a recoverable storage failure rather than a
    /// configuration error.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Reason code of a storage failure.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Storage(failure) => Some(failure.reason),
            _ => None,
        }
    }
}

/// Operation that produced a [`StorageFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Select => "Selection",
            Self::Insert => "Insertion",
            Self::Update => "Update",
            Self::Delete => "Deletion",
        })
    }
}

/// Why a storage operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Integrity constraint violated (unique, not null, foreign key, check)
    Constraint,
    /// `force_update` was set and no row matched
    NothingUpdated,
    /// Statement could not be prepared or executed as a query
    QueryConstruction,
    /// Write attempted on a read-only handle
    ReadOnly,
    /// Any other engine failure
    Other,
}

/// A storage failure translated from the engine error at the manager
/// boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed ({reason:?}): {message}")]
pub struct StorageFailure {
    pub operation: Operation,
    pub reason: FailureReason,
    pub message: String,
}

impl StorageFailure {
    pub(crate) fn new(operation: Operation, reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            operation,
            reason,
            message: message.into(),
        }
    }

    /// Classify an engine error raised during `operation`.
    pub(crate) fn from_sqlite(operation: Operation, err: &rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        let reason = match (err.sqlite_error_code(), err) {
            (Some(ErrorCode::ConstraintViolation), _) => FailureReason::Constraint,
            (Some(ErrorCode::ReadOnly), _) => FailureReason::ReadOnly,
            // Plain SQLITE_ERROR: syntax errors, unknown tables or columns.
            // Prepare-time syntax errors carry no error code.
            (Some(ErrorCode::Unknown), _)
            | (_, rusqlite::Error::SqlInputError { .. })
            | (_, rusqlite::Error::InvalidParameterCount(..)) => FailureReason::QueryConstruction,
            _ if operation == Operation::Select => FailureReason::QueryConstruction,
            _ => FailureReason::Other,
        };
        Self::new(operation, reason, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rusqlite::Connection;

    use super::*;

    fn engine_error(sql: &str) -> rusqlite::Error {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
             INSERT INTO users (id, name) VALUES (1, 'Ann');",
        )
        .unwrap();
        conn.execute(sql, []).unwrap_err()
    }

    #[rstest]
    #[case(Operation::Insert, "INSERT INTO users (name) VALUES (", FailureReason::QueryConstruction)]
    #[case(Operation::Insert, "INSERT INTO missing (name) VALUES ('x')", FailureReason::QueryConstruction)]
    #[case(Operation::Insert, "INSERT INTO users (name) VALUES ('Ann')", FailureReason::Constraint)]
    #[case(Operation::Insert, "INSERT INTO users (name) VALUES (NULL)", FailureReason::Constraint)]
    #[case(Operation::Update, "UPDATE users SET name = = 'x'", FailureReason::QueryConstruction)]
    #[case(Operation::Update, "UPDATE users SET nickname = 'x'", FailureReason::QueryConstruction)]
    #[case(Operation::Delete, "DELETE FROM users WHERE id = = 1", FailureReason::QueryConstruction)]
    #[case(Operation::Select, "SELECT FROM", FailureReason::QueryConstruction)]
    fn classify_engine_errors(
        #[case] operation: Operation,
        #[case] sql: &str,
        #[case] expected: FailureReason,
    ) {
        let failure = StorageFailure::from_sqlite(operation, &engine_error(sql));
        assert_eq!(failure.operation, operation);
        assert_eq!(failure.reason, expected);
    }

    #[test]
    fn test_failure_reason_classification() {
        let err = Error::from(StorageFailure::new(
            Operation::Update,
            FailureReason::NothingUpdated,
            "Nothing updated",
        ));
        assert!(err.is_storage_failure());
        assert_eq!(err.failure_reason(), Some(FailureReason::NothingUpdated));
        assert_eq!(
            err.to_string(),
            "Update failed (NothingUpdated): Nothing updated"
        );

        assert!(!Error::NotOpen.is_storage_failure());
        assert_eq!(Error::NotOpen.failure_reason(), None);
    }
}
