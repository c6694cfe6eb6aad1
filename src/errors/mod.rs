//! Error handling utilities for the moodjournal application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! The service layer in [`crate::ops`] is the error boundary. Storage errors
//! are logged there and either propagated (writes) or degraded to a neutral
//! value (dashboard aggregates). Validation failures always surface as
//! [`AppError::Validation`] so callers can tell a rejected write apart from an
//! empty read.

use std::io;
use thiserror::Error;

/// Represents specific error cases that can occur when interacting with external editors.
///
/// # Examples
///
/// ```
/// use moodjournal::errors::EditorError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "command not found");
/// let error = EditorError::CommandNotFound {
///     command: "vim".to_string(),
///     source: io_error,
/// };
///
/// assert!(format!("{}", error).contains("not found"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// Error when the specified editor command cannot be found.
    #[error("Editor command '{command}' not found: {source}. Please check that the editor is installed and available in your PATH.")]
    CommandNotFound {
        /// The editor command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor command fails to execute due to other I/O errors.
    #[error("Failed to execute editor '{command}': {source}")]
    ExecutionFailed {
        /// The editor command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor exits with a non-zero status code.
    #[error("Editor '{command}' exited with non-zero status code: {status_code}. The entry was not saved.")]
    NonZeroExit {
        /// The editor command that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },
}

/// Input rejected by a service before anything was written.
///
/// # Examples
///
/// ```
/// use moodjournal::errors::ValidationError;
///
/// let error = ValidationError::DuplicateDate("2024-01-15".to_string());
/// assert!(format!("{}", error).contains("2024-01-15"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Primary mood was blank.
    #[error("Primary mood is required")]
    MissingMood,

    /// Mood key is not one of the canonical moods.
    #[error("Invalid mood '{0}'")]
    InvalidMood(String),

    /// Entry content was blank.
    #[error("Entry content is required")]
    EmptyContent,

    /// An entry already exists for this calendar date.
    #[error("An entry already exists for {0}")]
    DuplicateDate(String),

    /// Entry date is not a valid `YYYY-MM-DD` date.
    #[error("Invalid entry date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Title exceeds the maximum length.
    #[error("Title must be at most 100 characters")]
    TitleTooLong,

    /// More than two secondary moods were supplied.
    #[error("At most 2 secondary moods are allowed")]
    TooManySecondaryMoods,

    /// PIN or password failed the length rules.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Credential type is neither "pin" nor "password".
    #[error("Invalid credential type '{0}', expected 'pin' or 'password'")]
    InvalidCredentialType(String),

    /// Avatar gender is neither "male" nor "female".
    #[error("Invalid gender '{0}', expected 'male' or 'female'")]
    InvalidGender(String),

    /// Tag name was empty after normalization.
    #[error("Tag name cannot be empty")]
    EmptyTagName,

    /// Tag name exceeds the maximum length.
    #[error("Tag name must be at most 50 characters")]
    TagNameTooLong,

    /// Profile name was blank.
    #[error("Profile name cannot be empty")]
    EmptyProfileName,
}

/// Represents specific error cases that can occur during credential hashing.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The OS random number generator could not produce a salt.
    #[error("Failed to generate credential salt: {0}")]
    SaltGeneration(#[source] rand::Error),

    /// A stored hash or salt was not valid base64.
    #[error("Stored credential is corrupt: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use moodjournal::errors::DatabaseError;
///
/// let error = DatabaseError::Custom("schema version mismatch".to_string());
/// assert!(format!("{}", error).contains("schema version mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other moodjournal instances.")]
    Pool(#[from] r2d2::Error),

    /// Custom database error with detailed message.
    #[error("Database error: {0}")]
    Custom(String),
}

/// Represents all possible errors that can occur in the moodjournal application.
///
/// # Examples
///
/// ```
/// use moodjournal::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any write took place.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A record the caller explicitly asked for does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Errors when interacting with the text editor.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Errors related to credential hashing.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Errors related to database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(DatabaseError::Sqlite(e))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Database(DatabaseError::Pool(e))
    }
}

impl AppError {
    /// Returns the validation failure, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            AppError::Validation(v) => Some(v),
            _ => None,
        }
    }

    /// True for storage-level failures (SQLite or pool), as opposed to
    /// rejected input.
    pub fn is_storage(&self) -> bool {
        matches!(self, AppError::Database(_))
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use moodjournal::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::NotFound("entry 7".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
