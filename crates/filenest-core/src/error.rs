//! Error types shared by every FileNest crate.
//!
//! Infrastructure failures from sqlx, std::io and friends are converted
//! into [`AppError`] at the crate boundary and travel via `?` from there. Domain outcomes that are part of the
//! namespace contract (conflicts, missing endpoints, restore preconditions)
//! are carried as dedicated [`ErrorKind`] variants so callers can branch on
//! them without string matching.

use std::fmt;
use thiserror::Error;

/// Classifies every error FileNest can surface.
///
/// The namespace-domain variants form a closed result set: every expected
/// failure mode of a tree mutation maps to exactly one of them. The
/// remaining variants classify infrastructure faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The supplied path fails the basic path-syntax check.
    InvalidFolderPath,
    /// A folder already occupies the target path (RaiseConflict policy).
    FolderAlreadyExists,
    /// A file already occupies the target name (RaiseConflict policy).
    FileAlreadyExists,
    /// The folder endpoint does not resolve.
    FolderNotFound,
    /// The file endpoint does not resolve.
    FileNotFound,
    /// A move/copy would place a folder inside its own subtree.
    TargetIsChildOfSource,
    /// Restore was requested on a folder that is not soft-deleted.
    FolderIsNotDeleted,
    /// Restore was requested on a file that is not soft-deleted.
    FileIsNotDeleted,
    /// The backing blob is missing for an otherwise valid version.
    FileStoreNotFound,
    /// A mutation other than restore was attempted on a soft-deleted item.
    CannotModifyDeletedItems,
    /// Input validation failed (empty names, embedded separators, etc.).
    Validation,
    /// The metadata store rejected or failed a query.
    Database,
    /// The blob store hit an I/O fault.
    Storage,
    /// Settings could not be loaded or were inconsistent.
    Configuration,
    /// Encoding or decoding structured data failed.
    Serialization,
    /// Anything that does not fit the kinds above.
    GeneralFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFolderPath => write!(f, "INVALID_FOLDER_PATH"),
            Self::FolderAlreadyExists => write!(f, "FOLDER_ALREADY_EXISTS"),
            Self::FileAlreadyExists => write!(f, "FILE_ALREADY_EXISTS"),
            Self::FolderNotFound => write!(f, "FOLDER_NOT_FOUND"),
            Self::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            Self::TargetIsChildOfSource => write!(f, "TARGET_IS_CHILD_OF_SOURCE"),
            Self::FolderIsNotDeleted => write!(f, "FOLDER_IS_NOT_DELETED"),
            Self::FileIsNotDeleted => write!(f, "FILE_IS_NOT_DELETED"),
            Self::FileStoreNotFound => write!(f, "FILE_STORE_NOT_FOUND"),
            Self::CannotModifyDeletedItems => write!(f, "CANNOT_MODIFY_DELETED_ITEMS"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::GeneralFailure => write!(f, "GENERAL_FAILURE"),
        }
    }
}

/// The error type carried by [`AppResult`](crate::result::AppResult).
///
/// Pairs an [`ErrorKind`] with a human-readable message and, for
/// infrastructure faults, the underlying cause. Callers branch on `kind`;
/// `message` and `source` are for logs.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it as the `source` chain.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    // Shorthand constructors, one per kind.

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFolderPath, message)
    }

    pub fn folder_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FolderAlreadyExists, message)
    }

    pub fn file_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileAlreadyExists, message)
    }

    pub fn folder_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FolderNotFound, message)
    }

    pub fn file_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileNotFound, message)
    }

    pub fn target_is_child(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TargetIsChildOfSource, message)
    }

    pub fn folder_not_deleted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FolderIsNotDeleted, message)
    }

    pub fn file_not_deleted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileIsNotDeleted, message)
    }

    pub fn blob_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileStoreNotFound, message)
    }

    pub fn deleted_item(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CannotModifyDeletedItems, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralFailure, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
