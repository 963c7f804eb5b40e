//! Error types for the notedump-core library.
//!
//! This module provides comprehensive error handling using the `thiserror` crate,
//! with detailed error variants for different failure modes.
//!
//! Note that the text extraction pipeline itself has no error channel: noisy or
//! unparseable note data degrades to an empty string by design. The variants
//! here cover the hard boundaries around it — the database, the filesystem,
//! and export serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for notedump operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all notedump operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to open the notes database
    #[error("failed to open notes database '{path}': {source}")]
    DatabaseOpen {
        /// Path to the database that failed to open
        path: PathBuf,
        /// Underlying SQLite error
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed
    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// The requested note does not exist
    #[error("note {id} not found")]
    NoteNotFound {
        /// The note identifier that was looked up
        id: i64,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize notes for export
    #[error("failed to serialize export: {0}")]
    ExportSerialize(#[from] serde_json::Error),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a new database open error
    pub fn database_open(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        Self::DatabaseOpen {
            path: path.into(),
            source,
        }
    }

    /// Creates a new note-not-found error
    pub fn note_not_found(id: i64) -> Self {
        Self::NoteNotFound { id }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this error means a looked-up record was absent,
    /// as opposed to the database itself misbehaving
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoteNotFound { .. })
    }
}
