//! Errors raised while opening or querying the `trees` database
//!
//! Foreign key violations and busy timeouts surface as [`DatabaseError::Statement`]
//! with the failing statement named in `context`. Missing rows are not errors
//! at this layer; callers receive `None`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// libsql could not open the database file
    #[error("Failed to open tree database at {path}: {source}")]
    Open {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Creating the `trees` table or its index failed
    #[error("Failed to prepare trees schema: {0}")]
    Schema(String),

    /// The database directory exists but cannot be written
    #[error("Permission denied for tree database path: {path}")]
    PermissionDenied { path: PathBuf },

    /// The directory holding the database file could not be created
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Connection-level libsql failure
    #[error("libsql error: {0}")]
    Libsql(#[from] libsql::Error),

    /// A statement against `trees` failed
    #[error("Tree statement failed: {context}")]
    Statement { context: String },
}

impl DatabaseError {
    pub fn open(path: PathBuf, source: libsql::Error) -> Self {
        Self::Open { path, source }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    pub fn create_directory(path: PathBuf, source: std::io::Error) -> Self {
        Self::CreateDirectory { path, source }
    }

    pub fn statement(context: impl Into<String>) -> Self {
        Self::Statement {
            context: context.into(),
        }
    }
}
