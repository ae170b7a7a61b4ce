//! Storage error types for geonear-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage
//! layer: SQLite failures, migration failures, entity-not-found variants,
//! and uniqueness conflicts.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An underlying SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A program with the given ID was not found.
    #[error("program not found: {0}")]
    ProgramNotFound(i64),

    /// A program type with the given ID was not found.
    #[error("program type not found: {0}")]
    TypeNotFound(i64),

    /// A program with the same name and address already exists.
    #[error("duplicate program: '{name}' at '{address}'")]
    DuplicateProgram { name: String, address: String },

    /// A program type with the same name already exists.
    #[error("duplicate program type: '{name}'")]
    DuplicateType { name: String },
}
