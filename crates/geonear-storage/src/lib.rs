//! Storage abstraction for geonear program records.
//!
//! Provides the [`ProgramStore`] trait defining the storage contract that all
//! backends implement, plus [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Architecture
//!
//! Program records are keyed by a storage-level spatial cell ID, so the one
//! non-CRUD query is an ordered range scan over `cell_id` (optionally
//! restricted by category). Writes that touch multiple rows -- a program plus
//! its type associations -- are atomic within the backend.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: ProgramId, TypeId and the stored record types
//! - [`traits`]: ProgramStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL schema constants and migration setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ProgramStore;
pub use types::{NewProgram, ProgramId, ProgramRecord, ProgramType, TypeId};
