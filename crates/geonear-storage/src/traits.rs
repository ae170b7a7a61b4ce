//! The [`ProgramStore`] trait defining the storage contract for program
//! records and their category associations.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait, ensuring
//! they are fully swappable without changing orchestration logic. The trait
//! is synchronous (not async): callers that live in an async context hold the
//! store behind an async-aware lock instead.

use geonear_core::CellRange;

use crate::error::StorageError;
use crate::types::{NewProgram, ProgramId, ProgramRecord, ProgramType, TypeId};

/// The storage contract for program records.
pub trait ProgramStore {
    // -------------------------------------------------------------------
    // Program operations
    // -------------------------------------------------------------------

    /// Persists a new program together with its type associations.
    ///
    /// Atomic: the program row and every association row become visible
    /// together, or not at all. Type IDs that do not resolve to an existing
    /// program type are silently skipped -- associations are best-effort by
    /// policy, the program itself is not.
    ///
    /// Fails with [`StorageError::DuplicateProgram`] when a program with the
    /// same (name, address) already exists.
    fn save_program(
        &mut self,
        new: &NewProgram,
        type_ids: &[TypeId],
    ) -> Result<ProgramRecord, StorageError>;

    /// Retrieves a program by ID.
    fn get_program(&self, id: ProgramId) -> Result<ProgramRecord, StorageError>;

    /// Returns all programs whose cell ID falls within `range`, endpoints
    /// inclusive, optionally restricted to programs associated with
    /// `type_filter`.
    ///
    /// Never returns duplicates for a single range. No ordering guarantee;
    /// callers deduplicate across multiple ranges themselves.
    fn find_in_range(
        &self,
        range: CellRange,
        type_filter: Option<TypeId>,
    ) -> Result<Vec<ProgramRecord>, StorageError>;

    // -------------------------------------------------------------------
    // Type operations
    // -------------------------------------------------------------------

    /// Returns the types associated with a program, unordered.
    fn types_of(&self, program: ProgramId) -> Result<Vec<ProgramType>, StorageError>;

    /// Returns every registered type, ordered by type ID ascending.
    fn all_types(&self) -> Result<Vec<ProgramType>, StorageError>;

    /// Looks up a type by ID.
    fn get_type(&self, id: TypeId) -> Result<Option<ProgramType>, StorageError>;

    /// Registers a new program type (administrative).
    ///
    /// Fails with [`StorageError::DuplicateType`] when the name is taken.
    fn create_type(&mut self, name: &str) -> Result<ProgramType, StorageError>;
}
