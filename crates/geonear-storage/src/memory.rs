//! In-memory implementation of [`ProgramStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, seeding scripts,
//! and anywhere persistence isn't needed. Semantics are identical to the
//! SQLite backend: (name, address) uniqueness, unique associations with
//! unknown type IDs skipped, inclusive range scans. Insertion-ordered maps
//! keep iteration deterministic.

use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;

use geonear_core::CellRange;

use crate::error::StorageError;
use crate::traits::ProgramStore;
use crate::types::{NewProgram, ProgramId, ProgramRecord, ProgramType, TypeId};

/// In-memory backend with SQLite-equivalent semantics.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    programs: IndexMap<i64, ProgramRecord>,
    types: IndexMap<i64, ProgramType>,
    /// Unique (program_id, type_id) association pairs.
    refs: Vec<(i64, i64)>,
    next_program_id: i64,
    next_type_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl ProgramStore for InMemoryStore {
    fn save_program(
        &mut self,
        new: &NewProgram,
        type_ids: &[TypeId],
    ) -> Result<ProgramRecord, StorageError> {
        // Validate before mutating so a failed save leaves no partial state,
        // mirroring the SQLite transaction.
        if self
            .programs
            .values()
            .any(|p| p.name == new.name && p.address == new.address)
        {
            return Err(StorageError::DuplicateProgram {
                name: new.name.clone(),
                address: new.address.clone(),
            });
        }

        self.next_program_id += 1;
        let id = self.next_program_id;
        let record = ProgramRecord {
            id: ProgramId(id),
            name: new.name.clone(),
            address: new.address.clone(),
            latitude: new.latitude,
            longitude: new.longitude,
            cell_id: new.cell_id,
        };
        self.programs.insert(id, record.clone());

        for type_id in type_ids {
            if !self.types.contains_key(&type_id.0) {
                // Unresolved type IDs are skipped, not an error.
                continue;
            }
            if !self.refs.contains(&(id, type_id.0)) {
                self.refs.push((id, type_id.0));
            }
        }

        Ok(record)
    }

    fn get_program(&self, id: ProgramId) -> Result<ProgramRecord, StorageError> {
        self.programs
            .get(&id.0)
            .cloned()
            .ok_or(StorageError::ProgramNotFound(id.0))
    }

    fn find_in_range(
        &self,
        range: CellRange,
        type_filter: Option<TypeId>,
    ) -> Result<Vec<ProgramRecord>, StorageError> {
        Ok(self
            .programs
            .values()
            .filter(|p| range.contains(p.cell_id))
            .filter(|p| match type_filter {
                Some(t) => self.refs.contains(&(p.id.0, t.0)),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn types_of(&self, program: ProgramId) -> Result<Vec<ProgramType>, StorageError> {
        if !self.programs.contains_key(&program.0) {
            return Err(StorageError::ProgramNotFound(program.0));
        }
        Ok(self
            .refs
            .iter()
            .filter(|(p, _)| *p == program.0)
            .filter_map(|(_, t)| self.types.get(t).cloned())
            .collect())
    }

    fn all_types(&self) -> Result<Vec<ProgramType>, StorageError> {
        let mut types: Vec<ProgramType> = self.types.values().cloned().collect();
        types.sort_by_key(|t| t.type_id.0);
        Ok(types)
    }

    fn get_type(&self, id: TypeId) -> Result<Option<ProgramType>, StorageError> {
        Ok(self.types.get(&id.0).cloned())
    }

    fn create_type(&mut self, name: &str) -> Result<ProgramType, StorageError> {
        if self.types.values().any(|t| t.type_name == name) {
            return Err(StorageError::DuplicateType {
                name: name.to_string(),
            });
        }
        self.next_type_id += 1;
        let ty = ProgramType {
            type_id: TypeId(self.next_type_id),
            type_name: name.to_string(),
            created_at: now_unix(),
        };
        self.types.insert(ty.type_id.0, ty.clone());
        Ok(ty)
    }
}
