//! SQLite implementation of [`ProgramStore`].
//!
//! [`SqliteStore`] persists program records in a SQLite database with WAL
//! mode, automatic schema migrations, and a scoped transaction around every
//! multi-row write. Cell IDs are stored as the i64 twos-complement of the
//! u64 cell ID; a covering range never crosses the signed boundary (both
//! endpoints always lie on the same cube face), so numeric BETWEEN queries
//! order correctly.

use rusqlite::{params, Connection, OptionalExtension};

use geonear_core::{CellId, CellRange};

use crate::error::StorageError;
use crate::traits::ProgramStore;
use crate::types::{NewProgram, ProgramId, ProgramRecord, ProgramType, TypeId};

/// SQLite-backed implementation of [`ProgramStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Verifies a program exists, returning an error if not.
    fn assert_program_exists(&self, id: ProgramId) -> Result<(), StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM programs WHERE id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::ProgramNotFound(id.0));
        }
        Ok(())
    }

    fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }

    fn row_to_program(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProgramRecord> {
        let cell_id: i64 = row.get(5)?;
        Ok(ProgramRecord {
            id: ProgramId(row.get(0)?),
            name: row.get(1)?,
            address: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
            cell_id: CellId(cell_id as u64),
        })
    }

    fn row_to_type(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProgramType> {
        Ok(ProgramType {
            type_id: TypeId(row.get(0)?),
            type_name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl ProgramStore for SqliteStore {
    fn save_program(
        &mut self,
        new: &NewProgram,
        type_ids: &[TypeId],
    ) -> Result<ProgramRecord, StorageError> {
        // One scoped transaction spans the program row and every association
        // row; dropping the transaction on any error path rolls back.
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO programs (name, address, latitude, longitude, cell_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.name,
                new.address,
                new.latitude,
                new.longitude,
                new.cell_id.0 as i64
            ],
        );
        if let Err(err) = inserted {
            if Self::is_unique_violation(&err) {
                return Err(StorageError::DuplicateProgram {
                    name: new.name.clone(),
                    address: new.address.clone(),
                });
            }
            return Err(err.into());
        }
        let program_id = tx.last_insert_rowid();

        for type_id in type_ids {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM program_types WHERE type_id = ?1)",
                params![type_id.0],
                |row| row.get(0),
            )?;
            if !exists {
                // Unresolved type IDs are skipped, not an error.
                continue;
            }
            // OR IGNORE: the same type listed twice links once.
            tx.execute(
                "INSERT OR IGNORE INTO program_type_refs (program_id, type_id) VALUES (?1, ?2)",
                params![program_id, type_id.0],
            )?;
        }

        tx.commit()?;

        Ok(ProgramRecord {
            id: ProgramId(program_id),
            name: new.name.clone(),
            address: new.address.clone(),
            latitude: new.latitude,
            longitude: new.longitude,
            cell_id: new.cell_id,
        })
    }

    fn get_program(&self, id: ProgramId) -> Result<ProgramRecord, StorageError> {
        self.conn
            .query_row(
                "SELECT id, name, address, latitude, longitude, cell_id
                 FROM programs WHERE id = ?1",
                params![id.0],
                Self::row_to_program,
            )
            .optional()?
            .ok_or(StorageError::ProgramNotFound(id.0))
    }

    fn find_in_range(
        &self,
        range: CellRange,
        type_filter: Option<TypeId>,
    ) -> Result<Vec<ProgramRecord>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, address, latitude, longitude, cell_id
             FROM programs
             WHERE cell_id BETWEEN ?1 AND ?2
               AND (?3 IS NULL OR EXISTS (
                    SELECT 1 FROM program_type_refs r
                    WHERE r.program_id = programs.id AND r.type_id = ?3))",
        )?;
        let rows = stmt.query_map(
            params![
                range.start.0 as i64,
                range.end.0 as i64,
                type_filter.map(|t| t.0)
            ],
            Self::row_to_program,
        )?;
        let mut programs = Vec::new();
        for row in rows {
            programs.push(row?);
        }
        Ok(programs)
    }

    fn types_of(&self, program: ProgramId) -> Result<Vec<ProgramType>, StorageError> {
        self.assert_program_exists(program)?;
        let mut stmt = self.conn.prepare_cached(
            "SELECT t.type_id, t.type_name, t.created_at
             FROM program_types t
             JOIN program_type_refs r ON r.type_id = t.type_id
             WHERE r.program_id = ?1",
        )?;
        let rows = stmt.query_map(params![program.0], Self::row_to_type)?;
        let mut types = Vec::new();
        for row in rows {
            types.push(row?);
        }
        Ok(types)
    }

    fn all_types(&self) -> Result<Vec<ProgramType>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT type_id, type_name, created_at FROM program_types ORDER BY type_id",
        )?;
        let rows = stmt.query_map([], Self::row_to_type)?;
        let mut types = Vec::new();
        for row in rows {
            types.push(row?);
        }
        Ok(types)
    }

    fn get_type(&self, id: TypeId) -> Result<Option<ProgramType>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT type_id, type_name, created_at FROM program_types WHERE type_id = ?1",
                params![id.0],
                Self::row_to_type,
            )
            .optional()?)
    }

    fn create_type(&mut self, name: &str) -> Result<ProgramType, StorageError> {
        let inserted = self.conn.execute(
            "INSERT INTO program_types (type_name) VALUES (?1)",
            params![name],
        );
        if let Err(err) = inserted {
            if Self::is_unique_violation(&err) {
                return Err(StorageError::DuplicateType {
                    name: name.to_string(),
                });
            }
            return Err(err.into());
        }
        let type_id = self.conn.last_insert_rowid();
        self.get_type(TypeId(type_id))?
            .ok_or(StorageError::TypeNotFound(type_id))
    }
}
