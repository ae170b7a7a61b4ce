//! Storage-layer types for program identity and records.
//!
//! [`ProgramId`] and [`TypeId`] are defined here (not in geonear-core)
//! because record identity is a storage concern -- programs and types only
//! gain an ID when persisted. The inner `i64` aligns with SQLite's
//! `INTEGER PRIMARY KEY`.

use std::fmt;

use serde::{Deserialize, Serialize};

use geonear_core::CellId;

/// Unique identifier for a stored program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(pub i64);

/// Unique identifier for a program type (category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(pub i64);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A program to be persisted. The cell ID is derived from the coordinates
/// once, at creation time, and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgram {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cell_id: CellId,
}

/// A persisted program record. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub id: ProgramId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cell_id: CellId,
}

/// A program category. Reference data, created administratively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramType {
    pub type_id: TypeId,
    pub type_name: String,
    /// Unix timestamp (seconds) of creation.
    pub created_at: i64,
}
