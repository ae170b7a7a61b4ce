//! Program search and creation request/response types.

use serde::{Deserialize, Serialize};

use geonear_core::CellId;
use geonear_storage::{ProgramRecord, ProgramType};

/// Query parameters for `GET /api/programs/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Free-text address to search around.
    pub address: String,
    /// Search radius in miles.
    pub radius_miles: f64,
    /// Optional category restriction.
    pub type_id: Option<i64>,
}

/// Request body for `POST /api/programs/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddProgramRequest {
    pub name: String,
    pub address: String,
    /// Category IDs to associate. Unresolved IDs are skipped.
    #[serde(default)]
    pub type_ids: Vec<i64>,
}

/// Request body for `POST /api/programs/types`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTypeRequest {
    pub type_name: String,
}

/// A search hit: a program with its category names attached.
///
/// The order of `types` reflects retrieval order and is not guaranteed
/// stable across calls.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramResponse {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub types: Vec<String>,
}

/// A persisted program as returned by the add operation. Type resolution is
/// a read-side concern, so no type names here.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramView {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cell_id: CellId,
}

impl From<ProgramRecord> for ProgramView {
    fn from(record: ProgramRecord) -> Self {
        ProgramView {
            id: record.id.0,
            name: record.name,
            address: record.address,
            latitude: record.latitude,
            longitude: record.longitude,
            cell_id: record.cell_id,
        }
    }
}

/// A program category.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramTypeView {
    pub type_id: i64,
    pub type_name: String,
    pub created_at: i64,
}

impl From<ProgramType> for ProgramTypeView {
    fn from(ty: ProgramType) -> Self {
        ProgramTypeView {
            type_id: ty.type_id.0,
            type_name: ty.type_name,
            created_at: ty.created_at,
        }
    }
}
