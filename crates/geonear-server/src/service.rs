//! ProgramService: the single coordinator between HTTP handlers and the
//! geometry/storage/geocoding collaborators.
//!
//! All business logic flows through [`ProgramService`]. Handlers are thin
//! wrappers that delegate to these methods.
//!
//! Every operation is request-scoped: no mutable state is shared between
//! calls beyond the store itself. The multi-row write in [`add_program`]
//! is atomic inside the store; [`search`] is read-only and needs no
//! transaction scope.
//!
//! [`add_program`]: ProgramService::add_program
//! [`search`]: ProgramService::search

use std::collections::HashSet;

use geonear_core::{covering_ranges, CellId, CellRange, CoveringConfig};
use geonear_storage::{NewProgram, ProgramStore, SqliteStore, TypeId};

use crate::error::ApiError;
use crate::geocoder::Geocoder;
use crate::schema::programs::{
    AddProgramRequest, ProgramResponse, ProgramTypeView, ProgramView,
};

/// The central service coordinating geocoding, cell coverings, and the
/// program store.
pub struct ProgramService {
    store: SqliteStore,
    geocoder: Geocoder,
    covering: CoveringConfig,
}

impl ProgramService {
    /// Creates a new ProgramService, opening a SQLite database at `db_path`.
    pub fn new(db_path: &str, geocoder: Geocoder) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)
            .map_err(|e| ApiError::InternalError(format!("failed to open store: {}", e)))?;
        Ok(ProgramService {
            store,
            geocoder,
            covering: CoveringConfig::default(),
        })
    }

    /// Creates a new ProgramService with an in-memory database (for testing).
    pub fn in_memory(geocoder: Geocoder) -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()
            .map_err(|e| ApiError::InternalError(format!("failed to open store: {}", e)))?;
        Ok(ProgramService {
            store,
            geocoder,
            covering: CoveringConfig::default(),
        })
    }

    /// Finds programs within `radius_miles` of `address`, optionally
    /// restricted to one category.
    ///
    /// Geocodes the address, computes the covering cell ranges for the
    /// search disc, issues one range query per range, and unions the
    /// results. Zero coverage or zero matches yields an empty list, not an
    /// error.
    pub async fn search(
        &mut self,
        address: &str,
        radius_miles: f64,
        type_id: Option<i64>,
    ) -> Result<Vec<ProgramResponse>, ApiError> {
        if !radius_miles.is_finite() || radius_miles < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "radius must be a non-negative number of miles, got {radius_miles}"
            )));
        }

        let center = self.geocoder.geocode(address).await?;
        let ranges = covering_ranges(center, radius_miles, &self.covering);
        tracing::debug!(
            ranges = ranges.len(),
            radius_miles,
            "searching covering ranges"
        );

        let programs = self.distinct_in_ranges(&ranges, type_id.map(TypeId))?;
        programs
            .into_iter()
            .map(|program| {
                let types = self
                    .store
                    .types_of(program.id)?
                    .into_iter()
                    .map(|t| t.type_name)
                    .collect();
                Ok(ProgramResponse {
                    id: program.id.0,
                    name: program.name,
                    address: program.address,
                    latitude: program.latitude,
                    longitude: program.longitude,
                    types,
                })
            })
            .collect()
    }

    /// Geocodes the address, derives the storage-level cell ID, and persists
    /// the program with its category associations.
    ///
    /// Unresolved type IDs are skipped silently -- a deliberate best-effort
    /// policy, not an oversight. Returns the persisted record without
    /// resolved type names; type resolution is a read-side concern.
    pub async fn add_program(&mut self, req: &AddProgramRequest) -> Result<ProgramView, ApiError> {
        let coords = self.geocoder.geocode(&req.address).await?;
        let cell_id = CellId::from_lat_lng(coords).parent(self.covering.storage_level);
        let type_ids: Vec<TypeId> = req.type_ids.iter().copied().map(TypeId).collect();

        let record = self.store.save_program(
            &NewProgram {
                name: req.name.clone(),
                address: req.address.clone(),
                latitude: coords.lat(),
                longitude: coords.lng(),
                cell_id,
            },
            &type_ids,
        )?;
        tracing::info!(id = record.id.0, name = %record.name, "program added");
        Ok(record.into())
    }

    /// Lists every registered program type, ordered by ID.
    pub fn list_types(&self) -> Result<Vec<ProgramTypeView>, ApiError> {
        Ok(self
            .store
            .all_types()?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Registers a new program type (administrative).
    pub fn create_type(&mut self, name: &str) -> Result<ProgramTypeView, ApiError> {
        Ok(self.store.create_type(name)?.into())
    }

    /// Union of the per-range query results, deduplicated by program
    /// identity: a program whose cell falls in the overlap of two ranges
    /// appears exactly once, in first-retrieval order.
    fn distinct_in_ranges(
        &self,
        ranges: &[CellRange],
        type_filter: Option<TypeId>,
    ) -> Result<Vec<geonear_storage::ProgramRecord>, ApiError> {
        let mut seen = HashSet::new();
        let mut programs = Vec::new();
        for range in ranges {
            for program in self.store.find_in_range(*range, type_filter)? {
                if seen.insert(program.id) {
                    programs.push(program);
                }
            }
        }
        Ok(programs)
    }
}
