//! Program handlers (search, add, type listing/creation).

use axum::extract::{Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::programs::{
    AddProgramRequest, CreateTypeRequest, ProgramResponse, ProgramTypeView, ProgramView,
    SearchQuery,
};
use crate::state::AppState;

/// Finds programs near an address.
///
/// `GET /api/programs/search?address=...&radius_miles=...[&type_id=...]`
pub async fn search_programs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProgramResponse>>, ApiError> {
    let mut service = state.service.lock().await;
    let programs = service
        .search(&query.address, query.radius_miles, query.type_id)
        .await?;
    Ok(Json(programs))
}

/// Adds a new program.
///
/// `POST /api/programs/add`
pub async fn add_program(
    State(state): State<AppState>,
    Json(req): Json<AddProgramRequest>,
) -> Result<Json<ProgramView>, ApiError> {
    let mut service = state.service.lock().await;
    let program = service.add_program(&req).await?;
    Ok(Json(program))
}

/// Lists all program types.
///
/// `GET /api/programs/types`
pub async fn list_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProgramTypeView>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.list_types()?))
}

/// Registers a new program type (administrative).
///
/// `POST /api/programs/types`
pub async fn create_type(
    State(state): State<AppState>,
    Json(req): Json<CreateTypeRequest>,
) -> Result<Json<ProgramTypeView>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.create_type(&req.type_name)?))
}
