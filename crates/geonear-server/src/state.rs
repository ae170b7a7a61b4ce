//! Application state with a shared `ProgramService` for concurrent requests.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` so axum
//! handler tasks await the lock instead of blocking a runtime thread.
//! An `RwLock` would let the read-only search requests run concurrently,
//! but `ProgramService` holds a `rusqlite::Connection`, which is `!Sync`
//! and therefore cannot sit behind one.

use std::sync::Arc;

use crate::error::ApiError;
use crate::geocoder::Geocoder;
use crate::service::ProgramService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared program service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<ProgramService>>,
}

impl AppState {
    /// Creates a new `AppState` with a `ProgramService` backed by the given
    /// SQLite database path and geocoder.
    pub fn new(db_path: &str, geocoder: Geocoder) -> Result<Self, ApiError> {
        let service = ProgramService::new(db_path, geocoder)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }

    /// Creates a new `AppState` with an in-memory database (for testing).
    pub fn in_memory(geocoder: Geocoder) -> Result<Self, ApiError> {
        let service = ProgramService::in_memory(geocoder)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }
}
