//! Core error types for geonear-core.
//!
//! Uses `thiserror` for structured, matchable error variants. The geometry
//! functions themselves are pure and total over valid inputs; the only
//! failure mode at this layer is constructing an out-of-range coordinate.

use thiserror::Error;

/// Core errors produced by the geonear-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A latitude/longitude pair outside [-90,90] x [-180,180].
    #[error("invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}
