pub mod cellid;
pub mod covering;
pub mod error;
pub mod latlng;

// Re-export commonly used types
pub use cellid::{CellId, CellRange};
pub use covering::{covering_ranges, CoveringConfig, EARTH_RADIUS_MILES, MAX_COVERING_CELLS, STORAGE_LEVEL};
pub use error::CoreError;
pub use latlng::{LatLng, Point};
