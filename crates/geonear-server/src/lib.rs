//! HTTP/JSON API server for locating social-support programs near an
//! address.
//!
//! Composes the geometry crate (cell IDs, disc coverings), the storage crate
//! (program records keyed by spatial cell), and an external geocoding
//! collaborator into the search and add-program operations, and exposes them
//! over a small REST surface. This crate contains the server framework, API
//! schema types, error handling, and route definitions.

pub mod error;
pub mod geocoder;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
