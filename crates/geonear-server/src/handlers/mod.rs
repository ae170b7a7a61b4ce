//! HTTP handler modules for the geonear API.
//!
//! Handlers parse requests, acquire the service lock, delegate to
//! [`ProgramService`], and return JSON responses. No business logic lives
//! in handlers.
//!
//! [`ProgramService`]: crate::service::ProgramService

pub mod programs;
