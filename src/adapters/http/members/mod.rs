//! HTTP adapter for member endpoints.
//!
//! Registration, profile edits, renewals, intake forms, access checks and
//! attendance reports, all keyed by member id.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::member_routes;
