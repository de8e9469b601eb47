//! HTTP adapter for the desk: scanning, who is inside, and subscription reports.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::desk_routes;
