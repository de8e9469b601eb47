//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory store for tests and database-less desks
//! - `postgres` - PostgreSQL repositories
//! - `http` - REST API (axum)
//! - `scanner` - Keyboard-wedge scanner feed

pub mod http;
pub mod memory;
pub mod postgres;
pub mod scanner;

pub use memory::InMemoryStore;
