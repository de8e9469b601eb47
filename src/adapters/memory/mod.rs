//! In-memory adapters for testing and development.

mod store;

pub use store::InMemoryStore;
