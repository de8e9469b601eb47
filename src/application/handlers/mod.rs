//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod access;
pub mod member;
pub mod scanner;
pub mod subscription;
