//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, calendar, errors)
//! - `member` - Members and their intake forms
//! - `subscription` - Subscription windows, status queries, and history
//! - `access` - Access outcomes and desk transitions
//! - `attendance` - Scan logs, active sessions, and visit reports
//! - `scanner` - Keyboard-wedge scan reassembly

pub mod access;
pub mod attendance;
pub mod foundation;
pub mod member;
pub mod scanner;
pub mod subscription;
