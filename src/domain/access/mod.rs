//! Access domain module.
//!
//! Access outcomes for scanned codes and the session transitions a desk
//! applies for each outcome.

mod desk;
mod errors;
mod validation;

pub use desk::{DeskMode, ScanDecision, SessionChange};
pub use errors::AccessError;
pub use validation::{AccessOutcome, AccessValidation};
