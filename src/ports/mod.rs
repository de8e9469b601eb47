//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the record store. Adapters implement these ports.
//!
//! Not-found is `Ok(None)`, never an error. An `Err` always means the store
//! could not answer.
//!
//! ## Store Ports
//!
//! - `MemberRepository` - Members
//! - `MemberIdAllocator` - Shared member id counter
//! - `SubscriptionRepository` - Live subscriptions and archived history
//! - `IntakeRepository` - Medical history, emergency contact, liability waiver
//! - `AttendanceRepository` - Scan logs and active sessions

mod attendance_repository;
mod intake_repository;
mod member_repository;
mod subscription_repository;

pub use attendance_repository::AttendanceRepository;
pub use intake_repository::IntakeRepository;
pub use member_repository::{MemberIdAllocator, MemberRepository};
pub use subscription_repository::SubscriptionRepository;
