//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::access::{
    AttendanceReportHandler, ListScansHandler, RecordScanHandler, ValidateAccessHandler,
};
pub use handlers::member::{
    DeleteMemberHandler, GetMemberHandler, IntakeHandler, ListMembersHandler,
    RegisterMemberHandler, UpdateMemberHandler,
};
pub use handlers::scanner::ScanInputHandler;
pub use handlers::subscription::{
    ListExpiringHandler, ListHistoryHandler, RenewSubscriptionHandler,
};
