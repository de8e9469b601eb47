//! Member handlers.
//!
//! ## Commands
//! - Registering a member with their first subscription and intake forms
//! - Partial member updates and deletion
//! - Intake forms (medical history, emergency contact, liability waiver)
//!
//! ## Queries
//! - Member detail
//! - Member table with subscription summary

mod delete_member;
mod get_member;
mod intake;
mod list_members;
mod register_member;
mod update_member;

// Commands
pub use delete_member::{DeleteMemberCommand, DeleteMemberHandler};
pub use intake::{
    EmergencyContactForm, IntakeForms, IntakeHandler, IntakeRecords, SaveEmergencyContactCommand,
    SaveMedicalHistoryCommand, SignWaiverCommand, WaiverForm,
};
pub use register_member::{RegisterMemberCommand, RegisterMemberHandler, RegisterMemberResult};
pub use update_member::{UpdateMemberCommand, UpdateMemberHandler};

// Queries
pub use get_member::{GetMemberHandler, GetMemberQuery, MemberDetail};
pub use list_members::{ListMembersHandler, MemberSummary, SubscriptionLookup};
