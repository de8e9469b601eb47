//! Member domain module.
//!
//! Members, their partial updates, and the intake forms collected at
//! registration (medical history, emergency contact, liability waiver).

mod aggregate;
mod errors;
mod intake;

pub use aggregate::{Member, MemberProfile, MemberUpdate};
pub use errors::MemberError;
pub use intake::{
    EmergencyContact, EmergencyContactUpdate, LiabilityWaiver, MedicalAnswers, MedicalHistory,
    MedicalHistoryUpdate,
};
