//! Member repository port.
//!
//! Defines the contract for persisting members and allocating their
//! identifiers.
//!
//! # Example
//!
//! ```ignore
//! async fn register(
//!     ids: &dyn MemberIdAllocator,
//!     members: &dyn MemberRepository,
//!     name: &str,
//! ) -> Result<Member, DomainError> {
//!     let id = ids.next_member_id().await?;
//!     let member = Member::register(id, name, MemberProfile::default(), Timestamp::now())?;
//!     members.save(&member).await?;
//!     Ok(member)
//! }
//! ```

use crate::domain::foundation::{DomainError, MemberId, Timestamp};
use crate::domain::member::{Member, MemberUpdate};
use async_trait::async_trait;

/// Repository port for Member persistence.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Save a new member.
    ///
    /// # Errors
    ///
    /// - `MemberExists` if the identifier is already taken
    /// - `DatabaseError` on persistence failure
    async fn save(&self, member: &Member) -> Result<(), DomainError>;

    /// Apply a partial update and return the updated member.
    ///
    /// Returns `None` if the member does not exist. Load, apply and write
    /// happen as one unit.
    ///
    /// # Errors
    ///
    /// - Validation codes if the update is rejected by the domain
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        id: &MemberId,
        update: MemberUpdate,
        now: Timestamp,
    ) -> Result<Option<Member>, DomainError>;

    /// Find a member by identifier.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;

    /// All members, newest first.
    async fn list(&self) -> Result<Vec<Member>, DomainError>;

    /// Delete a member along with their live subscription, intake records and
    /// active session. History and scan logs are kept.
    ///
    /// Returns `false` if the member did not exist.
    async fn delete(&self, id: &MemberId) -> Result<bool, DomainError>;
}

/// Allocates member identifiers from the shared counter.
#[async_trait]
pub trait MemberIdAllocator: Send + Sync {
    /// Atomically advances the counter and returns the new identifier.
    ///
    /// Two concurrent calls never return the same identifier.
    async fn next_member_id(&self) -> Result<MemberId, DomainError>;
}
