//! RegisterMemberHandler - Command handler for signing up a new member.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::subscription::SubscriptionPlan;
use crate::domain::foundation::{LocalCalendar, Timestamp};
use crate::domain::member::{Member, MemberError, MemberProfile};
use crate::domain::subscription::{MembershipType, PaymentStatus, Subscription};
use crate::ports::{IntakeRepository, MemberIdAllocator, MemberRepository, SubscriptionRepository};

use super::intake::{save_records, IntakeForms, IntakeRecords};

/// Command to register a member with their first subscription.
#[derive(Debug, Clone)]
pub struct RegisterMemberCommand {
    pub name: String,
    pub profile: MemberProfile,
    pub plan: SubscriptionPlan,
    pub coaching_preference: bool,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<Timestamp>,
    pub intake: IntakeForms,
}

impl RegisterMemberCommand {
    pub fn new(name: impl Into<String>, plan: SubscriptionPlan) -> Self {
        Self {
            name: name.into(),
            profile: MemberProfile::default(),
            plan,
            coaching_preference: false,
            payment_status: PaymentStatus::NotPaid,
            payment_date: None,
            intake: IntakeForms::default(),
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterMemberResult {
    pub member: Member,
    pub subscription: Subscription,
    pub intake: IntakeRecords,
}

/// Handler for member sign-up.
pub struct RegisterMemberHandler {
    ids: Arc<dyn MemberIdAllocator>,
    members: Arc<dyn MemberRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    intake: Arc<dyn IntakeRepository>,
    calendar: LocalCalendar,
}

impl RegisterMemberHandler {
    pub fn new(
        ids: Arc<dyn MemberIdAllocator>,
        members: Arc<dyn MemberRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        intake: Arc<dyn IntakeRepository>,
        calendar: LocalCalendar,
    ) -> Self {
        Self {
            ids,
            members,
            subscriptions,
            intake,
            calendar,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterMemberCommand,
    ) -> Result<RegisterMemberResult, MemberError> {
        let now = Timestamp::now();

        // 1. Walk-in windows are checked before an id is spent
        cmd.plan.validate(now)?;

        // 2. Allocate the identifier
        let member_id = self.ids.next_member_id().await?;

        // 3. Build and validate every record before the first write
        let member = Member::register(member_id.clone(), cmd.name, cmd.profile, now)?;
        let membership_type = if cmd.plan.is_walk_in() {
            MembershipType::WalkIn
        } else {
            MembershipType::New
        };
        let subscription = cmd
            .plan
            .build(member_id.clone(), now, &self.calendar)?
            .with_membership_type(membership_type)
            .with_payment(cmd.payment_status, cmd.payment_date)
            .with_coaching(cmd.coaching_preference);
        let intake = cmd.intake.into_records(&member_id, now)?;

        // 4. Persist
        self.members.save(&member).await?;
        self.subscriptions.upsert(&subscription).await?;
        save_records(self.intake.as_ref(), &intake).await?;

        info!(
            member_id = %member.id,
            plan = subscription.plan_duration().as_deref().unwrap_or("walk-in"),
            "Member registered"
        );

        Ok(RegisterMemberResult {
            member,
            subscription,
            intake,
        })
    }
}
