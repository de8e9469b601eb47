//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::access::{
    AttendanceReportHandler, ListScansHandler, RecordScanHandler, ValidateAccessHandler,
};
use crate::application::handlers::member::{
    DeleteMemberHandler, GetMemberHandler, IntakeHandler, ListMembersHandler,
    RegisterMemberHandler, UpdateMemberHandler,
};
use crate::application::handlers::subscription::{
    ListExpiringHandler, ListHistoryHandler, RenewSubscriptionHandler,
};
use crate::config::{GymConfig, ScannerConfig, ValidationError};
use crate::domain::access::DeskMode;
use crate::domain::foundation::LocalCalendar;
use crate::ports::{
    AttendanceRepository, IntakeRepository, MemberIdAllocator, MemberRepository,
    SubscriptionRepository,
};

/// Desk-wide settings the handlers need besides the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeskSettings {
    pub calendar: LocalCalendar,
    /// Window for the expiring-members report.
    pub expiring_threshold_days: u32,
    /// Window for the "expiring soon" flag on the member listing.
    pub listing_threshold_days: u32,
    /// Mode used by `POST /api/scans` when the request names none.
    pub desk_mode: DeskMode,
}

impl DeskSettings {
    pub fn from_config(gym: &GymConfig, scanner: &ScannerConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            calendar: gym.calendar()?,
            expiring_threshold_days: gym.expiring_threshold_days,
            listing_threshold_days: gym.listing_threshold_days,
            desk_mode: scanner.desk_mode()?,
        })
    }
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            calendar: LocalCalendar::utc(),
            expiring_threshold_days: 3,
            listing_threshold_days: 7,
            desk_mode: DeskMode::Toggle,
        }
    }
}

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct AppState {
    pub ids: Arc<dyn MemberIdAllocator>,
    pub members: Arc<dyn MemberRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub intake: Arc<dyn IntakeRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub settings: DeskSettings,
}

impl AppState {
    /// State over a single store implementing every port.
    pub fn from_store<S>(store: S, settings: DeskSettings) -> Self
    where
        S: MemberIdAllocator
            + MemberRepository
            + SubscriptionRepository
            + IntakeRepository
            + AttendanceRepository
            + Clone
            + 'static,
    {
        Self {
            ids: Arc::new(store.clone()),
            members: Arc::new(store.clone()),
            subscriptions: Arc::new(store.clone()),
            intake: Arc::new(store.clone()),
            attendance: Arc::new(store),
            settings,
        }
    }

    // Handlers are created on demand from the shared ports.

    pub fn register_member_handler(&self) -> RegisterMemberHandler {
        RegisterMemberHandler::new(
            self.ids.clone(),
            self.members.clone(),
            self.subscriptions.clone(),
            self.intake.clone(),
            self.settings.calendar,
        )
    }

    pub fn update_member_handler(&self) -> UpdateMemberHandler {
        UpdateMemberHandler::new(self.members.clone())
    }

    pub fn delete_member_handler(&self) -> DeleteMemberHandler {
        DeleteMemberHandler::new(self.members.clone())
    }

    pub fn get_member_handler(&self) -> GetMemberHandler {
        GetMemberHandler::new(
            self.members.clone(),
            self.subscriptions.clone(),
            self.intake.clone(),
            self.attendance.clone(),
        )
    }

    pub fn list_members_handler(&self) -> ListMembersHandler {
        ListMembersHandler::new(
            self.members.clone(),
            self.subscriptions.clone(),
            self.settings.listing_threshold_days,
        )
    }

    pub fn intake_handler(&self) -> IntakeHandler {
        IntakeHandler::new(self.members.clone(), self.intake.clone())
    }

    pub fn renew_subscription_handler(&self) -> RenewSubscriptionHandler {
        RenewSubscriptionHandler::new(
            self.members.clone(),
            self.subscriptions.clone(),
            self.settings.calendar,
        )
    }

    pub fn list_expiring_handler(&self) -> ListExpiringHandler {
        ListExpiringHandler::new(
            self.subscriptions.clone(),
            self.settings.expiring_threshold_days,
        )
    }

    pub fn list_history_handler(&self) -> ListHistoryHandler {
        ListHistoryHandler::new(self.subscriptions.clone())
    }

    pub fn validate_access_handler(&self) -> ValidateAccessHandler {
        ValidateAccessHandler::new(
            self.members.clone(),
            self.subscriptions.clone(),
            self.attendance.clone(),
        )
    }

    pub fn record_scan_handler(&self) -> RecordScanHandler {
        RecordScanHandler::new(
            Arc::new(self.validate_access_handler()),
            self.attendance.clone(),
            self.settings.desk_mode,
        )
    }

    pub fn list_scans_handler(&self) -> ListScansHandler {
        ListScansHandler::new(self.attendance.clone(), self.settings.calendar)
    }

    pub fn attendance_report_handler(&self) -> AttendanceReportHandler {
        AttendanceReportHandler::new(self.members.clone(), self.attendance.clone())
    }
}
