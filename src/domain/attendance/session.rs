use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, Timestamp};

/// A member currently inside the gym.
///
/// At most one exists per member; its presence is the only record of being
/// checked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub member_id: MemberId,
    pub member_name: String,
    pub check_in_time: Timestamp,
}

impl ActiveSession {
    pub fn start(member_id: MemberId, member_name: impl Into<String>, at: Timestamp) -> Self {
        Self {
            member_id,
            member_name: member_name.into(),
            check_in_time: at,
        }
    }
}
