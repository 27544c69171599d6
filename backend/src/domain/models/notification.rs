use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::Group;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub group_id: Option<String>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Derived on read, never stored
    ContributionReminder,
    GroupActivated,
    PayoutReceived,
}

impl Notification {
    pub fn generate_id() -> String {
        format!("notif-{}", Uuid::new_v4())
    }

    pub fn group_activated(user_id: &str, group: &Group) -> Self {
        Self {
            id: Self::generate_id(),
            user_id: user_id.to_string(),
            group_id: Some(group.id.clone()),
            kind: NotificationKind::GroupActivated,
            title: "Group is active".to_string(),
            message: format!(
                "\"{}\" is full. The payout order has been drawn and round 1 has started.",
                group.name
            ),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn payout_received(user_id: &str, group: &Group, amount: i64) -> Self {
        Self {
            id: Self::generate_id(),
            user_id: user_id.to_string(),
            group_id: Some(group.id.clone()),
            kind: NotificationKind::PayoutReceived,
            title: "Payout received".to_string(),
            message: format!(
                "You received {} from \"{}\" for round {}.",
                amount, group.name, group.current_round
            ),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Reminder for an active group; the id is stable per group so clients can
    /// key on it across refreshes.
    pub fn contribution_reminder(user_id: &str, group: &Group) -> Self {
        Self {
            id: format!("reminder-{}", group.id),
            user_id: user_id.to_string(),
            group_id: Some(group.id.clone()),
            kind: NotificationKind::ContributionReminder,
            title: "Contribution reminder".to_string(),
            message: format!(
                "Don't forget to contribute {} to \"{}\" for round {}.",
                group.contribution_amount, group.name, group.current_round
            ),
            is_read: false,
            created_at: group.next_payout_date,
        }
    }
}
