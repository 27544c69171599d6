use crate::domain::models::notification::{
    Notification as DomainNotification, NotificationKind as DomainNotificationKind,
};
use shared::{Notification as SharedNotification, NotificationKind as SharedNotificationKind};

pub struct NotificationMapper;

impl NotificationMapper {
    pub fn to_dto(domain: DomainNotification) -> SharedNotification {
        SharedNotification {
            id: domain.id,
            group_id: domain.group_id,
            kind: match domain.kind {
                DomainNotificationKind::ContributionReminder => {
                    SharedNotificationKind::ContributionReminder
                }
                DomainNotificationKind::GroupActivated => SharedNotificationKind::GroupActivated,
                DomainNotificationKind::PayoutReceived => SharedNotificationKind::PayoutReceived,
            },
            title: domain.title,
            message: domain.message,
            is_read: domain.is_read,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainNotification>) -> Vec<SharedNotification> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
