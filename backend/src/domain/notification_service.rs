use log::info;
use std::sync::Arc;

use super::errors::{RoscaError, RoscaResult};
use super::models::notification::Notification;
use crate::storage::{Connection, GroupStorage, NotificationStorage};

#[derive(Clone)]
pub struct NotificationService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> NotificationService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    /// One reminder per active group the user belongs to. Reminders are
    /// computed on every call and never stored.
    pub fn reminders_for(&self, user_id: &str) -> RoscaResult<Vec<Notification>> {
        Ok(self
            .connection
            .read()
            .list_groups()?
            .iter()
            .filter(|g| g.is_active() && g.has_participant(user_id))
            .map(|g| Notification::contribution_reminder(user_id, g))
            .collect())
    }

    /// Stored notifications for the user, newest first.
    pub fn list_for_user(&self, user_id: &str) -> RoscaResult<Vec<Notification>> {
        let mut notifications = self.connection.read().list_user_notifications(user_id)?;
        notifications.reverse();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Marking someone else's notification reports it as not found.
    pub fn mark_read(&self, user_id: &str, notification_id: &str) -> RoscaResult<Notification> {
        let unit = self.connection.begin();
        let mut notification = unit
            .get_notification(notification_id)?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| RoscaError::NotificationNotFound(notification_id.to_string()))?;

        if !notification.is_read {
            notification.is_read = true;
            unit.store_notification(&notification)?;
            unit.commit()?;
            info!("Notification '{}' marked read", notification_id);
        }
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::notification::NotificationKind;
    use crate::storage::seed::demo_ledger;
    use crate::storage::MemoryConnection;
    use chrono::{Duration, Utc};

    fn service_with_notifications() -> NotificationService<MemoryConnection> {
        let mut ledger = demo_ledger();
        let group = ledger.groups[0].clone();
        let mut older = Notification::group_activated("user-002", &group);
        older.created_at = Utc::now() - Duration::days(2);
        let newer = Notification::payout_received("user-002", &group, 25_000);
        let other = Notification::payout_received("user-003", &group, 25_000);
        ledger.notifications = vec![older, newer, other];
        NotificationService::new(Arc::new(MemoryConnection::with_data(ledger)))
    }

    #[test]
    fn test_reminders_for_active_groups_only() {
        let service = service_with_notifications();
        let reminders = service.reminders_for("user-002").unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, "reminder-group-001");
        assert_eq!(reminders[0].kind, NotificationKind::ContributionReminder);

        assert!(service.reminders_for("user-admin-001").unwrap().is_empty());
        // Derived reminders never reach the store
        assert_eq!(service.list_for_user("user-002").unwrap().len(), 2);
    }

    #[test]
    fn test_list_newest_first() {
        let notifications = service_with_notifications()
            .list_for_user("user-002")
            .unwrap();
        assert_eq!(notifications[0].kind, NotificationKind::PayoutReceived);
        assert_eq!(notifications[1].kind, NotificationKind::GroupActivated);
    }

    #[test]
    fn test_mark_read() {
        let service = service_with_notifications();
        let id = service.list_for_user("user-002").unwrap()[0].id.clone();

        assert!(service.mark_read("user-002", &id).unwrap().is_read);
        assert!(service.list_for_user("user-002").unwrap()[0].is_read);
        // Idempotent
        assert!(service.mark_read("user-002", &id).unwrap().is_read);
    }

    #[test]
    fn test_mark_read_for_other_user_is_not_found() {
        let service = service_with_notifications();
        let id = service.list_for_user("user-003").unwrap()[0].id.clone();
        assert!(matches!(
            service.mark_read("user-002", &id).unwrap_err(),
            RoscaError::NotificationNotFound(_)
        ));
        assert!(!service.list_for_user("user-003").unwrap()[0].is_read);
    }
}
