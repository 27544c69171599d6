//! # Ledger Snapshot
//!
//! Single-document form of the whole ledger: four named arrays with the
//! camelCase field names browser-era exports used (`creatorId`,
//! `passwordHash`, `payoutOrder`, ... but `created_at`). Used for export,
//! import and the demo seed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::LedgerData;
use crate::domain::models::group::{Frequency, Group, GroupStatus};
use crate::domain::models::notification::{Notification, NotificationKind};
use crate::domain::models::transaction::{
    LedgerParty, Transaction, TransactionStatus, TransactionType,
};
use crate::domain::models::user::{Role, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub users: Vec<SnapshotUser>,
    #[serde(default)]
    pub groups: Vec<SnapshotGroup>,
    #[serde(default)]
    pub transactions: Vec<SnapshotTransaction>,
    #[serde(default)]
    pub notifications: Vec<SnapshotNotification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub balance: i64,
    pub role: Role,
    #[serde(default)]
    pub joined_groups: Vec<String>,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotGroup {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    pub participants: Vec<String>,
    pub contribution_amount: i64,
    pub max_participants: u32,
    #[serde(default)]
    pub payout_order: Vec<String>,
    pub frequency: Frequency,
    pub current_round: u32,
    pub status: GroupStatus,
    pub start_date: DateTime<Utc>,
    pub next_payout_date: DateTime<Utc>,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTransaction {
    pub id: String,
    pub group_id: String,
    pub from_user_id: LedgerParty,
    pub to_user_id: LedgerParty,
    pub amount: i64,
    pub round: u32,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNotification {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for SnapshotUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password.clone(),
            balance: user.balance,
            role: user.role,
            joined_groups: user.joined_groups.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<SnapshotUser> for User {
    fn from(user: SnapshotUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            password: user.password_hash,
            balance: user.balance,
            role: user.role,
            joined_groups: user.joined_groups,
            created_at: user.created_at,
        }
    }
}

impl From<&Group> for SnapshotGroup {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            creator_id: group.creator_id.clone(),
            participants: group.participants.clone(),
            contribution_amount: group.contribution_amount,
            max_participants: group.max_participants,
            payout_order: group.payout_order.clone(),
            frequency: group.frequency,
            current_round: group.current_round,
            status: group.status,
            start_date: group.start_date,
            next_payout_date: group.next_payout_date,
            created_at: group.created_at,
        }
    }
}

impl From<SnapshotGroup> for Group {
    fn from(group: SnapshotGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
            creator_id: group.creator_id,
            participants: group.participants,
            contribution_amount: group.contribution_amount,
            max_participants: group.max_participants,
            payout_order: group.payout_order,
            frequency: group.frequency,
            current_round: group.current_round,
            status: group.status,
            start_date: group.start_date,
            next_payout_date: group.next_payout_date,
            created_at: group.created_at,
        }
    }
}

impl From<&Transaction> for SnapshotTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            group_id: transaction.group_id.clone(),
            from_user_id: transaction.from.clone(),
            to_user_id: transaction.to.clone(),
            amount: transaction.amount,
            round: transaction.round,
            transaction_type: transaction.transaction_type,
            status: transaction.status,
            created_at: transaction.created_at,
        }
    }
}

impl From<SnapshotTransaction> for Transaction {
    fn from(transaction: SnapshotTransaction) -> Self {
        Self {
            id: transaction.id,
            group_id: transaction.group_id,
            from: transaction.from_user_id,
            to: transaction.to_user_id,
            amount: transaction.amount,
            round: transaction.round,
            transaction_type: transaction.transaction_type,
            status: transaction.status,
            created_at: transaction.created_at,
        }
    }
}

impl From<&Notification> for SnapshotNotification {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.clone(),
            user_id: notification.user_id.clone(),
            group_id: notification.group_id.clone(),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

impl From<SnapshotNotification> for Notification {
    fn from(notification: SnapshotNotification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            group_id: notification.group_id,
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

impl From<&LedgerData> for LedgerSnapshot {
    fn from(ledger: &LedgerData) -> Self {
        Self {
            users: ledger.users.iter().map(SnapshotUser::from).collect(),
            groups: ledger.groups.iter().map(SnapshotGroup::from).collect(),
            transactions: ledger
                .transactions
                .iter()
                .map(SnapshotTransaction::from)
                .collect(),
            notifications: ledger
                .notifications
                .iter()
                .map(SnapshotNotification::from)
                .collect(),
        }
    }
}

impl From<LedgerSnapshot> for LedgerData {
    fn from(snapshot: LedgerSnapshot) -> Self {
        Self {
            users: snapshot.users.into_iter().map(User::from).collect(),
            groups: snapshot.groups.into_iter().map(Group::from).collect(),
            transactions: snapshot
                .transactions
                .into_iter()
                .map(Transaction::from)
                .collect(),
            notifications: snapshot
                .notifications
                .into_iter()
                .map(Notification::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSER_EXPORT: &str = r#"{
        "users": [
            { "id": "user-001", "name": "Ivan Petrov", "email": "ivan@example.com",
              "passwordHash": "pass123", "balance": 15000, "role": "user",
              "joinedGroups": ["group-001"], "created_at": "2024-10-01T09:00:00.000Z" }
        ],
        "groups": [
            { "id": "group-001", "name": "First savings circle", "creatorId": "user-001",
              "participants": ["user-001"], "contributionAmount": 5000, "maxParticipants": 5,
              "payoutOrder": [], "frequency": "monthly", "currentRound": 1, "status": "waiting",
              "startDate": "2024-11-01T00:00:00Z", "nextPayoutDate": "2024-11-01T00:00:00Z",
              "created_at": "2024-10-01T09:00:00.000Z" }
        ],
        "transactions": [
            { "id": "txn-002", "groupId": "group-001", "fromUserId": "user-001",
              "toUserId": "system", "amount": 5000, "round": 1, "type": "contribution",
              "status": "completed", "created_at": "2024-11-01T00:00:00.000Z" }
        ],
        "notifications": []
    }"#;

    #[test]
    fn test_reads_browser_export_layout() {
        let snapshot: LedgerSnapshot = serde_json::from_str(BROWSER_EXPORT).unwrap();
        let ledger = LedgerData::from(snapshot);

        assert_eq!(ledger.users[0].password, "pass123");
        assert_eq!(ledger.users[0].joined_groups, vec!["group-001".to_string()]);
        assert_eq!(ledger.groups[0].creator_id, "user-001");
        assert_eq!(ledger.groups[0].status, GroupStatus::Waiting);
        assert_eq!(ledger.transactions[0].to, LedgerParty::System);
        assert_eq!(
            ledger.transactions[0].from,
            LedgerParty::user("user-001")
        );
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let snapshot: LedgerSnapshot = serde_json::from_str(r#"{"users": []}"#).unwrap();
        assert!(LedgerData::from(snapshot).is_empty());
    }

    #[test]
    fn test_export_uses_legacy_field_names() {
        let snapshot: LedgerSnapshot = serde_json::from_str(BROWSER_EXPORT).unwrap();
        let ledger = LedgerData::from(snapshot);
        let json = serde_json::to_value(LedgerSnapshot::from(&ledger)).unwrap();

        assert!(json["users"][0].get("passwordHash").is_some());
        assert!(json["users"][0].get("created_at").is_some());
        assert!(json["groups"][0].get("nextPayoutDate").is_some());
        assert_eq!(json["transactions"][0]["type"], "contribution");
        assert_eq!(json["transactions"][0]["toUserId"], "system");
    }
}
