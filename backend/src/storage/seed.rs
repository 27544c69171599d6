//! Demo data: an administrator, five members and one running group whose
//! first round has been fully funded.

use chrono::{DateTime, TimeZone, Utc};

use super::ledger::LedgerData;
use crate::domain::models::group::{Frequency, Group, GroupStatus};
use crate::domain::models::transaction::{
    LedgerParty, Transaction, TransactionStatus, TransactionType,
};
use crate::domain::models::user::{Role, User};

pub const DEMO_ADMIN_EMAIL: &str = "admin@rosca.app";
pub const DEMO_GROUP_ID: &str = "group-001";

const DEMO_MEMBERS: [(&str, &str, &str, i64); 5] = [
    ("user-001", "Ivan Petrov", "ivan@example.com", 15000),
    ("user-002", "Anna Sidorova", "anna@example.com", 8000),
    ("user-003", "Alisa Kuznetsova", "alisa@example.com", 5000),
    ("user-004", "Dmitry Novikov", "dmitry@example.com", 5000),
    ("user-005", "Elena Volkova", "elena@example.com", 5000),
];

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn demo_ledger() -> LedgerData {
    let seeded_at = at(2024, 11, 1);

    let mut users = vec![User {
        id: "user-admin-001".to_string(),
        name: "Administrator".to_string(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        password: "admin123".to_string(),
        balance: 50000,
        role: Role::Admin,
        joined_groups: vec![],
        created_at: seeded_at,
    }];
    users.extend(DEMO_MEMBERS.iter().map(|(id, name, email, balance)| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password: "pass123".to_string(),
        balance: *balance,
        role: Role::User,
        joined_groups: vec![DEMO_GROUP_ID.to_string()],
        created_at: seeded_at,
    }));

    let member_ids: Vec<String> = DEMO_MEMBERS.iter().map(|(id, ..)| id.to_string()).collect();
    let group = Group {
        id: DEMO_GROUP_ID.to_string(),
        name: "First savings circle".to_string(),
        creator_id: "user-001".to_string(),
        participants: member_ids.clone(),
        contribution_amount: 5000,
        max_participants: 5,
        payout_order: member_ids.clone(),
        frequency: Frequency::Monthly,
        current_round: 1,
        status: GroupStatus::Active,
        start_date: seeded_at,
        next_payout_date: at(2024, 12, 1),
        created_at: seeded_at,
    };

    let mut transactions = vec![Transaction {
        id: "txn-001".to_string(),
        group_id: DEMO_GROUP_ID.to_string(),
        from: LedgerParty::System,
        to: LedgerParty::user("user-001"),
        amount: 25000,
        round: 1,
        transaction_type: TransactionType::Payout,
        status: TransactionStatus::Completed,
        created_at: seeded_at,
    }];
    transactions.extend(member_ids.iter().enumerate().map(|(index, user_id)| Transaction {
        id: format!("txn-{:03}", index + 2),
        group_id: DEMO_GROUP_ID.to_string(),
        from: LedgerParty::user(user_id),
        to: LedgerParty::System,
        amount: 5000,
        round: 1,
        transaction_type: TransactionType::Contribution,
        status: TransactionStatus::Completed,
        created_at: seeded_at,
    }));

    LedgerData {
        users,
        groups: vec![group],
        transactions,
        notifications: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_ledger_shape() {
        let ledger = demo_ledger();
        assert_eq!(ledger.users.len(), 6);
        assert_eq!(ledger.groups.len(), 1);
        assert_eq!(ledger.transactions.len(), 6);
        assert_eq!(ledger.transactions[5].id, "txn-006");

        let group = &ledger.groups[0];
        assert!(group.is_full());
        assert_eq!(group.payout_order.len(), 5);
        assert_eq!(group.payout_amount(), 25000);
        assert_eq!(group.next_payout_date, at(2024, 12, 1));
    }

    #[test]
    fn test_demo_admin_credentials() {
        let ledger = demo_ledger();
        let admin = ledger.users.iter().find(|u| u.is_admin()).unwrap();
        assert!(admin.credentials_match(DEMO_ADMIN_EMAIL, "admin123"));
    }
}
