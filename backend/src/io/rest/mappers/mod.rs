//! Conversions between domain types and the wire DTOs in `shared`.

pub mod group_mapper;
pub mod notification_mapper;
pub mod transaction_mapper;
pub mod user_mapper;

pub use group_mapper::GroupMapper;
pub use notification_mapper::NotificationMapper;
pub use transaction_mapper::TransactionMapper;
pub use user_mapper::UserMapper;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::demo_ledger;
    use shared::{GroupStatus, TransactionDirection, UserRole, SYSTEM_ACCOUNT};

    #[test]
    fn test_user_dto_carries_no_password() {
        let admin = demo_ledger().users.remove(0);
        let dto = UserMapper::to_dto(admin);
        assert_eq!(dto.role, UserRole::Admin);
        assert_eq!(dto.created_at, "2024-11-01T00:00:00+00:00");
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_group_and_transaction_dtos() {
        let ledger = demo_ledger();
        let group = GroupMapper::to_dto(ledger.groups[0].clone());
        assert_eq!(group.status, GroupStatus::Active);
        assert_eq!(group.next_payout_date, "2024-12-01T00:00:00+00:00");

        let payout = TransactionMapper::to_dto(ledger.transactions[0].clone());
        assert_eq!(payout.from_user_id, SYSTEM_ACCOUNT);
        assert_eq!(payout.to_user_id, "user-001");
    }

    #[test]
    fn test_transaction_query_mapping() {
        let query = TransactionMapper::to_query(shared::TransactionListRequest {
            transaction_type: Some(shared::TransactionType::Payout),
            status: None,
        });
        assert_eq!(
            query.transaction_type,
            Some(crate::domain::models::transaction::TransactionType::Payout)
        );
        assert!(query.status.is_none());
        assert_eq!(TransactionDirection::Incoming.sign(), "+");
    }
}
