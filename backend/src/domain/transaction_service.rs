//! Read models over the transaction ledger.

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::commands::transactions::{Direction, TransactionListQuery, TransactionView};
use super::errors::{RoscaError, RoscaResult};
use super::models::transaction::Transaction;
use crate::storage::{Connection, GroupStorage, TransactionStorage, UserStorage};

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    /// Transactions the user paid or received, newest first.
    ///
    /// Entries with equal timestamps keep reverse ledger order, so the most
    /// recently appended comes first.
    pub fn list_for_user(
        &self,
        user_id: &str,
        query: TransactionListQuery,
    ) -> RoscaResult<Vec<TransactionView>> {
        let view = self.connection.read();
        if view.get_user(user_id)?.is_none() {
            return Err(RoscaError::UserNotFound(user_id.to_string()));
        }

        let group_names: HashMap<String, String> = view
            .list_groups()?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        let mut transactions: Vec<Transaction> = view
            .list_user_transactions(user_id)?
            .into_iter()
            .filter(|t| query.transaction_type.map_or(true, |kind| t.transaction_type == kind))
            .filter(|t| query.status.map_or(true, |status| t.status == status))
            .collect();
        newest_first(&mut transactions);
        debug!(
            "Listing {} transactions for user '{}' ({:?})",
            transactions.len(),
            user_id,
            query
        );

        Ok(transactions
            .into_iter()
            .map(|transaction| TransactionView {
                direction: if transaction.to.is_user(user_id) {
                    Direction::Incoming
                } else {
                    Direction::Outgoing
                },
                group_name: group_names.get(&transaction.group_id).cloned(),
                transaction,
            })
            .collect())
    }

    /// Every ledger entry of one group, newest first.
    pub fn list_for_group(&self, group_id: &str) -> RoscaResult<Vec<Transaction>> {
        let view = self.connection.read();
        if view.get_group(group_id)?.is_none() {
            return Err(RoscaError::GroupNotFound(group_id.to_string()));
        }
        let mut transactions = view.list_group_transactions(group_id)?;
        newest_first(&mut transactions);
        Ok(transactions)
    }
}

fn newest_first(transactions: &mut [Transaction]) {
    transactions.reverse();
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::transaction::{TransactionStatus, TransactionType};
    use crate::storage::seed::demo_ledger;
    use crate::storage::MemoryConnection;
    use chrono::{Duration, TimeZone, Utc};

    fn service() -> TransactionService<MemoryConnection> {
        TransactionService::new(Arc::new(MemoryConnection::with_data(demo_ledger())))
    }

    #[test]
    fn test_user_history_directions() {
        let entries = service()
            .list_for_user("user-001", TransactionListQuery::default())
            .unwrap();
        assert_eq!(entries.len(), 2);

        // Same timestamp: the later ledger entry comes first
        assert_eq!(entries[0].transaction.id, "txn-002");
        assert_eq!(entries[0].direction, Direction::Outgoing);
        assert_eq!(entries[1].transaction.id, "txn-001");
        assert_eq!(entries[1].direction, Direction::Incoming);
        assert_eq!(entries[1].group_name.as_deref(), Some("First savings circle"));
    }

    #[test]
    fn test_filters() {
        let service = service();
        let payouts = service
            .list_for_user(
                "user-001",
                TransactionListQuery {
                    transaction_type: Some(TransactionType::Payout),
                    status: None,
                },
            )
            .unwrap();
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].transaction.amount, 25_000);

        let none = service
            .list_for_user(
                "user-002",
                TransactionListQuery {
                    transaction_type: Some(TransactionType::Payout),
                    status: Some(TransactionStatus::Completed),
                },
            )
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_newest_first_by_timestamp() {
        let base = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap();
        let mut ledger = demo_ledger();
        ledger.transactions[0].created_at = base + Duration::days(3);
        let service =
            TransactionService::new(Arc::new(MemoryConnection::with_data(ledger)));

        let entries = service.list_for_group("group-001").unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].id, "txn-001");
        assert_eq!(entries[1].id, "txn-006");
    }

    #[test]
    fn test_unknown_ids() {
        let service = service();
        assert!(matches!(
            service
                .list_for_user("user-404", TransactionListQuery::default())
                .unwrap_err(),
            RoscaError::UserNotFound(_)
        ));
        assert!(matches!(
            service.list_for_group("group-404").unwrap_err(),
            RoscaError::GroupNotFound(_)
        ));
    }
}
