//! Recording a participant's contribution for the current round.

use log::info;
use std::sync::Arc;

use super::commands::contributions::ContributionResult;
use super::errors::{RoscaError, RoscaResult};
use super::models::transaction::Transaction;
use crate::storage::{Connection, GroupStorage, TransactionStorage, UserStorage};

#[derive(Clone)]
pub struct ContributionService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> ContributionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    /// Move one contribution from the user into the group's pool.
    ///
    /// At most one contribution per (user, group, round). On any failure the
    /// balance and the ledger are unchanged.
    pub fn contribute(&self, group_id: &str, user_id: &str) -> RoscaResult<ContributionResult> {
        let unit = self.connection.begin();
        let group = unit
            .get_group(group_id)?
            .ok_or_else(|| RoscaError::GroupNotFound(group_id.to_string()))?;
        let mut user = unit
            .get_user(user_id)?
            .ok_or_else(|| RoscaError::UserNotFound(user_id.to_string()))?;

        if !group.is_active() {
            return Err(RoscaError::GroupNotActive);
        }
        if !group.has_participant(user_id) {
            return Err(RoscaError::NotParticipant);
        }
        if unit
            .find_contribution(user_id, group_id, group.current_round)?
            .is_some()
        {
            return Err(RoscaError::AlreadyContributed {
                round: group.current_round,
            });
        }
        if user.balance < group.contribution_amount {
            return Err(RoscaError::InsufficientBalance {
                balance: user.balance,
                required: group.contribution_amount,
            });
        }

        let transaction = Transaction::contribution(&group, user_id);
        user.balance -= transaction.amount;

        unit.append_transaction(&transaction)?;
        unit.store_user(&user)?;
        unit.commit()?;

        info!(
            "User '{}' contributed {} to group '{}' for round {}",
            user_id, transaction.amount, group_id, transaction.round
        );
        Ok(ContributionResult {
            success_message: format!(
                "Contribution of {} to \"{}\" recorded for round {}.",
                transaction.amount, group.name, transaction.round
            ),
            new_balance: user.balance,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::group::GroupStatus;
    use crate::domain::models::transaction::{LedgerParty, TransactionType};
    use crate::storage::test_utils::{sample_group, sample_user};
    use crate::storage::MemoryConnection;

    /// Active two-member group; user-a can afford one contribution.
    fn setup(balance_a: i64) -> (ContributionService<MemoryConnection>, Arc<MemoryConnection>) {
        let connection = Arc::new(MemoryConnection::new());
        let mut group = sample_group("group-001", &["user-a", "user-b"], 2);
        group.status = GroupStatus::Active;
        group.payout_order = vec!["user-b".to_string(), "user-a".to_string()];

        let unit = connection.begin();
        unit.store_user(&sample_user("user-a", balance_a)).unwrap();
        unit.store_user(&sample_user("user-b", 10_000)).unwrap();
        unit.store_user(&sample_user("user-c", 10_000)).unwrap();
        unit.store_group(&group).unwrap();
        unit.commit().unwrap();
        (ContributionService::new(connection.clone()), connection)
    }

    #[test]
    fn test_contribution_debits_and_records() {
        let (service, connection) = setup(7000);
        let result = service.contribute("group-001", "user-a").unwrap();

        assert_eq!(result.new_balance, 2000);
        assert_eq!(result.transaction.amount, 5000);
        assert_eq!(result.transaction.round, 1);
        assert_eq!(result.transaction.from, LedgerParty::user("user-a"));
        assert_eq!(result.transaction.to, LedgerParty::System);
        assert_eq!(result.transaction.transaction_type, TransactionType::Contribution);

        let view = connection.read();
        assert_eq!(view.get_user("user-a").unwrap().unwrap().balance, 2000);
        assert_eq!(view.list_transactions().unwrap().len(), 1);
    }

    #[test]
    fn test_second_contribution_same_round_rejected() {
        let (service, connection) = setup(20_000);
        service.contribute("group-001", "user-a").unwrap();
        let err = service.contribute("group-001", "user-a").unwrap_err();

        assert!(matches!(err, RoscaError::AlreadyContributed { round: 1 }));
        let view = connection.read();
        assert_eq!(view.get_user("user-a").unwrap().unwrap().balance, 15_000);
        assert_eq!(view.list_transactions().unwrap().len(), 1);
    }

    #[test]
    fn test_insufficient_balance_leaves_state_unchanged() {
        let (service, connection) = setup(4999);
        let err = service.contribute("group-001", "user-a").unwrap_err();

        assert!(matches!(
            err,
            RoscaError::InsufficientBalance {
                balance: 4999,
                required: 5000
            }
        ));
        let view = connection.read();
        assert_eq!(view.get_user("user-a").unwrap().unwrap().balance, 4999);
        assert!(view.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let (service, _) = setup(5000);
        assert_eq!(service.contribute("group-001", "user-a").unwrap().new_balance, 0);
    }

    #[test]
    fn test_non_member_and_inactive_group_rejected() {
        let (service, connection) = setup(10_000);
        assert!(matches!(
            service.contribute("group-001", "user-c").unwrap_err(),
            RoscaError::NotParticipant
        ));
        assert!(matches!(
            service.contribute("group-404", "user-a").unwrap_err(),
            RoscaError::GroupNotFound(_)
        ));

        let unit = connection.begin();
        unit.store_group(&sample_group("group-002", &["user-a"], 3))
            .unwrap();
        unit.commit().unwrap();
        assert!(matches!(
            service.contribute("group-002", "user-a").unwrap_err(),
            RoscaError::GroupNotActive
        ));
    }
}
