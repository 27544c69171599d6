use std::sync::Arc;

use super::commands::dashboard::DashboardSummary;
use super::errors::{RoscaError, RoscaResult};
use super::models::transaction::TransactionType;
use crate::storage::{Connection, GroupStorage, TransactionStorage, UserStorage};

#[derive(Clone)]
pub struct DashboardService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> DashboardService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    /// Balance and lifetime totals for one user.
    ///
    /// The next payout date comes from the first active group (store order)
    /// in which the user's turn is still ahead of the current round.
    pub fn summary(&self, user_id: &str) -> RoscaResult<DashboardSummary> {
        let view = self.connection.read();
        let user = view
            .get_user(user_id)?
            .ok_or_else(|| RoscaError::UserNotFound(user_id.to_string()))?;

        let groups: Vec<_> = view
            .list_groups()?
            .into_iter()
            .filter(|g| g.has_participant(user_id))
            .collect();

        let (mut total_contributions, mut total_payouts) = (0i64, 0i64);
        for transaction in view.list_user_transactions(user_id)? {
            match transaction.transaction_type {
                TransactionType::Contribution if transaction.from.is_user(user_id) => {
                    total_contributions = total_contributions.saturating_add(transaction.amount);
                }
                TransactionType::Payout if transaction.to.is_user(user_id) => {
                    total_payouts = total_payouts.saturating_add(transaction.amount);
                }
                _ => {}
            }
        }

        let next_payout_date = groups
            .iter()
            .filter(|g| g.is_active())
            .find(|g| {
                g.payout_position(user_id)
                    .is_some_and(|position| position >= g.current_round as usize)
            })
            .map(|g| g.next_payout_date);

        Ok(DashboardSummary {
            balance: user.balance,
            total_groups: groups.len(),
            total_contributions,
            total_payouts,
            next_payout_date,
        })
    }
}
