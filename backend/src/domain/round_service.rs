//! Round advancement: paying the pool to the scheduled recipient and moving
//! the group to its next round (or completing it).

use anyhow::anyhow;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::commands::rounds::{AdvanceRoundCommand, AdvanceRoundResult, RoundProgress};
use super::errors::{RoscaError, RoscaResult};
use super::models::group::GroupStatus;
use super::models::notification::Notification;
use super::models::transaction::Transaction;
use super::schedule;
use super::user_service::require_admin;
use crate::storage::{
    Connection, GroupStorage, NotificationStorage, TransactionStorage, UserStorage,
};

#[derive(Clone)]
pub struct RoundService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> RoundService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    /// Pay out the current round and advance the group. Administrators only.
    ///
    /// Fails with `MissingContributions` when fewer contributions than
    /// participants were recorded for the round, unless
    /// `allow_missing_contributions` is set; then the shortfall is logged and
    /// reported back as a warning.
    pub fn advance_round(
        &self,
        actor_id: &str,
        command: AdvanceRoundCommand,
    ) -> RoscaResult<AdvanceRoundResult> {
        let unit = self.connection.begin();
        require_admin(&unit, actor_id)?;

        let group_id = command.group_id.as_str();
        let mut group = unit
            .get_group(group_id)?
            .ok_or_else(|| RoscaError::GroupNotFound(group_id.to_string()))?;
        if !group.is_active() {
            return Err(RoscaError::GroupNotActive);
        }

        let recipient_id = group
            .scheduled_recipient()
            .ok_or(RoscaError::PayoutOrderIncomplete)?
            .to_string();
        let mut recipient = unit
            .get_user(&recipient_id)?
            .ok_or_else(|| RoscaError::UserNotFound(recipient_id.clone()))?;

        let received = unit
            .list_round_contributions(group_id, group.current_round)?
            .len();
        let expected = group.participants.len();
        let warning = if received < expected {
            if !command.allow_missing_contributions {
                return Err(RoscaError::MissingContributions {
                    round: group.current_round,
                    received,
                    expected,
                });
            }
            let message = format!(
                "Round {} of \"{}\" paid out with only {} of {} contributions",
                group.current_round, group.name, received, expected
            );
            warn!("{}", message);
            Some(message)
        } else {
            None
        };

        let payout = Transaction::payout(&group, &recipient_id);
        recipient.balance = recipient
            .balance
            .checked_add(payout.amount)
            .ok_or_else(|| anyhow!("Balance of user '{}' would overflow", recipient_id))?;
        let notification = Notification::payout_received(&recipient_id, &group, payout.amount);

        let next_payout_date = schedule::next_payout_date(group.frequency, group.next_payout_date)
            .ok_or_else(|| anyhow!("Next payout date for group '{}' is out of range", group_id))?;
        let completed_round = group.current_round;
        if completed_round >= group.max_participants {
            group.status = GroupStatus::Completed;
        } else {
            group.current_round += 1;
        }
        group.next_payout_date = next_payout_date;

        unit.append_transaction(&payout)?;
        unit.store_user(&recipient)?;
        unit.store_group(&group)?;
        unit.store_notification(&notification)?;
        unit.commit()?;

        let success_message = if group.status == GroupStatus::Completed {
            info!(
                "Group '{}' completed: round {} paid {} to '{}'",
                group_id, completed_round, payout.amount, recipient_id
            );
            format!(
                "Round {} paid to {}. \"{}\" has completed all rounds.",
                completed_round, recipient.name, group.name
            )
        } else {
            info!(
                "Group '{}' round {} paid {} to '{}', now on round {}",
                group_id, completed_round, payout.amount, recipient_id, group.current_round
            );
            format!(
                "Round {} paid to {}. Round {} has started.",
                completed_round, recipient.name, group.current_round
            )
        };

        Ok(AdvanceRoundResult {
            group,
            payout,
            recipient_name: recipient.name,
            completed_round,
            warning,
            success_message,
        })
    }

    /// Who has and has not contributed to the group's current round.
    pub fn round_progress(&self, group_id: &str) -> RoscaResult<RoundProgress> {
        let view = self.connection.read();
        let group = view
            .get_group(group_id)?
            .ok_or_else(|| RoscaError::GroupNotFound(group_id.to_string()))?;

        let contributions = view.list_round_contributions(group_id, group.current_round)?;
        let contributors: HashSet<&str> = contributions
            .iter()
            .filter_map(|t| t.from.user_id())
            .collect();
        let missing_user_ids = group
            .participants
            .iter()
            .filter(|p| !contributors.contains(p.as_str()))
            .cloned()
            .collect();

        Ok(RoundProgress {
            group_id: group.id.clone(),
            round: group.current_round,
            contributions_received: contributions.len(),
            contributions_expected: group.participants.len(),
            missing_user_ids,
        })
    }
}
