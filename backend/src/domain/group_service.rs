//! Group service domain logic.
//!
//! Covers group creation from raw form input, joining, and the read models
//! built around a group (lists, details, payout schedule).
//!
//! ## Business Rules
//!
//! - A new group starts `Waiting` with its creator as the only participant
//! - Users may only join a waiting group that is not full and that they are
//!   not already in
//! - The join that fills the roster activates the group and draws the payout
//!   order, a uniformly random permutation of the final roster. The order is
//!   never redrawn.

use chrono::{DateTime, Utc};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};

use super::commands::groups::{
    CreateGroupCommand, GroupDetails, JoinGroupResult, ParticipantSummary, ScheduledPayout,
};
use super::errors::{RoscaError, RoscaResult};
use super::models::group::{
    Frequency, Group, GroupStatus, GroupValidationError, MAX_GROUP_NAME_LENGTH,
};
use super::models::notification::Notification;
use super::schedule;
use super::user_service::display_name;
use crate::storage::{Connection, GroupStorage, NotificationStorage, UserStorage};

struct GroupForm {
    name: String,
    max_participants: u32,
    contribution_amount: i64,
    frequency: Frequency,
    start_date: DateTime<Utc>,
}

fn validate_group_form(command: &CreateGroupCommand) -> Result<GroupForm, GroupValidationError> {
    let name = command.name.trim();
    if name.is_empty() {
        return Err(GroupValidationError::EmptyName);
    }
    if name.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(GroupValidationError::NameTooLong);
    }

    let max_participants: u32 = command
        .max_participants
        .trim()
        .parse()
        .map_err(|_| GroupValidationError::InvalidMaxParticipants(command.max_participants.clone()))?;
    if max_participants < 2 {
        return Err(GroupValidationError::TooFewParticipants);
    }

    let contribution_amount: i64 = command.contribution_amount.trim().parse().map_err(|_| {
        GroupValidationError::InvalidContributionAmount(command.contribution_amount.clone())
    })?;
    if contribution_amount <= 0 {
        return Err(GroupValidationError::NonPositiveContribution);
    }
    if schedule::payout_amount(contribution_amount, max_participants).is_none() {
        return Err(GroupValidationError::PayoutOverflow);
    }

    let frequency: Frequency = command
        .frequency
        .parse()
        .map_err(|_| GroupValidationError::UnknownFrequency(command.frequency.clone()))?;

    let start_date = schedule::parse_start_date(&command.start_date)
        .ok_or_else(|| GroupValidationError::InvalidStartDate(command.start_date.clone()))?;

    Ok(GroupForm {
        name: name.to_string(),
        max_participants,
        contribution_amount,
        frequency,
        start_date,
    })
}

#[derive(Clone)]
pub struct GroupService<C: Connection> {
    connection: Arc<C>,
    rng: Arc<Mutex<StdRng>>,
}

impl<C: Connection> GroupService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            connection,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Deterministic payout orders, for tests and reproducible demos.
    pub fn with_rng_seed(connection: Arc<C>, seed: u64) -> Self {
        Self {
            connection,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn create_group(&self, creator_id: &str, command: CreateGroupCommand) -> RoscaResult<Group> {
        info!("Creating group for '{}': {:?}", creator_id, command);
        let form = validate_group_form(&command)?;

        let unit = self.connection.begin();
        let mut creator = unit
            .get_user(creator_id)?
            .ok_or_else(|| RoscaError::UserNotFound(creator_id.to_string()))?;

        let group = Group {
            id: Group::generate_id(),
            name: form.name,
            creator_id: creator.id.clone(),
            participants: vec![creator.id.clone()],
            contribution_amount: form.contribution_amount,
            max_participants: form.max_participants,
            payout_order: vec![],
            frequency: form.frequency,
            current_round: 1,
            status: GroupStatus::Waiting,
            start_date: form.start_date,
            next_payout_date: form.start_date,
            created_at: Utc::now(),
        };
        creator.record_joined_group(&group.id);

        unit.store_group(&group)?;
        unit.store_user(&creator)?;
        unit.commit()?;

        info!(
            "Created group '{}' ({}): {} x {} {}",
            group.name, group.id, group.max_participants, group.contribution_amount, group.frequency
        );
        Ok(group)
    }

    pub fn join_group(&self, group_id: &str, user_id: &str) -> RoscaResult<JoinGroupResult> {
        let unit = self.connection.begin();
        let mut group = unit
            .get_group(group_id)?
            .ok_or_else(|| RoscaError::GroupNotFound(group_id.to_string()))?;
        let mut user = unit
            .get_user(user_id)?
            .ok_or_else(|| RoscaError::UserNotFound(user_id.to_string()))?;

        if group.has_participant(user_id) {
            return Err(RoscaError::AlreadyJoined);
        }
        if group.is_full() {
            return Err(RoscaError::GroupFull);
        }
        if group.status != GroupStatus::Waiting {
            return Err(RoscaError::GroupNotWaiting);
        }

        group.participants.push(user.id.clone());
        user.record_joined_group(&group.id);

        let activated = group.is_full();
        if activated {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            group.payout_order = schedule::assign_payout_order(&group.participants, &mut *rng);
            group.status = GroupStatus::Active;
            for participant in &group.participants {
                unit.store_notification(&Notification::group_activated(participant, &group))?;
            }
        }

        unit.store_group(&group)?;
        unit.store_user(&user)?;
        unit.commit()?;

        let success_message = if activated {
            info!(
                "Group '{}' is full and active, payout order {:?}",
                group.id, group.payout_order
            );
            format!(
                "You joined \"{}\". The group is full and round 1 has started.",
                group.name
            )
        } else {
            info!("User '{}' joined group '{}'", user_id, group.id);
            format!(
                "You joined \"{}\" ({}/{} members).",
                group.name,
                group.participants.len(),
                group.max_participants
            )
        };

        Ok(JoinGroupResult {
            group,
            activated,
            success_message,
        })
    }

    pub fn get_group(&self, group_id: &str) -> RoscaResult<Group> {
        self.connection
            .read()
            .get_group(group_id)?
            .ok_or_else(|| RoscaError::GroupNotFound(group_id.to_string()))
    }

    pub fn list_groups(&self) -> RoscaResult<Vec<Group>> {
        Ok(self.connection.read().list_groups()?)
    }

    /// Groups the user participates in, in store order.
    pub fn groups_for_user(&self, user_id: &str) -> RoscaResult<Vec<Group>> {
        Ok(self
            .list_groups()?
            .into_iter()
            .filter(|group| group.has_participant(user_id))
            .collect())
    }

    /// Waiting groups with a free seat that the user is not in yet.
    pub fn available_groups(&self, user_id: &str) -> RoscaResult<Vec<Group>> {
        Ok(self
            .list_groups()?
            .into_iter()
            .filter(|group| {
                group.status == GroupStatus::Waiting
                    && !group.has_participant(user_id)
                    && !group.is_full()
            })
            .collect())
    }

    pub fn group_details(&self, group_id: &str) -> RoscaResult<GroupDetails> {
        let view = self.connection.read();
        let group = view
            .get_group(group_id)?
            .ok_or_else(|| RoscaError::GroupNotFound(group_id.to_string()))?;

        let participants = group
            .participants
            .iter()
            .map(|user_id| {
                Ok(ParticipantSummary {
                    user_id: user_id.clone(),
                    name: display_name(&view, user_id)?,
                    is_creator: *user_id == group.creator_id,
                })
            })
            .collect::<RoscaResult<Vec<_>>>()?;

        let payout_amount = group.payout_amount();
        let schedule = schedule::payout_schedule(&group)
            .into_iter()
            .map(|(round, user_id, state)| {
                Ok(ScheduledPayout {
                    round,
                    user_name: display_name(&view, &user_id)?,
                    user_id,
                    amount: payout_amount,
                    state,
                })
            })
            .collect::<RoscaResult<Vec<_>>>()?;

        Ok(GroupDetails {
            creator_name: display_name(&view, &group.creator_id)?,
            payout_amount,
            participants,
            schedule,
            group,
        })
    }
}
