//! Domain model for a rotating savings group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    pub participants: Vec<String>,
    pub contribution_amount: i64,
    pub max_participants: u32,
    pub payout_order: Vec<String>,
    pub frequency: Frequency,
    /// 1-based; stays at `max_participants` once the group completes
    pub current_round: u32,
    pub status: GroupStatus,
    pub start_date: DateTime<Utc>,
    pub next_payout_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn generate_id() -> String {
        format!("group-{}", Uuid::new_v4())
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    pub fn is_active(&self) -> bool {
        self.status == GroupStatus::Active
    }

    /// Pooled amount paid out each round. Group creation rejects values that
    /// would overflow, so saturation only guards hand-edited records.
    pub fn payout_amount(&self) -> i64 {
        self.contribution_amount
            .saturating_mul(i64::from(self.max_participants))
    }

    /// Recipient of the current round's payout.
    pub fn scheduled_recipient(&self) -> Option<&str> {
        let index = self.current_round.checked_sub(1)? as usize;
        self.payout_order.get(index).map(String::as_str)
    }

    /// Zero-based position of a user in the payout order.
    pub fn payout_position(&self, user_id: &str) -> Option<usize> {
        self.payout_order.iter().position(|p| p == user_id)
    }

    /// Structural rules every stored group satisfies. Records built by the
    /// group service always pass; imported ones are checked here.
    pub fn check_invariants(&self) -> Result<(), GroupValidationError> {
        if self.max_participants < 2 {
            return Err(GroupValidationError::TooFewParticipants);
        }
        if self.contribution_amount <= 0 {
            return Err(GroupValidationError::NonPositiveContribution);
        }
        if self.participants.len() > self.max_participants as usize {
            return Err(GroupValidationError::TooManyParticipants {
                participants: self.participants.len(),
                max: self.max_participants,
            });
        }
        let mut seen = HashSet::new();
        for participant in &self.participants {
            if !seen.insert(participant.as_str()) {
                return Err(GroupValidationError::DuplicateParticipant(participant.clone()));
            }
        }

        let drawn = !self.payout_order.is_empty();
        if drawn || self.status != GroupStatus::Waiting {
            let mut order: Vec<&str> = self.payout_order.iter().map(String::as_str).collect();
            let mut members: Vec<&str> = self.participants.iter().map(String::as_str).collect();
            order.sort_unstable();
            members.sort_unstable();
            if !drawn || order != members {
                return Err(GroupValidationError::InvalidPayoutOrder);
            }
        }
        if !(1..=self.max_participants).contains(&self.current_round) {
            return Err(GroupValidationError::RoundOutOfRange {
                round: self.current_round,
                max: self.max_participants,
            });
        }
        Ok(())
    }
}

/// Longest accepted group name, in characters.
pub const MAX_GROUP_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    #[error("Group name cannot be empty")]
    EmptyName,
    #[error("Group name is too long")]
    NameTooLong,
    #[error("Max participants must be a whole number, got '{0}'")]
    InvalidMaxParticipants(String),
    #[error("A group needs at least 2 participants")]
    TooFewParticipants,
    #[error("Contribution amount must be a whole number, got '{0}'")]
    InvalidContributionAmount(String),
    #[error("Contribution amount must be positive")]
    NonPositiveContribution,
    #[error("Payout amount is too large")]
    PayoutOverflow,
    #[error("Unknown frequency '{0}'")]
    UnknownFrequency(String),
    #[error("Start date '{0}' is not a valid date")]
    InvalidStartDate(String),
    #[error("Group has {participants} participants but allows only {max}")]
    TooManyParticipants { participants: usize, max: u32 },
    #[error("Participant '{0}' is listed more than once")]
    DuplicateParticipant(String),
    #[error("Payout order must be empty or list every participant exactly once")]
    InvalidPayoutOrder,
    #[error("Round {round} is outside 1..={max}")]
    RoundOutOfRange { round: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(format!("Unknown frequency: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Waiting,
    Active,
    Completed,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Waiting => "waiting",
            GroupStatus::Active => "active",
            GroupStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waiting" => Ok(GroupStatus::Waiting),
            "active" => Ok(GroupStatus::Active),
            "completed" => Ok(GroupStatus::Completed),
            other => Err(format!("Unknown group status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with_order(order: &[&str], current_round: u32) -> Group {
        let now = Utc::now();
        Group {
            id: "group-001".to_string(),
            name: "First circle".to_string(),
            creator_id: "user-001".to_string(),
            participants: order.iter().map(|s| s.to_string()).collect(),
            contribution_amount: 5000,
            max_participants: order.len() as u32,
            payout_order: order.iter().map(|s| s.to_string()).collect(),
            frequency: Frequency::Monthly,
            current_round,
            status: GroupStatus::Active,
            start_date: now,
            next_payout_date: now,
            created_at: now,
        }
    }

    #[test]
    fn test_scheduled_recipient_follows_round() {
        let group = group_with_order(&["a", "b", "c"], 2);
        assert_eq!(group.scheduled_recipient(), Some("b"));
        assert_eq!(group.payout_amount(), 15000);
    }

    #[test]
    fn test_scheduled_recipient_out_of_range() {
        assert_eq!(group_with_order(&["a"], 0).scheduled_recipient(), None);
        assert_eq!(group_with_order(&["a"], 2).scheduled_recipient(), None);
    }

    #[test]
    fn test_invariants_accept_waiting_and_active_groups() {
        let active = group_with_order(&["a", "b", "c"], 3);
        assert_eq!(active.check_invariants(), Ok(()));

        let mut waiting = group_with_order(&["a"], 1);
        waiting.max_participants = 3;
        waiting.payout_order.clear();
        waiting.status = GroupStatus::Waiting;
        assert_eq!(waiting.check_invariants(), Ok(()));
    }

    #[test]
    fn test_invariants_reject_broken_groups() {
        let mut crowded = group_with_order(&["a", "b", "c"], 1);
        crowded.max_participants = 2;
        assert_eq!(
            crowded.check_invariants(),
            Err(GroupValidationError::TooManyParticipants { participants: 3, max: 2 })
        );

        let mut twice = group_with_order(&["a", "b"], 1);
        twice.participants = vec!["a".to_string(), "a".to_string()];
        assert_eq!(
            twice.check_invariants(),
            Err(GroupValidationError::DuplicateParticipant("a".to_string()))
        );

        let mut stranger = group_with_order(&["a", "b"], 1);
        stranger.payout_order = vec!["a".to_string(), "z".to_string()];
        assert_eq!(stranger.check_invariants(), Err(GroupValidationError::InvalidPayoutOrder));

        let mut undrawn = group_with_order(&["a", "b"], 1);
        undrawn.payout_order.clear();
        assert_eq!(undrawn.check_invariants(), Err(GroupValidationError::InvalidPayoutOrder));

        assert_eq!(
            group_with_order(&["a", "b"], 3).check_invariants(),
            Err(GroupValidationError::RoundOutOfRange { round: 3, max: 2 })
        );
        assert_eq!(
            group_with_order(&["a", "b"], 0).check_invariants(),
            Err(GroupValidationError::RoundOutOfRange { round: 0, max: 2 })
        );
    }

    #[test]
    fn test_payout_amount_saturates() {
        let mut group = group_with_order(&["a", "b"], 1);
        group.contribution_amount = i64::MAX;
        assert_eq!(group.payout_amount(), i64::MAX);
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!("daily".parse::<Frequency>().is_err());
    }
}
