//! Domain model for an immutable ledger entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::SYSTEM_ACCOUNT;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::group::Group;

/// One side of a ledger entry: a user or the group's pooled account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LedgerParty {
    System,
    User(String),
}

impl LedgerParty {
    pub fn user(user_id: &str) -> Self {
        LedgerParty::User(user_id.to_string())
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            LedgerParty::System => None,
            LedgerParty::User(id) => Some(id),
        }
    }

    pub fn is_user(&self, user_id: &str) -> bool {
        self.user_id() == Some(user_id)
    }
}

impl From<String> for LedgerParty {
    fn from(value: String) -> Self {
        if value == SYSTEM_ACCOUNT {
            LedgerParty::System
        } else {
            LedgerParty::User(value)
        }
    }
}

impl From<LedgerParty> for String {
    fn from(party: LedgerParty) -> Self {
        match party {
            LedgerParty::System => SYSTEM_ACCOUNT.to_string(),
            LedgerParty::User(id) => id,
        }
    }
}

impl fmt::Display for LedgerParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerParty::System => f.write_str(SYSTEM_ACCOUNT),
            LedgerParty::User(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub group_id: String,
    pub from: LedgerParty,
    pub to: LedgerParty,
    pub amount: i64,
    pub round: u32,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn generate_id() -> String {
        format!("txn-{}", Uuid::new_v4())
    }

    /// Contribution from `user_id` into the pool for the group's current round.
    pub fn contribution(group: &Group, user_id: &str) -> Self {
        Self {
            id: Self::generate_id(),
            group_id: group.id.clone(),
            from: LedgerParty::user(user_id),
            to: LedgerParty::System,
            amount: group.contribution_amount,
            round: group.current_round,
            transaction_type: TransactionType::Contribution,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        }
    }

    /// Pool payout to `recipient_id` for the group's current round.
    pub fn payout(group: &Group, recipient_id: &str) -> Self {
        Self {
            id: Self::generate_id(),
            group_id: group.id.clone(),
            from: LedgerParty::System,
            to: LedgerParty::user(recipient_id),
            amount: group.payout_amount(),
            round: group.current_round,
            transaction_type: TransactionType::Payout,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        }
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.from.is_user(user_id) || self.to.is_user(user_id)
    }

    pub fn is_contribution_for(&self, user_id: &str, group_id: &str, round: u32) -> bool {
        self.transaction_type == TransactionType::Contribution
            && self.group_id == group_id
            && self.round == round
            && self.from.is_user(user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Contribution,
    Payout,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Contribution => "contribution",
            TransactionType::Payout => "payout",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "contribution" => Ok(TransactionType::Contribution),
            "payout" => Ok(TransactionType::Payout),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// Entries are written already settled; there is no pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "completed" => Ok(TransactionStatus::Completed),
            other => Err(format!("Unknown transaction status: {}", other)),
        }
    }
}
