//! Fixtures shared by storage and domain tests.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use super::file::FileConnection;
use crate::domain::models::group::{Frequency, Group, GroupStatus};
use crate::domain::models::transaction::{
    LedgerParty, Transaction, TransactionStatus, TransactionType,
};
use crate::domain::models::user::{Role, User};

/// A file-backed connection in a temporary directory that is removed when the
/// environment is dropped, even if the test panics.
pub struct TestEnvironment {
    pub connection: FileConnection,
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = FileConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// Open a second connection on the same directory, as a restart would.
    pub fn reopen(&self) -> Result<FileConnection> {
        FileConnection::new(&self.base_path)
    }
}

pub fn sample_user(id: &str, balance: i64) -> User {
    User {
        id: id.to_string(),
        name: format!("Name of {}", id),
        email: format!("{}@example.com", id),
        password: "pass123".to_string(),
        balance,
        role: Role::User,
        joined_groups: vec![],
        created_at: Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap(),
    }
}

pub fn sample_group(id: &str, participants: &[&str], max_participants: u32) -> Group {
    let start = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap();
    Group {
        id: id.to_string(),
        name: format!("Circle {}", id),
        creator_id: participants.first().map(|p| p.to_string()).unwrap_or_default(),
        participants: participants.iter().map(|p| p.to_string()).collect(),
        contribution_amount: 5000,
        max_participants,
        payout_order: vec![],
        frequency: Frequency::Monthly,
        current_round: 1,
        status: GroupStatus::Waiting,
        start_date: start,
        next_payout_date: start,
        created_at: start,
    }
}

pub fn sample_transaction(id: &str, from_user: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        group_id: "group-001".to_string(),
        from: LedgerParty::user(from_user),
        to: LedgerParty::System,
        amount: 5000,
        round: 1,
        transaction_type: TransactionType::Contribution,
        status: TransactionStatus::Completed,
        created_at: Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap(),
    }
}
