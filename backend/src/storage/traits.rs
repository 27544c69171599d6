//! # Storage Traits
//!
//! Repository interfaces the domain layer talks to. Every method returns
//! `anyhow::Result`; the domain decides what a failure means.
//!
//! The entity traits are implemented by [`UnitOfWork`], which reads through
//! its own staged writes. A [`Connection`] is the backend underneath: it owns
//! the committed ledger, the session slot and the write lock.

use anyhow::Result;
use std::sync::Mutex;

use super::ledger::{ChangeSet, LedgerData};
use super::unit_of_work::UnitOfWork;
use crate::domain::models::group::Group;
use crate::domain::models::notification::Notification;
use crate::domain::models::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::domain::models::user::User;

pub trait UserStorage {
    fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// All users in insertion order
    fn list_users(&self) -> Result<Vec<User>>;

    /// Insert or replace by id
    fn store_user(&self, user: &User) -> Result<()>;

    fn delete_user(&self, user_id: &str) -> Result<()>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.list_users()?.into_iter().find(|u| u.email == email))
    }
}

pub trait GroupStorage {
    fn get_group(&self, group_id: &str) -> Result<Option<Group>>;

    /// All groups in insertion order
    fn list_groups(&self) -> Result<Vec<Group>>;

    /// Insert or replace by id
    fn store_group(&self, group: &Group) -> Result<()>;

    fn delete_group(&self, group_id: &str) -> Result<()>;
}

/// The ledger is append-only: there is no update or delete.
pub trait TransactionStorage {
    /// All transactions in the order they were appended
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Fails if a transaction with the same id already exists
    fn append_transaction(&self, transaction: &Transaction) -> Result<()>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self
            .list_transactions()?
            .into_iter()
            .find(|t| t.id == transaction_id))
    }

    fn list_group_transactions(&self, group_id: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .list_transactions()?
            .into_iter()
            .filter(|t| t.group_id == group_id)
            .collect())
    }

    fn list_user_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .list_transactions()?
            .into_iter()
            .filter(|t| t.involves(user_id))
            .collect())
    }

    fn find_contribution(
        &self,
        user_id: &str,
        group_id: &str,
        round: u32,
    ) -> Result<Option<Transaction>> {
        Ok(self
            .list_transactions()?
            .into_iter()
            .find(|t| t.is_contribution_for(user_id, group_id, round)))
    }

    /// Completed contributions recorded for one round of one group
    fn list_round_contributions(&self, group_id: &str, round: u32) -> Result<Vec<Transaction>> {
        Ok(self
            .list_transactions()?
            .into_iter()
            .filter(|t| {
                t.transaction_type == TransactionType::Contribution
                    && t.status == TransactionStatus::Completed
                    && t.group_id == group_id
                    && t.round == round
            })
            .collect())
    }
}

pub trait NotificationStorage {
    fn get_notification(&self, notification_id: &str) -> Result<Option<Notification>>;

    fn list_notifications(&self) -> Result<Vec<Notification>>;

    /// Insert or replace by id
    fn store_notification(&self, notification: &Notification) -> Result<()>;

    fn delete_notification(&self, notification_id: &str) -> Result<()>;

    fn list_user_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        Ok(self
            .list_notifications()?
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect())
    }
}

/// The single persisted "who is logged in" key.
pub trait SessionStorage {
    fn get_current_user_id(&self) -> Result<Option<String>>;

    fn set_current_user_id(&self, user_id: &str) -> Result<()>;

    fn clear_current_user_id(&self) -> Result<()>;
}

/// A storage backend. Cloning shares the underlying store.
pub trait Connection: SessionStorage + Send + Sync + Clone + 'static {
    /// Run `read` against the committed ledger.
    fn with_ledger<T>(&self, read: impl FnOnce(&LedgerData) -> T) -> Result<T>;

    /// Serializes writers. Held by a writable [`UnitOfWork`] for its lifetime.
    fn write_lock(&self) -> &Mutex<()>;

    /// Publish a change set: afterwards every change is visible, or on error
    /// none is. Callers must hold [`Connection::write_lock`].
    fn apply(&self, changes: ChangeSet) -> Result<()>;

    /// Open a writable unit of work, blocking until no other writer is active.
    fn begin(&self) -> UnitOfWork<'_, Self> {
        UnitOfWork::begin(self)
    }

    /// Open a read-only view of the committed ledger.
    fn read(&self) -> UnitOfWork<'_, Self> {
        UnitOfWork::read_only(self)
    }
}
