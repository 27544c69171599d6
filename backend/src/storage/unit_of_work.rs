//! # Unit of Work
//!
//! Groups the writes of one logical operation so they become visible
//! together. Reads issued through the unit see its own staged writes first,
//! then the committed ledger.
//!
//! Dropping a unit without calling [`UnitOfWork::commit`] discards every
//! staged change; the committed ledger is never touched before commit.
//!
//! A read-only unit copies the committed ledger on its first read and serves
//! every later read from that copy, so a read model built from several reads
//! never mixes states from before and after a concurrent commit.

use anyhow::{bail, Result};
use log::debug;
use std::cell::RefCell;
use std::sync::{MutexGuard, PoisonError};

use super::ledger::{ChangeSet, LedgerData, Record, StagedTable};
use super::traits::{Connection, GroupStorage, NotificationStorage, TransactionStorage, UserStorage};
use crate::domain::models::group::Group;
use crate::domain::models::notification::Notification;
use crate::domain::models::transaction::Transaction;
use crate::domain::models::user::User;

pub struct UnitOfWork<'c, C: Connection> {
    connection: &'c C,
    /// `None` for read-only units
    guard: Option<MutexGuard<'c, ()>>,
    staged: RefCell<ChangeSet>,
    /// Ledger copy for read-only units, taken on first read
    pinned: RefCell<Option<LedgerData>>,
}

impl<'c, C: Connection> UnitOfWork<'c, C> {
    pub fn begin(connection: &'c C) -> Self {
        // The mutex guards no data, so a panic in another writer leaves
        // nothing inconsistent behind.
        let guard = connection
            .write_lock()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Self {
            connection,
            guard: Some(guard),
            staged: RefCell::new(ChangeSet::default()),
            pinned: RefCell::new(None),
        }
    }

    pub fn read_only(connection: &'c C) -> Self {
        Self {
            connection,
            guard: None,
            staged: RefCell::new(ChangeSet::default()),
            pinned: RefCell::new(None),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.guard.is_some()
    }

    pub fn has_changes(&self) -> bool {
        !self.staged.borrow().is_empty()
    }

    /// Publish every staged change at once.
    pub fn commit(self) -> Result<()> {
        let UnitOfWork {
            connection,
            guard,
            staged,
            ..
        } = self;
        if guard.is_none() {
            bail!("Cannot commit a read-only unit of work");
        }
        let changes = staged.into_inner();
        if changes.is_empty() {
            return Ok(());
        }
        debug!("Committing unit of work: {}", changes.summary());
        connection.apply(changes)?;
        drop(guard);
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        if !self.is_writable() {
            bail!("Attempted to write through a read-only unit of work");
        }
        Ok(())
    }

    /// Read the committed ledger. Writers hold the write lock, so nothing
    /// commits underneath them; readers go through their pinned copy.
    fn committed<T>(&self, read: impl FnOnce(&LedgerData) -> T) -> Result<T> {
        if self.is_writable() {
            return self.connection.with_ledger(read);
        }
        let mut pinned = self.pinned.borrow_mut();
        if pinned.is_none() {
            *pinned = Some(self.connection.with_ledger(|ledger| ledger.clone())?);
        }
        match pinned.as_ref() {
            Some(ledger) => Ok(read(ledger)),
            None => bail!("Read view has no ledger copy"),
        }
    }

    fn get_record<T: Record>(
        &self,
        id: &str,
        staged: fn(&ChangeSet) -> &StagedTable<T>,
        committed: fn(&LedgerData) -> &Vec<T>,
    ) -> Result<Option<T>> {
        {
            let changes = self.staged.borrow();
            if let Some(entry) = staged(&changes).lookup(id) {
                return Ok(entry.cloned());
            }
        }
        self.committed(|ledger| {
            committed(ledger)
                .iter()
                .find(|row| row.record_id() == id)
                .cloned()
        })
    }

    fn list_records<T: Record>(
        &self,
        staged: fn(&ChangeSet) -> &StagedTable<T>,
        committed: fn(&LedgerData) -> &Vec<T>,
    ) -> Result<Vec<T>> {
        let mut rows = self.committed(|ledger| committed(ledger).clone())?;
        staged(&self.staged.borrow()).merge_into(&mut rows);
        Ok(rows)
    }
}

fn staged_users(changes: &ChangeSet) -> &StagedTable<User> {
    &changes.users
}

fn committed_users(ledger: &LedgerData) -> &Vec<User> {
    &ledger.users
}

fn staged_groups(changes: &ChangeSet) -> &StagedTable<Group> {
    &changes.groups
}

fn committed_groups(ledger: &LedgerData) -> &Vec<Group> {
    &ledger.groups
}

fn staged_notifications(changes: &ChangeSet) -> &StagedTable<Notification> {
    &changes.notifications
}

fn committed_notifications(ledger: &LedgerData) -> &Vec<Notification> {
    &ledger.notifications
}

impl<'c, C: Connection> UserStorage for UnitOfWork<'c, C> {
    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.get_record(user_id, staged_users, committed_users)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.list_records(staged_users, committed_users)
    }

    fn store_user(&self, user: &User) -> Result<()> {
        self.ensure_writable()?;
        self.staged.borrow_mut().users.put(user.clone());
        Ok(())
    }

    fn delete_user(&self, user_id: &str) -> Result<()> {
        self.ensure_writable()?;
        self.staged.borrow_mut().users.remove(user_id);
        Ok(())
    }
}

impl<'c, C: Connection> GroupStorage for UnitOfWork<'c, C> {
    fn get_group(&self, group_id: &str) -> Result<Option<Group>> {
        self.get_record(group_id, staged_groups, committed_groups)
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        self.list_records(staged_groups, committed_groups)
    }

    fn store_group(&self, group: &Group) -> Result<()> {
        self.ensure_writable()?;
        self.staged.borrow_mut().groups.put(group.clone());
        Ok(())
    }

    fn delete_group(&self, group_id: &str) -> Result<()> {
        self.ensure_writable()?;
        self.staged.borrow_mut().groups.remove(group_id);
        Ok(())
    }
}

impl<'c, C: Connection> NotificationStorage for UnitOfWork<'c, C> {
    fn get_notification(&self, notification_id: &str) -> Result<Option<Notification>> {
        self.get_record(notification_id, staged_notifications, committed_notifications)
    }

    fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.list_records(staged_notifications, committed_notifications)
    }

    fn store_notification(&self, notification: &Notification) -> Result<()> {
        self.ensure_writable()?;
        self.staged.borrow_mut().notifications.put(notification.clone());
        Ok(())
    }

    fn delete_notification(&self, notification_id: &str) -> Result<()> {
        self.ensure_writable()?;
        self.staged.borrow_mut().notifications.remove(notification_id);
        Ok(())
    }
}

impl<'c, C: Connection> TransactionStorage for UnitOfWork<'c, C> {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut rows = self.committed(|ledger| ledger.transactions.clone())?;
        rows.extend(self.staged.borrow().transactions.iter().cloned());
        Ok(rows)
    }

    fn append_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.ensure_writable()?;
        if self.get_transaction(&transaction.id)?.is_some() {
            bail!("Transaction '{}' already exists in the ledger", transaction.id);
        }
        self.staged.borrow_mut().transactions.push(transaction.clone());
        Ok(())
    }
}
