//! # Ledger Data
//!
//! In-memory shape of everything the store persists, plus the change set a
//! unit of work accumulates before publishing.
//!
//! Rows keep insertion order. Several read models ("first active group",
//! "first user with these credentials") depend on that order, so updates
//! replace rows in place and new rows are appended.

use anyhow::{bail, Result};

use crate::domain::models::group::Group;
use crate::domain::models::notification::Notification;
use crate::domain::models::transaction::Transaction;
use crate::domain::models::user::User;

/// Anything stored in a keyed table.
pub trait Record: Clone {
    fn record_id(&self) -> &str;
}

impl Record for User {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Group {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Transaction {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Notification {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerData {
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub transactions: Vec<Transaction>,
    pub notifications: Vec<Notification>,
}

impl LedgerData {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.groups.is_empty()
            && self.transactions.is_empty()
            && self.notifications.is_empty()
    }
}

/// Staged upserts and deletes for one table, in the order they were made.
/// A later write to the same id replaces the earlier staged entry.
#[derive(Debug, Clone)]
pub struct StagedTable<T> {
    entries: Vec<(String, Option<T>)>,
}

impl<T> Default for StagedTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Record> StagedTable<T> {
    pub fn put(&mut self, record: T) {
        let id = record.record_id().to_string();
        self.stage(id, Some(record));
    }

    pub fn remove(&mut self, id: &str) {
        self.stage(id.to_string(), None);
    }

    fn stage(&mut self, id: String, entry: Option<T>) {
        match self.entries.iter_mut().find(|(staged_id, _)| *staged_id == id) {
            Some(existing) => existing.1 = entry,
            None => self.entries.push((id, entry)),
        }
    }

    /// `None` when the id is untouched, `Some(None)` when staged for deletion.
    pub fn lookup(&self, id: &str) -> Option<Option<&T>> {
        self.entries
            .iter()
            .find(|(staged_id, _)| staged_id == id)
            .map(|(_, entry)| entry.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Overlay the staged entries onto committed rows.
    pub fn merge_into(&self, rows: &mut Vec<T>) {
        for (id, entry) in &self.entries {
            let position = rows.iter().position(|row| row.record_id() == id);
            match (position, entry) {
                (Some(index), Some(record)) => rows[index] = record.clone(),
                (Some(index), None) => {
                    rows.remove(index);
                }
                (None, Some(record)) => rows.push(record.clone()),
                (None, None) => {}
            }
        }
    }
}

/// Everything one unit of work wants to publish.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub users: StagedTable<User>,
    pub groups: StagedTable<Group>,
    pub notifications: StagedTable<Notification>,
    /// Append-only
    pub transactions: Vec<Transaction>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.groups.is_empty()
            && self.notifications.is_empty()
            && self.transactions.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} user(s), {} group(s), {} notification(s), {} transaction(s)",
            self.users.len(),
            self.groups.len(),
            self.notifications.len(),
            self.transactions.len()
        )
    }

    /// Apply every staged change to `ledger`, or leave it untouched on error.
    pub fn apply_to(&self, ledger: &mut LedgerData) -> Result<()> {
        for (index, transaction) in self.transactions.iter().enumerate() {
            let duplicate_committed = ledger.transactions.iter().any(|t| t.id == transaction.id);
            let duplicate_staged = self.transactions[..index]
                .iter()
                .any(|t| t.id == transaction.id);
            if duplicate_committed || duplicate_staged {
                bail!("Transaction '{}' already exists in the ledger", transaction.id);
            }
        }

        self.users.merge_into(&mut ledger.users);
        self.groups.merge_into(&mut ledger.groups);
        self.notifications.merge_into(&mut ledger.notifications);
        ledger.transactions.extend(self.transactions.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::{sample_transaction, sample_user};

    #[test]
    fn test_merge_keeps_insertion_order() {
        let mut rows = vec![sample_user("user-a", 10), sample_user("user-b", 20)];
        let mut staged = StagedTable::default();
        staged.put(sample_user("user-c", 30));
        staged.put(sample_user("user-a", 99));
        staged.merge_into(&mut rows);

        let ids: Vec<&str> = rows.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["user-a", "user-b", "user-c"]);
        assert_eq!(rows[0].balance, 99);
    }

    #[test]
    fn test_later_stage_replaces_earlier() {
        let mut staged = StagedTable::default();
        staged.put(sample_user("user-a", 10));
        staged.remove("user-a");
        assert_eq!(staged.len(), 1);
        assert!(matches!(staged.lookup("user-a"), Some(None)));
        assert!(staged.lookup("user-b").is_none());
    }

    #[test]
    fn test_duplicate_transaction_rejected_without_partial_apply() {
        let mut ledger = LedgerData::default();
        ledger.transactions.push(sample_transaction("txn-1", "user-a"));

        let mut changes = ChangeSet::default();
        changes.users.put(sample_user("user-a", 5));
        changes.transactions.push(sample_transaction("txn-1", "user-a"));

        assert!(changes.apply_to(&mut ledger).is_err());
        assert!(ledger.users.is_empty());
        assert_eq!(ledger.transactions.len(), 1);
    }
}
