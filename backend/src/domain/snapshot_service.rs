//! Whole-ledger export and import, and first-run seeding.

use anyhow::Context;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::commands::snapshot::ImportSummary;
use super::errors::RoscaResult;
use super::user_service::require_admin;
use crate::storage::{
    Connection, GroupStorage, LedgerData, LedgerSnapshot, NotificationStorage,
    TransactionStorage, UnitOfWork, UserStorage,
};

#[derive(Clone)]
pub struct SnapshotService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> SnapshotService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    pub fn export(&self, actor_id: &str) -> RoscaResult<LedgerSnapshot> {
        require_admin(&self.connection.read(), actor_id)?;
        let snapshot = self
            .connection
            .with_ledger(|ledger| LedgerSnapshot::from(ledger))?;
        info!(
            "Exported snapshot: {} users, {} groups, {} transactions",
            snapshot.users.len(),
            snapshot.groups.len(),
            snapshot.transactions.len()
        );
        Ok(snapshot)
    }

    pub fn export_json(&self, actor_id: &str) -> RoscaResult<String> {
        let snapshot = self.export(actor_id)?;
        Ok(serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?)
    }

    /// Merge a snapshot into the store in one unit of work.
    ///
    /// Users, groups and notifications replace records with the same id.
    /// A group that breaks its structural rules rejects the whole import.
    /// The ledger stays append-only: transactions whose id already exists are
    /// skipped rather than overwritten.
    pub fn import(&self, actor_id: &str, snapshot: LedgerSnapshot) -> RoscaResult<ImportSummary> {
        let unit = self.connection.begin();
        require_admin(&unit, actor_id)?;

        let summary = merge(&unit, LedgerData::from(snapshot))?;
        unit.commit()?;
        info!("Imported snapshot: {:?}", summary);
        Ok(summary)
    }

    /// Load `data` when the store holds nothing at all. Returns whether it
    /// did.
    pub fn seed_if_empty(&self, data: LedgerData) -> RoscaResult<bool> {
        let unit = self.connection.begin();
        if !self.connection.with_ledger(LedgerData::is_empty)? {
            return Ok(false);
        }
        let summary = merge(&unit, data)?;
        unit.commit()?;
        info!("Seeded empty store: {:?}", summary);
        Ok(true)
    }
}

fn merge<C: Connection>(unit: &UnitOfWork<'_, C>, data: LedgerData) -> RoscaResult<ImportSummary> {
    let mut summary = ImportSummary::default();
    for user in &data.users {
        unit.store_user(user)?;
        summary.users += 1;
    }
    for group in &data.groups {
        if let Err(e) = group.check_invariants() {
            warn!("Rejecting group '{}' from import: {}", group.id, e);
            return Err(e.into());
        }
        unit.store_group(group)?;
        summary.groups += 1;
    }
    for notification in &data.notifications {
        unit.store_notification(notification)?;
        summary.notifications += 1;
    }

    let mut known: HashSet<String> = unit
        .list_transactions()?
        .into_iter()
        .map(|t| t.id)
        .collect();
    for transaction in &data.transactions {
        if !known.insert(transaction.id.clone()) {
            warn!("Skipping transaction '{}': already in the ledger", transaction.id);
            continue;
        }
        unit.append_transaction(transaction)?;
        summary.transactions += 1;
    }
    Ok(summary)
}
