use anyhow::{anyhow, Context, Result};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use super::{transaction_ledger, yaml_records};
use crate::storage::ledger::{ChangeSet, LedgerData};
use crate::storage::traits::Connection;

/// FileConnection owns a data directory and a cache of its committed ledger.
/// The cache is loaded once at open; after that only this process is
/// expected to write the directory.
#[derive(Clone)]
pub struct FileConnection {
    base_directory: PathBuf,
    ledger: Arc<RwLock<LedgerData>>,
    write_lock: Arc<Mutex<()>>,
}

impl FileConnection {
    /// Open (creating if needed) a data directory and load every table.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {:?}", base_path))?;
            info!("Created data directory: {:?}", base_path);
        }

        let connection = Self {
            base_directory: base_path,
            ledger: Arc::new(RwLock::new(LedgerData::default())),
            write_lock: Arc::new(Mutex::new(())),
        };
        let ledger = connection.load_ledger()?;
        info!(
            "Opened data directory {:?}: {} user(s), {} group(s), {} transaction(s), {} notification(s)",
            connection.base_directory,
            ledger.users.len(),
            ledger.groups.len(),
            ledger.transactions.len(),
            ledger.notifications.len()
        );
        *connection
            .ledger
            .write()
            .map_err(|_| anyhow!("Ledger lock poisoned"))? = ledger;
        Ok(connection)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn users_path(&self) -> PathBuf {
        self.base_directory.join("users.yaml")
    }

    pub fn groups_path(&self) -> PathBuf {
        self.base_directory.join("groups.yaml")
    }

    pub fn notifications_path(&self) -> PathBuf {
        self.base_directory.join("notifications.yaml")
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.base_directory.join("transactions.csv")
    }

    fn load_ledger(&self) -> Result<LedgerData> {
        Ok(LedgerData {
            users: yaml_records::load(&self.users_path())?,
            groups: yaml_records::load(&self.groups_path())?,
            transactions: transaction_ledger::load(&self.transactions_path())?,
            notifications: yaml_records::load(&self.notifications_path())?,
        })
    }

    /// Write a temp file for every table the change set touches.
    fn write_temp_files(
        &self,
        changes: &ChangeSet,
        next: &LedgerData,
        written: &mut Vec<(PathBuf, PathBuf)>,
    ) -> Result<()> {
        if !changes.users.is_empty() {
            let target = self.users_path();
            written.push((yaml_records::write_temp(&target, &next.users)?, target));
        }
        if !changes.groups.is_empty() {
            let target = self.groups_path();
            written.push((yaml_records::write_temp(&target, &next.groups)?, target));
        }
        if !changes.notifications.is_empty() {
            let target = self.notifications_path();
            written.push((
                yaml_records::write_temp(&target, &next.notifications)?,
                target,
            ));
        }
        if !changes.transactions.is_empty() {
            let target = self.transactions_path();
            written.push((
                transaction_ledger::write_temp(&target, &next.transactions)?,
                target,
            ));
        }
        Ok(())
    }
}

impl Connection for FileConnection {
    fn with_ledger<T>(&self, read: impl FnOnce(&LedgerData) -> T) -> Result<T> {
        let ledger = self
            .ledger
            .read()
            .map_err(|_| anyhow!("Ledger lock poisoned"))?;
        Ok(read(&ledger))
    }

    fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }

    fn apply(&self, changes: ChangeSet) -> Result<()> {
        let mut cache = self
            .ledger
            .write()
            .map_err(|_| anyhow!("Ledger lock poisoned"))?;
        let mut next = cache.clone();
        changes.apply_to(&mut next)?;

        let mut written = Vec::new();
        if let Err(e) = self.write_temp_files(&changes, &next, &mut written) {
            error!("Failed to stage files, discarding commit: {:#}", e);
            for (temp_path, _) in &written {
                let _ = fs::remove_file(temp_path);
            }
            return Err(e);
        }
        publish(&written)?;

        *cache = next;
        Ok(())
    }
}

/// A table file moved into place, with the copy of what it replaced.
struct Published {
    target: PathBuf,
    backup: Option<PathBuf>,
}

/// Rename every temp file onto its target. When one fails, the targets
/// already replaced are restored from their `.bak` copies and the remaining
/// temp files are removed, so the directory is left as it was.
fn publish(written: &[(PathBuf, PathBuf)]) -> Result<()> {
    let mut published: Vec<Published> = Vec::new();
    for (index, (temp_path, target)) in written.iter().enumerate() {
        if let Err(e) = publish_one(temp_path, target, &mut published) {
            error!("Failed to publish {:?}, rolling back: {:#}", target, e);
            for (pending, _) in &written[index..] {
                let _ = fs::remove_file(pending);
            }
            roll_back(published);
            return Err(e);
        }
    }
    for entry in published {
        if let Some(backup) = entry.backup {
            let _ = fs::remove_file(backup);
        }
    }
    Ok(())
}

fn publish_one(temp_path: &Path, target: &Path, published: &mut Vec<Published>) -> Result<()> {
    let backup = if target.exists() {
        let backup = target.with_extension("bak");
        fs::copy(target, &backup)
            .with_context(|| format!("Failed to back up {:?}", target))?;
        Some(backup)
    } else {
        None
    };
    if let Err(e) = fs::rename(temp_path, target) {
        if let Some(backup) = &backup {
            let _ = fs::remove_file(backup);
        }
        return Err(e).with_context(|| format!("Failed to move {:?} into place", target));
    }
    published.push(Published {
        target: target.to_path_buf(),
        backup,
    });
    Ok(())
}

fn roll_back(published: Vec<Published>) {
    for entry in published.into_iter().rev() {
        let restored = match &entry.backup {
            Some(backup) => fs::rename(backup, &entry.target),
            None => fs::remove_file(&entry.target),
        };
        if let Err(e) = restored {
            error!("Failed to restore {:?}: {}", entry.target, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::notification::Notification;
    use crate::domain::models::user::User;
    use crate::storage::test_utils::{sample_group, sample_transaction, sample_user, TestEnvironment};
    use crate::storage::traits::{GroupStorage, NotificationStorage, TransactionStorage, UserStorage};

    #[test]
    fn test_commit_persists_every_table() {
        let env = TestEnvironment::new().unwrap();
        let group = sample_group("group-001", &["user-a"], 3);
        let unit = env.connection.begin();
        unit.store_user(&sample_user("user-a", 100)).unwrap();
        unit.store_group(&group).unwrap();
        unit.store_notification(&Notification::group_activated("user-a", &group))
            .unwrap();
        unit.append_transaction(&sample_transaction("txn-1", "user-a"))
            .unwrap();
        unit.commit().unwrap();

        for file in ["users.yaml", "groups.yaml", "notifications.yaml", "transactions.csv"] {
            assert!(env.base_path.join(file).exists(), "{} missing", file);
        }

        let reopened = env.reopen().unwrap();
        let view = reopened.read();
        assert_eq!(view.list_users().unwrap(), vec![sample_user("user-a", 100)]);
        assert_eq!(view.get_group("group-001").unwrap(), Some(group));
        assert_eq!(view.list_notifications().unwrap().len(), 1);
        assert_eq!(view.list_transactions().unwrap().len(), 1);
    }

    #[test]
    fn test_untouched_tables_are_not_written() {
        let env = TestEnvironment::new().unwrap();
        let unit = env.connection.begin();
        unit.store_user(&sample_user("user-a", 100)).unwrap();
        unit.commit().unwrap();

        assert!(env.base_path.join("users.yaml").exists());
        assert!(!env.base_path.join("groups.yaml").exists());
        assert!(!env.base_path.join("transactions.csv").exists());
    }

    #[test]
    fn test_failed_apply_leaves_disk_and_cache_unchanged() {
        let env = TestEnvironment::new().unwrap();
        let unit = env.connection.begin();
        unit.append_transaction(&sample_transaction("txn-1", "user-a"))
            .unwrap();
        unit.commit().unwrap();

        // Bypass the unit's duplicate check to exercise the store's own.
        let mut changes = ChangeSet::default();
        changes.users.put(sample_user("user-b", 5));
        changes.transactions.push(sample_transaction("txn-1", "user-b"));
        assert!(env.connection.apply(changes).is_err());

        assert!(!env.base_path.join("users.yaml").exists());
        let reopened = env.reopen().unwrap();
        assert_eq!(reopened.read().list_transactions().unwrap().len(), 1);
        assert!(env.connection.read().list_users().unwrap().is_empty());
    }

    #[test]
    fn test_no_temp_files_left_after_commit() {
        let env = TestEnvironment::new().unwrap();
        let unit = env.connection.begin();
        unit.store_user(&sample_user("user-a", 100)).unwrap();
        unit.append_transaction(&sample_transaction("txn-1", "user-a"))
            .unwrap();
        unit.commit().unwrap();

        let leftovers: Vec<_> = fs::read_dir(&env.base_path)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().map_or(false, |ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_rename_restores_published_tables() {
        let env = TestEnvironment::new().unwrap();
        let unit = env.connection.begin();
        unit.store_user(&sample_user("user-a", 10_000)).unwrap();
        unit.commit().unwrap();

        // A non-empty directory where the ledger file belongs cannot be replaced
        let blocker = env.base_path.join("transactions.csv");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let unit = env.connection.begin();
        unit.store_user(&sample_user("user-a", 5_000)).unwrap();
        unit.append_transaction(&sample_transaction("txn-1", "user-a"))
            .unwrap();
        assert!(unit.commit().is_err());

        let cached = env.connection.read().get_user("user-a").unwrap().unwrap();
        assert_eq!(cached.balance, 10_000);
        let on_disk: Vec<User> = yaml_records::load(&env.connection.users_path()).unwrap();
        assert_eq!(on_disk, vec![sample_user("user-a", 10_000)]);

        let leftovers: Vec<_> = fs::read_dir(&env.base_path)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map_or(false, |ext| ext == "tmp" || ext == "bak")
            })
            .collect();
        assert!(leftovers.is_empty());
    }
}
