//! In-memory storage backend. Used by tests and by `storage: memory`
//! deployments where nothing needs to survive a restart.

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex, RwLock};

use super::ledger::{ChangeSet, LedgerData};
use super::traits::{Connection, SessionStorage};

#[derive(Clone, Default)]
pub struct MemoryConnection {
    ledger: Arc<RwLock<LedgerData>>,
    session: Arc<RwLock<Option<String>>>,
    write_lock: Arc<Mutex<()>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: LedgerData) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(data)),
            ..Self::default()
        }
    }
}

impl SessionStorage for MemoryConnection {
    fn get_current_user_id(&self) -> Result<Option<String>> {
        let session = self
            .session
            .read()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        Ok(session.clone())
    }

    fn set_current_user_id(&self, user_id: &str) -> Result<()> {
        let mut session = self
            .session
            .write()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        *session = Some(user_id.to_string());
        Ok(())
    }

    fn clear_current_user_id(&self) -> Result<()> {
        let mut session = self
            .session
            .write()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        *session = None;
        Ok(())
    }
}

impl Connection for MemoryConnection {
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
        let mut ledger = self
            .ledger
            .write()
            .map_err(|_| anyhow!("Ledger lock poisoned"))?;
        let mut next = ledger.clone();
        changes.apply_to(&mut next)?;
        *ledger = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::sample_user;
    use crate::storage::traits::UserStorage;

    #[test]
    fn test_session_slot() {
        let connection = MemoryConnection::new();
        assert_eq!(connection.get_current_user_id().unwrap(), None);
        connection.set_current_user_id("user-001").unwrap();
        assert_eq!(
            connection.get_current_user_id().unwrap().as_deref(),
            Some("user-001")
        );
        connection.clear_current_user_id().unwrap();
        assert_eq!(connection.get_current_user_id().unwrap(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let connection = MemoryConnection::new();
        let other = connection.clone();
        let unit = connection.begin();
        unit.store_user(&sample_user("user-a", 1)).unwrap();
        unit.commit().unwrap();
        assert!(other.read().get_user("user-a").unwrap().is_some());
    }
}
