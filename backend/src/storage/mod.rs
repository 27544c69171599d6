//! # Storage Module
//!
//! Persistence for users, groups, the transaction ledger, notifications and
//! the session key.
//!
//! Two interchangeable backends implement [`Connection`]:
//!
//! - [`MemoryConnection`]: process-local, for tests and throwaway servers
//! - [`FileConnection`]: a data directory of YAML and CSV files
//!
//! The domain layer never writes to a connection directly. It opens a
//! [`UnitOfWork`], reads and stages writes through the repository traits, and
//! commits once, so each logical operation is all-or-nothing.

pub mod file;
pub mod ledger;
pub mod memory;
pub mod seed;
pub mod snapshot;
pub mod traits;
pub mod unit_of_work;

#[cfg(test)]
pub mod test_utils;

pub use file::FileConnection;
pub use ledger::{ChangeSet, LedgerData};
pub use memory::MemoryConnection;
pub use snapshot::LedgerSnapshot;
pub use traits::{
    Connection, GroupStorage, NotificationStorage, SessionStorage, TransactionStorage,
    UserStorage,
};
pub use unit_of_work::UnitOfWork;
