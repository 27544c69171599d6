//! # File Storage Module
//!
//! Directory-backed store. Entity tables are YAML files, the append-only
//! ledger is a CSV file and the logged-in user lives in its own small YAML
//! file.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── users.yaml
//! ├── groups.yaml
//! ├── notifications.yaml
//! ├── transactions.csv
//! └── session.yaml
//! ```
//!
//! All writes go to a `.tmp` sibling first and are renamed into place only
//! once every file touched by a commit has been written.

pub mod connection;
pub mod session;
pub mod transaction_ledger;
pub mod yaml_records;

pub use connection::FileConnection;
