//! # Domain Module
//!
//! Business rules of a rotating savings group: accounts and the session,
//! group formation, contributions, round payouts and the read models built
//! on top of the ledger.
//!
//! Every service is generic over a storage [`Connection`](crate::storage::Connection)
//! and runs each write operation inside one unit of work, so a failed
//! operation leaves balances, groups and the ledger exactly as they were.
//! Failures are reported as [`RoscaError`].

pub mod admin_service;
pub mod commands;
pub mod contribution_service;
pub mod dashboard_service;
pub mod errors;
pub mod group_service;
pub mod models;
pub mod notification_service;
pub mod round_service;
pub mod schedule;
pub mod session_service;
pub mod snapshot_service;
pub mod transaction_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use contribution_service::ContributionService;
pub use dashboard_service::DashboardService;
pub use errors::{RoscaError, RoscaResult};
pub use group_service::GroupService;
pub use notification_service::NotificationService;
pub use round_service::RoundService;
pub use session_service::SessionService;
pub use snapshot_service::SnapshotService;
pub use transaction_service::TransactionService;
pub use user_service::UserService;
