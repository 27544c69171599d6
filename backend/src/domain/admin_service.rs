use std::sync::Arc;

use super::commands::admin::{AdminOverview, AdminUserSummary};
use super::errors::RoscaResult;
use super::user_service::require_admin;
use crate::storage::{Connection, GroupStorage, TransactionStorage, UserStorage};

#[derive(Clone)]
pub struct AdminService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> AdminService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    /// Store-wide totals plus the groups an administrator can advance.
    pub fn overview(&self, actor_id: &str) -> RoscaResult<AdminOverview> {
        let view = self.connection.read();
        require_admin(&view, actor_id)?;

        let users: Vec<AdminUserSummary> = view
            .list_users()?
            .into_iter()
            .map(|user| AdminUserSummary {
                joined_group_count: user.joined_groups.len(),
                user,
            })
            .collect();
        let groups = view.list_groups()?;
        let active_groups = groups.iter().filter(|g| g.is_active()).cloned().collect();

        Ok(AdminOverview {
            total_users: users.len(),
            total_groups: groups.len(),
            total_transactions: view.list_transactions()?.len(),
            users,
            groups,
            active_groups,
        })
    }
}
