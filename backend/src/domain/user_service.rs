//! Account management and the name lookups every read model needs.

use chrono::Utc;
use log::info;
use shared::SYSTEM_ACCOUNT;
use std::sync::Arc;

use super::commands::users::CreateUserCommand;
use super::errors::{RoscaError, RoscaResult};
use super::models::user::User;
use crate::storage::{Connection, UserStorage};

/// Name shown for a ledger party: the pooled account, a user, or a
/// placeholder for ids that no longer resolve.
pub fn display_name<S: UserStorage + ?Sized>(storage: &S, party_id: &str) -> RoscaResult<String> {
    if party_id == SYSTEM_ACCOUNT {
        return Ok("System".to_string());
    }
    Ok(storage
        .get_user(party_id)?
        .map(|user| user.name)
        .unwrap_or_else(|| "Unknown".to_string()))
}

/// Load the acting user and fail unless they are an administrator.
pub fn require_admin<S: UserStorage + ?Sized>(storage: &S, actor_id: &str) -> RoscaResult<User> {
    let actor = storage
        .get_user(actor_id)?
        .ok_or_else(|| RoscaError::UserNotFound(actor_id.to_string()))?;
    if !actor.is_admin() {
        return Err(RoscaError::AdminRequired);
    }
    Ok(actor)
}

#[derive(Clone)]
pub struct UserService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> UserService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    pub fn create_user(&self, command: CreateUserCommand) -> RoscaResult<User> {
        let name = command.name.trim();
        let email = command.email.trim();
        if name.is_empty() {
            return Err(RoscaError::InvalidUser("Name cannot be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(RoscaError::InvalidUser(format!(
                "'{}' is not an email address",
                email
            )));
        }
        if command.password.is_empty() {
            return Err(RoscaError::InvalidUser("Password cannot be empty".to_string()));
        }
        if command.opening_balance < 0 {
            return Err(RoscaError::InvalidUser(
                "Opening balance cannot be negative".to_string(),
            ));
        }

        let unit = self.connection.begin();
        if unit.find_user_by_email(email)?.is_some() {
            return Err(RoscaError::EmailTaken(email.to_string()));
        }

        let user = User {
            id: User::generate_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: command.password,
            balance: command.opening_balance,
            role: command.role,
            joined_groups: vec![],
            created_at: Utc::now(),
        };
        unit.store_user(&user)?;
        unit.commit()?;

        info!("Created {} account '{}' ({})", user.role, user.id, user.email);
        Ok(user)
    }

    pub fn get_user(&self, user_id: &str) -> RoscaResult<User> {
        self.connection
            .read()
            .get_user(user_id)?
            .ok_or_else(|| RoscaError::UserNotFound(user_id.to_string()))
    }

    pub fn list_users(&self) -> RoscaResult<Vec<User>> {
        Ok(self.connection.read().list_users()?)
    }

    pub fn display_name(&self, party_id: &str) -> RoscaResult<String> {
        display_name(&self.connection.read(), party_id)
    }
}
