//! Login state. Credentials are compared by plain equality; the logged-in
//! user's id is the only session state and lives in the store's session key.

use log::{info, warn};
use std::sync::Arc;

use super::commands::session::LoginCommand;
use super::errors::{RoscaError, RoscaResult};
use super::models::user::User;
use crate::storage::{Connection, SessionStorage, UserStorage};

#[derive(Clone)]
pub struct SessionService<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> SessionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    /// Log in as the first user (in store order) whose email and password
    /// both match.
    pub fn login(&self, command: LoginCommand) -> RoscaResult<User> {
        let user = self
            .connection
            .read()
            .list_users()?
            .into_iter()
            .find(|user| user.credentials_match(&command.email, &command.password))
            .ok_or_else(|| {
                warn!("Failed login attempt for '{}'", command.email);
                RoscaError::InvalidCredentials
            })?;

        self.connection.set_current_user_id(&user.id)?;
        info!("User '{}' logged in", user.id);
        Ok(user)
    }

    pub fn logout(&self) -> RoscaResult<()> {
        self.connection.clear_current_user_id()?;
        info!("Logged out");
        Ok(())
    }

    /// The logged-in user, if any. A session pointing at a user that no longer
    /// exists is cleared.
    pub fn current_user(&self) -> RoscaResult<Option<User>> {
        let Some(user_id) = self.connection.get_current_user_id()? else {
            return Ok(None);
        };
        match self.connection.read().get_user(&user_id)? {
            Some(user) => Ok(Some(user)),
            None => {
                warn!("Session refers to missing user '{}', clearing it", user_id);
                self.connection.clear_current_user_id()?;
                Ok(None)
            }
        }
    }

    pub fn require_current_user(&self) -> RoscaResult<User> {
        self.current_user()?.ok_or(RoscaError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::demo_ledger;
    use crate::storage::MemoryConnection;

    fn service() -> SessionService<MemoryConnection> {
        SessionService::new(Arc::new(MemoryConnection::with_data(demo_ledger())))
    }

    fn login(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_sets_current_user() {
        let service = service();
        assert!(service.current_user().unwrap().is_none());

        let user = service.login(login("ivan@example.com", "pass123")).unwrap();
        assert_eq!(user.id, "user-001");
        assert_eq!(service.require_current_user().unwrap().id, "user-001");
    }

    #[test]
    fn test_wrong_password_rejected() {
        let service = service();
        let err = service.login(login("ivan@example.com", "nope")).unwrap_err();
        assert!(matches!(err, RoscaError::InvalidCredentials));
        assert!(service.current_user().unwrap().is_none());
    }

    #[test]
    fn test_logout_clears_session() {
        let service = service();
        service.login(login("admin@rosca.app", "admin123")).unwrap();
        service.logout().unwrap();
        assert!(matches!(
            service.require_current_user().unwrap_err(),
            RoscaError::NotAuthenticated
        ));
    }

    #[test]
    fn test_session_for_deleted_user_is_cleared() {
        let service = service();
        service.login(login("anna@example.com", "pass123")).unwrap();

        let unit = service.connection.begin();
        unit.delete_user("user-002").unwrap();
        unit.commit().unwrap();

        assert!(service.current_user().unwrap().is_none());
        assert_eq!(service.connection.get_current_user_id().unwrap(), None);
    }
}
