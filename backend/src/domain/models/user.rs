//! Domain model for a group member account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Compared by plain equality at login
    pub password: String,
    /// Whole currency units; may only go negative through direct edits
    pub balance: i64,
    pub role: Role,
    pub joined_groups: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn generate_id() -> String {
        format!("user-{}", Uuid::new_v4())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }

    pub fn has_joined(&self, group_id: &str) -> bool {
        self.joined_groups.iter().any(|g| g == group_id)
    }

    /// Add a group to the joined list, ignoring duplicates.
    pub fn record_joined_group(&mut self, group_id: &str) {
        if !self.has_joined(group_id) {
            self.joined_groups.push(group_id.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "user-001".to_string(),
            name: "Ivan Petrov".to_string(),
            email: "ivan@example.com".to_string(),
            password: "pass123".to_string(),
            balance: 15000,
            role: Role::User,
            joined_groups: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_credentials_require_both_fields() {
        let user = sample_user();
        assert!(user.credentials_match("ivan@example.com", "pass123"));
        assert!(!user.credentials_match("ivan@example.com", "wrong"));
        assert!(!user.credentials_match("IVAN@example.com", "pass123"));
    }

    #[test]
    fn test_record_joined_group_is_idempotent() {
        let mut user = sample_user();
        user.record_joined_group("group-001");
        user.record_joined_group("group-001");
        assert_eq!(user.joined_groups, vec!["group-001".to_string()]);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" user ".parse::<Role>().unwrap(), Role::User);
        assert!("owner".parse::<Role>().is_err());
    }
}
