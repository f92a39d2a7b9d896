//! User model
//!
//! Registered accounts and their roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered user.
///
/// The role decides what the user may do beyond their own records:
/// editors see and edit all content, admins additionally manage users,
/// tags and notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique, used to log in)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, not yet persisted user.
    ///
    /// The password must already be hashed, see `services::password::hash_password()`.
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Editors and admins
    pub fn is_editor(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Editor)
    }

    /// Whether this user may change the account with the given id
    pub fn can_manage(&self, user_id: i64) -> bool {
        self.is_admin() || self.id == user_id
    }
}

/// User role for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
    #[default]
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Editor => write!(f, "editor"),
            UserRole::User => write!(f, "user"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            "user" => Ok(UserRole::User),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Input for changing a user; absent fields stay untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Plaintext, hashed by the service
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: UserRole) -> User {
        User::new("Test".to_string(), "t@example.com".to_string(), "hash".to_string(), role)
    }

    #[test]
    fn test_user_new() {
        let user = user_with_role(UserRole::User);
        assert_eq!(user.id, 0);
        assert_eq!(user.name, "Test");
        assert_eq!(user.email, "t@example.com");
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn test_role_checks() {
        let admin = user_with_role(UserRole::Admin);
        let editor = user_with_role(UserRole::Editor);
        let user = user_with_role(UserRole::User);

        assert!(admin.is_admin() && admin.is_editor());
        assert!(!editor.is_admin() && editor.is_editor());
        assert!(!user.is_admin() && !user.is_editor());
    }

    #[test]
    fn test_can_manage() {
        let mut admin = user_with_role(UserRole::Admin);
        admin.id = 1;
        let mut user = user_with_role(UserRole::User);
        user.id = 2;

        assert!(admin.can_manage(2));
        assert!(user.can_manage(2));
        assert!(!user.can_manage(1));
    }

    #[test]
    fn test_role_round_trip_and_default() {
        for role in [UserRole::Admin, UserRole::Editor, UserRole::User] {
            assert_eq!(UserRole::from_str(&role.to_string()).unwrap(), role);
        }
        assert_eq!(UserRole::from_str("ADMIN").unwrap(), UserRole::Admin);
        assert!(UserRole::from_str("author").is_err());
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = user_with_role(UserRole::User);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }
}
