//! Collaboration model
//!
//! Grants a user a role on someone else's content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaboration {
    pub id: i64,
    pub content_id: i64,
    pub user_id: i64,
    pub role: CollaborationRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collaboration {
    pub fn new(content_id: i64, user_id: i64, role: CollaborationRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            content_id,
            user_id,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollaborationRole {
    Owner,
    Editor,
    #[default]
    Viewer,
}

impl CollaborationRole {
    /// Owners and editors may modify the content
    pub fn can_edit(&self) -> bool {
        matches!(self, CollaborationRole::Owner | CollaborationRole::Editor)
    }
}

impl fmt::Display for CollaborationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollaborationRole::Owner => write!(f, "owner"),
            CollaborationRole::Editor => write!(f, "editor"),
            CollaborationRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for CollaborationRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(CollaborationRole::Owner),
            "editor" => Ok(CollaborationRole::Editor),
            "viewer" => Ok(CollaborationRole::Viewer),
            _ => Err(anyhow::anyhow!("Invalid collaboration role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollaborationInput {
    pub user_id: i64,
    pub role: Option<CollaborationRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_can_edit() {
        assert!(CollaborationRole::Owner.can_edit());
        assert!(CollaborationRole::Editor.can_edit());
        assert!(!CollaborationRole::Viewer.can_edit());
    }

    #[test]
    fn test_role_default_and_parse() {
        assert_eq!(CollaborationRole::default(), CollaborationRole::Viewer);
        assert_eq!(CollaborationRole::from_str("OWNER").unwrap(), CollaborationRole::Owner);
        assert!(CollaborationRole::from_str("guest").is_err());
    }
}
