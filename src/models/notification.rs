//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A message addressed to one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: i64,
        kind: NotificationKind,
        message: String,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            kind,
            message,
            read: false,
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    System,
    Content,
    Collaboration,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::System => write!(f, "system"),
            NotificationKind::Content => write!(f, "content"),
            NotificationKind::Collaboration => write!(f, "collaboration"),
        }
    }
}

impl FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(NotificationKind::System),
            "content" => Ok(NotificationKind::Content),
            "collaboration" => Ok(NotificationKind::Collaboration),
            _ => Err(anyhow::anyhow!("Invalid notification type: {}", s)),
        }
    }
}
