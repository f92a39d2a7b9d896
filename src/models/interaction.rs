//! Interaction model
//!
//! A record of a user touching a content item. The AI insight engines
//! read these to find patterns and predict next actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub user_id: i64,
    pub content_id: i64,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(
        user_id: i64,
        content_id: i64,
        kind: InteractionKind,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            content_id,
            kind,
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Edit,
    Share,
    Like,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::View => write!(f, "view"),
            InteractionKind::Edit => write!(f, "edit"),
            InteractionKind::Share => write!(f, "share"),
            InteractionKind::Like => write!(f, "like"),
        }
    }
}

impl FromStr for InteractionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(InteractionKind::View),
            "edit" => Ok(InteractionKind::Edit),
            "share" => Ok(InteractionKind::Share),
            "like" => Ok(InteractionKind::Like),
            _ => Err(anyhow::anyhow!("Invalid interaction type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInteractionInput {
    pub content_id: i64,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            InteractionKind::View,
            InteractionKind::Edit,
            InteractionKind::Share,
            InteractionKind::Like,
        ] {
            assert_eq!(InteractionKind::from_str(&kind.to_string()).unwrap(), kind);
        }
        assert!(InteractionKind::from_str("click").is_err());
    }

    #[test]
    fn test_input_deserializes_type() {
        let input: CreateInteractionInput =
            serde_json::from_str(r#"{"content_id":3,"type":"share","metadata":{"via":"mail"}}"#)
                .unwrap();
        assert_eq!(input.kind, InteractionKind::Share);
        assert_eq!(input.metadata.unwrap()["via"], "mail");
    }
}
