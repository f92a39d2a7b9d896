//! Tag model
//!
//! Tags label content. Each tag carries a kind and an optional category
//! name used to group tags in the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: i64,
    /// Unique name
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
    /// Group name, e.g. "business"
    pub category: Option<String>,
    /// Number of contents carrying this tag
    #[serde(default)]
    pub count: i64,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String, kind: TagKind, category: Option<String>) -> Self {
        Self {
            id: 0,
            name,
            kind,
            category,
            count: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Category,
    #[default]
    Tag,
    System,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Category => write!(f, "category"),
            TagKind::Tag => write!(f, "tag"),
            TagKind::System => write!(f, "system"),
        }
    }
}

impl FromStr for TagKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(TagKind::Category),
            "tag" => Ok(TagKind::Tag),
            "system" => Ok(TagKind::System),
            _ => Err(anyhow::anyhow!("Invalid tag type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagInput {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<TagKind>,
    pub category: Option<String>,
}
