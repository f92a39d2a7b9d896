//! Content suggestion model
//!
//! Stored output of the AI content analysis for one content item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSuggestion {
    pub id: i64,
    pub content_id: i64,
    pub suggestion: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub confidence: f64,
    pub applied: bool,
    pub created_at: DateTime<Utc>,
}

impl ContentSuggestion {
    pub fn new(content_id: i64, suggestion: String, kind: SuggestionKind, confidence: f64) -> Self {
        Self {
            id: 0,
            content_id,
            suggestion,
            kind,
            confidence,
            applied: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Improvement,
    Structure,
    Clarity,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionKind::Improvement => write!(f, "improvement"),
            SuggestionKind::Structure => write!(f, "structure"),
            SuggestionKind::Clarity => write!(f, "clarity"),
        }
    }
}

impl FromStr for SuggestionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "improvement" => Ok(SuggestionKind::Improvement),
            "structure" => Ok(SuggestionKind::Structure),
            "clarity" => Ok(SuggestionKind::Clarity),
            _ => Err(anyhow::anyhow!("Invalid suggestion type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unapplied() {
        let s = ContentSuggestion::new(4, "More".to_string(), SuggestionKind::Improvement, 0.85);
        assert!(!s.applied);
        assert_eq!(s.content_id, 4);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(SuggestionKind::from_str("Structure").unwrap(), SuggestionKind::Structure);
        assert!(SuggestionKind::from_str("style").is_err());
        let json = serde_json::to_value(SuggestionKind::Clarity).unwrap();
        assert_eq!(json, "clarity");
    }
}
