//! Dashboard widget model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A widget on a user's dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub size: WidgetSize,
    /// Sort order on the dashboard, lowest first
    pub position: i32,
    /// Free-form configuration, usually JSON
    pub config: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Widget {
    pub fn new(
        user_id: i64,
        title: String,
        kind: WidgetKind,
        size: WidgetSize,
        position: i32,
        config: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            title,
            kind,
            size,
            position,
            config,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetKind {
    RecentActivity,
    QuickAccess,
    Recommendations,
    Notifications,
    Analytics,
    Custom,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WidgetKind::RecentActivity => "RECENT_ACTIVITY",
            WidgetKind::QuickAccess => "QUICK_ACCESS",
            WidgetKind::Recommendations => "RECOMMENDATIONS",
            WidgetKind::Notifications => "NOTIFICATIONS",
            WidgetKind::Analytics => "ANALYTICS",
            WidgetKind::Custom => "CUSTOM",
        };
        f.write_str(s)
    }
}

impl FromStr for WidgetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RECENT_ACTIVITY" => Ok(WidgetKind::RecentActivity),
            "QUICK_ACCESS" => Ok(WidgetKind::QuickAccess),
            "RECOMMENDATIONS" => Ok(WidgetKind::Recommendations),
            "NOTIFICATIONS" => Ok(WidgetKind::Notifications),
            "ANALYTICS" => Ok(WidgetKind::Analytics),
            "CUSTOM" => Ok(WidgetKind::Custom),
            _ => Err(anyhow::anyhow!("Invalid widget type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetSize::Small => write!(f, "small"),
            WidgetSize::Medium => write!(f, "medium"),
            WidgetSize::Large => write!(f, "large"),
        }
    }
}

impl FromStr for WidgetSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(WidgetSize::Small),
            "medium" => Ok(WidgetSize::Medium),
            "large" => Ok(WidgetSize::Large),
            _ => Err(anyhow::anyhow!("Invalid widget size: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWidgetInput {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub size: Option<WidgetSize>,
    pub position: Option<i32>,
    pub config: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWidgetInput {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<WidgetKind>,
    pub size: Option<WidgetSize>,
    pub position: Option<i32>,
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_format() {
        let json = serde_json::to_value(WidgetKind::RecentActivity).unwrap();
        assert_eq!(json, "RECENT_ACTIVITY");
        assert_eq!(WidgetKind::QuickAccess.to_string(), "QUICK_ACCESS");
        assert_eq!(WidgetKind::from_str("analytics").unwrap(), WidgetKind::Analytics);
        assert!(WidgetKind::from_str("CHART").is_err());
    }

    #[test]
    fn test_size_default() {
        assert_eq!(WidgetSize::default(), WidgetSize::Medium);
        assert_eq!(WidgetSize::from_str("LARGE").unwrap(), WidgetSize::Large);
    }

    #[test]
    fn test_create_input() {
        let input: CreateWidgetInput =
            serde_json::from_str(r#"{"title":"Stats","type":"ANALYTICS"}"#).unwrap();
        assert_eq!(input.kind, WidgetKind::Analytics);
        assert!(input.size.is_none());
        assert!(input.position.is_none());
    }
}
