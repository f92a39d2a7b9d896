//! Interaction repository
//!
//! Append-only log of user activity on content.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Interaction, InteractionKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn create(&self, interaction: &Interaction) -> Result<Interaction>;

    /// Newest first, at most `limit` entries
    async fn list_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Interaction>>;
}

pub struct SqlxInteractionRepository {
    pool: DynDatabasePool,
}

impl SqlxInteractionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn InteractionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl InteractionRepository for SqlxInteractionRepository {
    async fn create(&self, interaction: &Interaction) -> Result<Interaction> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_interaction_sqlite(self.pool.sqlite()?, interaction).await
            }
            DatabaseDriver::Mysql => create_interaction_mysql(self.pool.mysql()?, interaction).await,
        }
    }

    async fn list_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Interaction>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_interactions_sqlite(self.pool.sqlite()?, user_id, limit).await
            }
            DatabaseDriver::Mysql => {
                list_interactions_mysql(self.pool.mysql()?, user_id, limit).await
            }
        }
    }
}

const INSERT_SQL: &str = r#"
    INSERT INTO interactions (user_id, content_id, kind, metadata, created_at)
    VALUES (?, ?, ?, ?, ?)
"#;

const LIST_SQL: &str = r#"
    SELECT id, user_id, content_id, kind, metadata, created_at
    FROM interactions
    WHERE user_id = ?
    ORDER BY created_at DESC, id DESC
    LIMIT ?
"#;

fn encode_metadata(metadata: &Option<serde_json::Value>) -> Result<Option<String>> {
    metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to serialize interaction metadata")
}

fn decode_metadata(raw: Option<String>) -> Option<serde_json::Value> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_interaction_sqlite(pool: &SqlitePool, interaction: &Interaction) -> Result<Interaction> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_SQL)
        .bind(interaction.user_id)
        .bind(interaction.content_id)
        .bind(interaction.kind.to_string())
        .bind(encode_metadata(&interaction.metadata)?)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create interaction")?;

    Ok(Interaction {
        id: result.last_insert_rowid(),
        created_at: now,
        ..interaction.clone()
    })
}

async fn list_interactions_sqlite(pool: &SqlitePool, user_id: i64, limit: i64) -> Result<Vec<Interaction>> {
    let rows = sqlx::query(LIST_SQL)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to list interactions")?;

    rows.iter()
        .map(|row| {
            let kind_str: String = row.get("kind");
            Ok(Interaction {
                id: row.get("id"),
                user_id: row.get("user_id"),
                content_id: row.get("content_id"),
                kind: InteractionKind::from_str(&kind_str)?,
                metadata: decode_metadata(row.get("metadata")),
                created_at: row.get("created_at"),
            })
        })
        .collect()
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_interaction_mysql(pool: &MySqlPool, interaction: &Interaction) -> Result<Interaction> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_SQL)
        .bind(interaction.user_id)
        .bind(interaction.content_id)
        .bind(interaction.kind.to_string())
        .bind(encode_metadata(&interaction.metadata)?)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create interaction")?;

    Ok(Interaction {
        id: result.last_insert_id() as i64,
        created_at: now,
        ..interaction.clone()
    })
}

async fn list_interactions_mysql(pool: &MySqlPool, user_id: i64, limit: i64) -> Result<Vec<Interaction>> {
    let rows = sqlx::query(LIST_SQL)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to list interactions")?;

    rows.iter()
        .map(|row| {
            let kind_str: String = row.get("kind");
            Ok(Interaction {
                id: row.get("id"),
                user_id: row.get("user_id"),
                content_id: row.get("content_id"),
                kind: InteractionKind::from_str(&kind_str)?,
                metadata: decode_metadata(row.get("metadata")),
                created_at: row.get("created_at"),
            })
        })
        .collect()
}
