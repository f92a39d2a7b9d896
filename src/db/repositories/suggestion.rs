//! Content suggestion repository
//!
//! Applying a suggestion also rewrites its content body, so that write
//! lives here inside the same transaction as the claim.

use crate::config::DatabaseDriver;
use crate::db::repositories::content::search_key;
use crate::db::DynDatabasePool;
use crate::models::{ContentSuggestion, SuggestionKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<ContentSuggestion>>;

    /// Suggestions of one content item, oldest first
    async fn list_by_content(&self, content_id: i64) -> Result<Vec<ContentSuggestion>>;

    /// Swap the never-applied suggestions of a content item for `fresh`
    /// in one transaction, returning the stored rows
    async fn replace_unapplied(
        &self,
        content_id: i64,
        fresh: &[ContentSuggestion],
    ) -> Result<Vec<ContentSuggestion>>;

    /// Mark a suggestion applied and append `body_suffix` to its content,
    /// atomically. Returns `false` when the suggestion was already applied.
    async fn apply(&self, id: i64, content_id: i64, body_suffix: Option<&str>) -> Result<bool>;
}

pub struct SqlxSuggestionRepository {
    pool: DynDatabasePool,
}

impl SqlxSuggestionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SuggestionRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_SQL: &str =
    "SELECT id, content_id, suggestion, kind, confidence, applied, created_at FROM content_suggestions";

const INSERT_SQL: &str = r#"
    INSERT INTO content_suggestions (content_id, suggestion, kind, confidence, applied, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

const DELETE_UNAPPLIED_SQL: &str =
    "DELETE FROM content_suggestions WHERE content_id = ? AND applied = FALSE";

/// Claim guard: only one caller can flip `applied`
const CLAIM_SQL: &str =
    "UPDATE content_suggestions SET applied = TRUE WHERE id = ? AND applied = FALSE";

#[async_trait]
impl SuggestionRepository for SqlxSuggestionRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<ContentSuggestion>> {
        let sql = format!("{} WHERE id = ?", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get suggestion")?;
                row.as_ref().map(row_to_suggestion_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get suggestion")?;
                row.as_ref().map(row_to_suggestion_mysql).transpose()
            }
        }
    }

    async fn list_by_content(&self, content_id: i64) -> Result<Vec<ContentSuggestion>> {
        let sql = format!("{} WHERE content_id = ? ORDER BY id ASC", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .bind(content_id)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list suggestions")?;
                rows.iter().map(row_to_suggestion_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .bind(content_id)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list suggestions")?;
                rows.iter().map(row_to_suggestion_mysql).collect()
            }
        }
    }

    async fn replace_unapplied(
        &self,
        content_id: i64,
        fresh: &[ContentSuggestion],
    ) -> Result<Vec<ContentSuggestion>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                replace_unapplied_sqlite(self.pool.sqlite()?, content_id, fresh).await
            }
            DatabaseDriver::Mysql => {
                replace_unapplied_mysql(self.pool.mysql()?, content_id, fresh).await
            }
        }
    }

    async fn apply(&self, id: i64, content_id: i64, body_suffix: Option<&str>) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                apply_suggestion_sqlite(self.pool.sqlite()?, id, content_id, body_suffix).await
            }
            DatabaseDriver::Mysql => {
                apply_suggestion_mysql(self.pool.mysql()?, id, content_id, body_suffix).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn replace_unapplied_sqlite(
    pool: &SqlitePool,
    content_id: i64,
    fresh: &[ContentSuggestion],
) -> Result<Vec<ContentSuggestion>> {
    let now = Utc::now();
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(DELETE_UNAPPLIED_SQL)
        .bind(content_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear pending suggestions")?;

    let mut stored = Vec::with_capacity(fresh.len());
    for s in fresh {
        let result = sqlx::query(INSERT_SQL)
            .bind(content_id)
            .bind(&s.suggestion)
            .bind(s.kind.to_string())
            .bind(s.confidence)
            .bind(s.applied)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to create suggestion")?;
        stored.push(ContentSuggestion {
            id: result.last_insert_rowid(),
            content_id,
            created_at: now,
            ..s.clone()
        });
    }

    tx.commit().await.context("Failed to commit suggestions")?;
    Ok(stored)
}

async fn apply_suggestion_sqlite(
    pool: &SqlitePool,
    id: i64,
    content_id: i64,
    body_suffix: Option<&str>,
) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let claimed = sqlx::query(CLAIM_SQL)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to mark suggestion applied")?
        .rows_affected();
    if claimed == 0 {
        tx.rollback().await.context("Failed to roll back")?;
        return Ok(false);
    }

    if let Some(suffix) = body_suffix {
        sqlx::query(
            r#"
            UPDATE contents
            SET body = body || ?, search_body = search_body || ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(suffix)
        .bind(search_key(suffix))
        .bind(Utc::now())
        .bind(content_id)
        .execute(&mut *tx)
        .await
        .context("Failed to append to content body")?;
    }

    tx.commit().await.context("Failed to commit applied suggestion")?;
    Ok(true)
}

fn row_to_suggestion_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<ContentSuggestion> {
    let kind_str: String = row.get("kind");
    Ok(ContentSuggestion {
        id: row.get("id"),
        content_id: row.get("content_id"),
        suggestion: row.get("suggestion"),
        kind: SuggestionKind::from_str(&kind_str)?,
        confidence: row.get("confidence"),
        applied: row.get("applied"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn replace_unapplied_mysql(
    pool: &MySqlPool,
    content_id: i64,
    fresh: &[ContentSuggestion],
) -> Result<Vec<ContentSuggestion>> {
    let now = Utc::now();
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(DELETE_UNAPPLIED_SQL)
        .bind(content_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear pending suggestions")?;

    let mut stored = Vec::with_capacity(fresh.len());
    for s in fresh {
        let result = sqlx::query(INSERT_SQL)
            .bind(content_id)
            .bind(&s.suggestion)
            .bind(s.kind.to_string())
            .bind(s.confidence)
            .bind(s.applied)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to create suggestion")?;
        stored.push(ContentSuggestion {
            id: result.last_insert_id() as i64,
            content_id,
            created_at: now,
            ..s.clone()
        });
    }

    tx.commit().await.context("Failed to commit suggestions")?;
    Ok(stored)
}

async fn apply_suggestion_mysql(
    pool: &MySqlPool,
    id: i64,
    content_id: i64,
    body_suffix: Option<&str>,
) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let claimed = sqlx::query(CLAIM_SQL)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to mark suggestion applied")?
        .rows_affected();
    if claimed == 0 {
        tx.rollback().await.context("Failed to roll back")?;
        return Ok(false);
    }

    if let Some(suffix) = body_suffix {
        sqlx::query(
            r#"
            UPDATE contents
            SET body = CONCAT(body, ?), search_body = CONCAT(search_body, ?), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(suffix)
        .bind(search_key(suffix))
        .bind(Utc::now())
        .bind(content_id)
        .execute(&mut *tx)
        .await
        .context("Failed to append to content body")?;
    }

    tx.commit().await.context("Failed to commit applied suggestion")?;
    Ok(true)
}

fn row_to_suggestion_mysql(row: &sqlx::mysql::MySqlRow) -> Result<ContentSuggestion> {
    let kind_str: String = row.get("kind");
    Ok(ContentSuggestion {
        id: row.get("id"),
        content_id: row.get("content_id"),
        suggestion: row.get("suggestion"),
        kind: SuggestionKind::from_str(&kind_str)?,
        confidence: row.get("confidence"),
        applied: row.get("applied"),
        created_at: row.get("created_at"),
    })
}
