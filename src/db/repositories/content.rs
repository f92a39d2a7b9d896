//! Content repository
//!
//! This module provides:
//! - `ContentRepository` trait defining the interface for content data access
//! - `SqlxContentRepository` implementing the trait for SQLite and MySQL
//!
//! Listing supports status, tag and text filters plus draft visibility,
//! always ordered by most recently updated first.
//!
//! Text search runs against `search_title`/`search_body`, lowercased copies
//! of title and body written on every insert and update. SQLite's `LOWER()`
//! and `LIKE` only fold ASCII, so folding happens here instead.

use super::placeholders;
use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{
    Content, ContentChanges, ContentFilter, ContentFormat, ContentStatus, ListParams, Visibility,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Content repository trait
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create(&self, content: &Content) -> Result<Content>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Content>>;

    /// Overwrite only the changed columns and bump `updated_at`.
    /// Returns `None` when the content no longer exists.
    async fn update(&self, id: i64, changes: &ContentChanges) -> Result<Option<Content>>;

    /// Delete a content item; tags links, collaborations and suggestions cascade
    async fn delete(&self, id: i64) -> Result<()>;

    /// Filtered page of content plus the total match count
    async fn list(&self, filter: &ContentFilter, params: &ListParams) -> Result<(Vec<Content>, i64)>;

    /// Replace the tag set of a content item
    async fn set_tags(&self, content_id: i64, tag_ids: &[i64]) -> Result<()>;
}

/// SQLx-based content repository implementation
pub struct SqlxContentRepository {
    pool: DynDatabasePool,
}

impl SqlxContentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContentRepository for SqlxContentRepository {
    async fn create(&self, content: &Content) -> Result<Content> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_content_sqlite(self.pool.sqlite()?, content).await,
            DatabaseDriver::Mysql => create_content_mysql(self.pool.mysql()?, content).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Content>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_content_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_content_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn update(&self, id: i64, changes: &ContentChanges) -> Result<Option<Content>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_content_sqlite(self.pool.sqlite()?, id, changes).await,
            DatabaseDriver::Mysql => update_content_mysql(self.pool.mysql()?, id, changes).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM contents WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.sqlite()?)
                    .await
                    .context("Failed to delete content")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.mysql()?)
                    .await
                    .context("Failed to delete content")?;
            }
        }
        Ok(())
    }

    async fn list(&self, filter: &ContentFilter, params: &ListParams) -> Result<(Vec<Content>, i64)> {
        let query = FilterQuery::build(filter);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_contents_sqlite(self.pool.sqlite()?, &query, params).await,
            DatabaseDriver::Mysql => list_contents_mysql(self.pool.mysql()?, &query, params).await,
        }
    }

    async fn set_tags(&self, content_id: i64, tag_ids: &[i64]) -> Result<()> {
        let mut unique = tag_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        match self.pool.driver() {
            DatabaseDriver::Sqlite => set_tags_sqlite(self.pool.sqlite()?, content_id, &unique).await,
            DatabaseDriver::Mysql => set_tags_mysql(self.pool.mysql()?, content_id, &unique).await,
        }
    }
}

const CONTENT_COLUMNS: &str =
    "c.id, c.title, c.body, c.format, c.status, c.author_id, c.created_at, c.updated_at";

/// A bind value for dynamically built WHERE clauses
#[derive(Debug, Clone, PartialEq)]
enum FilterValue {
    Int(i64),
    Text(String),
}

/// WHERE clause and its bind values, shared by both dialects
#[derive(Debug)]
struct FilterQuery {
    where_clause: String,
    values: Vec<FilterValue>,
}

impl FilterQuery {
    fn build(filter: &ContentFilter) -> Self {
        let mut conditions: Vec<String> = Vec::new();
        let mut values = Vec::new();

        if let Visibility::PublishedOrAuthor(author_id) = filter.visibility {
            conditions.push("(c.status = 'published' OR c.author_id = ?)".to_string());
            values.push(FilterValue::Int(author_id));
        }

        if let Some(status) = filter.status {
            conditions.push("c.status = ?".to_string());
            values.push(FilterValue::Text(status.to_string()));
        }

        if !filter.tag_ids.is_empty() {
            conditions.push(format!(
                "c.id IN (SELECT ct.content_id FROM content_tags ct WHERE ct.tag_id IN ({}))",
                placeholders(filter.tag_ids.len())
            ));
            values.extend(filter.tag_ids.iter().map(|id| FilterValue::Int(*id)));
        }

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(&search_key(search)));
            conditions.push(
                "(c.search_title LIKE ? ESCAPE '!' OR c.search_body LIKE ? ESCAPE '!')".to_string(),
            );
            values.push(FilterValue::Text(pattern.clone()));
            values.push(FilterValue::Text(pattern));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        Self {
            where_clause,
            values,
        }
    }
}

/// Case-folded form stored in the search columns and used for patterns
pub(crate) fn search_key(text: &str) -> String {
    text.to_lowercase()
}

const INSERT_SQL: &str = r#"
    INSERT INTO contents
        (title, body, search_title, search_body, format, status, author_id, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_SQL: &str = r#"
    UPDATE contents
    SET title = COALESCE(?, title),
        search_title = COALESCE(?, search_title),
        body = COALESCE(?, body),
        search_body = COALESCE(?, search_body),
        format = COALESCE(?, format),
        status = COALESCE(?, status),
        updated_at = ?
    WHERE id = ?
"#;

/// Escape LIKE wildcards with `!`
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '!' | '%' | '_') {
            escaped.push('!');
        }
        escaped.push(ch);
    }
    escaped
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_content_sqlite(pool: &SqlitePool, content: &Content) -> Result<Content> {
    let now = Utc::now();

    let result = sqlx::query(INSERT_SQL)
        .bind(&content.title)
        .bind(&content.body)
        .bind(search_key(&content.title))
        .bind(search_key(&content.body))
        .bind(content.format.to_string())
        .bind(content.status.to_string())
        .bind(content.author_id)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create content")?;

    Ok(Content {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..content.clone()
    })
}

async fn get_content_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("SELECT {} FROM contents c WHERE c.id = ?", CONTENT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get content by ID")?;

    row.as_ref().map(row_to_content_sqlite).transpose()
}

async fn update_content_sqlite(
    pool: &SqlitePool,
    id: i64,
    changes: &ContentChanges,
) -> Result<Option<Content>> {
    sqlx::query(UPDATE_SQL)
        .bind(changes.title.as_deref())
        .bind(changes.title.as_deref().map(search_key))
        .bind(changes.body.as_deref())
        .bind(changes.body.as_deref().map(search_key))
        .bind(changes.format.map(|f| f.to_string()))
        .bind(changes.status.map(|s| s.to_string()))
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update content")?;

    get_content_by_id_sqlite(pool, id).await
}

async fn list_contents_sqlite(
    pool: &SqlitePool,
    filter: &FilterQuery,
    params: &ListParams,
) -> Result<(Vec<Content>, i64)> {
    let count_sql = format!("SELECT COUNT(*) as count FROM contents c {}", filter.where_clause);
    let mut count_query = sqlx::query(&count_sql);
    for value in &filter.values {
        count_query = match value {
            FilterValue::Int(v) => count_query.bind(*v),
            FilterValue::Text(v) => count_query.bind(v.as_str()),
        };
    }
    let total: i64 = count_query
        .fetch_one(pool)
        .await
        .context("Failed to count contents")?
        .get("count");

    let list_sql = format!(
        "SELECT {} FROM contents c {} ORDER BY c.updated_at DESC, c.id DESC LIMIT ? OFFSET ?",
        CONTENT_COLUMNS, filter.where_clause
    );
    let mut list_query = sqlx::query(&list_sql);
    for value in &filter.values {
        list_query = match value {
            FilterValue::Int(v) => list_query.bind(*v),
            FilterValue::Text(v) => list_query.bind(v.as_str()),
        };
    }
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .context("Failed to list contents")?;

    let items = rows.iter().map(row_to_content_sqlite).collect::<Result<Vec<_>>>()?;
    Ok((items, total))
}

async fn set_tags_sqlite(pool: &SqlitePool, content_id: i64, tag_ids: &[i64]) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query("DELETE FROM content_tags WHERE content_id = ?")
        .bind(content_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear content tags")?;

    for tag_id in tag_ids {
        sqlx::query("INSERT INTO content_tags (content_id, tag_id) VALUES (?, ?)")
            .bind(content_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .context("Failed to link tag to content")?;
    }

    tx.commit().await.context("Failed to commit content tags")?;
    Ok(())
}

fn row_to_content_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Content> {
    let format_str: String = row.get("format");
    let status_str: String = row.get("status");

    Ok(Content {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        format: ContentFormat::from_str(&format_str)
            .with_context(|| format!("Invalid format in database: {}", format_str))?,
        status: ContentStatus::from_str(&status_str)
            .with_context(|| format!("Invalid status in database: {}", status_str))?,
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_content_mysql(pool: &MySqlPool, content: &Content) -> Result<Content> {
    let now = Utc::now();

    let result = sqlx::query(INSERT_SQL)
        .bind(&content.title)
        .bind(&content.body)
        .bind(search_key(&content.title))
        .bind(search_key(&content.body))
        .bind(content.format.to_string())
        .bind(content.status.to_string())
        .bind(content.author_id)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create content")?;

    Ok(Content {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..content.clone()
    })
}

async fn get_content_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("SELECT {} FROM contents c WHERE c.id = ?", CONTENT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get content by ID")?;

    row.as_ref().map(row_to_content_mysql).transpose()
}

async fn update_content_mysql(
    pool: &MySqlPool,
    id: i64,
    changes: &ContentChanges,
) -> Result<Option<Content>> {
    sqlx::query(UPDATE_SQL)
        .bind(changes.title.as_deref())
        .bind(changes.title.as_deref().map(search_key))
        .bind(changes.body.as_deref())
        .bind(changes.body.as_deref().map(search_key))
        .bind(changes.format.map(|f| f.to_string()))
        .bind(changes.status.map(|s| s.to_string()))
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update content")?;

    get_content_by_id_mysql(pool, id).await
}

async fn list_contents_mysql(
    pool: &MySqlPool,
    filter: &FilterQuery,
    params: &ListParams,
) -> Result<(Vec<Content>, i64)> {
    let count_sql = format!("SELECT COUNT(*) as count FROM contents c {}", filter.where_clause);
    let mut count_query = sqlx::query(&count_sql);
    for value in &filter.values {
        count_query = match value {
            FilterValue::Int(v) => count_query.bind(*v),
            FilterValue::Text(v) => count_query.bind(v.as_str()),
        };
    }
    let total: i64 = count_query
        .fetch_one(pool)
        .await
        .context("Failed to count contents")?
        .get("count");

    let list_sql = format!(
        "SELECT {} FROM contents c {} ORDER BY c.updated_at DESC, c.id DESC LIMIT ? OFFSET ?",
        CONTENT_COLUMNS, filter.where_clause
    );
    let mut list_query = sqlx::query(&list_sql);
    for value in &filter.values {
        list_query = match value {
            FilterValue::Int(v) => list_query.bind(*v),
            FilterValue::Text(v) => list_query.bind(v.as_str()),
        };
    }
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .context("Failed to list contents")?;

    let items = rows.iter().map(row_to_content_mysql).collect::<Result<Vec<_>>>()?;
    Ok((items, total))
}

async fn set_tags_mysql(pool: &MySqlPool, content_id: i64, tag_ids: &[i64]) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query("DELETE FROM content_tags WHERE content_id = ?")
        .bind(content_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear content tags")?;

    for tag_id in tag_ids {
        sqlx::query("INSERT INTO content_tags (content_id, tag_id) VALUES (?, ?)")
            .bind(content_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .context("Failed to link tag to content")?;
    }

    tx.commit().await.context("Failed to commit content tags")?;
    Ok(())
}

fn row_to_content_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Content> {
    let format_str: String = row.get("format");
    let status_str: String = row.get("status");

    Ok(Content {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        format: ContentFormat::from_str(&format_str)
            .with_context(|| format!("Invalid format in database: {}", format_str))?,
        status: ContentStatus::from_str(&status_str)
            .with_context(|| format!("Invalid status in database: {}", status_str))?,
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
