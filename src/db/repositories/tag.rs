//! Tag repository
//!
//! This module provides:
//! - `TagRepository` trait defining the interface for tag data access
//! - `SqlxTagRepository` implementing the trait for SQLite and MySQL
//!
//! Every tag read carries `count`, the number of contents linked to it.

use super::placeholders;
use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Tag, TagKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, tag: &Tag) -> Result<Tag>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Exact, case-insensitive name lookup
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// All tags ordered by name, optionally restricted to one kind
    async fn list(&self, kind: Option<TagKind>) -> Result<Vec<Tag>>;

    /// Tags with the given ids; unknown ids are skipped
    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>>;

    /// Tags linked to a content item, ordered by name
    async fn get_by_content_id(&self, content_id: i64) -> Result<Vec<Tag>>;

    /// Delete a tag; its content links cascade
    async fn delete(&self, id: i64) -> Result<()>;

    async fn count(&self) -> Result<i64>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, tag: &Tag) -> Result<Tag> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_tag_sqlite(self.pool.sqlite()?, tag).await,
            DatabaseDriver::Mysql => create_tag_mysql(self.pool.mysql()?, tag).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let sql = format!("{} WHERE t.id = ?", TAG_SELECT);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get tag by ID")?;
                row.as_ref().map(row_to_tag_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get tag by ID")?;
                row.as_ref().map(row_to_tag_mysql).transpose()
            }
        }
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let sql = format!("{} WHERE LOWER(t.name) = LOWER(?)", TAG_SELECT);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(name)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get tag by name")?;
                row.as_ref().map(row_to_tag_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(name)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get tag by name")?;
                row.as_ref().map(row_to_tag_mysql).transpose()
            }
        }
    }

    async fn list(&self, kind: Option<TagKind>) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_tags_sqlite(self.pool.sqlite()?, kind).await,
            DatabaseDriver::Mysql => list_tags_mysql(self.pool.mysql()?, kind).await,
        }
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_tags_by_ids_sqlite(self.pool.sqlite()?, ids).await,
            DatabaseDriver::Mysql => get_tags_by_ids_mysql(self.pool.mysql()?, ids).await,
        }
    }

    async fn get_by_content_id(&self, content_id: i64) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tags_by_content_sqlite(self.pool.sqlite()?, content_id).await
            }
            DatabaseDriver::Mysql => get_tags_by_content_mysql(self.pool.mysql()?, content_id).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query("DELETE FROM tags WHERE id = ?")
                    .bind(id)
                    .execute(self.pool.sqlite()?)
                    .await
                    .context("Failed to delete tag")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query("DELETE FROM tags WHERE id = ?")
                    .bind(id)
                    .execute(self.pool.mysql()?)
                    .await
                    .context("Failed to delete tag")?;
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let sql = "SELECT COUNT(*) as count FROM tags";
        let row_count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to count tags")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to count tags")?
                .get("count"),
        };
        Ok(row_count)
    }
}

const TAG_SELECT: &str = r#"
    SELECT t.id, t.name, t.kind, t.category, t.created_at,
           (SELECT COUNT(*) FROM content_tags ct WHERE ct.tag_id = t.id) AS count
    FROM tags t
"#;

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_tag_sqlite(pool: &SqlitePool, tag: &Tag) -> Result<Tag> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO tags (name, kind, category, created_at) VALUES (?, ?, ?, ?)")
        .bind(&tag.name)
        .bind(tag.kind.to_string())
        .bind(&tag.category)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create tag")?;

    Ok(Tag {
        id: result.last_insert_rowid(),
        count: 0,
        created_at: now,
        ..tag.clone()
    })
}

async fn list_tags_sqlite(pool: &SqlitePool, kind: Option<TagKind>) -> Result<Vec<Tag>> {
    let rows = match kind {
        Some(kind) => {
            sqlx::query(&format!("{} WHERE t.kind = ? ORDER BY t.name", TAG_SELECT))
                .bind(kind.to_string())
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query(&format!("{} ORDER BY t.name", TAG_SELECT))
                .fetch_all(pool)
                .await
        }
    }
    .context("Failed to list tags")?;

    rows.iter().map(row_to_tag_sqlite).collect()
}

async fn get_tags_by_ids_sqlite(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<Tag>> {
    let sql = format!("{} WHERE t.id IN ({}) ORDER BY t.name", TAG_SELECT, placeholders(ids.len()));
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query.fetch_all(pool).await.context("Failed to get tags by IDs")?;
    rows.iter().map(row_to_tag_sqlite).collect()
}

async fn get_tags_by_content_sqlite(pool: &SqlitePool, content_id: i64) -> Result<Vec<Tag>> {
    let sql = format!(
        "{} INNER JOIN content_tags link ON link.tag_id = t.id WHERE link.content_id = ? ORDER BY t.name",
        TAG_SELECT
    );
    let rows = sqlx::query(&sql)
        .bind(content_id)
        .fetch_all(pool)
        .await
        .context("Failed to get tags by content")?;

    rows.iter().map(row_to_tag_sqlite).collect()
}

fn row_to_tag_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    let kind_str: String = row.get("kind");
    let kind = TagKind::from_str(&kind_str)
        .with_context(|| format!("Invalid tag type in database: {}", kind_str))?;

    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        kind,
        category: row.get("category"),
        count: row.get("count"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_tag_mysql(pool: &MySqlPool, tag: &Tag) -> Result<Tag> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO tags (name, kind, category, created_at) VALUES (?, ?, ?, ?)")
        .bind(&tag.name)
        .bind(tag.kind.to_string())
        .bind(&tag.category)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create tag")?;

    Ok(Tag {
        id: result.last_insert_id() as i64,
        count: 0,
        created_at: now,
        ..tag.clone()
    })
}

async fn list_tags_mysql(pool: &MySqlPool, kind: Option<TagKind>) -> Result<Vec<Tag>> {
    let rows = match kind {
        Some(kind) => {
            sqlx::query(&format!("{} WHERE t.kind = ? ORDER BY t.name", TAG_SELECT))
                .bind(kind.to_string())
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query(&format!("{} ORDER BY t.name", TAG_SELECT))
                .fetch_all(pool)
                .await
        }
    }
    .context("Failed to list tags")?;

    rows.iter().map(row_to_tag_mysql).collect()
}

async fn get_tags_by_ids_mysql(pool: &MySqlPool, ids: &[i64]) -> Result<Vec<Tag>> {
    let sql = format!("{} WHERE t.id IN ({}) ORDER BY t.name", TAG_SELECT, placeholders(ids.len()));
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query.fetch_all(pool).await.context("Failed to get tags by IDs")?;
    rows.iter().map(row_to_tag_mysql).collect()
}

async fn get_tags_by_content_mysql(pool: &MySqlPool, content_id: i64) -> Result<Vec<Tag>> {
    let sql = format!(
        "{} INNER JOIN content_tags link ON link.tag_id = t.id WHERE link.content_id = ? ORDER BY t.name",
        TAG_SELECT
    );
    let rows = sqlx::query(&sql)
        .bind(content_id)
        .fetch_all(pool)
        .await
        .context("Failed to get tags by content")?;

    rows.iter().map(row_to_tag_mysql).collect()
}

fn row_to_tag_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Tag> {
    let kind_str: String = row.get("kind");
    let kind = TagKind::from_str(&kind_str)
        .with_context(|| format!("Invalid tag type in database: {}", kind_str))?;

    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        kind,
        category: row.get("category"),
        count: row.get("count"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_content, insert_user, migrated_pool};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxTagRepository) {
        let pool = migrated_pool().await;
        let repo = SqlxTagRepository::new(pool.clone());
        (pool, repo)
    }

    fn tag(name: &str, kind: TagKind) -> Tag {
        Tag::new(name.to_string(), kind, None)
    }

    async fn link(pool: &DynDatabasePool, content_id: i64, tag_id: i64) {
        sqlx::query("INSERT INTO content_tags (content_id, tag_id) VALUES (?, ?)")
            .bind(content_id)
            .bind(tag_id)
            .execute(pool.as_sqlite().unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_get_tag() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&Tag::new("rust".to_string(), TagKind::Tag, Some("tech".to_string())))
            .await
            .expect("Failed to create tag");
        assert!(created.id > 0);

        let found = repo.get_by_id(created.id).await.unwrap().expect("Tag not found");
        assert_eq!(found.name, "rust");
        assert_eq!(found.category.as_deref(), Some("tech"));
        assert_eq!(found.count, 0);

        assert!(repo.get_by_name("RUST").await.unwrap().is_some());
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&tag("dup", TagKind::Tag)).await.unwrap();
        assert!(repo.create(&tag("dup", TagKind::System)).await.is_err());
    }

    #[tokio::test]
    async fn test_list_orders_by_name_and_filters_kind() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&tag("zeta", TagKind::Tag)).await.unwrap();
        repo.create(&tag("alpha", TagKind::Tag)).await.unwrap();
        repo.create(&tag("internal", TagKind::System)).await.unwrap();

        let all = repo.list(None).await.unwrap();
        let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "internal", "zeta"]);

        let system = repo.list(Some(TagKind::System)).await.unwrap();
        assert_eq!(system.len(), 1);
        assert_eq!(system[0].name, "internal");
    }

    #[tokio::test]
    async fn test_counts_and_content_tags() {
        let (pool, repo) = setup_test_repo().await;
        let author = insert_user(&pool, "a@example.com").await;
        let c1 = insert_content(&pool, author, "draft").await;
        let c2 = insert_content(&pool, author, "published").await;

        let rust = repo.create(&tag("rust", TagKind::Tag)).await.unwrap();
        let web = repo.create(&tag("web", TagKind::Tag)).await.unwrap();
        link(&pool, c1, rust.id).await;
        link(&pool, c2, rust.id).await;
        link(&pool, c2, web.id).await;

        assert_eq!(repo.get_by_id(rust.id).await.unwrap().unwrap().count, 2);

        let tags = repo.get_by_content_id(c2).await.unwrap();
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["rust", "web"]);
    }

    #[tokio::test]
    async fn test_get_by_ids_skips_unknown() {
        let (_pool, repo) = setup_test_repo().await;
        let a = repo.create(&tag("a", TagKind::Tag)).await.unwrap();

        let found = repo.get_by_ids(&[a.id, 999]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(repo.get_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_links() {
        let (pool, repo) = setup_test_repo().await;
        let author = insert_user(&pool, "a@example.com").await;
        let content_id = insert_content(&pool, author, "draft").await;
        let t = repo.create(&tag("gone", TagKind::Tag)).await.unwrap();
        link(&pool, content_id, t.id).await;

        repo.delete(t.id).await.unwrap();

        assert!(repo.get_by_id(t.id).await.unwrap().is_none());
        assert!(repo.get_by_content_id(content_id).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
