//! Collaboration repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Collaboration, CollaborationRole};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

#[async_trait]
pub trait CollaborationRepository: Send + Sync {
    async fn create(&self, collaboration: &Collaboration) -> Result<Collaboration>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Collaboration>>;

    /// The collaboration of one user on one content item, if any
    async fn get_for_user(&self, content_id: i64, user_id: i64) -> Result<Option<Collaboration>>;

    async fn list_by_content(&self, content_id: i64) -> Result<Vec<Collaboration>>;

    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxCollaborationRepository {
    pool: DynDatabasePool,
}

impl SqlxCollaborationRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CollaborationRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_SQL: &str =
    "SELECT id, content_id, user_id, role, created_at, updated_at FROM collaborations";

#[async_trait]
impl CollaborationRepository for SqlxCollaborationRepository {
    async fn create(&self, collaboration: &Collaboration) -> Result<Collaboration> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_collaboration_sqlite(self.pool.sqlite()?, collaboration).await
            }
            DatabaseDriver::Mysql => {
                create_collaboration_mysql(self.pool.mysql()?, collaboration).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Collaboration>> {
        let sql = format!("{} WHERE id = ?", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get collaboration")?;
                row.as_ref().map(row_to_collaboration_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get collaboration")?;
                row.as_ref().map(row_to_collaboration_mysql).transpose()
            }
        }
    }

    async fn get_for_user(&self, content_id: i64, user_id: i64) -> Result<Option<Collaboration>> {
        let sql = format!("{} WHERE content_id = ? AND user_id = ?", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(content_id)
                    .bind(user_id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get collaboration for user")?;
                row.as_ref().map(row_to_collaboration_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(content_id)
                    .bind(user_id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get collaboration for user")?;
                row.as_ref().map(row_to_collaboration_mysql).transpose()
            }
        }
    }

    async fn list_by_content(&self, content_id: i64) -> Result<Vec<Collaboration>> {
        let sql = format!("{} WHERE content_id = ? ORDER BY id", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .bind(content_id)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list collaborations")?;
                rows.iter().map(row_to_collaboration_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .bind(content_id)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list collaborations")?;
                rows.iter().map(row_to_collaboration_mysql).collect()
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM collaborations WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.sqlite()?)
                    .await
                    .context("Failed to delete collaboration")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.mysql()?)
                    .await
                    .context("Failed to delete collaboration")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_collaboration_sqlite(pool: &SqlitePool, c: &Collaboration) -> Result<Collaboration> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO collaborations (content_id, user_id, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(c.content_id)
    .bind(c.user_id)
    .bind(c.role.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create collaboration")?;

    Ok(Collaboration {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..c.clone()
    })
}

fn row_to_collaboration_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Collaboration> {
    let role_str: String = row.get("role");
    Ok(Collaboration {
        id: row.get("id"),
        content_id: row.get("content_id"),
        user_id: row.get("user_id"),
        role: CollaborationRole::from_str(&role_str)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_collaboration_mysql(pool: &MySqlPool, c: &Collaboration) -> Result<Collaboration> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO collaborations (content_id, user_id, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(c.content_id)
    .bind(c.user_id)
    .bind(c.role.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create collaboration")?;

    Ok(Collaboration {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..c.clone()
    })
}

fn row_to_collaboration_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Collaboration> {
    let role_str: String = row.get("role");
    Ok(Collaboration {
        id: row.get("id"),
        content_id: row.get("content_id"),
        user_id: row.get("user_id"),
        role: CollaborationRole::from_str(&role_str)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_content, insert_user, migrated_pool};

    #[tokio::test]
    async fn test_create_get_list_delete() {
        let pool = migrated_pool().await;
        let repo = SqlxCollaborationRepository::new(pool.clone());
        let author = insert_user(&pool, "a@example.com").await;
        let helper = insert_user(&pool, "h@example.com").await;
        let content = insert_content(&pool, author, "draft").await;

        let created = repo
            .create(&Collaboration::new(content, helper, CollaborationRole::Editor))
            .await
            .expect("Failed to create collaboration");

        let found = repo.get_by_id(created.id).await.unwrap().expect("Not found");
        assert_eq!(found.role, CollaborationRole::Editor);

        let for_user = repo.get_for_user(content, helper).await.unwrap();
        assert!(for_user.is_some());
        assert!(repo.get_for_user(content, author).await.unwrap().is_none());

        assert_eq!(repo.list_by_content(content).await.unwrap().len(), 1);

        repo.delete(created.id).await.unwrap();
        assert!(repo.list_by_content(content).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected() {
        let pool = migrated_pool().await;
        let repo = SqlxCollaborationRepository::new(pool.clone());
        let author = insert_user(&pool, "a@example.com").await;
        let helper = insert_user(&pool, "h@example.com").await;
        let content = insert_content(&pool, author, "draft").await;

        repo.create(&Collaboration::new(content, helper, CollaborationRole::Viewer))
            .await
            .unwrap();
        let again = repo
            .create(&Collaboration::new(content, helper, CollaborationRole::Owner))
            .await;
        assert!(again.is_err());
    }
}
