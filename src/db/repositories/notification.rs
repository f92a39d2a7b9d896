//! Notification repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Notification, NotificationKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Notification>>;

    /// A user's notifications, newest first, optionally only read or unread ones
    async fn list_by_user(&self, user_id: i64, read: Option<bool>) -> Result<Vec<Notification>>;

    async fn mark_read(&self, id: i64) -> Result<()>;

    /// Mark every unread notification of a user as read, returning the count changed
    async fn mark_all_read(&self, user_id: i64) -> Result<u64>;
}

pub struct SqlxNotificationRepository {
    pool: DynDatabasePool,
}

impl SqlxNotificationRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NotificationRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NotificationRepository for SqlxNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_notification_sqlite(self.pool.sqlite()?, notification).await
            }
            DatabaseDriver::Mysql => {
                create_notification_mysql(self.pool.mysql()?, notification).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Notification>> {
        let sql = format!("{} WHERE id = ?", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get notification")?;
                row.as_ref().map(row_to_notification_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get notification")?;
                row.as_ref().map(row_to_notification_mysql).transpose()
            }
        }
    }

    async fn list_by_user(&self, user_id: i64, read: Option<bool>) -> Result<Vec<Notification>> {
        let sql = match read {
            Some(_) => format!(
                "{} WHERE user_id = ? AND is_read = ? ORDER BY created_at DESC, id DESC",
                SELECT_SQL
            ),
            None => format!("{} WHERE user_id = ? ORDER BY created_at DESC, id DESC", SELECT_SQL),
        };

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let mut query = sqlx::query(&sql).bind(user_id);
                if let Some(read) = read {
                    query = query.bind(read);
                }
                let rows = query
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list notifications")?;
                rows.iter().map(row_to_notification_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let mut query = sqlx::query(&sql).bind(user_id);
                if let Some(read) = read {
                    query = query.bind(read);
                }
                let rows = query
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list notifications")?;
                rows.iter().map(row_to_notification_mysql).collect()
            }
        }
    }

    async fn mark_read(&self, id: i64) -> Result<()> {
        let sql = "UPDATE notifications SET is_read = TRUE WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.sqlite()?)
                    .await
                    .context("Failed to mark notification read")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.mysql()?)
                    .await
                    .context("Failed to mark notification read")?;
            }
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<u64> {
        let sql = "UPDATE notifications SET is_read = TRUE WHERE user_id = ? AND is_read = FALSE";
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(user_id)
                .execute(self.pool.sqlite()?)
                .await
                .context("Failed to mark notifications read")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(user_id)
                .execute(self.pool.mysql()?)
                .await
                .context("Failed to mark notifications read")?
                .rows_affected(),
        };
        Ok(affected)
    }
}

const SELECT_SQL: &str =
    "SELECT id, user_id, kind, message, is_read, metadata, created_at FROM notifications";

const INSERT_SQL: &str = r#"
    INSERT INTO notifications (user_id, kind, message, is_read, metadata, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

fn encode_metadata(metadata: &Option<serde_json::Value>) -> Result<Option<String>> {
    metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to serialize notification metadata")
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_notification_sqlite(pool: &SqlitePool, n: &Notification) -> Result<Notification> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_SQL)
        .bind(n.user_id)
        .bind(n.kind.to_string())
        .bind(&n.message)
        .bind(n.read)
        .bind(encode_metadata(&n.metadata)?)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create notification")?;

    Ok(Notification {
        id: result.last_insert_rowid(),
        created_at: now,
        ..n.clone()
    })
}

fn row_to_notification_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Notification> {
    let kind_str: String = row.get("kind");
    let metadata: Option<String> = row.get("metadata");

    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: NotificationKind::from_str(&kind_str)?,
        message: row.get("message"),
        read: row.get("is_read"),
        metadata: metadata.and_then(|m| serde_json::from_str(&m).ok()),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_notification_mysql(pool: &MySqlPool, n: &Notification) -> Result<Notification> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_SQL)
        .bind(n.user_id)
        .bind(n.kind.to_string())
        .bind(&n.message)
        .bind(n.read)
        .bind(encode_metadata(&n.metadata)?)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create notification")?;

    Ok(Notification {
        id: result.last_insert_id() as i64,
        created_at: now,
        ..n.clone()
    })
}

fn row_to_notification_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Notification> {
    let kind_str: String = row.get("kind");
    let metadata: Option<String> = row.get("metadata");

    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: NotificationKind::from_str(&kind_str)?,
        message: row.get("message"),
        read: row.get("is_read"),
        metadata: metadata.and_then(|m| serde_json::from_str(&m).ok()),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_user, migrated_pool};

    async fn setup() -> (SqlxNotificationRepository, i64) {
        let pool = migrated_pool().await;
        let user = insert_user(&pool, "n@example.com").await;
        (SqlxNotificationRepository::new(pool), user)
    }

    fn note(user_id: i64, message: &str) -> Notification {
        Notification::new(user_id, NotificationKind::System, message.to_string(), None)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (repo, user) = setup().await;
        let created = repo
            .create(&Notification::new(
                user,
                NotificationKind::Collaboration,
                "Invited".to_string(),
                Some(serde_json::json!({"content_id": 5})),
            ))
            .await
            .expect("Failed to create notification");

        let found = repo.get_by_id(created.id).await.unwrap().expect("Not found");
        assert_eq!(found.kind, NotificationKind::Collaboration);
        assert!(!found.read);
        assert_eq!(found.metadata.unwrap()["content_id"], 5);
    }

    #[tokio::test]
    async fn test_list_with_read_filter() {
        let (repo, user) = setup().await;
        let first = repo.create(&note(user, "one")).await.unwrap();
        repo.create(&note(user, "two")).await.unwrap();

        repo.mark_read(first.id).await.unwrap();

        let all = repo.list_by_user(user, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].message, "two");

        let unread = repo.list_by_user(user, Some(false)).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "two");

        let read = repo.list_by_user(user, Some(true)).await.unwrap();
        assert_eq!(read.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_changes() {
        let (repo, user) = setup().await;
        for msg in ["a", "b", "c"] {
            repo.create(&note(user, msg)).await.unwrap();
        }

        assert_eq!(repo.mark_all_read(user).await.unwrap(), 3);
        assert_eq!(repo.mark_all_read(user).await.unwrap(), 0);
    }
}
