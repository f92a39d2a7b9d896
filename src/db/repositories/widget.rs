//! Widget repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Widget, WidgetKind, WidgetSize};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

#[async_trait]
pub trait WidgetRepository: Send + Sync {
    async fn create(&self, widget: &Widget) -> Result<Widget>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Widget>>;

    /// A user's widgets ordered by position
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Widget>>;

    async fn count_by_user(&self, user_id: i64) -> Result<i64>;

    async fn update(&self, widget: &Widget) -> Result<Widget>;

    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxWidgetRepository {
    pool: DynDatabasePool,
}

impl SqlxWidgetRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn WidgetRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_SQL: &str =
    "SELECT id, user_id, title, kind, size, position, config, created_at, updated_at FROM widgets";

#[async_trait]
impl WidgetRepository for SqlxWidgetRepository {
    async fn create(&self, widget: &Widget) -> Result<Widget> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_widget_sqlite(self.pool.sqlite()?, widget).await,
            DatabaseDriver::Mysql => create_widget_mysql(self.pool.mysql()?, widget).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Widget>> {
        let sql = format!("{} WHERE id = ?", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get widget")?;
                row.as_ref().map(row_to_widget_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get widget")?;
                row.as_ref().map(row_to_widget_mysql).transpose()
            }
        }
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Widget>> {
        let sql = format!("{} WHERE user_id = ? ORDER BY position ASC, id ASC", SELECT_SQL);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .bind(user_id)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list widgets")?;
                rows.iter().map(row_to_widget_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .bind(user_id)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list widgets")?;
                rows.iter().map(row_to_widget_mysql).collect()
            }
        }
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64> {
        let sql = "SELECT COUNT(*) as count FROM widgets WHERE user_id = ?";
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(user_id)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to count widgets")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(user_id)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to count widgets")?
                .get("count"),
        };
        Ok(count)
    }

    async fn update(&self, widget: &Widget) -> Result<Widget> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_widget_sqlite(self.pool.sqlite()?, widget).await?,
            DatabaseDriver::Mysql => update_widget_mysql(self.pool.mysql()?, widget).await?,
        }
        self.get_by_id(widget.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Widget not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM widgets WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.sqlite()?)
                    .await
                    .context("Failed to delete widget")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.mysql()?)
                    .await
                    .context("Failed to delete widget")?;
            }
        }
        Ok(())
    }
}

const INSERT_SQL: &str = r#"
    INSERT INTO widgets (user_id, title, kind, size, position, config, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_SQL: &str = r#"
    UPDATE widgets
    SET title = ?, kind = ?, size = ?, position = ?, config = ?, updated_at = ?
    WHERE id = ?
"#;

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_widget_sqlite(pool: &SqlitePool, w: &Widget) -> Result<Widget> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_SQL)
        .bind(w.user_id)
        .bind(&w.title)
        .bind(w.kind.to_string())
        .bind(w.size.to_string())
        .bind(w.position)
        .bind(&w.config)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create widget")?;

    Ok(Widget {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..w.clone()
    })
}

async fn update_widget_sqlite(pool: &SqlitePool, w: &Widget) -> Result<()> {
    sqlx::query(UPDATE_SQL)
        .bind(&w.title)
        .bind(w.kind.to_string())
        .bind(w.size.to_string())
        .bind(w.position)
        .bind(&w.config)
        .bind(Utc::now())
        .bind(w.id)
        .execute(pool)
        .await
        .context("Failed to update widget")?;
    Ok(())
}

fn row_to_widget_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Widget> {
    let kind_str: String = row.get("kind");
    let size_str: String = row.get("size");
    Ok(Widget {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        kind: WidgetKind::from_str(&kind_str)?,
        size: WidgetSize::from_str(&size_str)?,
        position: row.get("position"),
        config: row.get("config"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_widget_mysql(pool: &MySqlPool, w: &Widget) -> Result<Widget> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_SQL)
        .bind(w.user_id)
        .bind(&w.title)
        .bind(w.kind.to_string())
        .bind(w.size.to_string())
        .bind(w.position)
        .bind(&w.config)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create widget")?;

    Ok(Widget {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..w.clone()
    })
}

async fn update_widget_mysql(pool: &MySqlPool, w: &Widget) -> Result<()> {
    sqlx::query(UPDATE_SQL)
        .bind(&w.title)
        .bind(w.kind.to_string())
        .bind(w.size.to_string())
        .bind(w.position)
        .bind(&w.config)
        .bind(Utc::now())
        .bind(w.id)
        .execute(pool)
        .await
        .context("Failed to update widget")?;
    Ok(())
}

fn row_to_widget_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Widget> {
    let kind_str: String = row.get("kind");
    let size_str: String = row.get("size");
    Ok(Widget {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        kind: WidgetKind::from_str(&kind_str)?,
        size: WidgetSize::from_str(&size_str)?,
        position: row.get("position"),
        config: row.get("config"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_user, migrated_pool};

    async fn setup() -> (SqlxWidgetRepository, i64) {
        let pool = migrated_pool().await;
        let user = insert_user(&pool, "w@example.com").await;
        (SqlxWidgetRepository::new(pool), user)
    }

    fn widget(user_id: i64, title: &str, position: i32) -> Widget {
        Widget::new(
            user_id,
            title.to_string(),
            WidgetKind::Analytics,
            WidgetSize::Medium,
            position,
            None,
        )
    }

    #[tokio::test]
    async fn test_list_ordered_by_position() {
        let (repo, user) = setup().await;
        repo.create(&widget(user, "Second", 1)).await.unwrap();
        repo.create(&widget(user, "First", 0)).await.unwrap();

        let widgets = repo.list_by_user(user).await.unwrap();
        let titles: Vec<_> = widgets.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(repo.count_by_user(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, user) = setup().await;
        let mut w = repo.create(&widget(user, "Stats", 0)).await.unwrap();

        w.size = WidgetSize::Large;
        w.config = Some(r#"{"range":"7d"}"#.to_string());
        let updated = repo.update(&w).await.unwrap();
        assert_eq!(updated.size, WidgetSize::Large);
        assert_eq!(updated.config.as_deref(), Some(r#"{"range":"7d"}"#));

        repo.delete(w.id).await.unwrap();
        assert!(repo.get_by_id(w.id).await.unwrap().is_none());
    }
}
