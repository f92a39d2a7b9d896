//! Notification service

use crate::db::repositories::NotificationRepository;
use crate::models::{Notification, NotificationKind, User};
use anyhow::Context;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum NotificationServiceError {
    #[error("Notification not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        user: &User,
        read: Option<bool>,
    ) -> Result<Vec<Notification>, NotificationServiceError> {
        let items = self
            .repo
            .list_by_user(user.id, read)
            .await
            .context("Failed to list notifications")?;
        Ok(items)
    }

    /// Other users' notifications read as missing
    pub async fn mark_read(&self, user: &User, id: i64) -> Result<Notification, NotificationServiceError> {
        let notification = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get notification")?
            .filter(|n| n.user_id == user.id)
            .ok_or(NotificationServiceError::NotFound)?;

        self.repo
            .mark_read(id)
            .await
            .context("Failed to mark notification read")?;
        Ok(Notification {
            read: true,
            ..notification
        })
    }

    pub async fn mark_all_read(&self, user: &User) -> Result<u64, NotificationServiceError> {
        let changed = self
            .repo
            .mark_all_read(user.id)
            .await
            .context("Failed to mark notifications read")?;
        Ok(changed)
    }

    pub async fn notify(
        &self,
        user_id: i64,
        kind: NotificationKind,
        message: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) -> Result<Notification, NotificationServiceError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(NotificationServiceError::ValidationError(
                "Message is required".to_string(),
            ));
        }

        let created = self
            .repo
            .create(&Notification::new(user_id, kind, message, metadata))
            .await
            .context("Failed to create notification")?;
        debug!("Notified user {} ({})", user_id, kind);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::migrated_pool;
    use crate::db::repositories::SqlxNotificationRepository;
    use crate::models::UserRole;
    use crate::services::test_support::create_user;

    #[tokio::test]
    async fn test_notify_list_and_mark() {
        let pool = migrated_pool().await;
        let service = NotificationService::new(SqlxNotificationRepository::boxed(pool.clone()));
        let user = create_user(&pool, "u@example.com", UserRole::User).await;
        let other = create_user(&pool, "o@example.com", UserRole::User).await;

        let first = service
            .notify(user.id, NotificationKind::System, "Vitajte", None)
            .await
            .unwrap();
        service
            .notify(user.id, NotificationKind::Content, "Nový obsah", None)
            .await
            .unwrap();

        assert_eq!(service.list(&user, None).await.unwrap().len(), 2);

        assert!(matches!(
            service.mark_read(&other, first.id).await.unwrap_err(),
            NotificationServiceError::NotFound
        ));
        let marked = service.mark_read(&user, first.id).await.unwrap();
        assert!(marked.read);

        assert_eq!(service.list(&user, Some(false)).await.unwrap().len(), 1);
        assert_eq!(service.mark_all_read(&user).await.unwrap(), 1);
        assert!(service.list(&user, Some(false)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_requires_message() {
        let pool = migrated_pool().await;
        let service = NotificationService::new(SqlxNotificationRepository::boxed(pool.clone()));
        let user = create_user(&pool, "u@example.com", UserRole::User).await;

        assert!(matches!(
            service.notify(user.id, NotificationKind::System, "  ", None).await.unwrap_err(),
            NotificationServiceError::ValidationError(_)
        ));
    }
}
