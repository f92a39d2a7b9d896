//! Interaction service

use crate::db::repositories::{ContentRepository, InteractionRepository};
use crate::models::{CreateInteractionInput, Interaction, User};
use anyhow::Context;
use std::sync::Arc;

pub const DEFAULT_INTERACTION_LIMIT: i64 = 50;

#[derive(Debug, thiserror::Error)]
pub enum InteractionServiceError {
    #[error("Content not found")]
    NotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct InteractionService {
    repo: Arc<dyn InteractionRepository>,
    content_repo: Arc<dyn ContentRepository>,
}

impl InteractionService {
    pub fn new(repo: Arc<dyn InteractionRepository>, content_repo: Arc<dyn ContentRepository>) -> Self {
        Self { repo, content_repo }
    }

    /// Record that `user` touched a content item
    pub async fn create(
        &self,
        user: &User,
        input: CreateInteractionInput,
    ) -> Result<Interaction, InteractionServiceError> {
        self.content_repo
            .get_by_id(input.content_id)
            .await
            .context("Failed to get content")?
            .ok_or(InteractionServiceError::NotFound)?;

        let interaction = Interaction::new(user.id, input.content_id, input.kind, input.metadata);
        let created = self
            .repo
            .create(&interaction)
            .await
            .context("Failed to record interaction")?;
        Ok(created)
    }

    /// Newest first
    pub async fn list_for_user(
        &self,
        user: &User,
        limit: Option<i64>,
    ) -> Result<Vec<Interaction>, InteractionServiceError> {
        let limit = limit.unwrap_or(DEFAULT_INTERACTION_LIMIT).clamp(1, 500);
        let items = self
            .repo
            .list_by_user(user.id, limit)
            .await
            .context("Failed to list interactions")?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_content, migrated_pool};
    use crate::db::repositories::{SqlxContentRepository, SqlxInteractionRepository};
    use crate::models::{InteractionKind, UserRole};
    use crate::services::test_support::create_user;

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = migrated_pool().await;
        let service = InteractionService::new(
            SqlxInteractionRepository::boxed(pool.clone()),
            SqlxContentRepository::boxed(pool.clone()),
        );
        let user = create_user(&pool, "u@example.com", UserRole::User).await;
        let content = insert_content(&pool, user.id, "published").await;

        for kind in [InteractionKind::View, InteractionKind::Edit] {
            service
                .create(
                    &user,
                    CreateInteractionInput {
                        content_id: content,
                        kind,
                        metadata: None,
                    },
                )
                .await
                .unwrap();
        }

        let items = service.list_for_user(&user, None).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, InteractionKind::Edit);
        assert_eq!(service.list_for_user(&user, Some(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_content_is_not_found() {
        let pool = migrated_pool().await;
        let service = InteractionService::new(
            SqlxInteractionRepository::boxed(pool.clone()),
            SqlxContentRepository::boxed(pool.clone()),
        );
        let user = create_user(&pool, "u@example.com", UserRole::User).await;

        let err = service
            .create(
                &user,
                CreateInteractionInput {
                    content_id: 77,
                    kind: InteractionKind::Like,
                    metadata: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InteractionServiceError::NotFound));
    }
}
