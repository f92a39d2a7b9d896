//! Collaboration service
//!
//! Authors and admins invite other users onto a content item. The invited
//! user gets a `collaboration` notification.

use crate::db::repositories::{is_unique_violation, CollaborationRepository, UserRepository};
use crate::models::{Collaboration, CreateCollaborationInput, NotificationKind, User};
use crate::services::content::{ContentService, ContentServiceError};
use crate::services::notification::NotificationService;
use anyhow::Context;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum CollaborationServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<ContentServiceError> for CollaborationServiceError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::NotFound => Self::NotFound("Content not found".to_string()),
            ContentServiceError::Forbidden(msg) => Self::Forbidden(msg),
            ContentServiceError::ValidationError(msg) => Self::InternalError(anyhow::anyhow!(msg)),
            ContentServiceError::InternalError(e) => Self::InternalError(e),
        }
    }
}

pub struct CollaborationService {
    repo: Arc<dyn CollaborationRepository>,
    user_repo: Arc<dyn UserRepository>,
    contents: Arc<ContentService>,
    notifications: Arc<NotificationService>,
}

impl CollaborationService {
    pub fn new(
        repo: Arc<dyn CollaborationRepository>,
        user_repo: Arc<dyn UserRepository>,
        contents: Arc<ContentService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            repo,
            user_repo,
            contents,
            notifications,
        }
    }

    pub async fn create(
        &self,
        requester: &User,
        content_id: i64,
        input: CreateCollaborationInput,
    ) -> Result<Collaboration, CollaborationServiceError> {
        let content = self.contents.load_viewable(requester, content_id).await?;
        if content.author_id != requester.id && !requester.is_admin() {
            return Err(CollaborationServiceError::Forbidden(
                "Only the author or an admin can add collaborators".to_string(),
            ));
        }

        self.user_repo
            .get_by_id(input.user_id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| CollaborationServiceError::NotFound("User not found".to_string()))?;

        if self
            .repo
            .get_for_user(content_id, input.user_id)
            .await
            .context("Failed to check collaboration")?
            .is_some()
        {
            return Err(already_collaborating());
        }

        let role = input.role.unwrap_or_default();
        let created = match self
            .repo
            .create(&Collaboration::new(content_id, input.user_id, role))
            .await
        {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => return Err(already_collaborating()),
            Err(e) => return Err(e.context("Failed to create collaboration").into()),
        };

        let message = format!("Boli ste pridaný ako spolupracovník na obsah \"{}\"", content.title);
        if let Err(e) = self
            .notifications
            .notify(
                input.user_id,
                NotificationKind::Collaboration,
                message,
                Some(json!({ "content_id": content_id, "role": role })),
            )
            .await
        {
            warn!("Failed to notify collaborator {}: {}", input.user_id, e);
        }

        Ok(created)
    }

    pub async fn list_for_content(
        &self,
        viewer: &User,
        content_id: i64,
    ) -> Result<Vec<Collaboration>, CollaborationServiceError> {
        self.contents.load_viewable(viewer, content_id).await?;
        let items = self
            .repo
            .list_by_content(content_id)
            .await
            .context("Failed to list collaborations")?;
        Ok(items)
    }

    /// The content author, an admin or the collaborator themself may remove it
    pub async fn delete(&self, requester: &User, id: i64) -> Result<(), CollaborationServiceError> {
        let collaboration = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get collaboration")?
            .ok_or_else(|| CollaborationServiceError::NotFound("Collaboration not found".to_string()))?;

        let content = self.contents.load(collaboration.content_id).await?;
        let allowed = requester.is_admin()
            || content.author_id == requester.id
            || collaboration.user_id == requester.id;
        if !allowed {
            return Err(CollaborationServiceError::Forbidden(
                "You cannot remove this collaborator".to_string(),
            ));
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete collaboration")?;
        Ok(())
    }
}

fn already_collaborating() -> CollaborationServiceError {
    CollaborationServiceError::Conflict("User is already a collaborator".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::migrated_pool;
    use crate::db::repositories::SqlxNotificationRepository;
    use crate::db::repositories::SqlxUserRepository;
    use crate::models::{CollaborationRole, ContentStatus, CreateContentInput, UserRole};
    use crate::services::test_support::{content_service, create_user};

    struct Fixture {
        service: CollaborationService,
        contents: Arc<ContentService>,
        notifications: Arc<NotificationService>,
        pool: crate::db::DynDatabasePool,
    }

    async fn setup() -> Fixture {
        let pool = migrated_pool().await;
        let contents = Arc::new(content_service(&pool));
        let notifications = Arc::new(NotificationService::new(SqlxNotificationRepository::boxed(
            pool.clone(),
        )));
        let service = CollaborationService::new(
            crate::db::repositories::SqlxCollaborationRepository::boxed(pool.clone()),
            SqlxUserRepository::boxed(pool.clone()),
            contents.clone(),
            notifications.clone(),
        );
        Fixture {
            service,
            contents,
            notifications,
            pool,
        }
    }

    async fn content_by(f: &Fixture, author: &User) -> i64 {
        f.contents
            .create(
                author,
                CreateContentInput {
                    title: "Plán".to_string(),
                    status: Some(ContentStatus::Draft),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .content
            .id
    }

    fn invite(user_id: i64, role: Option<CollaborationRole>) -> CreateCollaborationInput {
        CreateCollaborationInput { user_id, role }
    }

    #[tokio::test]
    async fn test_create_defaults_role_and_notifies() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let helper = create_user(&f.pool, "h@example.com", UserRole::User).await;
        let content = content_by(&f, &author).await;

        let created = f
            .service
            .create(&author, content, invite(helper.id, None))
            .await
            .unwrap();
        assert_eq!(created.role, CollaborationRole::Viewer);

        let notes = f.notifications.list(&helper, None).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Collaboration);
        assert_eq!(notes[0].metadata.as_ref().unwrap()["content_id"], content);

        // a viewer collaborator can now see the draft
        assert_eq!(f.service.list_for_content(&helper, content).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rules() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let helper = create_user(&f.pool, "h@example.com", UserRole::User).await;
        let editor = create_user(&f.pool, "e@example.com", UserRole::Editor).await;
        let content = content_by(&f, &author).await;

        assert!(matches!(
            f.service.create(&editor, content, invite(helper.id, None)).await.unwrap_err(),
            CollaborationServiceError::Forbidden(_)
        ));
        assert!(matches!(
            f.service.create(&author, content, invite(999, None)).await.unwrap_err(),
            CollaborationServiceError::NotFound(_)
        ));

        f.service
            .create(&author, content, invite(helper.id, Some(CollaborationRole::Editor)))
            .await
            .unwrap();
        assert!(matches!(
            f.service.create(&author, content, invite(helper.id, None)).await.unwrap_err(),
            CollaborationServiceError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let helper = create_user(&f.pool, "h@example.com", UserRole::User).await;
        let stranger = create_user(&f.pool, "s@example.com", UserRole::User).await;
        let content = content_by(&f, &author).await;

        let c = f
            .service
            .create(&author, content, invite(helper.id, None))
            .await
            .unwrap();

        assert!(matches!(
            f.service.delete(&stranger, c.id).await.unwrap_err(),
            CollaborationServiceError::Forbidden(_)
        ));
        f.service.delete(&helper, c.id).await.unwrap();
        assert!(matches!(
            f.service.delete(&author, c.id).await.unwrap_err(),
            CollaborationServiceError::NotFound(_)
        ));
    }
}
