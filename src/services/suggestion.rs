//! Content suggestion service
//!
//! Turns the AI content analysis into stored, applicable suggestions.

use crate::db::repositories::SuggestionRepository;
use crate::models::{ContentSuggestion, ContentWithMeta, SuggestionKind, User};
use crate::services::ai::AiService;
use crate::services::content::{ContentService, ContentServiceError};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

/// Appended to the body when a `structure` suggestion is applied
pub const CONCLUSION_SECTION: &str =
    "\n\n## Záver\nV tomto dokumente sme zhrnuli kľúčové body týkajúce sa danej témy.";

#[derive(Debug, thiserror::Error)]
pub enum SuggestionServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<ContentServiceError> for SuggestionServiceError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::NotFound => Self::NotFound("Content not found".to_string()),
            ContentServiceError::Forbidden(msg) => Self::Forbidden(msg),
            ContentServiceError::ValidationError(msg) => Self::ValidationError(msg),
            ContentServiceError::InternalError(e) => Self::InternalError(e),
        }
    }
}

pub struct SuggestionService {
    repo: Arc<dyn SuggestionRepository>,
    contents: Arc<ContentService>,
    ai: Arc<AiService>,
}

impl SuggestionService {
    pub fn new(
        repo: Arc<dyn SuggestionRepository>,
        contents: Arc<ContentService>,
        ai: Arc<AiService>,
    ) -> Self {
        Self { repo, contents, ai }
    }

    /// Analyze the body and replace the pending suggestions with fresh ones
    pub async fn generate(
        &self,
        user: &User,
        content_id: i64,
    ) -> Result<Vec<ContentSuggestion>, SuggestionServiceError> {
        let content = self.contents.load_viewable(user, content_id).await?;
        let analysis = self.ai.analyze_content(&content.body);

        let fresh: Vec<ContentSuggestion> = analysis
            .suggestions
            .into_iter()
            .map(|item| ContentSuggestion::new(content_id, item.suggestion, item.kind, item.confidence))
            .collect();
        let stored = self
            .repo
            .replace_unapplied(content_id, &fresh)
            .await
            .context("Failed to store suggestions")?;

        info!("Generated {} suggestions for content {}", stored.len(), content_id);
        Ok(stored)
    }

    pub async fn list(
        &self,
        user: &User,
        content_id: i64,
    ) -> Result<Vec<ContentSuggestion>, SuggestionServiceError> {
        self.contents.load_viewable(user, content_id).await?;
        let items = self
            .repo
            .list_by_content(content_id)
            .await
            .context("Failed to list suggestions")?;
        Ok(items)
    }

    /// Rewrite the content body according to the suggestion and mark it applied.
    ///
    /// The claim and the body append commit together, so a second apply of
    /// the same suggestion is a conflict and applies of different
    /// suggestions never overwrite each other's text.
    pub async fn apply(&self, user: &User, id: i64) -> Result<ContentWithMeta, SuggestionServiceError> {
        let suggestion = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get suggestion")?
            .ok_or_else(|| SuggestionServiceError::NotFound("Suggestion not found".to_string()))?;

        let content = self
            .contents
            .load_editable(user, suggestion.content_id)
            .await?;
        if suggestion.applied {
            return Err(already_applied());
        }

        let suffix = match suggestion.kind {
            SuggestionKind::Improvement => Some(format!("\n\n{}", suggestion.suggestion)),
            SuggestionKind::Structure => Some(CONCLUSION_SECTION.to_string()),
            SuggestionKind::Clarity => None,
        };

        let claimed = self
            .repo
            .apply(id, content.id, suffix.as_deref())
            .await
            .context("Failed to apply suggestion")?;
        if !claimed {
            return Err(already_applied());
        }

        Ok(self.contents.get(user, content.id).await?)
    }
}

fn already_applied() -> SuggestionServiceError {
    SuggestionServiceError::Conflict("Suggestion already applied".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::migrated_pool;
    use crate::db::repositories::{
        SqlxContentRepository, SqlxInteractionRepository, SqlxSuggestionRepository,
        SqlxTagRepository,
    };
    use crate::db::DynDatabasePool;
    use crate::models::{ContentStatus, CreateContentInput, UserRole};
    use crate::services::test_support::{content_service, create_user};

    struct Fixture {
        service: SuggestionService,
        contents: Arc<ContentService>,
        pool: DynDatabasePool,
    }

    async fn setup() -> Fixture {
        let pool = migrated_pool().await;
        let contents = Arc::new(content_service(&pool));
        let ai = Arc::new(AiService::new(
            SqlxInteractionRepository::boxed(pool.clone()),
            SqlxContentRepository::boxed(pool.clone()),
            SqlxTagRepository::boxed(pool.clone()),
        ));
        let service = SuggestionService::new(
            SqlxSuggestionRepository::boxed(pool.clone()),
            contents.clone(),
            ai,
        );
        Fixture {
            service,
            contents,
            pool,
        }
    }

    async fn draft(f: &Fixture, author: &User, body: &str) -> i64 {
        f.contents
            .create(
                author,
                CreateContentInput {
                    title: "Návrh".to_string(),
                    body: body.to_string(),
                    status: Some(ContentStatus::Draft),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .content
            .id
    }

    fn of_kind(items: &[ContentSuggestion], kind: SuggestionKind) -> &ContentSuggestion {
        items.iter().find(|s| s.kind == kind).unwrap()
    }

    #[tokio::test]
    async fn test_generate_replaces_pending() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let id = draft(&f, &author, "Krátky text.").await;

        let first = f.service.generate(&author, id).await.unwrap();
        assert_eq!(first.len(), 3);

        let second = f.service.generate(&author, id).await.unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(f.service.list(&author, id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_apply_rewrites_body() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let id = draft(&f, &author, "Krátky text.").await;
        let items = f.service.generate(&author, id).await.unwrap();

        let improvement = of_kind(&items, SuggestionKind::Improvement);
        let updated = f.service.apply(&author, improvement.id).await.unwrap();
        assert_eq!(
            updated.content.body,
            format!("Krátky text.\n\n{}", improvement.suggestion)
        );

        let structure = of_kind(&items, SuggestionKind::Structure);
        let updated = f.service.apply(&author, structure.id).await.unwrap();
        assert!(updated.content.body.ends_with(CONCLUSION_SECTION));

        let clarity = of_kind(&items, SuggestionKind::Clarity);
        let before = updated.content.body.clone();
        let unchanged = f.service.apply(&author, clarity.id).await.unwrap();
        assert_eq!(unchanged.content.body, before);

        // applied suggestions survive regeneration
        f.service.generate(&author, id).await.unwrap();
        let listed = f.service.list(&author, id).await.unwrap();
        assert_eq!(listed.iter().filter(|s| s.applied).count(), 3);
    }

    #[tokio::test]
    async fn test_apply_twice_conflicts() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let id = draft(&f, &author, "Krátky text.").await;
        let items = f.service.generate(&author, id).await.unwrap();

        f.service.apply(&author, items[0].id).await.unwrap();
        assert!(matches!(
            f.service.apply(&author, items[0].id).await.unwrap_err(),
            SuggestionServiceError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_apply_of_same_suggestion_conflicts() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let id = draft(&f, &author, "Krátky text.").await;
        let items = f.service.generate(&author, id).await.unwrap();
        let improvement = of_kind(&items, SuggestionKind::Improvement);

        let (a, b) = tokio::join!(
            f.service.apply(&author, improvement.id),
            f.service.apply(&author, improvement.id),
        );

        let conflicts = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(SuggestionServiceError::Conflict(_))))
            .count();
        assert_eq!(conflicts, 1);
        assert!(a.is_ok() || b.is_ok());

        let stored = f.contents.get(&author, id).await.unwrap();
        assert_eq!(stored.content.body.matches(&improvement.suggestion).count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_apply_of_different_suggestions_keeps_both() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let id = draft(&f, &author, "Krátky text.").await;
        let items = f.service.generate(&author, id).await.unwrap();
        let improvement = of_kind(&items, SuggestionKind::Improvement);
        let structure = of_kind(&items, SuggestionKind::Structure);

        let (a, b) = tokio::join!(
            f.service.apply(&author, improvement.id),
            f.service.apply(&author, structure.id),
        );
        a.unwrap();
        b.unwrap();

        let body = f.contents.get(&author, id).await.unwrap().content.body;
        assert!(body.starts_with("Krátky text."));
        assert!(body.contains(&improvement.suggestion));
        assert!(body.contains(CONCLUSION_SECTION));

        let listed = f.service.list(&author, id).await.unwrap();
        assert_eq!(listed.iter().filter(|s| s.applied).count(), 2);
    }

    #[tokio::test]
    async fn test_access_rules() {
        let f = setup().await;
        let author = create_user(&f.pool, "a@example.com", UserRole::User).await;
        let stranger = create_user(&f.pool, "s@example.com", UserRole::User).await;
        let id = draft(&f, &author, "Krátky text.").await;
        let items = f.service.generate(&author, id).await.unwrap();

        // a hidden draft reads as missing
        assert!(matches!(
            f.service.generate(&stranger, id).await.unwrap_err(),
            SuggestionServiceError::NotFound(_)
        ));
        assert!(matches!(
            f.service.apply(&stranger, items[0].id).await.unwrap_err(),
            SuggestionServiceError::NotFound(_)
        ));
        assert!(matches!(
            f.service.apply(&author, 999).await.unwrap_err(),
            SuggestionServiceError::NotFound(_)
        ));
    }
}
