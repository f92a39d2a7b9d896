//! Tag service
//!
//! Tag creation, lookup and removal. Listings are cached per kind and
//! invalidated whenever tags or content links change.

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::{is_unique_violation, TagRepository};
use crate::models::{CreateTagInput, Tag, TagKind, User};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const TAG_LIST_CACHE_TTL_SECS: u64 = 600;
pub(crate) const CACHE_KEY_TAG_LIST: &str = "tags:list";

/// Seeded into an empty tag table as (name, category)
const DEFAULT_TAGS: [(&str, &str); 5] = [
    ("marketing", "business"),
    ("development", "tech"),
    ("design", "creative"),
    ("analytics", "business"),
    ("content", "creative"),
];

#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    #[error("Tag not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct TagService {
    repo: Arc<dyn TagRepository>,
    cache: Arc<Cache>,
}

impl TagService {
    pub fn new(repo: Arc<dyn TagRepository>, cache: Arc<Cache>) -> Self {
        Self { repo, cache }
    }

    pub async fn create(&self, input: CreateTagInput) -> Result<Tag, TagServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(TagServiceError::ValidationError(
                "Tag name cannot be empty".to_string(),
            ));
        }

        let duplicate = || TagServiceError::Conflict(format!("Tag '{}' already exists", name));
        if self
            .repo
            .get_by_name(name)
            .await
            .context("Failed to check existing tag")?
            .is_some()
        {
            return Err(duplicate());
        }

        let category = input
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let tag = Tag::new(name.to_string(), input.kind.unwrap_or_default(), category);

        let created = match self.repo.create(&tag).await {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => return Err(duplicate()),
            Err(e) => return Err(e.context("Failed to create tag").into()),
        };
        self.invalidate().await;
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Tag, TagServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .ok_or(TagServiceError::NotFound)
    }

    /// All tags ordered by name, optionally of one kind
    pub async fn list(&self, kind: Option<TagKind>) -> Result<Vec<Tag>, TagServiceError> {
        let cache_key = match kind {
            Some(k) => format!("{}:{}", CACHE_KEY_TAG_LIST, k),
            None => format!("{}:all", CACHE_KEY_TAG_LIST),
        };

        if let Ok(Some(cached)) = self.cache.get::<Vec<Tag>>(&cache_key).await {
            return Ok(cached);
        }

        let tags = self.repo.list(kind).await.context("Failed to list tags")?;
        let _ = self
            .cache
            .set(&cache_key, &tags, Duration::from_secs(TAG_LIST_CACHE_TTL_SECS))
            .await;
        Ok(tags)
    }

    /// Admin only; links to content go with the tag
    pub async fn delete(&self, requester: &User, id: i64) -> Result<(), TagServiceError> {
        if !requester.is_admin() {
            return Err(TagServiceError::Forbidden(
                "Only admins can delete tags".to_string(),
            ));
        }
        self.get(id).await?;

        self.repo.delete(id).await.context("Failed to delete tag")?;
        self.invalidate().await;
        Ok(())
    }

    /// Seed the default tags when none exist yet
    pub async fn init_defaults(&self) -> Result<usize, TagServiceError> {
        if self.repo.count().await.context("Failed to count tags")? > 0 {
            return Ok(0);
        }

        for (name, category) in DEFAULT_TAGS {
            let tag = Tag::new(name.to_string(), TagKind::Tag, Some(category.to_string()));
            self.repo
                .create(&tag)
                .await
                .with_context(|| format!("Failed to seed tag {}", name))?;
        }
        self.invalidate().await;
        info!("Seeded {} default tags", DEFAULT_TAGS.len());
        Ok(DEFAULT_TAGS.len())
    }

    /// Forget cached listings
    pub async fn invalidate(&self) {
        if let Err(e) = self
            .cache
            .delete_pattern(&format!("{}*", CACHE_KEY_TAG_LIST))
            .await
        {
            warn!("Failed to invalidate tag cache: {}", e);
        }
    }
}
