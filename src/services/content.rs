//! Content service
//!
//! Owns the visibility and edit rules for content:
//! - published content is visible to everyone signed in
//! - drafts are visible to their author, collaborators, editors and admins
//! - the author, editors, admins and owner/editor collaborators may edit
//! - only the author or an admin may delete

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::{
    CollaborationRepository, ContentRepository, TagRepository, UserRepository,
};
use crate::models::{
    AuthorBrief, Content, ContentChanges, ContentFilter, ContentStatus, ContentWithMeta,
    CreateContentInput, ListParams, PagedResult, UpdateContentInput, User, Visibility,
};
use crate::services::tag::CACHE_KEY_TAG_LIST;
use anyhow::Context;
use futures::future::try_join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Default and upper bound for `recent`
pub const DEFAULT_RECENT_LIMIT: u32 = 5;
const MAX_RECENT_LIMIT: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error("Content not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Query for content listings
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    pub status: Option<ContentStatus>,
    pub tag_ids: Vec<i64>,
    pub search: Option<String>,
    pub params: ListParams,
}

pub struct ContentService {
    content_repo: Arc<dyn ContentRepository>,
    tag_repo: Arc<dyn TagRepository>,
    user_repo: Arc<dyn UserRepository>,
    collaboration_repo: Arc<dyn CollaborationRepository>,
    cache: Arc<Cache>,
}

impl ContentService {
    pub fn new(
        content_repo: Arc<dyn ContentRepository>,
        tag_repo: Arc<dyn TagRepository>,
        user_repo: Arc<dyn UserRepository>,
        collaboration_repo: Arc<dyn CollaborationRepository>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            content_repo,
            tag_repo,
            user_repo,
            collaboration_repo,
            cache,
        }
    }

    pub async fn create(
        &self,
        author: &User,
        input: CreateContentInput,
    ) -> Result<ContentWithMeta, ContentServiceError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ContentServiceError::ValidationError(
                "Title is required".to_string(),
            ));
        }
        let tag_ids = self.validate_tags(&input.tag_ids).await?;

        let content = Content::new(
            title.to_string(),
            input.body,
            input.format,
            input.status.unwrap_or_default(),
            author.id,
        );
        let created = self
            .content_repo
            .create(&content)
            .await
            .context("Failed to create content")?;

        if !tag_ids.is_empty() {
            self.content_repo
                .set_tags(created.id, &tag_ids)
                .await
                .context("Failed to link tags")?;
            self.invalidate_tag_cache().await;
        }

        info!("User {} created content {}", author.id, created.id);
        self.with_meta(created).await
    }

    pub async fn get(&self, viewer: &User, id: i64) -> Result<ContentWithMeta, ContentServiceError> {
        let content = self.load_viewable(viewer, id).await?;
        self.with_meta(content).await
    }

    pub async fn list(
        &self,
        viewer: &User,
        query: ContentQuery,
    ) -> Result<PagedResult<ContentWithMeta>, ContentServiceError> {
        let mut filter = ContentFilter::new(listing_visibility(viewer));
        filter.status = query.status;
        filter.tag_ids = query.tag_ids;
        filter.search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (items, total) = self
            .content_repo
            .list(&filter, &query.params)
            .await
            .context("Failed to list content")?;

        let enriched = try_join_all(items.into_iter().map(|c| self.with_meta(c))).await?;
        Ok(PagedResult::new(enriched, total, &query.params))
    }

    /// Most recently updated visible content
    pub async fn recent(
        &self,
        viewer: &User,
        limit: Option<u32>,
    ) -> Result<Vec<ContentWithMeta>, ContentServiceError> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        let page = self
            .list(
                viewer,
                ContentQuery {
                    params: ListParams::new(1, limit),
                    ..Default::default()
                },
            )
            .await?;
        Ok(page.items)
    }

    pub async fn update(
        &self,
        editor: &User,
        id: i64,
        input: UpdateContentInput,
    ) -> Result<ContentWithMeta, ContentServiceError> {
        self.load_editable(editor, id).await?;

        let title = match input.title {
            Some(title) => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(ContentServiceError::ValidationError(
                        "Title is required".to_string(),
                    ));
                }
                Some(title.to_string())
            }
            None => None,
        };

        let tag_ids = match input.tag_ids {
            Some(ids) => Some(self.validate_tags(&ids).await?),
            None => None,
        };

        // Only the supplied columns are written, so concurrent edits of
        // different fields both survive
        let changes = ContentChanges {
            title,
            body: input.body,
            format: input.format,
            status: input.status,
        };
        let updated = self
            .content_repo
            .update(id, &changes)
            .await
            .context("Failed to update content")?
            .ok_or(ContentServiceError::NotFound)?;

        if let Some(tag_ids) = tag_ids {
            self.content_repo
                .set_tags(id, &tag_ids)
                .await
                .context("Failed to replace tags")?;
            self.invalidate_tag_cache().await;
        }

        self.with_meta(updated).await
    }

    pub async fn delete(&self, user: &User, id: i64) -> Result<(), ContentServiceError> {
        let content = self.load(id).await?;
        if content.author_id != user.id && !user.is_admin() {
            return Err(ContentServiceError::Forbidden(
                "Only the author or an admin can delete this content".to_string(),
            ));
        }

        self.content_repo
            .delete(id)
            .await
            .context("Failed to delete content")?;
        self.invalidate_tag_cache().await;
        info!("User {} deleted content {}", user.id, id);
        Ok(())
    }

    /// Fetch content the viewer may see; hidden drafts read as missing
    pub async fn load_viewable(&self, viewer: &User, id: i64) -> Result<Content, ContentServiceError> {
        let content = self.load(id).await?;
        if self.can_view(viewer, &content).await? {
            Ok(content)
        } else {
            Err(ContentServiceError::NotFound)
        }
    }

    /// Fetch content the user may modify
    pub async fn load_editable(&self, user: &User, id: i64) -> Result<Content, ContentServiceError> {
        let content = self.load_viewable(user, id).await?;
        if self.can_edit(user, &content).await? {
            Ok(content)
        } else {
            Err(ContentServiceError::Forbidden(
                "You cannot edit this content".to_string(),
            ))
        }
    }

    pub async fn can_view(&self, viewer: &User, content: &Content) -> Result<bool, ContentServiceError> {
        if content.is_published() || content.author_id == viewer.id || viewer.is_editor() {
            return Ok(true);
        }
        let collaboration = self
            .collaboration_repo
            .get_for_user(content.id, viewer.id)
            .await
            .context("Failed to check collaboration")?;
        Ok(collaboration.is_some())
    }

    pub async fn can_edit(&self, user: &User, content: &Content) -> Result<bool, ContentServiceError> {
        if content.author_id == user.id || user.is_editor() {
            return Ok(true);
        }
        let collaboration = self
            .collaboration_repo
            .get_for_user(content.id, user.id)
            .await
            .context("Failed to check collaboration")?;
        Ok(collaboration.is_some_and(|c| c.role.can_edit()))
    }

    /// Raw lookup without any access check
    pub async fn load(&self, id: i64) -> Result<Content, ContentServiceError> {
        self.content_repo
            .get_by_id(id)
            .await
            .context("Failed to get content")?
            .ok_or(ContentServiceError::NotFound)
    }

    async fn with_meta(&self, content: Content) -> Result<ContentWithMeta, ContentServiceError> {
        let tags = self
            .tag_repo
            .get_by_content_id(content.id)
            .await
            .context("Failed to load content tags")?;
        let author = self
            .user_repo
            .get_by_id(content.author_id)
            .await
            .context("Failed to load content author")?
            .map(|u| AuthorBrief { id: u.id, name: u.name })
            .unwrap_or(AuthorBrief {
                id: content.author_id,
                name: String::new(),
            });

        Ok(ContentWithMeta { content, tags, author })
    }

    /// Deduplicate tag ids and make sure every one exists
    async fn validate_tags(&self, ids: &[i64]) -> Result<Vec<i64>, ContentServiceError> {
        let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return Ok(unique);
        }

        let found = self
            .tag_repo
            .get_by_ids(&unique)
            .await
            .context("Failed to look up tags")?;
        if found.len() != unique.len() {
            let known: BTreeSet<i64> = found.iter().map(|t| t.id).collect();
            let missing: Vec<String> = unique
                .iter()
                .filter(|id| !known.contains(id))
                .map(|id| id.to_string())
                .collect();
            return Err(ContentServiceError::ValidationError(format!(
                "Unknown tag ids: {}",
                missing.join(", ")
            )));
        }
        Ok(unique)
    }

    async fn invalidate_tag_cache(&self) {
        if let Err(e) = self
            .cache
            .delete_pattern(&format!("{}*", CACHE_KEY_TAG_LIST))
            .await
        {
            warn!("Failed to invalidate tag cache: {}", e);
        }
    }
}

fn listing_visibility(viewer: &User) -> Visibility {
    if viewer.is_editor() {
        Visibility::All
    } else {
        Visibility::PublishedOrAuthor(viewer.id)
    }
}
