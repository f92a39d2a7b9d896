//! Content model
//!
//! This module provides:
//! - `Content` entity, a document authored by a user
//! - `ContentFormat` and `ContentStatus` enums
//! - Input and filter types for creating, updating and listing content
//! - Pagination types shared by list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Tag;

/// Content entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub format: ContentFormat,
    pub status: ContentStatus,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    pub fn new(
        title: String,
        body: String,
        format: ContentFormat,
        status: ContentStatus,
        author_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            body,
            format,
            status,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

/// Body markup of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Text,
    Html,
    Markdown,
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFormat::Text => write!(f, "text"),
            ContentFormat::Html => write!(f, "html"),
            ContentFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ContentFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ContentFormat::Text),
            "html" => Ok(ContentFormat::Html),
            "markdown" => Ok(ContentFormat::Markdown),
            _ => Err(anyhow::anyhow!("Invalid content format: {}", s)),
        }
    }
}

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// Visible to the author, collaborators, editors and admins only
    #[default]
    Draft,
    Published,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentStatus::Draft => write!(f, "draft"),
            ContentStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for ContentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "published" => Ok(ContentStatus::Published),
            _ => Err(anyhow::anyhow!("Invalid content status: {}", s)),
        }
    }
}

/// Public part of the author shown next to a content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorBrief {
    pub id: i64,
    pub name: String,
}

/// Content together with its tags and author, as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentWithMeta {
    #[serde(flatten)]
    pub content: Content,
    pub tags: Vec<Tag>,
    pub author: AuthorBrief,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentInput {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub format: ContentFormat,
    pub status: Option<ContentStatus>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

/// Partial update; `tag_ids` replaces the whole tag set when present
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub format: Option<ContentFormat>,
    pub status: Option<ContentStatus>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Columns to overwrite in a content update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub format: Option<ContentFormat>,
    pub status: Option<ContentStatus>,
}

/// Which content a viewer may see in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Everything, drafts included
    All,
    /// Published content plus this author's drafts
    PublishedOrAuthor(i64),
}

/// Filters for content listings
#[derive(Debug, Clone)]
pub struct ContentFilter {
    pub status: Option<ContentStatus>,
    /// Matches content carrying any of these tags
    pub tag_ids: Vec<i64>,
    /// Case-insensitive substring of title or body
    pub search: Option<String>,
    pub visibility: Visibility,
}

impl ContentFilter {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            status: None,
            tag_ids: Vec::new(),
            search: None,
            visibility,
        }
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Copy)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    /// Clamp to page >= 1 and 1..=100 items per page
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 || self.total <= 0 {
            return 0;
        }
        ((self.total as u64 + self.per_page as u64 - 1) / self.per_page as u64) as u32
    }

    /// Convert the items while keeping the paging data
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_new_defaults() {
        let content = Content::new(
            "Title".to_string(),
            "Body".to_string(),
            ContentFormat::Markdown,
            ContentStatus::Draft,
            7,
        );
        assert_eq!(content.id, 0);
        assert_eq!(content.author_id, 7);
        assert!(!content.is_published());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(ContentFormat::from_str("HTML").unwrap(), ContentFormat::Html);
        assert!(ContentFormat::from_str("pdf").is_err());
        assert_eq!(ContentStatus::from_str("published").unwrap(), ContentStatus::Published);
        assert!(ContentStatus::from_str("archived").is_err());
        assert_eq!(ContentStatus::default(), ContentStatus::Draft);
    }

    #[test]
    fn test_list_params_clamping() {
        let params = ListParams::new(0, 500);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
        assert_eq!(params.offset(), 0);

        let params = ListParams::new(3, 10);
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_paged_result_total_pages() {
        let params = ListParams::new(1, 10);
        assert_eq!(PagedResult::<i32>::new(vec![], 0, &params).total_pages(), 0);
        assert_eq!(PagedResult::<i32>::new(vec![], 10, &params).total_pages(), 1);
        assert_eq!(PagedResult::<i32>::new(vec![], 11, &params).total_pages(), 2);
    }

    #[test]
    fn test_paged_result_map() {
        let params = ListParams::new(2, 5);
        let page = PagedResult::new(vec![1, 2], 7, &params).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 7);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_content_with_meta_flattens() {
        let item = ContentWithMeta {
            content: Content::new(
                "T".to_string(),
                "B".to_string(),
                ContentFormat::Text,
                ContentStatus::Published,
                1,
            ),
            tags: vec![],
            author: AuthorBrief {
                id: 1,
                name: "Ann".to_string(),
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["status"], "published");
        assert_eq!(json["author"]["name"], "Ann");
    }
}
