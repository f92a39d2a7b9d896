//! Dashboard widget service
//!
//! Widgets are private to their owner; someone else's widget reads as missing.

use crate::db::repositories::WidgetRepository;
use crate::models::{CreateWidgetInput, UpdateWidgetInput, User, Widget};
use anyhow::Context;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum WidgetServiceError {
    #[error("Widget not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct WidgetService {
    repo: Arc<dyn WidgetRepository>,
}

impl WidgetService {
    pub fn new(repo: Arc<dyn WidgetRepository>) -> Self {
        Self { repo }
    }

    /// The user's widgets in dashboard order
    pub async fn list(&self, user: &User) -> Result<Vec<Widget>, WidgetServiceError> {
        let widgets = self
            .repo
            .list_by_user(user.id)
            .await
            .context("Failed to list widgets")?;
        Ok(widgets)
    }

    /// New widgets go to the end unless a position is given
    pub async fn create(&self, user: &User, input: CreateWidgetInput) -> Result<Widget, WidgetServiceError> {
        let title = validate_title(&input.title)?;

        let position = match input.position {
            Some(p) => p,
            None => self
                .repo
                .count_by_user(user.id)
                .await
                .context("Failed to count widgets")? as i32,
        };

        let widget = Widget::new(
            user.id,
            title,
            input.kind,
            input.size.unwrap_or_default(),
            position,
            input.config,
        );
        let created = self.repo.create(&widget).await.context("Failed to create widget")?;
        Ok(created)
    }

    pub async fn update(
        &self,
        user: &User,
        id: i64,
        input: UpdateWidgetInput,
    ) -> Result<Widget, WidgetServiceError> {
        let mut widget = self.owned(user, id).await?;

        if let Some(title) = input.title {
            widget.title = validate_title(&title)?;
        }
        if let Some(kind) = input.kind {
            widget.kind = kind;
        }
        if let Some(size) = input.size {
            widget.size = size;
        }
        if let Some(position) = input.position {
            widget.position = position;
        }
        if input.config.is_some() {
            widget.config = input.config;
        }

        let updated = self.repo.update(&widget).await.context("Failed to update widget")?;
        Ok(updated)
    }

    pub async fn delete(&self, user: &User, id: i64) -> Result<(), WidgetServiceError> {
        self.owned(user, id).await?;
        self.repo.delete(id).await.context("Failed to delete widget")?;
        Ok(())
    }

    async fn owned(&self, user: &User, id: i64) -> Result<Widget, WidgetServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get widget")?
            .filter(|w| w.user_id == user.id)
            .ok_or(WidgetServiceError::NotFound)
    }
}

fn validate_title(title: &str) -> Result<String, WidgetServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(WidgetServiceError::ValidationError(
            "Title is required".to_string(),
        ));
    }
    Ok(title.to_string())
}
