//! Common API utilities and shared types
//!
//! Pagination defaults, the JSON body extractor and the conversions from
//! service errors into [`ApiError`].

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use serde::Deserialize;
use tracing::error;

use crate::api::middleware::ApiError;
use crate::models::ListParams;
use crate::services::{
    AiServiceError, CollaborationServiceError, ContentServiceError, EnhancedAiError,
    InteractionServiceError, NotificationServiceError, SuggestionServiceError, TagServiceError,
    UserServiceError, WidgetServiceError,
};

// ============================================================================
// Pagination
// ============================================================================

pub fn default_page() -> u32 {
    1
}

pub fn default_per_page() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl PaginationQuery {
    pub fn params(&self) -> ListParams {
        ListParams::new(self.page, self.per_page)
    }
}

/// `"1, 2,x"` -> `[1, 2]`
pub fn parse_id_list(raw: Option<&str>) -> Vec<i64> {
    raw.map(|s| {
        s.split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    })
    .unwrap_or_default()
}

/// Treat a missing or blank string as absent
pub fn require_text(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::validation_error(message))
}

// ============================================================================
// JSON body
// ============================================================================

/// `Json` whose rejections answer with a `VALIDATION_ERROR` body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation_error(rejection.body_text())
    }
}

// ============================================================================
// Service error conversions
// ============================================================================

fn internal(err: anyhow::Error) -> ApiError {
    error!("Internal error: {:#}", err);
    ApiError::internal_error(err.to_string())
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
            UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            UserServiceError::Conflict(msg) => ApiError::conflict(msg),
            UserServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            UserServiceError::NotFound => ApiError::not_found("User not found"),
            UserServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<ContentServiceError> for ApiError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::NotFound => ApiError::not_found("Content not found"),
            ContentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            ContentServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ContentServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<TagServiceError> for ApiError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::NotFound => ApiError::not_found("Tag not found"),
            TagServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            TagServiceError::Conflict(msg) => ApiError::conflict(msg),
            TagServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            TagServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<InteractionServiceError> for ApiError {
    fn from(err: InteractionServiceError) -> Self {
        match err {
            InteractionServiceError::NotFound => ApiError::not_found("Content not found"),
            InteractionServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<NotificationServiceError> for ApiError {
    fn from(err: NotificationServiceError) -> Self {
        match err {
            NotificationServiceError::NotFound => ApiError::not_found("Notification not found"),
            NotificationServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            NotificationServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<CollaborationServiceError> for ApiError {
    fn from(err: CollaborationServiceError) -> Self {
        match err {
            CollaborationServiceError::NotFound(msg) => ApiError::not_found(msg),
            CollaborationServiceError::Conflict(msg) => ApiError::conflict(msg),
            CollaborationServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            CollaborationServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<WidgetServiceError> for ApiError {
    fn from(err: WidgetServiceError) -> Self {
        match err {
            WidgetServiceError::NotFound => ApiError::not_found("Widget not found"),
            WidgetServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            WidgetServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<SuggestionServiceError> for ApiError {
    fn from(err: SuggestionServiceError) -> Self {
        match err {
            SuggestionServiceError::NotFound(msg) => ApiError::not_found(msg),
            SuggestionServiceError::Conflict(msg) => ApiError::conflict(msg),
            SuggestionServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            SuggestionServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            SuggestionServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<AiServiceError> for ApiError {
    fn from(err: AiServiceError) -> Self {
        match err {
            AiServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<EnhancedAiError> for ApiError {
    fn from(err: EnhancedAiError) -> Self {
        match err {
            EnhancedAiError::InvalidProvider(_) => ApiError::validation_error(err.to_string()),
        }
    }
}
