//! Content suggestion endpoints
//!
//! - GET /api/v1/contents/{id}/suggestions
//! - POST /api/v1/contents/{id}/suggestions/generate
//! - POST /api/v1/suggestions/{id}/apply

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{ContentSuggestion, ContentWithMeta};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/apply", post(apply))
}

pub async fn list_for_content(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(content_id): Path<i64>,
) -> Result<Json<Vec<ContentSuggestion>>, ApiError> {
    Ok(Json(state.suggestion_service.list(&user, content_id).await?))
}

pub async fn generate(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(content_id): Path<i64>,
) -> Result<Json<Vec<ContentSuggestion>>, ApiError> {
    Ok(Json(state.suggestion_service.generate(&user, content_id).await?))
}

async fn apply(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ContentWithMeta>, ApiError> {
    Ok(Json(state.suggestion_service.apply(&user, id).await?))
}
