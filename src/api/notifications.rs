//! Notification endpoints
//!
//! - GET /api/v1/notifications?read=true|false
//! - POST /api/v1/notifications (admin) - Notify any user
//! - POST /api/v1/notifications/{id}/read
//! - POST /api/v1/notifications/read-all

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::ApiJson;
use crate::api::middleware::{require_admin, ApiError, AppState, AuthenticatedUser};
use crate::models::{Notification, NotificationKind};

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub read: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    pub message: String,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

pub fn router() -> Router<AppState> {
    let create = post(create_notification).route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(list_notifications).merge(create))
        .route("/read-all", post(mark_all_read))
        .route("/{id}/read", post(mark_read))
}

async fn list_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(state.notification_service.list(&user, query.read).await?))
}

async fn create_notification(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    state.user_service.get(body.user_id).await?;
    let created = state
        .notification_service
        .notify(body.user_id, body.kind, body.message, body.metadata)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn mark_read(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(state.notification_service.mark_read(&user, id).await?))
}

async fn mark_all_read(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = state.notification_service.mark_all_read(&user).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
