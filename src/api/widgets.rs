//! Dashboard widget endpoints, always scoped to the caller
//!
//! - GET|POST /api/v1/widgets
//! - PUT|DELETE /api/v1/widgets/{id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::api::common::ApiJson;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateWidgetInput, UpdateWidgetInput, Widget};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_widgets).post(create_widget))
        .route("/{id}", put(update_widget).delete(delete_widget))
}

async fn list_widgets(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Widget>>, ApiError> {
    Ok(Json(state.widget_service.list(&user).await?))
}

async fn create_widget(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(input): ApiJson<CreateWidgetInput>,
) -> Result<(StatusCode, Json<Widget>), ApiError> {
    let created = state.widget_service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_widget(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UpdateWidgetInput>,
) -> Result<Json<Widget>, ApiError> {
    Ok(Json(state.widget_service.update(&user, id, input).await?))
}

async fn delete_widget(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.widget_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
