//! Tag API endpoints
//!
//! - GET /api/v1/tags?type=tag|category|system
//! - GET /api/v1/tags/{id}
//! - POST /api/v1/tags
//! - DELETE /api/v1/tags/{id} (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::ApiJson;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateTagInput, Tag, TagKind};

#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    #[serde(rename = "type")]
    pub kind: Option<TagKind>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{id}", get(get_tag).delete(delete_tag))
}

async fn list_tags(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListTagsQuery>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tag_service.list(query.kind).await?))
}

async fn get_tag(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
    Ok(Json(state.tag_service.get(id).await?))
}

async fn create_tag(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(input): ApiJson<CreateTagInput>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tag = state.tag_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn delete_tag(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.tag_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{register, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_create_list_delete() {
        let (server, _) = test_server().await;
        let admin = register(&server, "admin@example.com").await;
        let user = register(&server, "user@example.com").await;

        let created = server
            .post("/api/v1/tags")
            .authorization_bearer(&user.token)
            .json(&json!({ "name": "rust", "type": "category" }))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        let id = created.json::<Value>()["id"].as_i64().unwrap();

        let duplicate = server
            .post("/api/v1/tags")
            .authorization_bearer(&user.token)
            .json(&json!({ "name": "rust" }))
            .await;
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let categories = server
            .get("/api/v1/tags?type=category")
            .authorization_bearer(&user.token)
            .await;
        let categories: Value = categories.json();
        assert_eq!(categories.as_array().unwrap().len(), 1);
        assert_eq!(categories[0]["name"], "rust");

        let denied = server
            .delete(&format!("/api/v1/tags/{}", id))
            .authorization_bearer(&user.token)
            .await;
        assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);

        let deleted = server
            .delete(&format!("/api/v1/tags/{}", id))
            .authorization_bearer(&admin.token)
            .await;
        assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

        let gone = server
            .get(&format!("/api/v1/tags/{}", id))
            .authorization_bearer(&admin.token)
            .await;
        assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    }
}
