//! Content API endpoints
//!
//! - GET /api/v1/contents?status&tag_ids=1,2&search&page&per_page
//! - GET /api/v1/contents/recent?limit
//! - GET|PUT|DELETE /api/v1/contents/{id}
//! - POST /api/v1/contents
//!
//! Visibility and edit rules live in the content service; hidden drafts
//! answer 404 just like missing ones.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::{default_page, default_per_page, parse_id_list, ApiJson};
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::{collaborations, suggestions};
use crate::models::{
    ContentStatus, ContentWithMeta, CreateContentInput, ListParams, PagedResult,
    UpdateContentInput,
};
use crate::services::ContentQuery;

#[derive(Debug, Deserialize)]
pub struct ListContentsQuery {
    pub status: Option<ContentStatus>,
    /// Comma separated tag ids; content must carry all of them
    pub tag_ids: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contents).post(create_content))
        .route("/recent", get(recent_contents))
        .route(
            "/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
        .route(
            "/{id}/collaborations",
            get(collaborations::list_for_content).post(collaborations::create),
        )
        .route("/{id}/suggestions", get(suggestions::list_for_content))
        .route(
            "/{id}/suggestions/generate",
            axum::routing::post(suggestions::generate),
        )
}

async fn list_contents(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListContentsQuery>,
) -> Result<Json<PagedResult<ContentWithMeta>>, ApiError> {
    let query = ContentQuery {
        status: query.status,
        tag_ids: parse_id_list(query.tag_ids.as_deref()),
        search: query.search,
        params: ListParams::new(query.page, query.per_page),
    };
    Ok(Json(state.content_service.list(&user, query).await?))
}

async fn recent_contents(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<ContentWithMeta>>, ApiError> {
    Ok(Json(state.content_service.recent(&user, query.limit).await?))
}

async fn get_content(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ContentWithMeta>, ApiError> {
    Ok(Json(state.content_service.get(&user, id).await?))
}

async fn create_content(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(input): ApiJson<CreateContentInput>,
) -> Result<(StatusCode, Json<ContentWithMeta>), ApiError> {
    let created = state.content_service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_content(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UpdateContentInput>,
) -> Result<Json<ContentWithMeta>, ApiError> {
    Ok(Json(state.content_service.update(&user, id, input).await?))
}

async fn delete_content(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.content_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{register, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_content_lifecycle() {
        let (server, _) = test_server().await;
        let author = register(&server, "author@example.com").await;

        let created = server
            .post("/api/v1/contents")
            .authorization_bearer(&author.token)
            .json(&json!({ "title": "Plán", "body": "Prvý návrh.", "status": "published" }))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        let body: Value = created.json();
        let id = body["id"].as_i64().unwrap();
        assert_eq!(body["author"]["id"], author.id);

        let updated = server
            .put(&format!("/api/v1/contents/{}", id))
            .authorization_bearer(&author.token)
            .json(&json!({ "title": "Plán v2" }))
            .await;
        assert_eq!(updated.json::<Value>()["title"], "Plán v2");

        let listed = server
            .get("/api/v1/contents?status=published&search=v2")
            .authorization_bearer(&author.token)
            .await;
        assert_eq!(listed.json::<Value>()["total"], 1);

        let recent = server
            .get("/api/v1/contents/recent?limit=3")
            .authorization_bearer(&author.token)
            .await;
        assert_eq!(recent.json::<Value>().as_array().unwrap().len(), 1);

        let deleted = server
            .delete(&format!("/api/v1/contents/{}", id))
            .authorization_bearer(&author.token)
            .await;
        assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

        let gone = server
            .get(&format!("/api/v1/contents/{}", id))
            .authorization_bearer(&author.token)
            .await;
        assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_drafts_hidden_from_other_users() {
        let (server, _) = test_server().await;
        let _admin = register(&server, "admin@example.com").await;
        let author = register(&server, "author@example.com").await;
        let stranger = register(&server, "stranger@example.com").await;

        let created = server
            .post("/api/v1/contents")
            .authorization_bearer(&author.token)
            .json(&json!({ "title": "Tajné", "body": "Koncept." }))
            .await;
        let id = created.json::<Value>()["id"].as_i64().unwrap();

        let hidden = server
            .get(&format!("/api/v1/contents/{}", id))
            .authorization_bearer(&stranger.token)
            .await;
        assert_eq!(hidden.status_code(), StatusCode::NOT_FOUND);

        let listed = server
            .get("/api/v1/contents")
            .authorization_bearer(&stranger.token)
            .await;
        assert_eq!(listed.json::<Value>()["total"], 0);
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let (server, _) = test_server().await;
        let author = register(&server, "author@example.com").await;

        let response = server
            .post("/api/v1/contents")
            .authorization_bearer(&author.token)
            .json(&json!({ "title": "  ", "body": "x" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
