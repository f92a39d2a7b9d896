//! Collaboration endpoints
//!
//! - GET|POST /api/v1/contents/{id}/collaborations (mounted by the content router)
//! - DELETE /api/v1/collaborations/{id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
    Json, Router,
};

use crate::api::common::ApiJson;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Collaboration, CreateCollaborationInput};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_collaboration))
}

pub async fn list_for_content(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(content_id): Path<i64>,
) -> Result<Json<Vec<Collaboration>>, ApiError> {
    let items = state
        .collaboration_service
        .list_for_content(&user, content_id)
        .await?;
    Ok(Json(items))
}

pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(content_id): Path<i64>,
    ApiJson(input): ApiJson<CreateCollaborationInput>,
) -> Result<(StatusCode, Json<Collaboration>), ApiError> {
    let created = state
        .collaboration_service
        .create(&user, content_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_collaboration(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.collaboration_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{create_content, register, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_collaborator_gains_access_and_notification() {
        let (server, _) = test_server().await;
        let author = register(&server, "author@example.com").await;
        let helper = register(&server, "helper@example.com").await;
        let id = create_content(&server, &author.token, "Spoločný návrh", "draft").await;

        let created = server
            .post(&format!("/api/v1/contents/{}/collaborations", id))
            .authorization_bearer(&author.token)
            .json(&json!({ "user_id": helper.id, "role": "editor" }))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        let collaboration_id = created.json::<Value>()["id"].as_i64().unwrap();

        let duplicate = server
            .post(&format!("/api/v1/contents/{}/collaborations", id))
            .authorization_bearer(&author.token)
            .json(&json!({ "user_id": helper.id }))
            .await;
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        // the draft is now visible and editable for the collaborator
        let edited = server
            .put(&format!("/api/v1/contents/{}", id))
            .authorization_bearer(&helper.token)
            .json(&json!({ "body": "Doplnené." }))
            .await;
        assert_eq!(edited.status_code(), StatusCode::OK);

        let notifications = server
            .get("/api/v1/notifications")
            .authorization_bearer(&helper.token)
            .await;
        let items: Value = notifications.json();
        assert_eq!(items[0]["type"], "collaboration");

        let listed = server
            .get(&format!("/api/v1/contents/{}/collaborations", id))
            .authorization_bearer(&helper.token)
            .await;
        assert_eq!(listed.json::<Value>().as_array().unwrap().len(), 1);

        let removed = server
            .delete(&format!("/api/v1/collaborations/{}", collaboration_id))
            .authorization_bearer(&helper.token)
            .await;
        assert_eq!(removed.status_code(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_only_author_adds_collaborators() {
        let (server, _) = test_server().await;
        let author = register(&server, "author@example.com").await;
        let other = register(&server, "other@example.com").await;
        let id = create_content(&server, &author.token, "Verejné", "published").await;

        let response = server
            .post(&format!("/api/v1/contents/{}/collaborations", id))
            .authorization_bearer(&other.token)
            .json(&json!({ "user_id": other.id }))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }
}
