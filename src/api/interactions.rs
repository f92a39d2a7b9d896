//! Interaction tracking endpoints
//!
//! - GET /api/v1/interactions?limit (newest first, default 50, max 500)
//! - POST /api/v1/interactions

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::ApiJson;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateInteractionInput, Interaction};

#[derive(Debug, Deserialize)]
pub struct ListInteractionsQuery {
    pub limit: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_interactions).post(create_interaction))
}

async fn list_interactions(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListInteractionsQuery>,
) -> Result<Json<Vec<Interaction>>, ApiError> {
    let items = state
        .interaction_service
        .list_for_user(&user, query.limit)
        .await?;
    Ok(Json(items))
}

async fn create_interaction(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(input): ApiJson<CreateInteractionInput>,
) -> Result<(StatusCode, Json<Interaction>), ApiError> {
    let created = state.interaction_service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{create_content, register, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_record_and_list() {
        let (server, _) = test_server().await;
        let user = register(&server, "user@example.com").await;
        let id = create_content(&server, &user.token, "Článok", "published").await;

        for kind in ["view", "edit"] {
            let response = server
                .post("/api/v1/interactions")
                .authorization_bearer(&user.token)
                .json(&json!({ "content_id": id, "type": kind }))
                .await;
            assert_eq!(response.status_code(), StatusCode::CREATED);
        }

        let listed = server
            .get("/api/v1/interactions?limit=1")
            .authorization_bearer(&user.token)
            .await;
        let listed: Value = listed.json();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["type"], "edit");

        let missing = server
            .post("/api/v1/interactions")
            .authorization_bearer(&user.token)
            .json(&json!({ "content_id": 999, "type": "view" }))
            .await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let bad_kind = server
            .post("/api/v1/interactions")
            .authorization_bearer(&user.token)
            .json(&json!({ "content_id": id, "type": "stare" }))
            .await;
        assert_eq!(bad_kind.status_code(), StatusCode::BAD_REQUEST);
    }
}
