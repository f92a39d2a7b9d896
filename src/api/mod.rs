//! API layer - HTTP handlers and routing
//!
//! Everything except registration, login and the health check sits behind
//! session authentication. Routes are grouped per resource:
//! - Auth and user management
//! - Contents, with their collaborations and suggestions
//! - Tags, interactions, notifications and widgets
//! - AI assistant and enhanced AI endpoints

pub mod ai;
pub mod auth;
pub mod collaborations;
pub mod common;
pub mod contents;
pub mod enhanced_ai;
pub mod interactions;
pub mod middleware;
pub mod notifications;
pub mod suggestions;
pub mod tags;
pub mod users;
pub mod widgets;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use middleware::{ApiError, AppState, AuthenticatedUser, RequestStats};

/// Build the `/api/v1` router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/users", users::router())
        .nest("/contents", contents::router())
        .nest("/collaborations", collaborations::router())
        .nest("/suggestions", suggestions::router())
        .nest("/tags", tags::router())
        .nest("/interactions", interactions::router())
        .nest("/notifications", notifications::router())
        .nest("/widgets", widgets::router())
        .nest("/ai/enhanced", enhanced_ai::router())
        .nest("/ai", ai::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    Router::new()
        .nest("/auth", auth::public_router())
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let cors = match state.config.server.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
            .allow_credentials(true),
        Err(_) => {
            warn!(
                "Invalid CORS origin {:?}, cross-origin requests are disabled",
                state.config.server.cors_origin
            );
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", build_api_router(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub total_requests: u64,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.request_stats.uptime_seconds(),
        total_requests: state.request_stats.total_requests(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{build_router, AppState};
    use crate::cache::create_test_cache;
    use crate::config::Config;
    use crate::db::repositories::test_support::migrated_pool;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    /// A registered account and its session token
    pub struct TestAccount {
        pub id: i64,
        pub token: String,
    }

    pub async fn test_server() -> (TestServer, AppState) {
        test_server_with(Config::default()).await
    }

    pub async fn test_server_with(config: Config) -> (TestServer, AppState) {
        let pool = migrated_pool().await;
        let state =
            AppState::new(config, pool, create_test_cache()).expect("Failed to build app state");
        let server =
            TestServer::new(build_router(state.clone())).expect("Failed to start test server");
        (server, state)
    }

    /// Register with password `secret`; the first account becomes admin
    pub async fn register(server: &TestServer, email: &str) -> TestAccount {
        let name = email.split('@').next().unwrap_or(email);
        let body: Value = server
            .post("/api/v1/auth/register")
            .json(&json!({ "name": name, "email": email, "password": "secret" }))
            .await
            .json();
        TestAccount {
            id: body["user"]["id"].as_i64().expect("registered user id"),
            token: body["token"].as_str().expect("session token").to_string(),
        }
    }

    /// Create a content item with a short body and return its id
    pub async fn create_content(server: &TestServer, token: &str, title: &str, status: &str) -> i64 {
        let body: Value = server
            .post("/api/v1/contents")
            .authorization_bearer(token)
            .json(&json!({ "title": title, "body": "Krátky text.", "status": status }))
            .await
            .json();
        body["id"].as_i64().expect("content id")
    }
}
