//! Authentication API endpoints
//!
//! - POST /api/v1/auth/register - Create an account (first one becomes admin)
//! - POST /api/v1/auth/login - Log in, rate limited per IP and per email
//! - POST /api/v1/auth/logout - Drop the current session
//! - GET /api/v1/auth/me - Current user

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::IpAddr;
use tracing::{info, warn};

use crate::api::common::ApiJson;
use crate::api::middleware::{extract_session_token, ApiError, AppState, AuthenticatedUser};
use crate::models::User;
use crate::services::user::{AuthResult, LoginInput, RegisterInput, UserServiceError};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Routes reachable without a session
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes behind `require_auth`
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

fn session_cookie(token: &str, max_age_days: i64) -> Result<HeaderValue, ApiError> {
    let cookie = format!(
        "session={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token,
        max_age_days * 24 * 60 * 60
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal_error(format!("Invalid session cookie: {}", e)))
}

fn auth_response(
    state: &AppState,
    result: AuthResult,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&result.token, state.user_service.session_expiration_days())?,
    );
    Ok((
        headers,
        Json(AuthResponse {
            token: result.token,
            user: result.user,
        }),
    ))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .user_service
        .register(RegisterInput::new(body.name, body.email, body.password))
        .await?;

    let (headers, body) = auth_response(&state, result)?;
    Ok((StatusCode::CREATED, headers, body))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = body.email.trim().to_lowercase();

    if let Some(ip) = client_ip(&headers) {
        if state.rate_limiter.is_ip_limited(ip).await {
            warn!("Login rate limit hit for {}", ip);
            return Err(ApiError::with_details(
                "RATE_LIMIT",
                "Too many requests, try again later",
                json!({ "retry_after": 60 }),
            ));
        }
        state.rate_limiter.record_ip_request(ip).await;
    }

    if state.rate_limiter.is_email_limited(&email).await {
        warn!("Too many failed logins for {}", email);
        return Err(ApiError::with_details(
            "RATE_LIMIT",
            "Too many failed attempts, try again in 15 minutes",
            json!({ "retry_after": 900 }),
        ));
    }

    let result = match state
        .user_service
        .login(LoginInput::new(body.email, body.password))
        .await
    {
        Ok(result) => result,
        Err(e) => {
            if matches!(e, UserServiceError::AuthenticationError(_)) {
                state.rate_limiter.record_failed_attempt(&email).await;
            }
            return Err(e.into());
        }
    };

    state.rate_limiter.clear_email_attempts(&email).await;
    info!("User {} logged in", result.user.id);
    auth_response(&state, result)
}

/// POST /api/v1/auth/logout
async fn logout(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_session_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;
    state.user_service.logout(&token).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    );
    Ok((StatusCode::NO_CONTENT, response_headers))
}

/// GET /api/v1/auth/me
async fn me(user: AuthenticatedUser) -> Json<User> {
    Json(user.0)
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`
fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
    };
    forwarded.or_else(real_ip)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{register, test_server};
    use serde_json::Value;

    #[test]
    fn test_client_ip() {
        let mut headers = HeaderMap::new();
        assert!(client_ip(&headers).is_none());

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), Some("10.0.0.2".parse().unwrap()));

        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4, 10.0.0.1"));
        assert_eq!(client_ip(&headers), Some("1.2.3.4".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_register_first_user_is_admin() {
        let (server, _) = test_server().await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({ "name": "Eva", "email": "eva@example.com", "password": "secret" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let cookie = response.header(header::SET_COOKIE);
        assert!(cookie.to_str().unwrap().starts_with("session="));

        let body: Value = response.json();
        assert_eq!(body["user"]["role"], "admin");
        assert!(body["user"].get("password_hash").is_none());

        let second = server
            .post("/api/v1/auth/register")
            .json(&json!({ "name": "Jan", "email": "jan@example.com", "password": "secret" }))
            .await;
        assert_eq!(second.json::<Value>()["user"]["role"], "user");
    }

    #[tokio::test]
    async fn test_register_validation_and_conflict() {
        let (server, _) = test_server().await;
        register(&server, "eva@example.com").await;

        let duplicate = server
            .post("/api/v1/auth/register")
            .json(&json!({ "name": "Eva", "email": "eva@example.com", "password": "secret" }))
            .await;
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let missing = server
            .post("/api/v1/auth/register")
            .json(&json!({ "name": "Eva" }))
            .await;
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.json::<Value>()["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_login_me_logout() {
        let (server, _) = test_server().await;
        register(&server, "eva@example.com").await;

        let login = server
            .post("/api/v1/auth/login")
            .json(&json!({ "email": "eva@example.com", "password": "secret" }))
            .await;
        assert_eq!(login.status_code(), StatusCode::OK);
        let token = login.json::<Value>()["token"].as_str().unwrap().to_string();

        let me = server.get("/api/v1/auth/me").authorization_bearer(&token).await;
        assert_eq!(me.json::<Value>()["email"], "eva@example.com");

        let logout = server
            .post("/api/v1/auth/logout")
            .authorization_bearer(&token)
            .await;
        assert_eq!(logout.status_code(), StatusCode::NO_CONTENT);

        let after = server.get("/api/v1/auth/me").authorization_bearer(&token).await;
        assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_failures_are_rate_limited() {
        let (server, _) = test_server().await;
        register(&server, "eva@example.com").await;

        for _ in 0..5 {
            let response = server
                .post("/api/v1/auth/login")
                .json(&json!({ "email": "eva@example.com", "password": "wrong" }))
                .await;
            assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        }

        let limited = server
            .post("/api/v1/auth/login")
            .json(&json!({ "email": "eva@example.com", "password": "secret" }))
            .await;
        assert_eq!(limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limited.json::<Value>()["error"]["code"], "RATE_LIMIT");
    }

    #[tokio::test]
    async fn test_protected_routes_need_a_session() {
        let (server, _) = test_server().await;
        let response = server.get("/api/v1/auth/me").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let bogus = server.get("/api/v1/auth/me").authorization_bearer("nope").await;
        assert_eq!(bogus.status_code(), StatusCode::UNAUTHORIZED);
    }
}
