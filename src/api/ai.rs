//! AI assistant endpoints
//!
//! - POST /api/v1/ai/analyze-content
//! - POST /api/v1/ai/prompt-suggestions
//! - GET /api/v1/ai/recommendations
//! - GET /api/v1/ai/predict-needs
//! - POST /api/v1/ai/tags
//! - GET /api/v1/ai/patterns
//! - GET /api/v1/ai/next-actions
//! - GET /api/v1/ai/context

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::{require_text, ApiJson};
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::services::ai::{ContentAnalysis, NeedsPrediction, PromptSuggestion, Recommendation};
use crate::services::insights::{InteractionPatterns, NextActions, SemanticTags, UserContext};

#[derive(Debug, Deserialize)]
pub struct AnalyzeContentRequest {
    /// Accepted for client compatibility, the analysis only reads `text`
    #[allow(dead_code)]
    pub content_id: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptSuggestionsRequest {
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-content", post(analyze_content))
        .route("/prompt-suggestions", post(prompt_suggestions))
        .route("/recommendations", get(recommendations))
        .route("/predict-needs", get(predict_needs))
        .route("/tags", post(generate_tags))
        .route("/patterns", get(patterns))
        .route("/next-actions", get(next_actions))
        .route("/context", get(context))
}

async fn analyze_content(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(body): ApiJson<AnalyzeContentRequest>,
) -> Result<Json<ContentAnalysis>, ApiError> {
    let text = require_text(body.text, "Text is required")?;
    Ok(Json(state.ai_service.analyze_content(&text)))
}

async fn prompt_suggestions(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(body): ApiJson<PromptSuggestionsRequest>,
) -> Result<Json<Vec<PromptSuggestion>>, ApiError> {
    let input = require_text(body.input, "Input is required")?;
    Ok(Json(state.ai_service.prompt_suggestions(&input)))
}

async fn recommendations(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Json<Vec<Recommendation>> {
    Json(state.ai_service.recommend_content())
}

async fn predict_needs(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Json<NeedsPrediction> {
    Json(state.ai_service.predict_needs())
}

async fn generate_tags(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(body): ApiJson<TextRequest>,
) -> Result<Json<SemanticTags>, ApiError> {
    let text = require_text(body.text, "Text is required")?;
    Ok(Json(state.ai_service.generate_tags(&text)))
}

async fn patterns(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<InteractionPatterns>, ApiError> {
    Ok(Json(state.ai_service.patterns(&user).await?))
}

async fn next_actions(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<NextActions>, ApiError> {
    Ok(Json(state.ai_service.next_actions(&user).await?))
}

async fn context(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<UserContext>, ApiError> {
    Ok(Json(state.ai_service.context(&user).await?))
}
