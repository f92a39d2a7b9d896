//! Enhanced AI endpoints backed by OpenAI/Groq, with local heuristics when
//! no provider is configured
//!
//! - POST /api/v1/ai/enhanced/analyze
//! - POST /api/v1/ai/enhanced/generate
//! - POST /api/v1/ai/enhanced/predict
//! - POST /api/v1/ai/enhanced/summarize
//! - GET /api/v1/ai/enhanced/provider
//! - PUT /api/v1/ai/enhanced/provider (admin)

use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::common::{require_text, ApiJson};
use crate::api::middleware::{require_admin, ApiError, AppState, AuthenticatedUser};
use crate::services::enhanced_ai::{ActionPrediction, EnhancedAnalysis, Summary};
use crate::services::llm::ProviderModels;
use crate::services::{GenerateOptions, Provider, SummarizeOptions};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub user_context: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<ActionPrediction>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
    #[serde(flatten)]
    pub options: SummarizeOptions,
}

#[derive(Debug, Deserialize)]
pub struct ProviderRequest {
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub provider: Provider,
    pub models: ProviderModels,
    pub remote_enabled: bool,
}

impl ProviderResponse {
    fn new(provider: Provider, remote_enabled: bool) -> Self {
        Self {
            provider,
            models: provider.models(),
            remote_enabled,
        }
    }
}

pub fn router() -> Router<AppState> {
    let set_provider = put(set_provider).route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/analyze", post(analyze))
        .route("/generate", post(generate))
        .route("/predict", post(predict))
        .route("/summarize", post(summarize))
        .route("/provider", get(get_provider).merge(set_provider))
}

async fn analyze(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(body): ApiJson<AnalyzeRequest>,
) -> Result<Json<EnhancedAnalysis>, ApiError> {
    let text = require_text(body.text, "Text is required")?;
    Ok(Json(state.enhanced_ai_service.analyze_content(&text).await))
}

async fn generate(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(options): ApiJson<GenerateOptions>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if options.prompt.trim().is_empty() {
        return Err(ApiError::validation_error("Prompt is required"));
    }
    let content = state.enhanced_ai_service.generate_content(&options).await;
    Ok(Json(GenerateResponse { content }))
}

async fn predict(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(body): ApiJson<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let context = body
        .user_context
        .filter(|c| !c.is_null())
        .ok_or_else(|| ApiError::validation_error("User context is required"))?;
    let predictions = state.enhanced_ai_service.predict_user_actions(&context).await;
    Ok(Json(PredictResponse { predictions }))
}

async fn summarize(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiJson(body): ApiJson<SummarizeRequest>,
) -> Result<Json<Summary>, ApiError> {
    let text = require_text(body.text, "Text is required")?;
    Ok(Json(
        state
            .enhanced_ai_service
            .summarize_content(&text, body.options)
            .await,
    ))
}

async fn get_provider(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Json<ProviderResponse> {
    Json(ProviderResponse::new(
        state.enhanced_ai_service.preferred_provider().await,
        state.enhanced_ai_service.is_remote(),
    ))
}

async fn set_provider(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProviderRequest>,
) -> Result<Json<ProviderResponse>, ApiError> {
    let name = require_text(body.provider, "Provider is required")?;
    let provider = state
        .enhanced_ai_service
        .set_preferred_provider(name.trim())
        .await?;
    Ok(Json(ProviderResponse::new(
        provider,
        state.enhanced_ai_service.is_remote(),
    )))
}
