//! Chat-completions client for the hosted LLM providers
//!
//! OpenAI and Groq share the same `/chat/completions` wire format, so one
//! client covers both; only the base URL, key and model names differ.

use crate::config::AiConfig;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error};

/// Supported hosted providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Groq,
}

impl Provider {
    /// Model for structured JSON tasks
    pub fn completion_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4",
            Provider::Groq => "llama3-8b-8192",
        }
    }

    /// Model for free-form generation
    pub fn generation_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4",
            Provider::Groq => "llama3-70b-8192",
        }
    }

    /// Configured but never called
    pub fn embedding_model(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("text-embedding-ada-002"),
            Provider::Groq => None,
        }
    }

    pub fn models(&self) -> ProviderModels {
        ProviderModels {
            completion: self.completion_model(),
            generation: self.generation_model(),
            embedding: self.embedding_model(),
        }
    }
}

/// Model names a provider is configured with, as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderModels {
    pub completion: &'static str,
    pub generation: &'static str,
    pub embedding: Option<&'static str>,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Groq => write!(f, "groq"),
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            _ => Err(anyhow!("Invalid AI provider: {}", s)),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

/// One chat-completions call
#[derive(Debug, Clone)]
pub struct Completion {
    pub provider: Provider,
    pub model: &'static str,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    /// Ask the provider for a JSON object reply
    pub json: bool,
}

// ============================================================================
// Client
// ============================================================================

pub struct LlmClient {
    http: Client,
    openai_key: Option<String>,
    groq_key: Option<String>,
    openai_base_url: String,
    groq_base_url: String,
}

impl LlmClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let key = |k: &Option<String>| k.clone().filter(|s| !s.trim().is_empty());
        Ok(Self {
            http,
            openai_key: key(&config.openai_api_key),
            groq_key: key(&config.groq_api_key),
            openai_base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            groq_base_url: config.groq_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn has_key(&self, provider: Provider) -> bool {
        self.key(provider).is_some()
    }

    /// Groq when preferred and keyed, otherwise OpenAI when keyed
    pub fn select(&self, preferred: Provider) -> Result<Provider> {
        if preferred == Provider::Groq && self.has_key(Provider::Groq) {
            Ok(Provider::Groq)
        } else if self.has_key(Provider::OpenAi) {
            Ok(Provider::OpenAi)
        } else {
            Err(anyhow!("Nie je nakonfigurovaný žiadny AI poskytovateľ"))
        }
    }

    /// Send one completion and return the first choice's text
    pub async fn complete(&self, completion: Completion) -> Result<String> {
        let key = self
            .key(completion.provider)
            .ok_or_else(|| anyhow!("No API key for {}", completion.provider))?;

        let request = ChatRequest {
            model: completion.model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: completion.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: completion.prompt,
                },
            ],
            temperature: completion.temperature,
            response_format: completion.json.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        };

        let url = format!("{}/chat/completions", self.base_url(completion.provider));
        debug!("Sending completion to {} ({})", completion.provider, completion.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", completion.provider))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("{} API error {}: {}", completion.provider, status, body);
            return Err(anyhow!("{} API error {}: {}", completion.provider, status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("Empty response from {}", completion.provider))
    }

    fn key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai_key.as_deref(),
            Provider::Groq => self.groq_key.as_deref(),
        }
    }

    fn base_url(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.openai_base_url,
            Provider::Groq => &self.groq_base_url,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Requests captured by a fake provider
    pub type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Serve a fake `/chat/completions` that always answers with `reply`.
    ///
    /// Returns the base URL and the captured (authorization, body) pairs.
    pub async fn fake_provider(reply: &str) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let seen = captured.clone();
        let reply = reply.to_string();

        let app = Router::new().route(
            "/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let seen = seen.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock().unwrap().push((auth, body));
                    Json(json!({
                        "choices": [{ "message": { "role": "assistant", "content": reply } }]
                    }))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), captured)
    }
}
