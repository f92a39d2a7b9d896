//! Enhanced AI service
//!
//! Content analysis, generation, action prediction and summarization.
//! Requests go to a hosted provider when remote calls are enabled and a key
//! is configured; otherwise local heuristics answer. Provider failures fall
//! back to fixed payloads. Results are memoized in the shared cache under
//! keys derived from `hash_string`.

use crate::cache::{Cache, CacheLayer};
use crate::config::AiConfig;
use crate::services::llm::{Completion, LlmClient, Provider};
use crate::services::text_analysis::{
    count_whole_words, hash_string, terminated_sentences, top_by_frequency, truncate_chars,
    word_tokens,
};
use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const KEYWORD_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "with", "by",
];
const POSITIVE_WORDS: &[&str] = &[
    "dobrý", "skvelý", "výborný", "úžasný", "perfektný", "rád", "spokojný", "šťastný",
];
const NEGATIVE_WORDS: &[&str] = &[
    "zlý", "hrozný", "strašný", "nespokojný", "problém", "chyba", "smutný", "nešťastný",
];
const KEY_POINT_MARKERS: &[&str] = &["dôležité", "kľúčové", "hlavné", "významné", "podstatné"];
const ACTION_MARKERS: &[&str] = &[
    "musí", "treba", "potrebné", "vykonať", "implementovať", "zabezpečiť",
];
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("business", &["biznis", "podnikanie", "firma", "spoločnosť", "trh", "predaj", "marketing"]),
    ("technology", &["technológia", "softvér", "hardvér", "aplikácia", "systém", "vývoj", "programovanie"]),
    ("science", &["veda", "výskum", "štúdia", "experiment", "teória", "analýza"]),
    ("health", &["zdravie", "medicína", "choroba", "liečba", "pacient", "lekár"]),
    ("education", &["vzdelávanie", "škola", "študent", "učiteľ", "kurz", "tréning"]),
    ("entertainment", &["zábava", "film", "hudba", "hra", "šport", "umenie"]),
];

pub const GENERATION_FAILED: &str = "Nepodarilo sa vygenerovať obsah. Skúste to znova neskôr.";
const DEFAULT_SUMMARY_LENGTH: usize = 200;

static PERSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").expect("valid person regex"));
static ORGANIZATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z]+ (s\.r\.o\.|a\.s\.|k\.s\.)").expect("valid organization regex")
});
static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}\.\s?\d{1,2}\.\s?\d{4}\b").expect("valid date regex"));
static SK_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[ľščťžýáíéúäô]|som|sme|ste|bolo|ako").expect("valid sk regex")
});
static CS_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[ěščřžýáíéúů]|jsem|jsme|jste|bylo|jak").expect("valid cs regex")
});
static EN_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(the|is|are|was|were|have|has|had|been|will|would)\b")
        .expect("valid en regex")
});

#[derive(Debug, thiserror::Error)]
pub enum EnhancedAiError {
    #[error("Neplatný poskytovateľ AI. Podporované hodnoty: \"openai\", \"groq\" (got {0})")]
    InvalidProvider(String),
}

// ============================================================================
// Inputs and results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancedAnalysis {
    pub tags: Vec<String>,
    pub sentiment: String,
    pub entities: Vec<NamedEntity>,
    pub summary: String,
    pub language: String,
    pub categories: Vec<String>,
}

impl Default for EnhancedAnalysis {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            sentiment: "neutral".to_string(),
            entities: Vec::new(),
            summary: String::new(),
            language: "sk".to_string(),
            categories: Vec::new(),
        }
    }
}

/// Field order matters: the cache key hashes this serialized as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub prompt: String,
    #[serde(rename = "type", default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl GenerateOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            content_type: default_content_type(),
            tone: default_tone(),
            language: default_language(),
        }
    }
}

fn default_content_type() -> String {
    "article".to_string()
}

fn default_tone() -> String {
    "formal".to_string()
}

fn default_language() -> String {
    "sk".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPrediction {
    pub action: String,
    pub probability: f64,
    pub context: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SummarizeOptions {
    pub max_length: usize,
    pub extract_key_points: bool,
    pub extract_action_items: bool,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_SUMMARY_LENGTH,
            extract_key_points: true,
            extract_action_items: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Vec<String>>,
}

// ============================================================================
// Service
// ============================================================================

pub struct EnhancedAiService {
    client: LlmClient,
    remote_enabled: bool,
    preferred: RwLock<Provider>,
    cache: Arc<Cache>,
    ttl: Duration,
}

impl EnhancedAiService {
    pub fn new(config: &AiConfig, cache: Arc<Cache>) -> anyhow::Result<Self> {
        let preferred = config.preferred_provider.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown AI provider {:?}, using openai",
                config.preferred_provider
            );
            Provider::OpenAi
        });
        Ok(Self {
            client: LlmClient::new(config)?,
            remote_enabled: config.remote_enabled && config.has_any_key(),
            preferred: RwLock::new(preferred),
            cache,
            ttl: Duration::from_secs(config.cache_ttl_seconds),
        })
    }

    pub async fn preferred_provider(&self) -> Provider {
        *self.preferred.read().await
    }

    pub async fn set_preferred_provider(&self, name: &str) -> Result<Provider, EnhancedAiError> {
        let provider: Provider = name
            .parse()
            .map_err(|_| EnhancedAiError::InvalidProvider(name.to_string()))?;
        *self.preferred.write().await = provider;
        info!("Preferred AI provider set to {}", provider);
        Ok(provider)
    }

    /// Whether calls go to a hosted provider
    pub fn is_remote(&self) -> bool {
        self.remote_enabled
    }

    pub async fn analyze_content(&self, text: &str) -> EnhancedAnalysis {
        let key = format!("analyze_{}", hash_string(text));
        if let Some(cached) = self.cached(&key).await {
            return cached;
        }

        let result = if self.remote_enabled {
            self.remote_json::<EnhancedAnalysis>(
                "Si expertný systém na analýzu textu. Tvoja úloha je analyzovať text a poskytnúť štruktúrovanú odpoveď vo formáte JSON.",
                analyze_prompt(text),
            )
            .await
        } else {
            Ok(local_analysis(text))
        };

        match result {
            Ok(analysis) => {
                self.store(&key, &analysis).await;
                analysis
            }
            Err(e) => {
                warn!("Content analysis failed, using fallback: {:#}", e);
                EnhancedAnalysis {
                    tags: keywords(text),
                    ..Default::default()
                }
            }
        }
    }

    pub async fn generate_content(&self, options: &GenerateOptions) -> String {
        let key = match serde_json::to_string(options) {
            Ok(json) => format!("generate_{}", hash_string(&json)),
            Err(e) => {
                warn!("Failed to serialize generate options: {}", e);
                return GENERATION_FAILED.to_string();
            }
        };
        if let Some(cached) = self.cached::<String>(&key).await {
            return cached;
        }

        let result = if self.remote_enabled {
            self.remote_generate(options).await
        } else {
            Ok(render_template(options))
        };

        match result {
            Ok(content) => {
                self.store(&key, &content).await;
                content
            }
            Err(e) => {
                warn!("Content generation failed: {:#}", e);
                GENERATION_FAILED.to_string()
            }
        }
    }

    pub async fn predict_user_actions(&self, context: &Value) -> Vec<ActionPrediction> {
        let key = format!("predict_{}", hash_string(&context.to_string()));
        if let Some(cached) = self.cached(&key).await {
            return cached;
        }

        let result = if self.remote_enabled {
            self.remote_predictions(context).await
        } else {
            Ok(simulate_predictions(context))
        };

        match result {
            Ok(predictions) => {
                self.store(&key, &predictions).await;
                predictions
            }
            Err(e) => {
                warn!("Action prediction failed, using fallback: {:#}", e);
                fallback_predictions()
            }
        }
    }

    pub async fn summarize_content(&self, text: &str, options: SummarizeOptions) -> Summary {
        let key = format!(
            "summarize_{}_{}_{}_{}",
            hash_string(text),
            options.max_length,
            options.extract_key_points,
            options.extract_action_items
        );
        if let Some(cached) = self.cached(&key).await {
            return cached;
        }

        let result = if self.remote_enabled {
            self.remote_json::<Summary>(
                "Si expertný systém na sumarizáciu textu. Tvoja úloha je sumarizovať text a extrahovať kľúčové informácie.",
                summarize_prompt(text, &options),
            )
            .await
        } else {
            Ok(local_summary(text, &options))
        };

        match result {
            Ok(summary) => {
                self.store(&key, &summary).await;
                summary
            }
            Err(e) => {
                warn!("Summarization failed, using fallback: {:#}", e);
                let summary = if text.chars().count() > DEFAULT_SUMMARY_LENGTH {
                    format!("{}...", truncate_chars(text, DEFAULT_SUMMARY_LENGTH - 3))
                } else {
                    text.to_string()
                };
                Summary {
                    summary,
                    key_points: None,
                    action_items: None,
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Remote calls
    // ------------------------------------------------------------------

    async fn remote_json<T: DeserializeOwned>(&self, system: &str, prompt: String) -> anyhow::Result<T> {
        let provider = self.client.select(self.preferred_provider().await)?;
        let reply = self
            .client
            .complete(Completion {
                provider,
                model: provider.completion_model(),
                system: system.to_string(),
                prompt,
                temperature: 0.3,
                json: true,
            })
            .await?;
        serde_json::from_str(&reply).context("Provider returned invalid JSON")
    }

    async fn remote_generate(&self, options: &GenerateOptions) -> anyhow::Result<String> {
        let provider = self.client.select(self.preferred_provider().await)?;
        self.client
            .complete(Completion {
                provider,
                model: provider.generation_model(),
                system: system_prompt(options),
                prompt: options.prompt.clone(),
                temperature: 0.7,
                json: false,
            })
            .await
    }

    async fn remote_predictions(&self, context: &Value) -> anyhow::Result<Vec<ActionPrediction>> {
        let reply: Value = self
            .remote_json(
                "Si expertný systém na predikciu používateľského správania. Tvoja úloha je analyzovať kontext používateľa a predpovedať jeho budúce akcie.",
                predict_prompt(context),
            )
            .await?;

        // a JSON-object reply wraps the list
        let list = match reply {
            Value::Array(_) => reply,
            Value::Object(mut map) => map
                .remove("predictions")
                .ok_or_else(|| anyhow::anyhow!("Provider reply has no predictions"))?,
            other => anyhow::bail!("Unexpected prediction reply: {}", other),
        };
        serde_json::from_value(list).context("Provider returned malformed predictions")
    }

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------

    async fn cached<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.cache.get::<T>(key).await {
            Ok(Some(hit)) => {
                debug!("AI cache hit: {}", key);
                Some(hit)
            }
            _ => None,
        }
    }

    async fn store<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value, self.ttl).await {
            warn!("Failed to cache AI result {}: {}", key, e);
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn analyze_prompt(text: &str) -> String {
    format!(
        r#"Analyzuj nasledujúci text a poskytni štruktúrovanú analýzu vo formáte JSON:

Text na analýzu:
"""
{text}
"""

Požadovaný výstup (JSON):
{{
  "tags": ["tag1", "tag2", "tag3", "tag4", "tag5"],
  "sentiment": "positive/negative/neutral",
  "entities": [
    {{"type": "person/organization/location/date/other", "name": "meno entity", "relevance": 0.0-1.0}}
  ],
  "summary": "krátke zhrnutie textu v 1-2 vetách",
  "language": "jazyk textu",
  "categories": ["kategória1", "kategória2"]
}}"#
    )
}

fn predict_prompt(context: &Value) -> String {
    let pretty = serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string());
    format!(
        r#"Analyzuj nasledujúci kontext používateľa a predikuj jeho najpravdepodobnejšie budúce akcie.
Poskytni odpoveď vo formáte JSON.

Kontext používateľa:
"""
{pretty}
"""

Požadovaný výstup (JSON):
{{
  "predictions": [
    {{
      "action": "názov akcie",
      "probability": 0.0-1.0,
      "context": "kontext predikcie",
      "recommendation": "odporúčanie pre UI"
    }}
  ]
}}"#
    )
}

fn summarize_prompt(text: &str, options: &SummarizeOptions) -> String {
    let mut fields = vec![r#"  "summary": "zhrnutie textu""#.to_string()];
    if options.extract_key_points {
        fields.push(r#"  "key_points": ["kľúčový bod 1", "kľúčový bod 2"]"#.to_string());
    }
    if options.extract_action_items {
        fields.push(r#"  "action_items": ["akčná položka 1", "akčná položka 2"]"#.to_string());
    }
    format!(
        "Sumarizuj nasledujúci text do maximálne {} znakov.\n\nText na sumarizáciu:\n\"\"\"\n{}\n\"\"\"\n\nPožadovaný výstup (JSON):\n{{\n{}\n}}",
        options.max_length,
        text,
        fields.join(",\n")
    )
}

/// System prompt for generation: base, type, tone, then language
pub fn system_prompt(options: &GenerateOptions) -> String {
    let mut prompt = String::from("Si expertný asistent pre tvorbu obsahu.");

    let type_sentence = match options.content_type.as_str() {
        "article" => Some(" Tvoja úloha je vytvoriť informatívny článok s úvodom, hlavnou časťou a záverom."),
        "email" => Some(" Tvoja úloha je vytvoriť profesionálny email s predmetom, oslovením, hlavnou časťou a záverom."),
        "social" => Some(" Tvoja úloha je vytvoriť pútavý príspevok na sociálne siete s hashtagmi a výzvou na akciu."),
        "report" => Some(" Tvoja úloha je vytvoriť štruktúrovaný report s exekutívnym zhrnutím, analýzou a odporúčaniami."),
        "presentation" => Some(" Tvoja úloha je vytvoriť osnovu prezentácie s hlavnými bodmi a poznámkami pre prezentujúceho."),
        _ => None,
    };
    let tone_sentence = match options.tone.as_str() {
        "formal" => Some(" Používaj formálny, profesionálny tón."),
        "informal" => Some(" Používaj neformálny, konverzačný tón."),
        "technical" => Some(" Používaj technický, odborný tón s príslušnou terminológiou."),
        "friendly" => Some(" Používaj priateľský, prístupný tón."),
        _ => None,
    };

    prompt.extend(type_sentence);
    prompt.extend(tone_sentence);
    prompt.push_str(&format!(" Obsah vytvor v jazyku: {}.", options.language));
    prompt
}

// ============================================================================
// Local heuristics
// ============================================================================

fn local_analysis(text: &str) -> EnhancedAnalysis {
    EnhancedAnalysis {
        tags: keywords(text),
        sentiment: sentiment(text).to_string(),
        entities: entities(text),
        summary: summarize(text, DEFAULT_SUMMARY_LENGTH),
        language: detect_language(text).to_string(),
        categories: categorize(text),
    }
}

fn keywords(text: &str) -> Vec<String> {
    let words = word_tokens(text)
        .into_iter()
        .filter(|w| w.chars().count() > 3 && !KEYWORD_STOPWORDS.contains(&w.as_str()));
    top_by_frequency(words, 5)
        .into_iter()
        .map(|(word, _)| word)
        .collect()
}

fn sentiment(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    let positive = count_whole_words(&lower, POSITIVE_WORDS);
    let negative = count_whole_words(&lower, NEGATIVE_WORDS);
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => "positive",
        std::cmp::Ordering::Less => "negative",
        std::cmp::Ordering::Equal => "neutral",
    }
}

fn entities(text: &str) -> Vec<NamedEntity> {
    let found = |re: &Regex, kind: &str, relevance: f64| -> Vec<NamedEntity> {
        re.find_iter(text)
            .map(|m| NamedEntity {
                kind: kind.to_string(),
                name: m.as_str().to_string(),
                relevance,
            })
            .collect()
    };

    let mut out = found(&PERSON, "person", 0.8);
    out.extend(found(&ORGANIZATION, "organization", 0.7));
    out.extend(found(&DATE, "date", 0.6));
    out
}

fn detect_language(text: &str) -> &'static str {
    let sk = SK_MARKERS.find_iter(text).count();
    let cs = CS_MARKERS.find_iter(text).count();
    let en = EN_MARKERS.find_iter(text).count();

    if sk > cs && sk > en {
        "sk"
    } else if cs > sk && cs > en {
        "cs"
    } else {
        "en"
    }
}

fn categorize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let matched: Vec<String> = CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(name, _)| name.to_string())
        .collect();

    if matched.is_empty() {
        vec!["general".to_string()]
    } else {
        matched
    }
}

/// Leading sentences that fit in `max_length`, with "..." when cut
fn summarize(text: &str, max_length: usize) -> String {
    let budget = max_length.saturating_sub(3);
    let sentences = terminated_sentences(text);

    if sentences.is_empty() {
        return if text.chars().count() > max_length {
            format!("{}...", truncate_chars(text, budget))
        } else {
            text.to_string()
        };
    }

    let mut summary = String::new();
    let mut used = 0;
    let mut taken = 0;
    for sentence in &sentences {
        let len = sentence.chars().count();
        if used + len > budget {
            break;
        }
        summary.push_str(sentence);
        used += len;
        taken += 1;
    }
    if taken < sentences.len() {
        summary.push_str("...");
    }
    summary
}

fn key_points(text: &str) -> Vec<String> {
    let sentences = terminated_sentences(text);
    if sentences.len() <= 3 {
        return sentences.into_iter().map(str::to_string).collect();
    }

    let marked: Vec<String> = sentences
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            KEY_POINT_MARKERS.iter().any(|m| lower.contains(m))
        })
        .map(|s| s.to_string())
        .collect();

    if marked.is_empty() {
        sentences.into_iter().take(3).map(str::to_string).collect()
    } else {
        marked
    }
}

fn action_items(text: &str) -> Vec<String> {
    terminated_sentences(text)
        .into_iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            ACTION_MARKERS.iter().any(|m| lower.contains(m))
        })
        .map(str::to_string)
        .collect()
}

fn local_summary(text: &str, options: &SummarizeOptions) -> Summary {
    Summary {
        summary: summarize(text, options.max_length),
        key_points: options.extract_key_points.then(|| key_points(text)),
        action_items: options.extract_action_items.then(|| action_items(text)),
    }
}

fn prediction(action: &str, probability: f64, context: &str, recommendation: &str) -> ActionPrediction {
    ActionPrediction {
        action: action.to_string(),
        probability,
        context: context.to_string(),
        recommendation: recommendation.to_string(),
    }
}

fn simulate_predictions(context: &Value) -> Vec<ActionPrediction> {
    let mut predictions = vec![
        prediction(
            "create_content",
            0.8,
            "recent_activity",
            "Ponúknuť vytvorenie nového obsahu na základe nedávnych aktivít",
        ),
        prediction(
            "view_analytics",
            0.6,
            "time_of_day",
            "Zobraziť analytický widget na dashboarde s aktuálnymi metrikami",
        ),
        prediction(
            "update_profile",
            0.3,
            "account_age",
            "Pripomenúť aktualizáciu profilu pre lepšiu personalizáciu",
        ),
    ];

    let created_recently = context["recentActivities"]
        .as_array()
        .is_some_and(|a| a.iter().any(|v| v == "content_creation"));
    if created_recently {
        predictions[0].probability = 0.5;
        predictions.push(prediction(
            "edit_content",
            0.7,
            "recent_content_creation",
            "Ponúknuť úpravu nedávno vytvoreného obsahu",
        ));
    }

    if is_truthy(&context["preferences"]["usesTags"]) {
        predictions.push(prediction(
            "organize_content",
            0.75,
            "tag_preference",
            "Navrhnúť reorganizáciu obsahu pomocou tagov",
        ));
    }

    if context["role"] == "admin" {
        predictions.push(prediction(
            "manage_users",
            0.65,
            "admin_role",
            "Zobraziť prehľad aktivity používateľov",
        ));
    }

    // stable, so equal probabilities keep insertion order
    predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    predictions
}

fn fallback_predictions() -> Vec<ActionPrediction> {
    vec![
        prediction("create_content", 0.8, "recent_activity", "Ponúknuť vytvorenie nového obsahu"),
        prediction("view_analytics", 0.6, "time_of_day", "Zobraziť analytický widget na dashboarde"),
        prediction("update_profile", 0.3, "account_age", "Pripomenúť aktualizáciu profilu"),
    ]
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Local stand-in for generation: a canned document per type and tone
pub fn render_template(options: &GenerateOptions) -> String {
    let p = options.prompt.as_str();
    let lower = p.to_lowercase();
    let hashtag: String = p.split_whitespace().collect();

    let content = match (options.content_type.as_str(), options.tone.as_str()) {
        ("article", "informal") => format!(
            "# {p}\n\nHej, poďme sa pozrieť na to, ako {lower} ovplyvňuje naše životy! Je tu pár vecí, o ktorých by sme mali hovoriť.\n\n## O čom to vlastne je?\n\n1. Kde sme teraz\n2. Čo je super a čo nie\n3. Kam to smeruje\n\n## Takže...\n\nCelkovo si myslím, že {lower} je téma, ktorú by sme nemali ignorovať. Čo si o tom myslíš ty?"
        ),
        ("article", "technical") => format!(
            "# Technická analýza: {p}\n\n## 1. Úvod\n\nTáto technická analýza sa zaoberá problematikou {lower} a jej implikáciami v súčasnom kontexte. Nasledujúce sekcie poskytujú detailný rozbor relevantných aspektov.\n\n## 2. Metodológia\n\nAnalýza bola vykonaná s využitím štandardných postupov a metód, zahŕňajúcich kvantitatívne aj kvalitatívne prístupy.\n\n## 3. Výsledky\n\nZískané dáta indikujú signifikantné korelácie medzi {lower} a súvisiacimi premennými.\n\n## 4. Záver\n\nNa základe vykonanej analýzy možno konštatovať, že {lower} predstavuje významný faktor, ktorý vyžaduje ďalší výskum a implementáciu adekvátnych opatrení."
        ),
        ("email", "formal") => format!(
            "Predmet: {p}\n\nVážený klient,\n\nďakujeme za Váš záujem o tému \"{p}\".\n\nRadi by sme Vám poskytli viac informácií o tejto téme. Na základe našej analýzy sme identifikovali niekoľko kľúčových aspektov, ktoré by mohli byť pre Vás relevantné.\n\nV prípade záujmu o ďalšie podrobnosti nás neváhajte kontaktovať.\n\nS úctou,\nTím Architekt kúziel"
        ),
        ("email", "informal") => format!(
            "Predmet: {p}\n\nAhoj,\n\nďakujeme, že ťa zaujíma téma \"{p}\".\n\nMáme pre teba niekoľko zaujímavých informácií o tejto téme. Pozreli sme sa na to bližšie a našli sme veci, ktoré by sa ti mohli páčiť.\n\nAk chceš vedieť viac, daj nám vedieť!\n\nS pozdravom,\nTím Architekt kúziel"
        ),
        ("email", "technical") => format!(
            "Predmet: Technická špecifikácia - {p}\n\nVážený partner,\n\nv nadväznosti na Vašu požiadavku Vám zasielame technickú špecifikáciu týkajúcu sa \"{p}\".\n\nŠpecifikácia zahŕňa nasledujúce komponenty:\n- Technické parametre\n- Implementačné požiadavky\n- Kompatibilita s existujúcimi systémami\n- Odporúčané konfigurácie\n\nV prípade akýchkoľvek technických otázok kontaktujte naše oddelenie podpory.\n\nS pozdravom,\nTechnický tím Architekt kúziel"
        ),
        ("social", "formal") => format!(
            "📢 {p} 📢\n\nRadi by sme sa s vami podelili o niekoľko odborných poznatkov na tému \"{p}\".\n\nNaši experti identifikovali kľúčové trendy a poznatky, ktoré môžu byť pre vás prínosné.\n\nPre viac informácií navštívte náš web alebo nás kontaktujte priamo.\n\n#{hashtag} #ArchitektKuziel #OdbornéInformácie"
        ),
        ("social", "informal") => format!(
            "🔥 {p} 🔥\n\nHej, pozrite sa na toto! Máme super novinky o \"{p}\"!\n\nToto vás určite zaujme... Pozrite si naše najnovšie zistenia a tipy!\n\nČo si o tom myslíte vy? Zdieľajte svoje názory v komentároch! 👇\n\n#{hashtag} #ArchitektKuziel #TrendyTémy"
        ),
        ("social", "technical") => format!(
            "📊 Technická analýza: {p} 📊\n\nPredstavujeme výsledky našej technickej analýzy témy \"{p}\".\n\nKľúčové metriky:\n- Efektivita: +25%\n- Optimalizácia: Významné zlepšenie\n- ROI: Pozitívny trend\n\nPre detailnú technickú dokumentáciu navštívte náš repozitár.\n\n#{hashtag} #TechnickáAnalýza #DataDriven"
        ),
        ("report", "formal") => format!(
            "# Správa: {p}\n\n## Exekutívne zhrnutie\n\nTáto správa poskytuje komplexnú analýzu témy \"{p}\" a jej implikácií pre relevantné zainteresované strany.\n\n## Metodológia\n\nAnalýza bola vykonaná s využitím kombinácie kvalitatívnych a kvantitatívnych metód, zahŕňajúcich zber dát, analýzu a interpretáciu výsledkov.\n\n## Kľúčové zistenia\n\n1. Zistenie 1\n2. Zistenie 2\n3. Zistenie 3\n\n## Odporúčania\n\nNa základe našich zistení odporúčame nasledujúce kroky:\n\n1. Odporúčanie 1\n2. Odporúčanie 2\n3. Odporúčanie 3\n\n## Záver\n\nTéma \"{p}\" predstavuje významný faktor, ktorý vyžaduje strategický prístup a implementáciu navrhovaných opatrení."
        ),
        ("report", "informal") => format!(
            "# Správa o {p}\n\n## O čom to celé je\n\nPozreli sme sa bližšie na \"{p}\" a máme pre vás zhrnutie toho, čo sme zistili.\n\n## Ako sme na to išli\n\nPoužili sme mix rôznych prístupov, aby sme získali čo najlepší obraz o situácii.\n\n## Čo sme zistili\n\n1. Toto je zaujímavé...\n2. Toto nás prekvapilo...\n3. Toto stojí za zmienku...\n\n## Čo odporúčame\n\nNa základe toho, čo sme zistili, navrhujeme:\n\n1. Skúste toto...\n2. Možno by pomohlo...\n3. Určite zvážte...\n\n## Záver\n\n\"{p}\" je téma, ktorá si zaslúži vašu pozornosť. S našimi odporúčaniami by ste mali vidieť pozitívne výsledky!"
        ),
        ("report", "technical") => format!(
            "# Technická správa: {p}\n\n## Exekutívne zhrnutie\n\nTáto technická správa analyzuje \"{p}\" z hľadiska technických parametrov, výkonnosti a implementačných aspektov.\n\n## Metodológia testovania\n\nTestovanie bolo vykonané v kontrolovanom prostredí s využitím štandardizovaných protokolov a metrík.\n\n## Technické špecifikácie\n\n| Parameter | Hodnota | Benchmark |\n|-----------|---------|----------|\n| Parameter 1 | Hodnota 1 | Benchmark 1 |\n| Parameter 2 | Hodnota 2 | Benchmark 2 |\n| Parameter 3 | Hodnota 3 | Benchmark 3 |\n\n## Analýza výkonnosti\n\nVýkonnostné testy indikujú nasledujúce charakteristiky:\n\n```\nEfficiency: 87.5%\nThroughput: 1250 ops/sec\nLatency: 45ms (avg)\n```\n\n## Technické odporúčania\n\n1. Implementačná stratégia A s parametrami X, Y, Z\n2. Optimalizácia komponentu B pre zvýšenie efektivity\n3. Integrácia s existujúcimi systémami prostredníctvom API C\n\n## Záver\n\nZ technického hľadiska \"{p}\" vykazuje optimálne charakteristiky pri implementácii navrhovaných konfigurácií a optimalizácií."
        ),
        ("presentation", "formal") => format!(
            "# Prezentácia: {p}\n\n## Snímka 1: Úvod\n- Predstavenie témy \"{p}\"\n- Ciele prezentácie\n- Prehľad obsahu\n\n## Snímka 2: Kontext\n- Historický vývoj\n- Súčasný stav\n- Relevancia pre publikum\n\n## Snímka 3: Kľúčové body\n- Bod 1: [Detaily]\n- Bod 2: [Detaily]\n- Bod 3: [Detaily]\n\n## Snímka 4: Analýza\n- Výhody a prínosy\n- Výzvy a obmedzenia\n- Porovnanie s alternatívami\n\n## Snímka 5: Prípadová štúdia\n- Konkrétny príklad implementácie\n- Dosiahnuté výsledky\n- Poučenia\n\n## Snímka 6: Odporúčania\n- Strategické odporúčania\n- Implementačné kroky\n- Očakávané výsledky\n\n## Snímka 7: Záver\n- Zhrnutie kľúčových bodov\n- Výzva k akcii\n- Kontaktné informácie\n\n## Poznámky pre prezentujúceho\n- Pripraviť odpovede na očakávané otázky\n- Zdôrazniť praktické príklady\n- Prispôsobiť tempo podľa reakcií publika"
        ),
        ("presentation", "informal") => format!(
            "# Prezentácia: {p}\n\n## Snímka 1: Začíname!\n- Hej, poďme sa pozrieť na \"{p}\"\n- O čom budeme hovoriť\n- Čo sa dozviete\n\n## Snímka 2: Trochu kontextu\n- Odkiaľ to prišlo\n- Kde sme teraz\n- Prečo by vás to malo zaujímať\n\n## Snímka 3: Hlavné veci\n- Vec 1: [Detaily]\n- Vec 2: [Detaily]\n- Vec 3: [Detaily]\n\n## Snímka 4: Rozbor\n- Čo je na tom super\n- S čím môžete mať problém\n- Ako to porovnať s inými možnosťami\n\n## Snímka 5: Príklad z praxe\n- Pozrite sa, ako to funguje v reálnom svete\n- Čo sa podarilo dosiahnuť\n- Čo sme sa naučili\n\n## Snímka 6: Tipy a triky\n- Čo odporúčame\n- Ako na to\n- Čo môžete očakávať\n\n## Snímka 7: Záver\n- Rýchle zhrnutie\n- Čo teraz?\n- Kde nás nájdete\n\n## Poznámky pre prezentujúceho\n- Buďte pripravení na otázky typu...\n- Použite príklady, ktoré ľudia poznajú\n- Sledujte reakcie a prispôsobte sa"
        ),
        ("presentation", "technical") => format!(
            "# Technická prezentácia: {p}\n\n## Snímka 1: Úvod do technickej problematiky\n- Technický kontext \"{p}\"\n- Špecifikácia cieľov\n- Štruktúra technickej prezentácie\n\n## Snímka 2: Technické pozadie\n- Technologický stack\n- Architektúra systému\n- Technické požiadavky\n\n## Snímka 3: Technická špecifikácia\n- Parameter 1: [Technické detaily]\n- Parameter 2: [Technické detaily]\n- Parameter 3: [Technické detaily]\n\n## Snímka 4: Implementačná analýza\n- Výkonnostné metriky\n- Škálovateľnosť a optimalizácia\n- Bezpečnostné aspekty\n\n## Snímka 5: Demonštrácia\n- Ukážka kódu / Pseudokód\n```\nfunction implementSolution(params) {{\n  // Implementačná logika\n  return optimizedResult;\n}}\n```\n- Výsledky benchmarkov\n- Analýza edge cases\n\n## Snímka 6: Implementačný plán\n- Technická roadmapa\n- Integračné body\n- Monitorovanie a údržba\n\n## Snímka 7: Technický záver\n- Zhrnutie technických aspektov\n- Ďalšie kroky vývoja\n- Technická dokumentácia a zdroje\n\n## Poznámky pre prezentujúceho\n- Pripraviť odpovede na technické otázky\n- Mať pripravené alternatívne implementačné scenáre\n- Zdôrazniť technické výhody oproti konkurenčným riešeniam"
        ),
        // article/formal, and every unknown combination
        _ => format!(
            "# {p}\n\nV dnešnej dobe je dôležité zamyslieť sa nad tým, ako {lower} ovplyvňuje náš každodenný život. Existuje niekoľko kľúčových aspektov, ktoré by sme mali zvážiť.\n\n## Hlavné body\n\n1. Analýza súčasného stavu\n2. Výhody a nevýhody\n3. Budúce trendy\n\n## Záver\n\nNa záver môžeme konštatovať, že {lower} predstavuje významnú oblasť, ktorej by sme mali venovať pozornosť v nasledujúcich rokoch."
        ),
    };

    if options.language != "sk" {
        format!(
            "{}\n\n[Tento obsah by bol preložený do jazyka: {}]",
            content, options.language
        )
    } else {
        content
    }
}
