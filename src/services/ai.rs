//! AI assistant service
//!
//! Deterministic stand-ins for the assistant features: content analysis,
//! prompt completion, recommendations and need prediction. The insight
//! endpoints run the rule engines over the caller's recorded interactions.

use crate::db::repositories::{ContentRepository, InteractionRepository, TagRepository};
use crate::models::{Interaction, InteractionKind, SuggestionKind, User, WidgetKind};
use crate::services::insights::{
    ContextAnalyzer, InteractionPatterns, NextActions, PatternRecognizer, PredictiveEngine,
    SemanticTagger, SemanticTags, UserContext,
};
use crate::services::interaction::DEFAULT_INTERACTION_LIMIT;
use crate::services::text_analysis::top_by_frequency;
use anyhow::Context;
use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const POSITIVE_WORDS: &[&str] = &["dobrý", "skvelý", "výborný", "pozitívny", "úspešný"];
const NEGATIVE_WORDS: &[&str] = &["zlý", "problém", "negatívny", "chyba", "zlyhanie"];
const KEYWORD_STOPWORDS: &[&str] = &["a", "the", "je", "sú", "v", "na", "to", "sa", "si"];

#[derive(Debug, thiserror::Error)]
pub enum AiServiceError {
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

// ============================================================================
// Result types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub suggestion: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub relevance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadabilityLevel {
    Easy,
    Medium,
    Difficult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub score: f64,
    pub level: ReadabilityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub suggestions: Vec<AnalysisSuggestion>,
    pub sentiment: Sentiment,
    pub keywords: Vec<Keyword>,
    pub readability: Readability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSuggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub relevance_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedTask {
    pub task: String,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedWidget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSuggestion {
    pub suggestion: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedsPrediction {
    pub predicted_tasks: Vec<PredictedTask>,
    pub suggested_widgets: Vec<SuggestedWidget>,
    pub optimal_workflow_suggestions: Vec<WorkflowSuggestion>,
}

// ============================================================================
// Service
// ============================================================================

pub struct AiService {
    interaction_repo: Arc<dyn InteractionRepository>,
    content_repo: Arc<dyn ContentRepository>,
    tag_repo: Arc<dyn TagRepository>,
    tagger: SemanticTagger,
    recognizer: PatternRecognizer,
    engine: PredictiveEngine,
    context: ContextAnalyzer,
}

impl AiService {
    pub fn new(
        interaction_repo: Arc<dyn InteractionRepository>,
        content_repo: Arc<dyn ContentRepository>,
        tag_repo: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            interaction_repo,
            content_repo,
            tag_repo,
            tagger: SemanticTagger,
            recognizer: PatternRecognizer,
            engine: PredictiveEngine,
            context: ContextAnalyzer,
        }
    }

    /// Improvement hints, sentiment, keywords and readability for `text`
    pub fn analyze_content(&self, text: &str) -> ContentAnalysis {
        ContentAnalysis {
            suggestions: suggestions_for(text),
            sentiment: sentiment(text),
            keywords: keywords(text),
            readability: readability(text),
        }
    }

    /// Command completions for what the user has typed so far
    pub fn prompt_suggestions(&self, input: &str) -> Vec<PromptSuggestion> {
        let lower = input.to_lowercase();
        let mut matched: Vec<(&str, f64)> = Vec::new();

        if lower.contains("dokument") {
            matched.push(("Vytvoriť nový dokument", 0.95));
            matched.push(("Zobraziť nedávne dokumenty", 0.85));
        }
        if lower.contains("analýz") {
            matched.push(("Analyzovať dáta z prieskumu", 0.92));
            matched.push(("Vytvoriť analytický report", 0.78));
        }
        if lower.contains("projekt") {
            matched.push(("Zobraziť stav projektu", 0.88));
            matched.push(("Aktualizovať projektový plán", 0.75));
        }
        if matched.is_empty() {
            matched = vec![
                ("Vytvoriť nový obsah", 0.7),
                ("Vyhľadať v dokumentoch", 0.65),
                ("Zobraziť nedávnu aktivitu", 0.6),
            ];
        }

        matched
            .into_iter()
            .map(|(text, score)| PromptSuggestion {
                text: text.to_string(),
                kind: "COMMAND".to_string(),
                score,
            })
            .collect()
    }

    pub fn recommend_content(&self) -> Vec<Recommendation> {
        [
            ("Analýza dát z prieskumu", 0.92, "Podobné dokumenty, ktoré ste nedávno prezerali"),
            ("Marketingová stratégia 2025", 0.85, "Populárne vo vašej organizácii"),
            ("Projektový plán - nový web", 0.78, "Nedávno upravené kolegami"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (title, score, reason))| Recommendation {
            id: (i + 1).to_string(),
            title: title.to_string(),
            relevance_score: *score,
            reason: reason.to_string(),
        })
        .collect()
    }

    pub fn predict_needs(&self) -> NeedsPrediction {
        NeedsPrediction {
            predicted_tasks: vec![
                PredictedTask {
                    task: "Aktualizovať projektový plán".to_string(),
                    confidence: 0.88,
                    reason: "Blížiaci sa termín".to_string(),
                },
                PredictedTask {
                    task: "Prehliadnuť analytické dáta".to_string(),
                    confidence: 0.75,
                    reason: "Pravidelná aktivita".to_string(),
                },
            ],
            suggested_widgets: vec![
                SuggestedWidget {
                    kind: WidgetKind::RecentActivity,
                    confidence: 0.92,
                },
                SuggestedWidget {
                    kind: WidgetKind::Analytics,
                    confidence: 0.85,
                },
            ],
            optimal_workflow_suggestions: vec![WorkflowSuggestion {
                suggestion: "Zoskupenie súvisiacich dokumentov do kolekcie".to_string(),
                confidence: 0.82,
            }],
        }
    }

    pub fn generate_tags(&self, text: &str) -> SemanticTags {
        self.tagger.generate_tags(text)
    }

    /// Habits found in the user's recent interactions
    pub async fn patterns(&self, user: &User) -> Result<InteractionPatterns, AiServiceError> {
        let history = self.history(user).await?;
        Ok(self.recognizer.analyze(&history))
    }

    /// Likely next steps for the user, based on recent interactions
    pub async fn next_actions(&self, user: &User) -> Result<NextActions, AiServiceError> {
        let history = self.history(user).await?;

        let last_viewed = history
            .iter()
            .rev()
            .find(|i| i.kind == InteractionKind::View)
            .map(|i| i.content_id);
        let title = match last_viewed {
            Some(id) => self
                .content_repo
                .get_by_id(id)
                .await
                .context("Failed to get content")?
                .map(|c| c.title),
            None => None,
        };

        let actions = self.engine.predict(
            &history,
            |id| if Some(id) == last_viewed { title.clone() } else { None },
            Utc::now().hour(),
        );
        Ok(actions)
    }

    /// Interests, working rhythm and inferred preferences of the user
    pub async fn context(&self, user: &User) -> Result<UserContext, AiServiceError> {
        let history = self.history(user).await?;

        let mut content_tags = HashMap::new();
        for interaction in &history {
            if content_tags.contains_key(&interaction.content_id) {
                continue;
            }
            let names = self
                .tag_repo
                .get_by_content_id(interaction.content_id)
                .await
                .context("Failed to get content tags")?
                .into_iter()
                .map(|tag| tag.name)
                .collect::<Vec<_>>();
            content_tags.insert(interaction.content_id, names);
        }

        Ok(self.context.analyze(&history, &content_tags))
    }

    /// Recent interactions, oldest first
    async fn history(&self, user: &User) -> Result<Vec<Interaction>, AiServiceError> {
        let mut items = self
            .interaction_repo
            .list_by_user(user.id, DEFAULT_INTERACTION_LIMIT)
            .await
            .context("Failed to list interactions")?;
        items.reverse();
        Ok(items)
    }
}

// ============================================================================
// Heuristics
// ============================================================================

fn suggestions_for(text: &str) -> Vec<AnalysisSuggestion> {
    let mut out = Vec::new();

    if text.chars().count() < 100 {
        out.push(AnalysisSuggestion {
            kind: SuggestionKind::Improvement,
            suggestion: "Rozšírte obsah o viac detailov a príkladov pre lepšie pochopenie."
                .to_string(),
            confidence: 0.85,
        });
    }
    if !text.contains("záver") {
        out.push(AnalysisSuggestion {
            kind: SuggestionKind::Structure,
            suggestion: "Pridajte záverečnú sekciu, ktorá zhrnie hlavné body.".to_string(),
            confidence: 0.78,
        });
    }
    if text.split('.').count() < 5 {
        out.push(AnalysisSuggestion {
            kind: SuggestionKind::Clarity,
            suggestion: "Rozdeľte dlhé vety na kratšie pre lepšiu čitateľnosť.".to_string(),
            confidence: 0.92,
        });
    }

    out
}

fn sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let mut score: f64 = 0.5;

    for word in lower.split_whitespace() {
        if POSITIVE_WORDS.iter().any(|p| word.contains(p)) {
            score += 0.1;
        }
        if NEGATIVE_WORDS.iter().any(|n| word.contains(n)) {
            score -= 0.1;
        }
    }

    let score = score.clamp(0.0, 1.0);
    let label = if score > 0.6 {
        SentimentLabel::Positive
    } else if score < 0.4 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    Sentiment { score, label }
}

fn keywords(text: &str) -> Vec<Keyword> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let total = words.len().max(1) as f64;

    let candidates = words
        .iter()
        .filter(|w| w.chars().count() > 3 && !KEYWORD_STOPWORDS.contains(w))
        .map(|w| w.to_string());

    top_by_frequency(candidates, 5)
        .into_iter()
        .map(|(word, count)| Keyword {
            word,
            relevance: count as f64 / total,
        })
        .collect()
}

fn readability(text: &str) -> Readability {
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let words: Vec<&str> = text.split_whitespace().collect();

    if sentences == 0 || words.is_empty() {
        return Readability {
            score: 0.5,
            level: ReadabilityLevel::Medium,
        };
    }

    let avg_words = words.len() as f64 / sentences as f64;
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_len = letters as f64 / words.len() as f64;

    let raw = avg_words * 0.1 + avg_word_len * 0.3;
    let score = 1.0 - (raw / 10.0).clamp(0.0, 1.0);
    let level = if score > 0.7 {
        ReadabilityLevel::Easy
    } else if score > 0.4 {
        ReadabilityLevel::Medium
    } else {
        ReadabilityLevel::Difficult
    };
    Readability { score, level }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_content, migrated_pool};
    use crate::db::repositories::{
        SqlxContentRepository, SqlxInteractionRepository, SqlxTagRepository, TagRepository,
    };
    use crate::models::{Tag, TagKind};
    use crate::models::UserRole;
    use crate::services::test_support::create_user;

    async fn service() -> (AiService, crate::db::DynDatabasePool) {
        let pool = migrated_pool().await;
        let service = AiService::new(
            SqlxInteractionRepository::boxed(pool.clone()),
            SqlxContentRepository::boxed(pool.clone()),
            SqlxTagRepository::boxed(pool.clone()),
        );
        (service, pool)
    }

    fn kinds(analysis: &ContentAnalysis) -> Vec<SuggestionKind> {
        analysis.suggestions.iter().map(|s| s.kind).collect()
    }

    #[tokio::test]
    async fn test_short_text_gets_all_suggestions() {
        let (ai, _pool) = service().await;
        let analysis = ai.analyze_content("Krátky text.");
        assert_eq!(
            kinds(&analysis),
            vec![SuggestionKind::Improvement, SuggestionKind::Structure, SuggestionKind::Clarity]
        );
        assert_eq!(analysis.suggestions[2].confidence, 0.92);
    }

    #[tokio::test]
    async fn test_long_structured_text_gets_none() {
        let (ai, _pool) = service().await;
        let text = "Prvá veta je tu. Druhá veta nasleduje. Tretia veta. Štvrtá veta. \
                    Piata veta a záver celého dokumentu s dostatkom textu.";
        assert!(ai.analyze_content(text).suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_sentiment_scoring() {
        let (ai, _pool) = service().await;

        let positive = ai.analyze_content("skvelý a výborný a úspešný výsledok").sentiment;
        assert_eq!(positive.label, SentimentLabel::Positive);
        assert!((positive.score - 0.8).abs() < 1e-9);

        let negative = ai.analyze_content("problém chyba zlyhanie").sentiment;
        assert_eq!(negative.label, SentimentLabel::Negative);

        let neutral = ai.analyze_content("dobrý problém").sentiment;
        assert_eq!(neutral.label, SentimentLabel::Neutral);
        assert!((neutral.score - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sentiment_is_clamped() {
        let (ai, _pool) = service().await;
        let text = "dobrý ".repeat(10);
        assert_eq!(ai.analyze_content(&text).sentiment.score, 1.0);
    }

    #[tokio::test]
    async fn test_keywords_rank_and_relevance() {
        let (ai, _pool) = service().await;
        let keywords = ai
            .analyze_content("dáta dáta plán plán plán je na krátke")
            .keywords;
        assert_eq!(keywords[0].word, "plán");
        assert!((keywords[0].relevance - 3.0 / 8.0).abs() < 1e-9);
        assert_eq!(keywords[1].word, "dáta");
        assert_eq!(keywords.len(), 3);
    }

    #[tokio::test]
    async fn test_readability() {
        let (ai, _pool) = service().await;

        let empty = ai.analyze_content("").readability;
        assert_eq!(empty.level, ReadabilityLevel::Medium);
        assert_eq!(empty.score, 0.5);

        // 2 words per sentence, 3.75 chars per word
        let easy = ai.analyze_content("Ahoj tam. Ako ste.").readability;
        assert_eq!(easy.level, ReadabilityLevel::Easy);
        assert!((easy.score - 0.8675).abs() < 1e-9);

        let long_words = "Nepravdepodobnejšie ".repeat(30) + ".";
        assert_eq!(
            ai.analyze_content(&long_words).readability.level,
            ReadabilityLevel::Difficult
        );
    }

    #[tokio::test]
    async fn test_prompt_suggestions() {
        let (ai, _pool) = service().await;

        let both = ai.prompt_suggestions("Dokument o analýze projektu");
        assert_eq!(both.len(), 6);
        assert_eq!(both[0].text, "Vytvoriť nový dokument");
        assert!(both.iter().all(|s| s.kind == "COMMAND"));

        let fallback = ai.prompt_suggestions("ahoj");
        assert_eq!(fallback.len(), 3);
        assert_eq!(fallback[2].score, 0.6);
    }

    #[tokio::test]
    async fn test_fixed_recommendations_and_needs() {
        let (ai, _pool) = service().await;

        let recs = ai.recommend_content();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[1].title, "Marketingová stratégia 2025");

        let needs = ai.predict_needs();
        let json = serde_json::to_value(&needs).unwrap();
        assert_eq!(json["suggested_widgets"][0]["type"], "RECENT_ACTIVITY");
        assert_eq!(needs.optimal_workflow_suggestions[0].confidence, 0.82);
    }

    #[tokio::test]
    async fn test_next_actions_reads_history() {
        let (ai, pool) = service().await;
        let user = create_user(&pool, "u@example.com", UserRole::User).await;
        let content = insert_content(&pool, user.id, "published").await;

        let repo = SqlxInteractionRepository::new(pool.clone());
        for kind in [InteractionKind::View, InteractionKind::Edit] {
            repo.create(&Interaction::new(user.id, content, kind, None))
                .await
                .unwrap();
        }

        let actions = ai.next_actions(&user).await.unwrap();
        assert_eq!(actions.likely_tasks.len(), 2);
        assert_eq!(actions.likely_tasks[0].target, Some(content));
        assert!(actions.likely_tasks[0].description.starts_with("Upraviť dokument \""));

        let patterns = ai.patterns(&user).await.unwrap();
        assert!(patterns.sequences.is_empty());
    }

    #[tokio::test]
    async fn test_context_uses_tags_of_touched_content() {
        let (ai, pool) = service().await;
        let user = create_user(&pool, "u@example.com", UserRole::User).await;
        let tagged = insert_content(&pool, user.id, "published").await;
        let untagged = insert_content(&pool, user.id, "draft").await;

        let tags = SqlxTagRepository::new(pool.clone());
        let tag = tags
            .create(&Tag::new("analytika".to_string(), TagKind::Tag, None))
            .await
            .unwrap();
        sqlx::query("INSERT INTO content_tags (content_id, tag_id) VALUES (?, ?)")
            .bind(tagged)
            .bind(tag.id)
            .execute(pool.as_sqlite().unwrap())
            .await
            .unwrap();

        let repo = SqlxInteractionRepository::new(pool.clone());
        for (content, kind) in [
            (tagged, InteractionKind::Edit),
            (tagged, InteractionKind::View),
            (untagged, InteractionKind::Edit),
        ] {
            repo.create(&Interaction::new(user.id, content, kind, None))
                .await
                .unwrap();
        }

        let context = ai.context(&user).await.unwrap();
        assert_eq!(context.interests.len(), 1);
        assert_eq!(context.interests[0].topic, "analytika");
        assert_eq!(context.interests[0].score, 1.0);
        assert_eq!(context.work_patterns.preferred_actions[0], InteractionKind::Edit);
        assert!(context.work_patterns.peak_activity_time.is_some());

        let other = create_user(&pool, "other@example.com", UserRole::User).await;
        let empty = ai.context(&other).await.unwrap();
        assert!(empty.interests.is_empty());
        assert_eq!(empty.work_patterns.peak_activity_time, None);
    }
}
