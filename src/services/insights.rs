//! Rule-based insight engines
//!
//! Four small analyzers the AI endpoints build on:
//! - `SemanticTagger` finds known topics and simple entities in text
//! - `PatternRecognizer` looks for habits in a user's interactions
//! - `PredictiveEngine` proposes what the user is likely to do next
//! - `ContextAnalyzer` sums up interests, working rhythm and preferences
//!
//! Interaction slices are expected oldest first.

use crate::models::{Interaction, InteractionKind};
use chrono::{Duration, NaiveDate, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

static DATE_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}\.\s?\d{1,2}\.\s?\d{4}").expect("valid date regex"));

static PERSON_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+").expect("valid person regex"));

/// Known topic keyword, its score, and the category it implies
const TOPICS: &[(&str, f64, &str, f64)] = &[
    ("marketing", 0.9, "Marketing", 0.9),
    ("analýza", 0.85, "Analýza", 0.85),
    ("stratégia", 0.8, "Stratégia", 0.8),
    ("projekt", 0.75, "Projekty", 0.85),
    ("dáta", 0.9, "Dáta", 0.9),
    ("výskum", 0.85, "Výskum", 0.85),
];

// ============================================================================
// Semantic tagging
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKeyword {
    pub word: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Date,
    Person,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub value: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticTags {
    pub keywords: Vec<ScoredKeyword>,
    pub categories: Vec<Category>,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticTagger;

impl SemanticTagger {
    pub fn generate_tags(&self, text: &str) -> SemanticTags {
        let lower = text.to_lowercase();
        let matched: Vec<_> = TOPICS
            .iter()
            .filter(|(word, ..)| lower.contains(word))
            .collect();

        let keywords = matched
            .iter()
            .map(|(word, score, ..)| ScoredKeyword {
                word: word.to_string(),
                score: *score,
            })
            .collect();
        let categories = matched
            .iter()
            .map(|(_, _, name, confidence)| Category {
                name: name.to_string(),
                confidence: *confidence,
            })
            .collect();

        // dates first, then names
        let entities = DATE_ENTITY
            .find_iter(text)
            .map(|m| Entity {
                kind: EntityKind::Date,
                value: m.as_str().to_string(),
                confidence: 0.9,
            })
            .chain(PERSON_ENTITY.find_iter(text).map(|m| Entity {
                kind: EntityKind::Person,
                value: m.as_str().to_string(),
                confidence: 0.7,
            }))
            .collect();

        SemanticTags {
            keywords,
            categories,
            entities,
        }
    }
}

// ============================================================================
// Pattern recognition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub description: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub name: String,
    pub description: String,
    pub time_frame: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionPatterns {
    pub sequences: Vec<Sequence>,
    pub routines: Vec<Routine>,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternRecognizer;

impl PatternRecognizer {
    pub fn analyze(&self, interactions: &[Interaction]) -> InteractionPatterns {
        let mut patterns = InteractionPatterns::default();

        let view_edit_share = interactions.windows(3).any(|w| {
            w[0].kind == InteractionKind::View
                && w[1].kind == InteractionKind::Edit
                && w[2].kind == InteractionKind::Share
        });
        if view_edit_share {
            patterns.sequences.push(Sequence {
                name: "view-edit-share".to_string(),
                description: "Prezeranie, úprava a zdieľanie obsahu".to_string(),
                confidence: 0.85,
            });
        }

        let morning = interactions
            .iter()
            .filter(|i| (8..=10).contains(&i.created_at.hour()))
            .count();
        if morning > 3 {
            patterns.routines.push(Routine {
                name: "morning-check".to_string(),
                description: "Ranná kontrola obsahu".to_string(),
                time_frame: "8:00-10:00".to_string(),
                confidence: 0.8,
            });
        }

        let late = interactions.iter().any(|i| {
            let hour = i.created_at.hour();
            hour >= 23 || hour <= 5
        });
        if late {
            patterns.anomalies.push(Anomaly {
                kind: "unusual-time".to_string(),
                description: "Aktivita v nezvyčajnom čase".to_string(),
                confidence: 0.75,
            });
        }

        patterns
    }
}

// ============================================================================
// Next-action prediction
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Edit,
    Share,
    Create,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelyTask {
    pub action: ActionKind,
    /// Content the action applies to, absent for new content
    pub target: Option<i64>,
    pub description: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecommendation {
    pub id: String,
    pub title: String,
    pub relevance: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextActions {
    pub likely_tasks: Vec<LikelyTask>,
    pub content_recommendations: Vec<ContentRecommendation>,
    pub interface_suggestions: Vec<InterfaceSuggestion>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PredictiveEngine;

impl PredictiveEngine {
    /// `title_of` resolves content titles for the task descriptions and
    /// `hour` is the current hour of day used for the layout hint.
    pub fn predict<F>(&self, interactions: &[Interaction], title_of: F, hour: u32) -> NextActions
    where
        F: Fn(i64) -> Option<String>,
    {
        let mut likely_tasks = Vec::new();

        if let Some(last_view) = interactions
            .iter()
            .rev()
            .find(|i| i.kind == InteractionKind::View)
        {
            let title = title_of(last_view.content_id).unwrap_or_default();
            likely_tasks.push(LikelyTask {
                action: ActionKind::Edit,
                target: Some(last_view.content_id),
                description: format!("Upraviť dokument \"{}\"", title),
                confidence: 0.75,
            });
            likely_tasks.push(LikelyTask {
                action: ActionKind::Share,
                target: Some(last_view.content_id),
                description: format!("Zdieľať dokument \"{}\"", title),
                confidence: 0.6,
            });
        }

        if interactions.len() > 5 {
            likely_tasks.push(LikelyTask {
                action: ActionKind::Create,
                target: None,
                description: "Vytvoriť nový dokument".to_string(),
                confidence: 0.8,
            });
        }

        NextActions {
            likely_tasks,
            content_recommendations: content_recommendations(),
            interface_suggestions: vec![layout_suggestion(hour)],
        }
    }
}

fn content_recommendations() -> Vec<ContentRecommendation> {
    [
        ("Analýza dát z prieskumu", 0.9, "Podobné dokumenty, ktoré ste nedávno prezerali"),
        ("Marketingová stratégia 2025", 0.85, "Populárne vo vašej organizácii"),
        ("Projektový plán - nový web", 0.75, "Nedávno upravené kolegami"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (title, relevance, reason))| ContentRecommendation {
        id: (i + 1).to_string(),
        title: title.to_string(),
        relevance: *relevance,
        reason: reason.to_string(),
    })
    .collect()
}

fn layout_suggestion(hour: u32) -> InterfaceSuggestion {
    let (description, confidence) = if (9..=17).contains(&hour) {
        ("Prepnúť na pracovné rozloženie s väčším priestorom pre obsah", 0.7)
    } else {
        ("Prepnúť na kompaktné rozloženie optimalizované pre večerné používanie", 0.65)
    };
    InterfaceSuggestion {
        kind: "LAYOUT".to_string(),
        description: description.to_string(),
        confidence,
    }
}

// ============================================================================
// User context
// ============================================================================

/// Interests reported per user
const MAX_INTERESTS: usize = 5;

/// Gap that closes a working session
const SESSION_GAP_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    pub topic: String,
    /// Relative weight, the strongest topic scores 1.0
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPatterns {
    /// Busiest two-hour window, e.g. "10:00-12:00"
    pub peak_activity_time: Option<String>,
    pub average_session_minutes: i64,
    /// Interaction kinds, most frequent first
    pub preferred_actions: Vec<InteractionKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreference {
    Compact,
    Comfortable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFrequency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub layout: LayoutPreference,
    pub color_scheme: ColorScheme,
    pub notification_frequency: NotificationFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub interests: Vec<Interest>,
    pub work_patterns: WorkPatterns,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAnalyzer;

impl ContextAnalyzer {
    /// `content_tags` maps a content id to the names of its tags.
    pub fn analyze(
        &self,
        interactions: &[Interaction],
        content_tags: &HashMap<i64, Vec<String>>,
    ) -> UserContext {
        let peak_start = peak_hour(interactions);
        UserContext {
            interests: interests(interactions, content_tags),
            work_patterns: WorkPatterns {
                peak_activity_time: peak_start
                    .map(|h| format!("{:02}:00-{:02}:00", h, (h + 2) % 24)),
                average_session_minutes: average_session_minutes(interactions),
                preferred_actions: preferred_actions(interactions),
            },
            preferences: preferences(interactions, peak_start),
        }
    }
}

fn action_weight(kind: InteractionKind) -> f64 {
    match kind {
        InteractionKind::Edit => 2.0,
        InteractionKind::Share => 1.5,
        InteractionKind::View | InteractionKind::Like => 1.0,
    }
}

fn interests(
    interactions: &[Interaction],
    content_tags: &HashMap<i64, Vec<String>>,
) -> Vec<Interest> {
    let mut weights: HashMap<&str, f64> = HashMap::new();
    for interaction in interactions {
        let Some(tags) = content_tags.get(&interaction.content_id) else {
            continue;
        };
        for tag in tags {
            *weights.entry(tag.as_str()).or_default() += action_weight(interaction.kind);
        }
    }

    let strongest = weights.values().copied().fold(0.0, f64::max);
    if strongest == 0.0 {
        return Vec::new();
    }

    let mut interests: Vec<_> = weights
        .into_iter()
        .map(|(topic, weight)| Interest {
            topic: topic.to_string(),
            score: (weight / strongest * 100.0).round() / 100.0,
        })
        .collect();
    interests.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.topic.cmp(&b.topic))
    });
    interests.truncate(MAX_INTERESTS);
    interests
}

/// Start hour of the busiest two-hour window, earliest on ties
fn peak_hour(interactions: &[Interaction]) -> Option<u32> {
    if interactions.is_empty() {
        return None;
    }
    let mut per_hour = [0usize; 24];
    for interaction in interactions {
        per_hour[interaction.created_at.hour() as usize] += 1;
    }
    let mut best = 0;
    let mut best_count = 0;
    for hour in 0..24 {
        let count = per_hour[hour] + per_hour[(hour + 1) % 24];
        if count > best_count {
            best = hour;
            best_count = count;
        }
    }
    Some(best as u32)
}

fn average_session_minutes(interactions: &[Interaction]) -> i64 {
    let Some(first) = interactions.first() else {
        return 0;
    };
    let gap = Duration::minutes(SESSION_GAP_MINUTES);

    let mut sessions = 0;
    let mut total = 0;
    let mut start = first.created_at;
    let mut last = first.created_at;
    for interaction in &interactions[1..] {
        if interaction.created_at - last > gap {
            sessions += 1;
            total += (last - start).num_minutes();
            start = interaction.created_at;
        }
        last = interaction.created_at;
    }
    sessions += 1;
    total += (last - start).num_minutes();

    total / sessions
}

fn preferred_actions(interactions: &[Interaction]) -> Vec<InteractionKind> {
    let mut counts: Vec<(InteractionKind, usize)> = [
        InteractionKind::View,
        InteractionKind::Edit,
        InteractionKind::Share,
        InteractionKind::Like,
    ]
    .into_iter()
    .map(|kind| (kind, interactions.iter().filter(|i| i.kind == kind).count()))
    .filter(|(_, count)| *count > 0)
    .collect();
    // stable, so ties keep the listing order above
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(kind, _)| kind).collect()
}

fn preferences(interactions: &[Interaction], peak_start: Option<u32>) -> Preferences {
    let working_hours = interactions
        .iter()
        .filter(|i| (9..=17).contains(&i.created_at.hour()))
        .count();
    let layout = if working_hours * 2 > interactions.len() {
        LayoutPreference::Comfortable
    } else {
        LayoutPreference::Compact
    };

    let color_scheme = match peak_start {
        Some(hour) if hour >= 19 || hour < 6 => ColorScheme::Dark,
        _ => ColorScheme::Light,
    };

    let active_days: HashSet<NaiveDate> = interactions
        .iter()
        .map(|i| i.created_at.date_naive())
        .collect();
    let notification_frequency = if active_days.is_empty() {
        NotificationFrequency::Medium
    } else {
        match interactions.len() / active_days.len() {
            0..=2 => NotificationFrequency::Low,
            3..=10 => NotificationFrequency::Medium,
            _ => NotificationFrequency::High,
        }
    };

    Preferences {
        layout,
        color_scheme,
        notification_frequency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, kind: InteractionKind, content_id: i64) -> Interaction {
        Interaction {
            id: 0,
            user_id: 1,
            content_id,
            kind,
            metadata: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, hour, 15, 0).unwrap(),
        }
    }

    #[test]
    fn test_tagger_keywords_and_categories() {
        let tags = SemanticTagger.generate_tags("Projektový plán a marketingová analýza dáta");
        let words: Vec<_> = tags.keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["marketing", "analýza", "projekt", "dáta"]);
        let projects = tags.categories.iter().find(|c| c.name == "Projekty").unwrap();
        assert_eq!(projects.confidence, 0.85);
        assert!(tags.entities.is_empty());
    }

    #[test]
    fn test_tagger_entities() {
        let tags = SemanticTagger.generate_tags("Stretnutie 12. 3.2025 s Jana Novak.");
        assert_eq!(tags.entities.len(), 2);
        assert_eq!(tags.entities[0].kind, EntityKind::Date);
        assert_eq!(tags.entities[0].value, "12. 3.2025");
        assert_eq!(tags.entities[1].kind, EntityKind::Person);
        assert_eq!(tags.entities[1].value, "Jana Novak");

        let json = serde_json::to_value(&tags.entities[1]).unwrap();
        assert_eq!(json["type"], "PERSON");
    }

    #[test]
    fn test_patterns_detects_sequence_routine_and_anomaly() {
        let interactions = vec![
            at(8, InteractionKind::View, 1),
            at(9, InteractionKind::Edit, 1),
            at(9, InteractionKind::Share, 1),
            at(10, InteractionKind::View, 2),
            at(23, InteractionKind::Like, 2),
        ];
        let patterns = PatternRecognizer.analyze(&interactions);
        assert_eq!(patterns.sequences[0].name, "view-edit-share");
        assert_eq!(patterns.routines[0].time_frame, "8:00-10:00");
        assert_eq!(patterns.anomalies[0].kind, "unusual-time");
    }

    #[test]
    fn test_patterns_empty_for_quiet_afternoon() {
        let interactions = vec![
            at(14, InteractionKind::Edit, 1),
            at(15, InteractionKind::View, 1),
        ];
        assert_eq!(PatternRecognizer.analyze(&interactions), InteractionPatterns::default());
    }

    #[test]
    fn test_predict_uses_last_view() {
        let interactions = vec![
            at(9, InteractionKind::View, 1),
            at(10, InteractionKind::View, 2),
            at(11, InteractionKind::Edit, 1),
        ];
        let actions = PredictiveEngine.predict(
            &interactions,
            |id| (id == 2).then(|| "Plán".to_string()),
            12,
        );
        assert_eq!(actions.likely_tasks.len(), 2);
        assert_eq!(actions.likely_tasks[0].action, ActionKind::Edit);
        assert_eq!(actions.likely_tasks[0].target, Some(2));
        assert_eq!(actions.likely_tasks[0].description, "Upraviť dokument \"Plán\"");
        assert_eq!(actions.likely_tasks[1].confidence, 0.6);
        assert_eq!(actions.content_recommendations.len(), 3);
        assert_eq!(actions.interface_suggestions[0].confidence, 0.7);
    }

    fn at_minute(hour: u32, minute: u32, kind: InteractionKind, content_id: i64) -> Interaction {
        Interaction {
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap(),
            ..at(hour, kind, content_id)
        }
    }

    fn tags(entries: &[(i64, &[&str])]) -> HashMap<i64, Vec<String>> {
        entries
            .iter()
            .map(|(id, names)| (*id, names.iter().map(|n| n.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_context_weights_interests_by_action() {
        let interactions = vec![
            at_minute(10, 0, InteractionKind::View, 1),
            at_minute(10, 10, InteractionKind::Edit, 2),
            at_minute(10, 20, InteractionKind::View, 2),
            at_minute(11, 0, InteractionKind::View, 3),
        ];
        let content_tags = tags(&[
            (1, &["marketing"]),
            (2, &["analytika", "marketing"]),
        ]);

        let context = ContextAnalyzer.analyze(&interactions, &content_tags);
        let topics: Vec<_> = context
            .interests
            .iter()
            .map(|i| (i.topic.as_str(), i.score))
            .collect();
        // marketing 1 + 2 + 1, analytika 2 + 1
        assert_eq!(topics, vec![("marketing", 1.0), ("analytika", 0.75)]);
    }

    #[test]
    fn test_context_work_patterns() {
        let interactions = vec![
            at_minute(10, 0, InteractionKind::View, 1),
            at_minute(10, 20, InteractionKind::Edit, 1),
            at_minute(10, 40, InteractionKind::Edit, 1),
            at_minute(14, 0, InteractionKind::View, 2),
            at_minute(14, 20, InteractionKind::Edit, 2),
        ];
        let context = ContextAnalyzer.analyze(&interactions, &HashMap::new());
        let patterns = context.work_patterns;

        assert_eq!(patterns.peak_activity_time.as_deref(), Some("09:00-11:00"));
        // sessions of 40 and 20 minutes
        assert_eq!(patterns.average_session_minutes, 30);
        assert_eq!(
            patterns.preferred_actions,
            vec![InteractionKind::Edit, InteractionKind::View]
        );
        assert!(context.interests.is_empty());
        assert_eq!(context.preferences.layout, LayoutPreference::Comfortable);
        assert_eq!(context.preferences.color_scheme, ColorScheme::Light);
        assert_eq!(
            context.preferences.notification_frequency,
            NotificationFrequency::Medium
        );
    }

    #[test]
    fn test_context_for_night_owl() {
        let interactions: Vec<_> = (0..12)
            .map(|m| at_minute(22, m * 4, InteractionKind::View, 1))
            .collect();
        let context = ContextAnalyzer.analyze(&interactions, &HashMap::new());

        assert_eq!(context.work_patterns.peak_activity_time.as_deref(), Some("21:00-23:00"));
        assert_eq!(context.preferences.layout, LayoutPreference::Compact);
        assert_eq!(context.preferences.color_scheme, ColorScheme::Dark);
        assert_eq!(
            context.preferences.notification_frequency,
            NotificationFrequency::High
        );
    }

    #[test]
    fn test_context_without_history() {
        let context = ContextAnalyzer.analyze(&[], &HashMap::new());
        assert!(context.interests.is_empty());
        assert_eq!(context.work_patterns.peak_activity_time, None);
        assert_eq!(context.work_patterns.average_session_minutes, 0);
        assert!(context.work_patterns.preferred_actions.is_empty());
        assert_eq!(context.preferences.layout, LayoutPreference::Compact);
        assert_eq!(
            context.preferences.notification_frequency,
            NotificationFrequency::Medium
        );

        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["preferences"]["color_scheme"], "light");
    }

    #[test]
    fn test_predict_create_after_busy_streak() {
        let interactions: Vec<_> = (0..6).map(|_| at(20, InteractionKind::Like, 1)).collect();
        let actions = PredictiveEngine.predict(&interactions, |_| None, 21);
        assert_eq!(actions.likely_tasks.len(), 1);
        assert_eq!(actions.likely_tasks[0].action, ActionKind::Create);
        assert_eq!(actions.likely_tasks[0].target, None);
        assert_eq!(actions.interface_suggestions[0].confidence, 0.65);
    }
}
