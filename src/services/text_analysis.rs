//! Text helpers shared by the AI services
//!
//! Word splitting here is Unicode-aware, so Slovak diacritics stay part of
//! the word they belong to.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A run of text closed by sentence punctuation
static TERMINATED_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid sentence regex"));

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid word regex"));

/// 32-bit string hash used in AI cache keys.
///
/// Folds UTF-16 code units as `h = (h << 5) - h + c` with wrapping `i32`
/// arithmetic and prints the result in decimal.
pub fn hash_string(s: &str) -> String {
    let hash = s.encode_utf16().fold(0i32, |h, c| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(c))
    });
    hash.to_string()
}

/// Sentences that end in `.`, `!` or `?`; trailing text without
/// punctuation is dropped
pub fn terminated_sentences(text: &str) -> Vec<&str> {
    TERMINATED_SENTENCE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Lowercased words split on any non-word character
pub fn word_tokens(text: &str) -> Vec<String> {
    NON_WORD
        .split(&text.to_lowercase())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// The `n` most frequent words with their counts.
///
/// Ties keep first-seen order.
pub fn top_by_frequency<I>(words: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for word in words {
        match index.get(&word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.clone(), counts.len());
                counts.push((word, 1));
            }
        }
    }

    // stable sort keeps insertion order within equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Whole-word occurrences of any of `words` in the already lowercased text
pub fn count_whole_words(lower: &str, words: &[&str]) -> usize {
    let tokens = word_tokens(lower);
    tokens
        .iter()
        .filter(|t| words.contains(&t.as_str()))
        .count()
}

/// Cut `text` to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_string_matches_known_values() {
        assert_eq!(hash_string(""), "0");
        assert_eq!(hash_string("a"), "97");
        assert_eq!(hash_string("ab"), "3105");
        // long input wraps into negative values instead of overflowing
        let long = "Architekt kúziel ".repeat(20);
        assert!(hash_string(&long).parse::<i32>().is_ok());
    }

    #[test]
    fn test_hash_uses_utf16_units() {
        // "ý" is a single code unit (0xFD)
        assert_eq!(hash_string("ý"), "253");
    }

    #[test]
    fn test_terminated_sentences() {
        let sentences = terminated_sentences("Prvá veta. Druhá! A zvyšok bez bodky");
        assert_eq!(sentences, vec!["Prvá veta.", " Druhá!"]);
        assert!(terminated_sentences("bez interpunkcie").is_empty());
    }

    #[test]
    fn test_word_tokens_keep_diacritics() {
        assert_eq!(
            word_tokens("Stratégia, ÚSPECH a dáta!"),
            vec!["stratégia", "úspech", "a", "dáta"]
        );
    }

    #[test]
    fn test_top_by_frequency_orders_and_breaks_ties() {
        let words = ["beta", "alfa", "beta", "gama", "alfa", "delta"]
            .iter()
            .map(|s| s.to_string());
        let top = top_by_frequency(words, 3);
        assert_eq!(
            top,
            vec![
                ("beta".to_string(), 2),
                ("alfa".to_string(), 2),
                ("gama".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_count_whole_words() {
        assert_eq!(count_whole_words("dobrý a dobrýdeň, dobrý", &["dobrý"]), 2);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("šťastný", 3), "šťa");
        assert_eq!(truncate_chars("ok", 5), "ok");
    }
}
