//! Surface-text statistics: readability, dictionary-hit percentages,
//! vocabulary diversity, punctuation and capitalization ratios.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use veracity_common::LexicalSignals;

use crate::dictionaries::{matched_terms, Dictionaries};

static SENTENCE_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static SILENT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").unwrap());
static LEADING_Y: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^y").unwrap());
static VOWEL_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[aeiouy]{1,2}").unwrap());

const PUNCTUATION: &[char] = &['!', '?', '.', ',', ';', ':'];

#[derive(Debug, Clone)]
pub struct LexicalExtractor {
    dictionaries: Arc<Dictionaries>,
}

impl LexicalExtractor {
    pub fn new(dictionaries: Arc<Dictionaries>) -> Self {
        Self { dictionaries }
    }

    /// Never fails: empty text yields zero scores and maximal readability.
    pub fn extract(&self, text: &str) -> LexicalSignals {
        let words: Vec<&str> = text.split_whitespace().collect();
        let word_count = words.len();
        let sentence_count = sentence_count(text);
        let lower = text.to_lowercase();
        let terms = &self.dictionaries.lexical;

        LexicalSignals {
            readability: flesch_reading_ease(&words, sentence_count),
            emotional_intensity: term_score(&lower, &terms.emotional, word_count),
            urgency_score: term_score(&lower, &terms.urgency, word_count),
            sensationalism_score: term_score(&lower, &terms.sensationalism, word_count),
            bias_indicators: term_score(&lower, &terms.bias, word_count),
            vocabulary_diversity: vocabulary_diversity(&words),
            punctuation_ratio: punctuation_ratio(text),
            caps_ratio: caps_ratio(text),
            word_count,
            sentence_count,
        }
    }
}

/// Non-empty fragments between runs of `.`, `!` or `?`; at least 1.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_SPLIT
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1)
}

/// Flesch reading ease. Unclamped; degenerate input can go negative or
/// above 100.
pub fn flesch_reading_ease(words: &[&str], sentence_count: usize) -> f64 {
    let word_count = words.len();
    let avg_words_per_sentence = word_count as f64 / sentence_count.max(1) as f64;
    let avg_syllables_per_word = if word_count == 0 {
        0.0
    } else {
        words.iter().map(|w| count_syllables(w)).sum::<usize>() as f64 / word_count as f64
    };
    206.835 - 1.015 * avg_words_per_sentence - 84.6 * avg_syllables_per_word
}

/// Heuristic syllable count. Edge punctuation is ignored.
pub fn count_syllables(word: &str) -> usize {
    let word = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }
    let stripped = SILENT_SUFFIX.replace(&word, "");
    let stripped = LEADING_Y.replace(&stripped, "");
    VOWEL_GROUP.find_iter(&stripped).count().max(1)
}

/// Unique lowercased words over the square root of the word count.
pub fn vocabulary_diversity(words: &[&str]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let unique: HashSet<String> = words
        .iter()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();
    unique.len() as f64 / (words.len() as f64).sqrt()
}

/// Percentage of dictionary terms present per word, capped at 100.
fn term_score(lowercase_text: &str, terms: &[String], word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let hits = matched_terms(lowercase_text, terms).len();
    (100.0 * hits as f64 / word_count as f64).min(100.0)
}

/// Share of characters in `[!?.,;:]`.
pub fn punctuation_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let marks = text.chars().filter(|c| PUNCTUATION.contains(c)).count();
    marks as f64 / total as f64
}

/// Share of ASCII letters that are uppercase.
pub fn caps_ratio(text: &str) -> f64 {
    let letters = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if letters == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_ascii_uppercase()).count();
    upper as f64 / letters as f64
}
