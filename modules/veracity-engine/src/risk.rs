//! Rhetorical red-flag detection.
//!
//! Five indicators, each capped before weighting: excessive punctuation,
//! shouting caps, conspiracy vocabulary, emotive language and urgency
//! pressure. Weights sum to 1.0 so the score lands in [0,1].

use std::collections::HashSet;
use std::sync::Arc;

use veracity_common::{RiskPatternResult, RiskPatterns};

use crate::dictionaries::{matched_terms, Dictionaries};
use crate::lexical::{caps_ratio, punctuation_ratio};

pub const PUNCTUATION_THRESHOLD: f64 = 0.10;
pub const CAPS_THRESHOLD: f64 = 0.30;

const PUNCTUATION_WEIGHT: f64 = 0.15;
const CAPS_WEIGHT: f64 = 0.15;
const CONSPIRACY_WEIGHT: f64 = 0.30;
const EMOTIVE_WEIGHT: f64 = 0.20;
const URGENCY_WEIGHT: f64 = 0.20;

/// Each distinct conspiracy term adds this much before saturating at 1.
const CONSPIRACY_TERM_STEP: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct RiskDetector {
    dictionaries: Arc<Dictionaries>,
}

impl RiskDetector {
    pub fn new(dictionaries: Arc<Dictionaries>) -> Self {
        Self { dictionaries }
    }

    pub fn analyze(&self, text: &str) -> RiskPatternResult {
        let lower = text.to_lowercase();
        let terms = &self.dictionaries.risk;

        let punct = punctuation_ratio(text);
        let caps = caps_ratio(text);
        let conspiracy = matched_terms(&lower, &terms.conspiracy);
        let emotive = matched_terms(&lower, &terms.emotive);
        let urgency = matched_terms(&lower, &terms.urgency);

        let patterns = RiskPatterns {
            excessive_punctuation: punct > PUNCTUATION_THRESHOLD,
            all_caps: caps > CAPS_THRESHOLD,
            emotive_language: !emotive.is_empty(),
            urgency_indicators: !urgency.is_empty(),
            conspiracy_terms: conspiracy.clone(),
        };

        let mut analysis = Vec::new();
        if patterns.excessive_punctuation {
            analysis.push(format!(
                "Excessive punctuation: {:.1}% of characters are punctuation marks",
                punct * 100.0
            ));
        }
        if patterns.all_caps {
            analysis.push(format!(
                "Excessive capitalization: {:.1}% of letters are uppercase",
                caps * 100.0
            ));
        }
        if !conspiracy.is_empty() {
            analysis.push(format!(
                "Conspiracy-related terms detected: {}",
                conspiracy.join(", ")
            ));
        }
        if patterns.emotive_language {
            analysis.push(format!("Emotive language detected: {}", emotive.join(", ")));
        }
        if patterns.urgency_indicators {
            analysis.push(format!("Urgency indicators detected: {}", urgency.join(", ")));
        }

        let risk_score = risk_score(&patterns, punct, caps);

        let mut seen = HashSet::new();
        let flagged_terms = conspiracy
            .into_iter()
            .chain(emotive)
            .chain(urgency)
            .filter(|t| seen.insert(t.clone()))
            .collect();

        RiskPatternResult {
            patterns,
            risk_score,
            flagged_terms,
            analysis,
        }
    }
}

fn risk_score(patterns: &RiskPatterns, punctuation_ratio: f64, caps_ratio: f64) -> f64 {
    let punctuation = if patterns.excessive_punctuation {
        PUNCTUATION_WEIGHT * punctuation_ratio.min(1.0)
    } else {
        0.0
    };
    let caps = if patterns.all_caps {
        CAPS_WEIGHT * caps_ratio.min(1.0)
    } else {
        0.0
    };
    let conspiracy = CONSPIRACY_WEIGHT
        * (patterns.conspiracy_terms.len() as f64 * CONSPIRACY_TERM_STEP).min(1.0);
    let emotive = if patterns.emotive_language {
        EMOTIVE_WEIGHT
    } else {
        0.0
    };
    let urgency = if patterns.urgency_indicators {
        URGENCY_WEIGHT
    } else {
        0.0
    };

    (punctuation + caps + conspiracy + emotive + urgency).clamp(0.0, 1.0)
}
