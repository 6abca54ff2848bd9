use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::normalize_domain;
use crate::error::VeracityError;

// --- Request ---

/// A piece of content submitted for credibility analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Outlet or domain the content came from, e.g. `reuters.com`.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
            source: None,
            url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Whitespace-only text is rejected along with empty text.
    pub fn validate(&self) -> Result<(), VeracityError> {
        if self.text.trim().is_empty() {
            return Err(VeracityError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Text fed to the lexical extractor, risk detector and classifier:
    /// the title (when present) on its own line ahead of the body.
    pub fn analyzed_body(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => format!("{title}\n{}", self.text),
            _ => self.text.clone(),
        }
    }

    /// Normalized source domain. An explicit `source` wins over the URL host.
    pub fn source_domain(&self) -> Option<String> {
        self.source
            .as_deref()
            .and_then(normalize_domain)
            .or_else(|| self.url.as_deref().and_then(normalize_domain))
    }
}

// --- Lexical signals ---

/// Surface statistics of a text. Percent-style scores are in [0,100],
/// ratios in [0,1]. `readability` is stored unclamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalSignals {
    pub readability: f64,
    pub emotional_intensity: f64,
    pub urgency_score: f64,
    pub sensationalism_score: f64,
    pub bias_indicators: f64,
    /// Unique-word count over √word-count.
    pub vocabulary_diversity: f64,
    pub punctuation_ratio: f64,
    pub caps_ratio: f64,
    pub word_count: usize,
    pub sentence_count: usize,
}

impl LexicalSignals {
    /// Readability clamped into [0,100] for threshold checks and display.
    pub fn readability_clamped(&self) -> f64 {
        self.readability.clamp(0.0, 100.0)
    }
}

// --- Risk patterns ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskPatterns {
    pub excessive_punctuation: bool,
    pub all_caps: bool,
    pub emotive_language: bool,
    pub urgency_indicators: bool,
    pub conspiracy_terms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskPatternResult {
    pub patterns: RiskPatterns,
    /// Weighted composite of the five red flags, in [0,1].
    pub risk_score: f64,
    pub flagged_terms: Vec<String>,
    /// One finding per triggered condition, in detection order.
    pub analysis: Vec<String>,
}

// --- Fact check ---

/// Normalized outcome of the external claim search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FactCheckVerdict {
    Verified { rating: String, publisher: String },
    NoResult,
    Unavailable { reason: String },
    Error { message: String },
}

impl FactCheckVerdict {
    pub const NOT_CONFIGURED: &'static str = "not configured";
    pub const TIMED_OUT: &'static str = "timed out";

    pub fn not_configured() -> Self {
        FactCheckVerdict::Unavailable {
            reason: Self::NOT_CONFIGURED.to_string(),
        }
    }

    pub fn timed_out() -> Self {
        FactCheckVerdict::Unavailable {
            reason: Self::TIMED_OUT.to_string(),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, FactCheckVerdict::Verified { .. })
    }
}

// --- Classifier ---

/// Internal classifier result after failure absorption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassifierOutcome {
    /// P(fake) in [0,1].
    Confidence { value: f64 },
    Unavailable { reason: String },
}

impl ClassifierOutcome {
    /// Accepts any finite score, clamped into [0,1]. NaN and infinities are
    /// treated as classifier failures.
    pub fn from_score(score: f64) -> Self {
        if score.is_finite() {
            ClassifierOutcome::Confidence {
                value: score.clamp(0.0, 1.0),
            }
        } else {
            ClassifierOutcome::Unavailable {
                reason: format!("non-finite score {score}"),
            }
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ClassifierOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    /// Confidence used as the blend base; unavailable counts as 0.
    pub fn value(&self) -> f64 {
        match self {
            ClassifierOutcome::Confidence { value } => *value,
            ClassifierOutcome::Unavailable { .. } => 0.0,
        }
    }
}

// --- Source trust ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    Trusted,
    Suspicious,
    Unknown,
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustTier::Trusted => write!(f, "trusted"),
            TrustTier::Suspicious => write!(f, "suspicious"),
            TrustTier::Unknown => write!(f, "unknown"),
        }
    }
}

// --- Result ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prediction {
    Real,
    Fake,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Real => write!(f, "REAL"),
            Prediction::Fake => write!(f, "FAKE"),
        }
    }
}

/// Final verdict for one analysis call. `confidence` is P(fake), not
/// certainty in the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityResult {
    pub prediction: Prediction,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub suspicious_indicators: Vec<String>,
    pub fact_check: FactCheckVerdict,
    pub processing_time_ms: u64,
    pub classifier: ClassifierOutcome,
    pub source_tier: TrustTier,
    pub source_domain: Option<String>,
    pub lexical: LexicalSignals,
    pub risk: RiskPatternResult,
    /// Set when the request deadline elapsed before every signal resolved.
    pub timed_out: bool,
}

impl CredibilityResult {
    pub fn with_processing_time(mut self, processing_time_ms: u64) -> Self {
        self.processing_time_ms = processing_time_ms;
        self
    }

    pub fn is_fake(&self) -> bool {
        self.prediction == Prediction::Fake
    }
}
