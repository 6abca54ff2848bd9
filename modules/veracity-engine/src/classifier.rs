//! Internal classifier capability.
//!
//! The blender only needs P(fake) for a text. A trained model behind an HTTP
//! endpoint and the rule-based stand-in are interchangeable behind
//! [`ContentClassifier`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dictionaries::Dictionaries;
use crate::lexical::LexicalExtractor;
use crate::risk::RiskDetector;

#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Probability in [0,1] that `text` is fake.
    async fn confidence(&self, text: &str) -> Result<f64>;
}

// ---------------------------------------------------------------------------
// HeuristicClassifier
// ---------------------------------------------------------------------------

const RISK_WEIGHT: f64 = 0.6;
const STYLE_WEIGHT: f64 = 0.4;

/// Rule-based stand-in used when no model endpoint is configured. Scores
/// rhetorical risk and loaded-language density; calm prose scores near 0.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    lexical: LexicalExtractor,
    risk: RiskDetector,
}

impl HeuristicClassifier {
    pub fn new(dictionaries: Arc<Dictionaries>) -> Self {
        Self {
            lexical: LexicalExtractor::new(Arc::clone(&dictionaries)),
            risk: RiskDetector::new(dictionaries),
        }
    }

    pub fn score(&self, text: &str) -> f64 {
        let signals = self.lexical.extract(text);
        let risk = self.risk.analyze(text);

        // Mean of the four dictionary percentages, as a fraction.
        let style = (signals.emotional_intensity
            + signals.urgency_score
            + signals.sensationalism_score
            + signals.bias_indicators)
            / 400.0;

        (RISK_WEIGHT * risk.risk_score + STYLE_WEIGHT * style.min(1.0)).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl ContentClassifier for HeuristicClassifier {
    async fn confidence(&self, text: &str) -> Result<f64> {
        Ok(self.score(text))
    }
}

// ---------------------------------------------------------------------------
// HttpClassifier
// ---------------------------------------------------------------------------

const CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    confidence: f64,
}

/// Client for a model-serving endpoint that accepts `{"text": ...}` and
/// answers `{"confidence": <P(fake)>}`.
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CLASSIFIER_TIMEOUT)
            .build()
            .context("Failed to build classifier HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContentClassifier for HttpClassifier {
    async fn confidence(&self, text: &str) -> Result<f64> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .with_context(|| format!("Classifier request to {} failed", self.endpoint))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Classifier returned status {}: {}", status.as_u16(), body);
        }

        let parsed: ClassifyResponse = resp
            .json()
            .await
            .context("Classifier response was not valid JSON")?;
        Ok(parsed.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heuristic() -> HeuristicClassifier {
        HeuristicClassifier::new(Arc::new(Dictionaries::builtin().unwrap()))
    }

    #[tokio::test]
    async fn calm_prose_scores_zero() {
        let score = heuristic()
            .confidence("The library extended its weekend opening hours this month.")
            .await
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn inflammatory_text_scores_higher_than_calm_text() {
        let classifier = heuristic();
        let calm = classifier
            .confidence("Researchers reported modest results in a small trial.")
            .await
            .unwrap();
        let loud = classifier
            .confidence("BREAKING!!! The EVIL deep state is hiding chemtrails. WAKE UP sheeple!!!")
            .await
            .unwrap();
        assert!(loud > calm);
        assert!(loud > 0.3);
        assert!(loud <= 1.0);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let classifier = HttpClassifier::new("http://127.0.0.1:9/classify").unwrap();
        assert!(classifier.confidence("text").await.is_err());
    }
}
