// Test doubles for the two async trait boundaries.
//
// - FixedClassifier / FailingClassifier / SlowClassifier (ContentClassifier)
// - StubFactChecker / SlowFactChecker (FactChecker)
//
// No network, deterministic output. Enabled for unit tests and, through the
// `test-support` feature, for the integration tests in `tests/`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use veracity_common::FactCheckVerdict;

use crate::analyzer::Analyzer;
use crate::classifier::ContentClassifier;
use crate::dictionaries::Dictionaries;
use crate::fact_check::FactChecker;

// ---------------------------------------------------------------------------
// Classifiers
// ---------------------------------------------------------------------------

/// Always answers with the same confidence.
pub struct FixedClassifier(pub f64);

#[async_trait]
impl ContentClassifier for FixedClassifier {
    async fn confidence(&self, _text: &str) -> Result<f64> {
        Ok(self.0)
    }
}

/// Always fails, like a model server that is down.
pub struct FailingClassifier;

#[async_trait]
impl ContentClassifier for FailingClassifier {
    async fn confidence(&self, _text: &str) -> Result<f64> {
        bail!("model server unavailable")
    }
}

/// Answers after a delay. Used to exercise the request deadline.
pub struct SlowClassifier {
    pub delay: Duration,
    pub value: f64,
}

#[async_trait]
impl ContentClassifier for SlowClassifier {
    async fn confidence(&self, _text: &str) -> Result<f64> {
        tokio::time::sleep(self.delay).await;
        Ok(self.value)
    }
}

// ---------------------------------------------------------------------------
// Fact checkers
// ---------------------------------------------------------------------------

/// Returns a canned verdict and counts lookups.
pub struct StubFactChecker {
    verdict: FactCheckVerdict,
    calls: AtomicUsize,
}

impl StubFactChecker {
    pub fn new(verdict: FactCheckVerdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rated(rating: &str, publisher: &str) -> Self {
        Self::new(FactCheckVerdict::Verified {
            rating: rating.to_string(),
            publisher: publisher.to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactChecker for StubFactChecker {
    async fn verify_claim(&self, _text: &str) -> FactCheckVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict.clone()
    }
}

/// Answers with a verdict after a delay.
pub struct SlowFactChecker {
    pub delay: Duration,
    pub verdict: FactCheckVerdict,
}

#[async_trait]
impl FactChecker for SlowFactChecker {
    async fn verify_claim(&self, _text: &str) -> FactCheckVerdict {
        tokio::time::sleep(self.delay).await;
        self.verdict.clone()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn builtin_dictionaries() -> Arc<Dictionaries> {
    Arc::new(Dictionaries::builtin().expect("embedded dictionaries parse"))
}

/// Analyzer wired to a fixed classifier score and a canned verdict.
pub fn stub_analyzer(confidence: f64, verdict: FactCheckVerdict) -> Analyzer {
    Analyzer::builder()
        .dictionaries(builtin_dictionaries())
        .classifier(Arc::new(FixedClassifier(confidence)))
        .fact_checker(Arc::new(StubFactChecker::new(verdict)))
        .build()
}
