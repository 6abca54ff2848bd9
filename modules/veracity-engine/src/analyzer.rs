//! Caller-facing analysis: validate, extract synchronous signals, resolve the
//! classifier and fact-check concurrently under one deadline, then blend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use typed_builder::TypedBuilder;

use veracity_common::{
    AnalysisRequest, ClassifierOutcome, Config, CredibilityResult, FactCheckVerdict,
    LexicalSignals, RiskPatternResult, TrustTier, VeracityError,
};

use crate::blender::{blend, BlendInputs};
use crate::classifier::{ContentClassifier, HeuristicClassifier, HttpClassifier};
use crate::dictionaries::Dictionaries;
use crate::fact_check::{FactChecker, GoogleFactChecker};
use crate::lexical::LexicalExtractor;
use crate::risk::RiskDetector;
use crate::source_trust::SourceTrust;

pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Requests analyzed at once by [`Analyzer::analyze_many`].
const BATCH_CONCURRENCY: usize = 4;

/// Long-lived analysis engine. Cheap to clone; all shared parts are
/// read-only.
#[derive(Clone, TypedBuilder)]
pub struct Analyzer {
    dictionaries: Arc<Dictionaries>,
    classifier: Arc<dyn ContentClassifier>,
    fact_checker: Arc<dyn FactChecker>,
    #[builder(default = DEFAULT_ANALYSIS_TIMEOUT)]
    timeout: Duration,
}

impl Analyzer {
    /// Wire the production engine from configuration: dictionaries from the
    /// override path or the embedded set, the HTTP model when
    /// `CLASSIFIER_URL` is set (heuristic otherwise), and the Google fact
    /// checker (unconfigured without an API key).
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let dictionaries = Arc::new(
            Dictionaries::load_or_builtin(config.dictionaries_path.as_deref())
                .map_err(|e| VeracityError::Dictionary(format!("{e:#}")))?,
        );

        let classifier: Arc<dyn ContentClassifier> = match config.classifier_url.as_deref() {
            Some(url) => Arc::new(HttpClassifier::new(url)?),
            None => Arc::new(HeuristicClassifier::new(Arc::clone(&dictionaries))),
        };

        let fact_checker = Arc::new(GoogleFactChecker::from_config(config)?);
        if !fact_checker.is_configured() {
            warn!("FACT_CHECK_API_KEY not set, fact-check verdicts will be unavailable");
        }

        Ok(Self::builder()
            .dictionaries(dictionaries)
            .classifier(classifier)
            .fact_checker(fact_checker)
            .timeout(config.analysis_timeout())
            .build())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn dictionaries(&self) -> &Arc<Dictionaries> {
        &self.dictionaries
    }

    /// Lexical and risk signals only. Synchronous, no I/O.
    pub fn signals(&self, text: &str) -> (LexicalSignals, RiskPatternResult) {
        let lexical = LexicalExtractor::new(Arc::clone(&self.dictionaries)).extract(text);
        let risk = RiskDetector::new(Arc::clone(&self.dictionaries)).analyze(text);
        (lexical, risk)
    }

    pub fn trust_tier(&self, source: &str) -> TrustTier {
        SourceTrust::new(Arc::clone(&self.dictionaries)).trust_tier(source)
    }

    /// Analyze one request. Only input validation can fail; every signal
    /// failure is folded into the result.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<CredibilityResult, VeracityError> {
        request.validate()?;

        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.timeout;
        let body = request.analyzed_body();
        let source_domain = request.source_domain();

        info!(
            text_chars = request.text.chars().count(),
            has_title = request.title.is_some(),
            source = source_domain.as_deref().unwrap_or("<none>"),
            "Analyzing content"
        );

        let (lexical, risk) = self.signals(&body);
        let source_tier = match source_domain.as_deref() {
            Some(domain) => SourceTrust::new(Arc::clone(&self.dictionaries)).tier_for_domain(domain),
            None => TrustTier::Unknown,
        };

        let ((classifier, classifier_timed_out), (fact_check, fact_check_timed_out)) = tokio::join!(
            self.classify(&body, deadline),
            self.verify(&request.text, deadline),
        );

        let result = blend(BlendInputs {
            classifier,
            lexical,
            risk,
            fact_check,
            source_tier,
            source_domain,
            timed_out: classifier_timed_out || fact_check_timed_out,
        })
        .with_processing_time(started.elapsed().as_millis() as u64);

        info!(
            prediction = %result.prediction,
            confidence = result.confidence,
            indicators = result.suspicious_indicators.len(),
            timed_out = result.timed_out,
            elapsed_ms = result.processing_time_ms,
            "Analysis complete"
        );

        Ok(result)
    }

    /// Analyze several requests with bounded concurrency. Output order
    /// matches input order.
    pub async fn analyze_many(
        &self,
        requests: &[AnalysisRequest],
    ) -> Vec<Result<CredibilityResult, VeracityError>> {
        stream::iter(requests)
            .map(|request| self.analyze(request))
            .buffered(BATCH_CONCURRENCY)
            .collect()
            .await
    }

    async fn classify(
        &self,
        text: &str,
        deadline: tokio::time::Instant,
    ) -> (ClassifierOutcome, bool) {
        match tokio::time::timeout_at(deadline, self.classifier.confidence(text)).await {
            Ok(Ok(score)) => {
                let outcome = ClassifierOutcome::from_score(score);
                if let ClassifierOutcome::Unavailable { reason } = &outcome {
                    warn!(reason = %reason, "Classifier returned an unusable score");
                }
                (outcome, false)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Internal classifier failed");
                (ClassifierOutcome::unavailable(e.to_string()), false)
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Internal classifier timed out");
                (ClassifierOutcome::unavailable("timed out"), true)
            }
        }
    }

    async fn verify(
        &self,
        text: &str,
        deadline: tokio::time::Instant,
    ) -> (FactCheckVerdict, bool) {
        match tokio::time::timeout_at(deadline, self.fact_checker.verify_claim(text)).await {
            Ok(verdict) => (verdict, false),
            Err(_) => {
                warn!(timeout = ?self.timeout, "Fact-check lookup timed out");
                (FactCheckVerdict::timed_out(), true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingClassifier, FixedClassifier, StubFactChecker};

    fn analyzer(classifier: Arc<dyn ContentClassifier>, verdict: FactCheckVerdict) -> Analyzer {
        Analyzer::builder()
            .dictionaries(Arc::new(Dictionaries::builtin().unwrap()))
            .classifier(classifier)
            .fact_checker(Arc::new(StubFactChecker::new(verdict)))
            .build()
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_signals_run() {
        let a = analyzer(Arc::new(FixedClassifier(0.5)), FactCheckVerdict::NoResult);
        let err = a.analyze(&AnalysisRequest::new("")).await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn failing_classifier_does_not_abort_analysis() {
        let a = analyzer(Arc::new(FailingClassifier), FactCheckVerdict::NoResult);
        let result = a
            .analyze(&AnalysisRequest::new("Local bakery opens a second location."))
            .await
            .unwrap();
        assert!(matches!(result.classifier, ClassifierOutcome::Unavailable { .. }));
        assert!(result.reasoning[0].starts_with("Internal classifier failed"));
        assert!(!result.timed_out);
    }

    #[tokio::test]
    async fn url_host_resolves_source_tier() {
        let a = analyzer(Arc::new(FixedClassifier(0.3)), FactCheckVerdict::NoResult);
        let request = AnalysisRequest::new("Council approves new budget.")
            .with_url("https://www.reuters.com/world/budget");
        let result = a.analyze(&request).await.unwrap();
        assert_eq!(result.source_tier, TrustTier::Trusted);
        assert_eq!(result.source_domain.as_deref(), Some("reuters.com"));
    }

    #[tokio::test]
    async fn from_config_without_keys_uses_local_signals() {
        let a = Analyzer::from_config(&Config::default()).unwrap();
        assert_eq!(a.timeout(), DEFAULT_ANALYSIS_TIMEOUT);
        let result = a
            .analyze(&AnalysisRequest::new("The museum reopened after renovations."))
            .await
            .unwrap();
        assert_eq!(result.fact_check, FactCheckVerdict::not_configured());
    }

    #[test]
    fn from_config_reports_bad_dictionary_path() {
        let config = Config {
            dictionaries_path: Some("/nonexistent/veracity/dicts.toml".into()),
            ..Default::default()
        };
        let err = Analyzer::from_config(&config).err().unwrap();
        match err.downcast_ref::<VeracityError>() {
            Some(VeracityError::Dictionary(message)) => {
                assert!(message.contains("/nonexistent/veracity/dicts.toml"))
            }
            other => panic!("expected Dictionary error, got {other:?}"),
        }
    }
}
