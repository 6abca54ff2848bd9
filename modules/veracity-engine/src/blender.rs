//! Credibility blending: merges the classifier outcome, fact-check verdict,
//! source tier and rhetorical risk into one confidence plus an ordered
//! reasoning trail.
//!
//! Confidence is P(fake). The composition is
//!
//! ```text
//! clamp(base + fact_check_modifier + trust_nudge + risk_nudge, 0, 1)
//! ```
//!
//! where `base` is the classifier confidence (0 when unavailable). Both
//! nudges together stay below the smallest non-zero fact-check modifier.
//! Sub-signals nobody computes (publisher history, domain age, recency) are
//! absent, not defaulted.

use tracing::debug;

use veracity_common::{
    ClassifierOutcome, CredibilityResult, FactCheckVerdict, LexicalSignals, Prediction,
    RiskPatternResult, TrustTier,
};

use crate::fact_check::RatingClass;

pub const FALSE_RATING_MODIFIER: f64 = -0.4;
pub const MISLEADING_RATING_MODIFIER: f64 = -0.2;
pub const TRUE_RATING_MODIFIER: f64 = 0.2;

pub const TRUST_NUDGE: f64 = 0.05;
pub const RISK_NUDGE_WEIGHT: f64 = 0.1;

/// Confidence above this predicts FAKE.
pub const FAKE_THRESHOLD: f64 = 0.5;

const EMOTIONAL_FLAG: f64 = 70.0;
const SENSATIONALISM_FLAG: f64 = 70.0;
const BIAS_FLAG: f64 = 70.0;
const READABILITY_FLAG: f64 = 50.0;

/// Everything the blender consumes. Any async signal may be unresolved
/// (classifier unavailable, verdict unavailable) and the blend still runs.
#[derive(Debug, Clone)]
pub struct BlendInputs {
    pub classifier: ClassifierOutcome,
    pub lexical: LexicalSignals,
    pub risk: RiskPatternResult,
    pub fact_check: FactCheckVerdict,
    pub source_tier: TrustTier,
    pub source_domain: Option<String>,
    pub timed_out: bool,
}

/// Additive adjustment for the fact-check verdict. Non-verified verdicts
/// contribute nothing.
pub fn fact_check_modifier(verdict: &FactCheckVerdict) -> f64 {
    match verdict {
        FactCheckVerdict::Verified { rating, .. } => match RatingClass::classify(rating) {
            RatingClass::False => FALSE_RATING_MODIFIER,
            RatingClass::Misleading => MISLEADING_RATING_MODIFIER,
            RatingClass::True => TRUE_RATING_MODIFIER,
            RatingClass::Other => 0.0,
        },
        FactCheckVerdict::NoResult
        | FactCheckVerdict::Unavailable { .. }
        | FactCheckVerdict::Error { .. } => 0.0,
    }
}

pub fn trust_nudge(tier: TrustTier) -> f64 {
    match tier {
        TrustTier::Suspicious => TRUST_NUDGE,
        TrustTier::Trusted => -TRUST_NUDGE,
        TrustTier::Unknown => 0.0,
    }
}

pub fn risk_nudge(risk_score: f64) -> f64 {
    RISK_NUDGE_WEIGHT * risk_score.clamp(0.0, 1.0)
}

pub fn prediction_for(confidence: f64) -> Prediction {
    if confidence > FAKE_THRESHOLD {
        Prediction::Fake
    } else {
        Prediction::Real
    }
}

/// Reasoning lines plus the subset that count as negative findings.
#[derive(Default)]
struct Trail {
    reasoning: Vec<String>,
    indicators: Vec<String>,
}

impl Trail {
    fn note(&mut self, line: String) {
        self.reasoning.push(line);
    }

    fn flag(&mut self, line: String) {
        self.indicators.push(line.clone());
        self.reasoning.push(line);
    }

    fn push(&mut self, line: String, suspicious: bool) {
        if suspicious {
            self.flag(line)
        } else {
            self.note(line)
        }
    }
}

pub fn blend(inputs: BlendInputs) -> CredibilityResult {
    let BlendInputs {
        classifier,
        lexical,
        risk,
        fact_check,
        source_tier,
        source_domain,
        timed_out,
    } = inputs;

    let base = classifier.value();
    let modifier = fact_check_modifier(&fact_check);
    let trust = trust_nudge(source_tier);
    let risk_adjustment = risk_nudge(risk.risk_score);
    let confidence = (base + modifier + trust + risk_adjustment).clamp(0.0, 1.0);
    let prediction = prediction_for(confidence);

    debug!(
        base,
        modifier,
        trust,
        risk_adjustment,
        confidence,
        %prediction,
        "Blended credibility signals"
    );

    let mut trail = Trail::default();

    // 1. classifier
    match &classifier {
        ClassifierOutcome::Confidence { value } => trail.push(
            format!(
                "Internal classifier estimates a {:.0}% likelihood that the content is fake",
                value * 100.0
            ),
            *value > FAKE_THRESHOLD,
        ),
        ClassifierOutcome::Unavailable { reason } => trail.note(format!(
            "Internal classifier failed ({reason}); its confidence is treated as 0"
        )),
    }

    // 2. fact check
    match &fact_check {
        FactCheckVerdict::Verified { rating, publisher } => trail.push(
            format!(
                "Fact-check by {publisher} rated this claim \"{rating}\" (adjustment {modifier:+.2})"
            ),
            RatingClass::classify(rating).is_negative(),
        ),
        FactCheckVerdict::NoResult => trail.note(
            "Fact-check inconclusive: no published fact-checks matched this claim".to_string(),
        ),
        FactCheckVerdict::Unavailable { reason } => {
            trail.note(format!("Fact-check inconclusive: fact-check service {reason}"))
        }
        FactCheckVerdict::Error { message } => {
            trail.note(format!("Fact-check inconclusive: lookup failed ({message})"))
        }
    }

    // 3. lexical flags
    if lexical.emotional_intensity > EMOTIONAL_FLAG {
        trail.flag(format!(
            "Excessive emotional language (score {:.1})",
            lexical.emotional_intensity
        ));
    }
    if lexical.sensationalism_score > SENSATIONALISM_FLAG {
        trail.flag(format!(
            "Sensationalist style (score {:.1})",
            lexical.sensationalism_score
        ));
    }
    if lexical.bias_indicators > BIAS_FLAG {
        trail.flag(format!(
            "Strong bias indicators (score {:.1})",
            lexical.bias_indicators
        ));
    }
    let readability = lexical.readability_clamped();
    if readability < READABILITY_FLAG {
        trail.flag(format!("Difficult to read (readability {readability:.1})"));
    }

    // 4. risk patterns
    for line in &risk.analysis {
        trail.flag(line.clone());
    }

    // 5. source trust
    match (source_tier, source_domain.as_deref()) {
        (TrustTier::Trusted, Some(domain)) => {
            trail.note(format!("Source {domain} is a recognized trusted outlet"))
        }
        (TrustTier::Suspicious, Some(domain)) => trail.flag(format!(
            "Source {domain} is hosted on a generic publishing platform"
        )),
        (_, Some(domain)) => trail.note(format!(
            "Source {domain} has no established trust record"
        )),
        (_, None) => trail.note("No source provided; source trust unknown".to_string()),
    }

    if risk_adjustment > 0.0 {
        trail.note(format!(
            "Rhetorical risk score {:.2} added {risk_adjustment:+.3} to confidence",
            risk.risk_score
        ));
    }

    if timed_out {
        trail.note(
            "Analysis deadline elapsed before all signals resolved; result is partial"
                .to_string(),
        );
    }

    CredibilityResult {
        prediction,
        confidence,
        reasoning: trail.reasoning,
        suspicious_indicators: trail.indicators,
        fact_check,
        processing_time_ms: 0,
        classifier,
        source_tier,
        source_domain,
        lexical,
        risk,
        timed_out,
    }
}
