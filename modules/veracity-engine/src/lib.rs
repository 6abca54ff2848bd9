pub mod analyzer;
pub mod blender;
pub mod classifier;
pub mod dictionaries;
pub mod fact_check;
pub mod lexical;
pub mod risk;
pub mod source_trust;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use analyzer::Analyzer;
pub use blender::{blend, BlendInputs};
pub use classifier::{ContentClassifier, HeuristicClassifier, HttpClassifier};
pub use dictionaries::Dictionaries;
pub use fact_check::{FactChecker, GoogleFactChecker, RatingClass};
pub use lexical::LexicalExtractor;
pub use risk::RiskDetector;
pub use source_trust::SourceTrust;
