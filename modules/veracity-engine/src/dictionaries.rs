//! Term dictionaries shared read-only by every component.
//!
//! Loaded once at startup (embedded TOML, optionally overridden from disk),
//! normalized, then handed out as `Arc<Dictionaries>`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

const EMBEDDED: &str = include_str!("../dictionaries.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dictionaries {
    pub lexical: LexicalTerms,
    pub risk: RiskTerms,
    pub sources: SourceLists,
}

/// Word lists behind the four percentage-style lexical scores.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexicalTerms {
    pub emotional: Vec<String>,
    pub urgency: Vec<String>,
    pub sensationalism: Vec<String>,
    pub bias: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskTerms {
    pub conspiracy: Vec<String>,
    pub emotive: Vec<String>,
    pub urgency: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceLists {
    /// Exact domains; sub-labels of these also count as trusted.
    pub trusted: Vec<String>,
    /// Hosting-platform suffixes, always stored with a leading dot.
    pub suspicious_suffixes: Vec<String>,
}

impl Dictionaries {
    /// The dictionaries compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::parse(EMBEDDED).context("Failed to parse embedded dictionaries")
    }

    /// Load dictionaries from a TOML file with the same layout as the
    /// embedded `dictionaries.toml`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionaries file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse dictionaries file: {}", path.display()))
    }

    /// Embedded dictionaries unless an override path is given.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: Dictionaries = toml::from_str(content)?;
        let dictionaries = raw.normalized();
        anyhow::ensure!(
            !dictionaries.risk.conspiracy.is_empty(),
            "risk.conspiracy must list at least one term"
        );
        Ok(dictionaries)
    }

    fn normalized(self) -> Self {
        Self {
            lexical: LexicalTerms {
                emotional: normalize_terms(self.lexical.emotional),
                urgency: normalize_terms(self.lexical.urgency),
                sensationalism: normalize_terms(self.lexical.sensationalism),
                bias: normalize_terms(self.lexical.bias),
            },
            risk: RiskTerms {
                conspiracy: normalize_terms(self.risk.conspiracy),
                emotive: normalize_terms(self.risk.emotive),
                urgency: normalize_terms(self.risk.urgency),
            },
            sources: SourceLists {
                trusted: normalize_terms(self.sources.trusted)
                    .into_iter()
                    .map(|d| d.trim_matches('.').to_string())
                    .filter(|d| !d.is_empty())
                    .collect(),
                suspicious_suffixes: normalize_terms(self.sources.suspicious_suffixes)
                    .into_iter()
                    .map(|s| {
                        if s.starts_with('.') {
                            s
                        } else {
                            format!(".{s}")
                        }
                    })
                    .collect(),
            },
        }
    }
}

/// Lowercase, trim, drop blanks and duplicates. First occurrence keeps its
/// position so match lists come out in file order.
fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Dictionary terms contained in `lowercase_text`, in dictionary order.
pub fn matched_terms(lowercase_text: &str, terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .filter(|term| lowercase_text.contains(term.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dictionaries_parse() {
        let dicts = Dictionaries::builtin().unwrap();
        assert!(dicts.risk.conspiracy.len() >= 10);
        assert!(dicts.risk.conspiracy.contains(&"deep state".to_string()));
        assert!(dicts.sources.trusted.contains(&"reuters.com".to_string()));
        assert!(dicts
            .sources
            .suspicious_suffixes
            .iter()
            .all(|s| s.starts_with('.')));
    }

    #[test]
    fn terms_are_lowercased_and_deduplicated() {
        let toml = r#"
            [lexical]
            emotional = ["Shocking", "shocking ", ""]
            urgency = []
            sensationalism = []
            bias = []

            [risk]
            conspiracy = ["Deep State"]
            emotive = []
            urgency = []

            [sources]
            trusted = [".Reuters.com"]
            suspicious_suffixes = ["blogspot.com"]
        "#;
        let dicts = Dictionaries::parse(toml).unwrap();
        assert_eq!(dicts.lexical.emotional, vec!["shocking"]);
        assert_eq!(dicts.risk.conspiracy, vec!["deep state"]);
        assert_eq!(dicts.sources.trusted, vec!["reuters.com"]);
        assert_eq!(dicts.sources.suspicious_suffixes, vec![".blogspot.com"]);
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let err = Dictionaries::parse("[extra]\nterms = []").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn missing_override_file_reports_path() {
        let err = Dictionaries::load(Path::new("/nonexistent/dicts.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/dicts.toml"));
    }

    #[test]
    fn matched_terms_preserve_dictionary_order() {
        let terms = vec!["wake up".to_string(), "deep state".to_string()];
        let found = matched_terms("the deep state wants you asleep. wake up!", &terms);
        assert_eq!(found, vec!["wake up", "deep state"]);
    }
}
