use std::sync::Arc;

use veracity_common::{normalize_domain, TrustTier};

use crate::dictionaries::Dictionaries;

/// Static allow/deny pattern lookup for source domains. No network.
#[derive(Debug, Clone)]
pub struct SourceTrust {
    dictionaries: Arc<Dictionaries>,
}

impl SourceTrust {
    pub fn new(dictionaries: Arc<Dictionaries>) -> Self {
        Self { dictionaries }
    }

    /// Accepts a bare domain, a host with port, or a full URL.
    pub fn trust_tier(&self, source: &str) -> TrustTier {
        match normalize_domain(source) {
            Some(domain) => self.tier_for_domain(&domain),
            None => TrustTier::Unknown,
        }
    }

    /// Tier for an already-normalized domain. The allow-list is checked
    /// first, so a trusted outlet is never demoted by a platform suffix.
    pub fn tier_for_domain(&self, domain: &str) -> TrustTier {
        let lists = &self.dictionaries.sources;

        let trusted = lists
            .trusted
            .iter()
            .any(|t| domain == t || is_sub_label(domain, t));
        if trusted {
            return TrustTier::Trusted;
        }

        if lists
            .suspicious_suffixes
            .iter()
            .any(|suffix| domain.ends_with(suffix.as_str()))
        {
            return TrustTier::Suspicious;
        }

        TrustTier::Unknown
    }
}

fn is_sub_label(domain: &str, parent: &str) -> bool {
    domain
        .strip_suffix(parent)
        .is_some_and(|prefix| prefix.ends_with('.'))
}
