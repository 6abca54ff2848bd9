use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::VeracityError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Engine configuration loaded from environment variables.
/// Every key is optional; a missing fact-check key disables that signal
/// rather than failing startup.
#[derive(Debug, Clone, Default)]
pub struct Config {
    // Fact checking
    pub fact_check_api_key: Option<String>,
    pub fact_check_base_url: Option<String>,

    // Classifier
    pub classifier_url: Option<String>,

    // Analysis
    pub analysis_timeout_secs: Option<u64>,
    pub dictionaries_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, VeracityError> {
        dotenvy::dotenv().ok();

        let analysis_timeout_secs = match non_empty_env("ANALYSIS_TIMEOUT_SECS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                VeracityError::Config(format!(
                    "ANALYSIS_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?),
            None => None,
        };

        let config = Self {
            fact_check_api_key: non_empty_env("FACT_CHECK_API_KEY"),
            fact_check_base_url: non_empty_env("FACT_CHECK_BASE_URL"),
            classifier_url: non_empty_env("CLASSIFIER_URL"),
            analysis_timeout_secs,
            dictionaries_path: non_empty_env("VERACITY_DICTIONARIES").map(PathBuf::from),
        };

        Ok(config)
    }

    /// Whole-request deadline for one analysis.
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn fact_check_configured(&self) -> bool {
        self.fact_check_api_key.is_some()
    }

    /// Log config at startup with secrets reduced to a short preview.
    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().take(4).map(char::len_utf8).sum();
            format!("{}...({} chars)", &val[..n], val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  FACT_CHECK_API_KEY: {}", preview_opt(&self.fact_check_api_key));
        tracing::info!(
            "  FACT_CHECK_BASE_URL: {}",
            self.fact_check_base_url.as_deref().unwrap_or("<default>")
        );
        tracing::info!(
            "  CLASSIFIER_URL: {}",
            self.classifier_url.as_deref().unwrap_or("<heuristic>")
        );
        tracing::info!("  ANALYSIS_TIMEOUT: {:?}", self.analysis_timeout());
        tracing::info!(
            "  VERACITY_DICTIONARIES: {}",
            self.dictionaries_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<embedded>".to_string())
        );
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_ten_seconds() {
        let config = Config::default();
        assert_eq!(config.analysis_timeout(), Duration::from_secs(10));
        assert!(!config.fact_check_configured());
    }

    #[test]
    fn explicit_timeout_wins() {
        let config = Config {
            analysis_timeout_secs: Some(3),
            ..Default::default()
        };
        assert_eq!(config.analysis_timeout(), Duration::from_secs(3));
    }
}
