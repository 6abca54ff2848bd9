pub mod error;
pub mod types;

pub use error::{FactCheckError, Result};
pub use types::{Claim, ClaimReview, ClaimSearchQuery, ClaimSearchResponse, Publisher};

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://factchecktools.googleapis.com";

/// Language filter applied when the caller does not set one.
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// Result-page cap applied when the caller does not set one.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct FactCheckClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FactCheckClient {
    pub fn new(api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search published fact-checks matching `query`. One request, no paging.
    pub async fn search_claims(&self, query: &ClaimSearchQuery) -> Result<ClaimSearchResponse> {
        let url = format!("{}/v1alpha1/claims:search", self.base_url);
        tracing::debug!(
            query_chars = query.query.len(),
            language_code = %query.language_code,
            page_size = query.page_size,
            "Searching fact-check claims"
        );

        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FactCheckError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let parsed: ClaimSearchResponse = serde_json::from_str(&body)?;
        tracing::debug!(claims = parsed.claims.len(), "Fact-check search complete");
        Ok(parsed)
    }

    /// Convenience wrapper using the default language filter and page size.
    pub async fn search(&self, query: &str) -> Result<ClaimSearchResponse> {
        self.search_claims(&ClaimSearchQuery::new(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let client = FactCheckClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let client = FactCheckClient::new("key")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, FactCheckError::Network(_)), "got {err:?}");
    }
}
