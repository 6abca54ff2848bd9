use serde::{Deserialize, Serialize};

/// Query parameters for `claims:search`.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimSearchQuery {
    pub query: String,
    #[serde(rename = "languageCode")]
    pub language_code: String,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl ClaimSearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language_code: crate::DEFAULT_LANGUAGE_CODE.to_string(),
            page_size: crate::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }
}

/// Response body of `claims:search`. An empty object means no matching claims.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimSearchResponse {
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

impl ClaimSearchResponse {
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// A claim as indexed by the fact-check search service.
#[derive(Debug, Clone, Deserialize)]
pub struct Claim {
    pub text: Option<String>,
    pub claimant: Option<String>,
    /// As sent by the publisher; may be a full timestamp or a bare date.
    #[serde(rename = "claimDate")]
    pub claim_date: Option<String>,
    #[serde(rename = "claimReview", default)]
    pub claim_review: Vec<ClaimReview>,
}

/// One publisher's review of a claim.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimReview {
    pub publisher: Option<Publisher>,
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "reviewDate")]
    pub review_date: Option<String>,
    #[serde(rename = "textualRating")]
    pub textual_rating: Option<String>,
    #[serde(rename = "languageCode")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Publisher {
    pub name: Option<String>,
    pub site: Option<String>,
}
