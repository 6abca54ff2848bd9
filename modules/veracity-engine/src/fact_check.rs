//! External fact-check lookup and verdict normalization.
//!
//! The lookup never fails from the caller's point of view: missing
//! credentials, transport errors and malformed payloads all come back as a
//! `FactCheckVerdict` variant.

use async_trait::async_trait;
use tracing::{debug, warn};

use factcheck_client::{ClaimSearchQuery, ClaimSearchResponse, FactCheckClient, FactCheckError};
use veracity_common::{Config, FactCheckVerdict, VeracityError};

const UNRATED: &str = "Unrated";
const UNKNOWN_PUBLISHER: &str = "unknown publisher";

#[async_trait]
pub trait FactChecker: Send + Sync {
    /// Look up published fact-checks for the literal claim text.
    async fn verify_claim(&self, text: &str) -> FactCheckVerdict;
}

/// Fact checker backed by the Google Fact Check Tools claim search.
/// Built without a client when no API key is configured.
pub struct GoogleFactChecker {
    client: Option<FactCheckClient>,
}

impl GoogleFactChecker {
    pub fn new(client: FactCheckClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn from_config(config: &Config) -> Result<Self, VeracityError> {
        let Some(api_key) = config.fact_check_api_key.as_deref() else {
            return Ok(Self::unconfigured());
        };
        let mut client = FactCheckClient::new(api_key)
            .map_err(|e| VeracityError::Config(format!("fact-check client: {e}")))?;
        if let Some(base_url) = config.fact_check_base_url.as_deref() {
            client = client.with_base_url(base_url);
        }
        Ok(Self::new(client))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl FactChecker for GoogleFactChecker {
    async fn verify_claim(&self, text: &str) -> FactCheckVerdict {
        let Some(client) = &self.client else {
            debug!("Fact-check API key not set, skipping lookup");
            return FactCheckVerdict::not_configured();
        };

        // Client defaults: en-US, five results.
        let query = ClaimSearchQuery::new(text);
        let verdict = verdict_from_response(client.search_claims(&query).await);
        if let FactCheckVerdict::Error { message } = &verdict {
            warn!(error = %message, "Fact-check lookup failed");
        }
        verdict
    }
}

/// Collapse a claim-search outcome into a verdict. Only the first claim's
/// first review is consulted.
pub fn verdict_from_response(
    response: Result<ClaimSearchResponse, FactCheckError>,
) -> FactCheckVerdict {
    let response = match response {
        Ok(r) => r,
        Err(e) => {
            return FactCheckVerdict::Error {
                message: e.to_string(),
            }
        }
    };

    let Some(claim) = response.claims.first() else {
        return FactCheckVerdict::NoResult;
    };

    let Some(review) = claim.claim_review.first() else {
        return FactCheckVerdict::Error {
            message: "malformed response: first claim has no review".to_string(),
        };
    };

    let rating = non_blank(review.textual_rating.as_deref())
        .unwrap_or(UNRATED)
        .to_string();

    let publisher = review
        .publisher
        .as_ref()
        .and_then(|p| non_blank(p.name.as_deref()).or_else(|| non_blank(p.site.as_deref())))
        .unwrap_or(UNKNOWN_PUBLISHER)
        .to_string();

    FactCheckVerdict::Verified { rating, publisher }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Coarse reading of a free-text rating such as "Pants on Fire" or
/// "Half True".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingClass {
    False,
    Misleading,
    True,
    Other,
}

impl RatingClass {
    /// Case-insensitive keyword match, first hit wins: false/untrue, then
    /// misleading/mixture, then true/accurate. "Mostly false" is `False`
    /// and "Half true" is `True`.
    pub fn classify(rating: &str) -> Self {
        let r = rating.to_lowercase();
        if r.contains("false") || r.contains("untrue") {
            RatingClass::False
        } else if r.contains("misleading") || r.contains("mixture") {
            RatingClass::Misleading
        } else if r.contains("true") || r.contains("accurate") {
            RatingClass::True
        } else {
            RatingClass::Other
        }
    }

    /// The content was rated as wrong or distorting.
    pub fn is_negative(self) -> bool {
        matches!(self, RatingClass::False | RatingClass::Misleading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factcheck_client::{Claim, ClaimReview, Publisher};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral local port and return
    /// the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn checker_for(base_url: &str) -> GoogleFactChecker {
        GoogleFactChecker::new(
            FactCheckClient::new("test-key")
                .unwrap()
                .with_base_url(base_url),
        )
    }

    fn review(rating: Option<&str>, name: Option<&str>, site: Option<&str>) -> ClaimReview {
        ClaimReview {
            publisher: Some(Publisher {
                name: name.map(String::from),
                site: site.map(String::from),
            }),
            url: None,
            title: None,
            review_date: None,
            textual_rating: rating.map(String::from),
            language_code: None,
        }
    }

    fn claim(reviews: Vec<ClaimReview>) -> Claim {
        Claim {
            text: Some("claim".into()),
            claimant: None,
            claim_date: None,
            claim_review: reviews,
        }
    }

    fn response(claims: Vec<Claim>) -> ClaimSearchResponse {
        ClaimSearchResponse {
            claims,
            next_page_token: None,
        }
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let checker = GoogleFactChecker::from_config(&Config::default()).unwrap();
        assert!(!checker.is_configured());
        assert_eq!(
            checker.verify_claim("anything").await,
            FactCheckVerdict::Unavailable {
                reason: "not configured".into()
            }
        );
    }

    #[test]
    fn empty_claims_is_no_result() {
        assert_eq!(
            verdict_from_response(Ok(response(vec![]))),
            FactCheckVerdict::NoResult
        );
    }

    #[test]
    fn transport_error_becomes_error_verdict() {
        let verdict = verdict_from_response(Err(FactCheckError::Api {
            status: 403,
            message: "API key not valid".into(),
        }));
        match verdict {
            FactCheckVerdict::Error { message } => assert!(message.contains("403")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn only_first_claim_first_review_is_used() {
        let resp = response(vec![
            claim(vec![
                review(Some("False"), Some("PolitiFact"), None),
                review(Some("True"), Some("Snopes"), None),
            ]),
            claim(vec![review(Some("True"), Some("AFP"), None)]),
        ]);
        assert_eq!(
            verdict_from_response(Ok(resp)),
            FactCheckVerdict::Verified {
                rating: "False".into(),
                publisher: "PolitiFact".into()
            }
        );
    }

    #[test]
    fn missing_rating_and_name_fall_back() {
        let resp = response(vec![claim(vec![review(None, None, Some("factcheck.org"))])]);
        assert_eq!(
            verdict_from_response(Ok(resp)),
            FactCheckVerdict::Verified {
                rating: "Unrated".into(),
                publisher: "factcheck.org".into()
            }
        );

        let bare = response(vec![claim(vec![review(Some("  "), None, None)])]);
        assert_eq!(
            verdict_from_response(Ok(bare)),
            FactCheckVerdict::Verified {
                rating: "Unrated".into(),
                publisher: "unknown publisher".into()
            }
        );
    }

    #[test]
    fn blank_publisher_name_falls_back_to_site() {
        let resp = response(vec![claim(vec![review(
            Some("False"),
            Some("   "),
            Some("snopes.com"),
        )])]);
        assert_eq!(
            verdict_from_response(Ok(resp)),
            FactCheckVerdict::Verified {
                rating: "False".into(),
                publisher: "snopes.com".into()
            }
        );
    }

    #[tokio::test]
    async fn unparseable_body_becomes_error_verdict() {
        let base = serve_once("200 OK", "{bad}").await;
        match checker_for(&base).verify_claim("the moon is cheese").await {
            FactCheckVerdict::Error { message } => {
                assert!(message.starts_with("Parse error"), "got {message}")
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_status_becomes_error_verdict() {
        let base = serve_once(
            "500 Internal Server Error",
            r#"{"error": {"message": "backend unavailable"}}"#,
        )
        .await;
        match checker_for(&base).verify_claim("the moon is cheese").await {
            FactCheckVerdict::Error { message } => {
                assert!(message.contains("500"), "got {message}");
                assert!(message.contains("backend unavailable"));
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn served_review_becomes_verified_verdict() {
        let base = serve_once(
            "200 OK",
            r#"{"claims": [{"text": "the moon is cheese", "claimDate": "2021-07-20",
                "claimReview": [{"publisher": {"name": "", "site": "afp.com"},
                "textualRating": "False"}]}]}"#,
        )
        .await;
        assert_eq!(
            checker_for(&base).verify_claim("the moon is cheese").await,
            FactCheckVerdict::Verified {
                rating: "False".into(),
                publisher: "afp.com".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_object_is_no_result_over_http() {
        let base = serve_once("200 OK", "{}").await;
        assert_eq!(
            checker_for(&base).verify_claim("obscure claim").await,
            FactCheckVerdict::NoResult
        );
    }

    #[test]
    fn claim_without_review_is_malformed() {
        let verdict = verdict_from_response(Ok(response(vec![claim(vec![])])));
        assert!(matches!(verdict, FactCheckVerdict::Error { .. }));
    }

    #[test]
    fn ratings_classify_by_keyword_precedence() {
        assert_eq!(RatingClass::classify("False"), RatingClass::False);
        assert_eq!(RatingClass::classify("Mostly Untrue"), RatingClass::False);
        assert_eq!(RatingClass::classify("Misleading"), RatingClass::Misleading);
        assert_eq!(RatingClass::classify("Mixture"), RatingClass::Misleading);
        assert_eq!(RatingClass::classify("Half True"), RatingClass::True);
        assert_eq!(RatingClass::classify("Accurate"), RatingClass::True);
        assert_eq!(RatingClass::classify("Pants on Fire"), RatingClass::Other);
        assert!(RatingClass::False.is_negative());
        assert!(!RatingClass::True.is_negative());
    }
}
