//! Sitemap fetching with identity rotation and bounded retries.
//!
//! One fetch is: GET the URL with a freshly picked User-Agent, check the
//! status, parse the body. HTTP-level failures are retried on a fixed
//! delay until the attempt budget runs out; parse failures are final.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

use super::identity::UserAgentSource;
use super::sitemap::{self, SitemapNode};

/// Why a sitemap URL produced no node.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP-level failure (connect, timeout, non-2xx) that survived the
    /// whole retry budget. Carries the last attempt's cause.
    #[error("fetching {url} failed after {attempts} attempt(s): {source}")]
    Http {
        url: String,
        attempts: u32,
        source: reqwest::Error,
    },
    /// The body came back but is not well-formed XML. Never retried;
    /// a second download cannot fix a malformed document.
    #[error("invalid sitemap XML from {url}: {source}")]
    Parse {
        url: String,
        source: quick_xml::Error,
    },
}

/// Fetch seam for the walker. Lets the traversal run against canned
/// trees in tests instead of a live server.
#[async_trait]
pub trait FetchSitemap: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<SitemapNode, FetchError>;
}

/// HTTP sitemap fetcher backed by a shared [`reqwest::Client`].
pub struct SitemapFetcher {
    client: reqwest::Client,
    identities: Arc<dyn UserAgentSource>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl SitemapFetcher {
    /// Build a fetcher with its own HTTP client.
    ///
    /// `max_attempts` counts the first try as well; it is clamped to at
    /// least 1. `request_timeout` applies per attempt.
    pub fn new(
        identities: Arc<dyn UserAgentSource>,
        max_attempts: u32,
        retry_delay: Duration,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            identities,
            max_attempts: max_attempts.max(1),
            retry_delay,
        })
    }

    /// One GET with a fresh identity. Non-2xx statuses become errors here
    /// so the retry loop treats them like connection failures.
    async fn attempt(&self, url: &str) -> Result<String, reqwest::Error> {
        let agent = self.identities.pick();
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, agent)
            .send()
            .await?
            .error_for_status()?;
        resp.text().await
    }
}

#[async_trait]
impl FetchSitemap for SitemapFetcher {
    async fn fetch(&self, url: &str) -> Result<SitemapNode, FetchError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt(url).await {
                Ok(body) => {
                    return sitemap::parse(url, &body).map_err(|source| FetchError::Parse {
                        url: url.to_string(),
                        source,
                    });
                }
                Err(source) => {
                    if attempts >= self.max_attempts {
                        return Err(FetchError::Http {
                            url: url.to_string(),
                            attempts,
                            source,
                        });
                    }
                    debug!("attempt {attempts} for {url} failed ({source}), retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::identity::UserAgentPool;
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const URLSET: &str =
        r#"<urlset><url><loc>https://example.com/a</loc></url><url><loc>https://example.com/b</loc></url></urlset>"#;

    fn fetcher_with(agent: &str, max_attempts: u32) -> SitemapFetcher {
        SitemapFetcher::new(
            Arc::new(UserAgentPool::new(vec![agent.to_string()])),
            max_attempts,
            Duration::from_millis(10),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_urlset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(URLSET))
            .mount(&server)
            .await;

        let fetcher = fetcher_with("test-agent/1.0", 3);
        let node = fetcher
            .fetch(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();
        assert_eq!(
            node.page_urls,
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_pinned_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .and(header("user-agent", "test-agent/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(URLSET))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher_with("test-agent/1.0", 1);
        fetcher
            .fetch(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_retries_then_succeeds() {
        let server = MockServer::start().await;
        // First two requests 503, then the real body.
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(URLSET))
            .mount(&server)
            .await;

        let fetcher = fetcher_with("test-agent/1.0", 3);
        let node = fetcher
            .fetch(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();
        assert_eq!(node.page_urls.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_exhausts_attempt_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = fetcher_with("test-agent/1.0", 3);
        let err = fetcher
            .fetch(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap_err();
        match err {
            FetchError::Http { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_does_not_retry_parse_errors() {
        let server = MockServer::start().await;
        // expect(1): a retry would trip the mock's verification on drop.
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<urlset><url><loc>x</wrong>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher_with("test-agent/1.0", 3);
        let err = fetcher
            .fetch(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }
}
