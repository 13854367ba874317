//! HTTP fetching for the capture pipeline
//!
//! Wraps a pair of reqwest clients (redirect-following and not) behind the
//! configured user agent and timeouts. The primary page fetch surfaces
//! errors; iframe fetches are absorbed into a [`FrameOutcome`].

use crate::config::CaptureConfig;
use crate::error::{Error, Result};
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// A successfully fetched primary page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Response body text
    pub body: String,

    /// URL the response actually came from, after any redirects
    pub final_url: Url,
}

/// Result of a single iframe fetch: the payload, or the reason it failed.
/// Never both.
#[derive(Debug, Clone)]
pub enum FrameOutcome {
    /// Body text of the embedded document
    Loaded(String),
    /// Human-readable failure reason (network, status, or timeout)
    Failed(String),
}

/// HTTP fetcher for a capture run
pub struct PageFetcher {
    redirecting: Client,
    direct: Client,
    config: CaptureConfig,
}

impl PageFetcher {
    /// Create a fetcher from a capture configuration
    pub fn new(config: CaptureConfig) -> Result<Self> {
        let redirecting = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        let direct = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            redirecting,
            direct,
            config,
        })
    }

    /// The configuration this fetcher was built with
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Fetch the primary page, raising on transport errors and non-success
    /// statuses. With `follow_redirects` disabled a redirect response counts
    /// as a non-success status.
    pub async fn fetch_page(&self, url: &str, follow_redirects: bool) -> Result<FetchedPage> {
        let client = if follow_redirects {
            &self.redirecting
        } else {
            &self.direct
        };

        // Parse up front so a malformed URL reports as a URL error rather
        // than an opaque client error.
        let url = Url::parse(url)?;

        debug!(%url, follow_redirects, "fetching primary page");
        let response = client
            .get(url)
            .timeout(self.config.page_timeout)
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(FetchedPage { body, final_url })
    }

    /// Fetch one iframe payload. All failures (network, status, timeout) are
    /// folded into [`FrameOutcome::Failed`]; nothing propagates.
    pub async fn fetch_frame(&self, url: &str) -> FrameOutcome {
        match self.try_fetch_frame(url).await {
            Ok(body) => FrameOutcome::Loaded(body),
            Err(err) => {
                debug!(url, error = %err, "iframe fetch failed");
                FrameOutcome::Failed(err.to_string())
            }
        }
    }

    async fn try_fetch_frame(&self, url: &str) -> Result<String> {
        let response = self
            .redirecting
            .get(url)
            .timeout(self.config.frame_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(CaptureConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn fetch_page_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("<html><body>hi</body></html>")
            .expect(1)
            .create_async()
            .await;

        let page = fetcher()
            .fetch_page(&format!("{}/page", server.url()), true)
            .await
            .unwrap();
        assert!(page.body.contains("hi"));
        assert!(page.final_url.as_str().ends_with("/page"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_page_non_success_is_fatal() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let result = fetcher()
            .fetch_page(&format!("{}/missing", server.url()), true)
            .await;
        assert!(matches!(result, Err(Error::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn fetch_page_follows_redirects_only_when_asked() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/moved")
            .with_status(302)
            .with_header("location", &format!("{}/target", server.url()))
            .expect_at_least(1)
            .create_async()
            .await;
        server
            .mock("GET", "/target")
            .with_status(200)
            .with_body("landed")
            .create_async()
            .await;

        let url = format!("{}/moved", server.url());

        let followed = fetcher().fetch_page(&url, true).await.unwrap();
        assert_eq!(followed.body, "landed");
        assert!(followed.final_url.as_str().ends_with("/target"));

        let unfollowed = fetcher().fetch_page(&url, false).await;
        assert!(matches!(
            unfollowed,
            Err(Error::Status { status: 302, .. })
        ));
    }

    #[tokio::test]
    async fn fetch_page_rejects_malformed_url() {
        let result = fetcher().fetch_page("not a url", true).await;
        assert!(matches!(result, Err(Error::UrlParse(_))));
    }

    #[tokio::test]
    async fn fetch_frame_absorbs_failures() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/frame")
            .with_status(500)
            .create_async()
            .await;

        let outcome = fetcher()
            .fetch_frame(&format!("{}/frame", server.url()))
            .await;
        match outcome {
            FrameOutcome::Failed(reason) => assert!(reason.contains("500")),
            FrameOutcome::Loaded(_) => panic!("expected a failed outcome"),
        }
    }

    #[tokio::test]
    async fn fetch_frame_returns_payload() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/frame")
            .with_status(200)
            .with_body("<p>embedded</p>")
            .create_async()
            .await;

        let outcome = fetcher()
            .fetch_frame(&format!("{}/frame", server.url()))
            .await;
        match outcome {
            FrameOutcome::Loaded(body) => assert_eq!(body, "<p>embedded</p>"),
            FrameOutcome::Failed(reason) => panic!("unexpected failure: {reason}"),
        }
    }
}
