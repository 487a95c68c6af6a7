// src/fetch/http.rs
// =============================================================================
// The real network fetcher, built on reqwest.
//
// Key functionality:
// - One shared Client (connection pooling) with our User-Agent and timeout
// - Redirects are followed by reqwest up to a limit
// - 4xx/5xx answers come back as HttpError, never as a Rust error
// - reqwest errors are boiled down to a short TransportFailure
// =============================================================================

use super::{FetchOutcome, Fetcher, TransportFailure};
use crate::config::CrawlConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{redirect, Client};
use tracing::debug;

/// Fetches pages with a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the client from the run configuration.
    ///
    /// Fails only if reqwest cannot set up its TLS backend.
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url, error = %e, "request failed");
                return FetchOutcome::TransportError(classify_error(&e));
            }
        };

        // reqwest already followed redirects, this is the final status
        let status = response.status().as_u16();
        if status >= 400 {
            return FetchOutcome::HttpError { status };
        }
        let final_url = response.url().to_string();

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                status,
                final_url,
                body,
            },
            Err(e) => {
                debug!(url, error = %e, "failed to read body");
                FetchOutcome::TransportError(classify_error(&e))
            }
        }
    }
}

// Boils a reqwest error down to the label we record.
//
// Order matters: a connect timeout reports both is_timeout() and
// is_connect(), and we want it to read as a timeout.
fn classify_error(error: &reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else if error.is_connect() {
        TransportFailure::Connect
    } else if error.is_redirect() {
        TransportFailure::Redirect
    } else {
        TransportFailure::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> CrawlConfig {
        CrawlConfig {
            request_timeout: Duration::from_secs(5),
            ..CrawlConfig::default()
        }
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<a href=\"/next\">next</a>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let url = format!("{}/page", server.url());
        let outcome = fetcher.fetch(&url).await;

        mock.assert_async().await;
        assert_eq!(
            outcome,
            FetchOutcome::Success {
                status: 200,
                final_url: url,
                body: "<a href=\"/next\">next</a>".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _broken = server
            .mock("GET", "/broken")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let outcome = fetcher.fetch(&format!("{}/broken", server.url())).await;

        assert_eq!(outcome, FetchOutcome::HttpError { status: 500 });
    }

    #[tokio::test]
    async fn test_follows_redirect_to_final_status() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/new", server.url());
        // Mocks are removed when dropped, so keep them bound
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", &target)
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/new")
            .with_status(200)
            .with_body("moved here")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let outcome = fetcher.fetch(&format!("{}/old", server.url())).await;

        assert_eq!(
            outcome,
            FetchOutcome::Success {
                status: 200,
                final_url: target,
                body: "moved here".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", "test-agent/1.0")
            .with_status(200)
            .create_async()
            .await;

        let config = CrawlConfig {
            user_agent: "test-agent/1.0".to_string(),
            ..test_config()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        fetcher.fetch(&format!("{}/", server.url())).await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refused_connection_is_classified() {
        // Port 1 on loopback has nothing listening
        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let outcome = fetcher.fetch("http://127.0.0.1:1/").await;

        assert_eq!(
            outcome,
            FetchOutcome::TransportError(TransportFailure::Connect)
        );
    }
}
