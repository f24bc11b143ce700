//! HTTP client for Kickstarter project description pages.

use std::time::Duration;

use url::Url;

use crate::{extract::html_to_project, types::ProjectData, user_agent::get_user_agent, Error};

/// Default timeout for a page request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for project pages.
///
/// Sends requests with browser-like headers and a randomized user agent.
/// The underlying `reqwest::Client` is built once and reused for every poll.
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with the default 30-second request timeout.
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Downloads the page at `url` and decodes the project data it embeds.
    pub async fn get_project(&self, url: &Url) -> Result<ProjectData, Error> {
        let html = self.get_page(url).await?;
        html_to_project(&html).map_err(|e| {
            tracing::error!(url = %url, error = %e, "failed to extract project data");
            e
        })
    }

    /// Downloads the raw HTML of `url`. Any non-2xx status is an error.
    pub async fn get_page(&self, url: &Url) -> Result<String, Error> {
        let resp = self
            .http
            .get(url.clone())
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "failed to get project page");
                Error::Request(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(url = %url, status = %status, "project page request failed");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        Ok(resp.text().await?)
    }
}
