use reqwest::StatusCode;
use tracing::{debug, info};

use crate::config::InstallerConfig;
use crate::core::InstallerError;
use crate::release::{ReleaseFeed, ReleaseInfo};

const FETCH_OPERATION: &str = "fetch the latest release";

/// HTTP client for the `releases/latest` endpoint.
///
/// Carries a fixed request timeout; a timeout is reported like any other
/// network failure. Requests are never retried.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    client: reqwest::Client,
    url: String,
}

impl ReleaseClient {
    /// Build a client for the feed described in `config`.
    pub fn new(config: &InstallerConfig) -> Result<Self, InstallerError> {
        let client = reqwest::Client::builder()
            .timeout(config.feed_timeout())
            .user_agent(config.feed.user_agent.clone())
            .build()
            .map_err(|e| InstallerError::Network {
                operation: "initialize the HTTP client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: config.release_url(),
        })
    }

    /// Query `url` instead of the configured feed.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Endpoint this client queries.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn network_error(reason: impl Into<String>) -> InstallerError {
        InstallerError::Network {
            operation: FETCH_OPERATION.to_string(),
            reason: reason.into(),
        }
    }
}

impl ReleaseFeed for ReleaseClient {
    async fn latest(&self) -> Result<ReleaseInfo, InstallerError> {
        debug!("Fetching latest release from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Self::network_error("the release feed did not answer in time")
                } else {
                    Self::network_error(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Self::network_error(format!("release feed returned HTTP {status}")));
        }

        let release: ReleaseInfo = response
            .json()
            .await
            .map_err(|e| Self::network_error(format!("malformed release document: {e}")))?;

        if release.version().is_empty() {
            return Err(Self::network_error("release document has an empty tag"));
        }

        info!("Latest release is {} ({} assets)", release.tag, release.assets.len());
        Ok(release)
    }
}
