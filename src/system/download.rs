use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::InstallerConfig;
use crate::constants::DOWNLOAD_CONNECT_TIMEOUT;
use crate::core::InstallerError;
use crate::system::Downloader;
use crate::utils::TransferProgress;

/// Streams release assets over HTTP(S) to disk.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpDownloader {
    /// Downloader identifying itself with the configured user agent.
    pub fn new(config: &InstallerConfig) -> Result<Self, InstallerError> {
        let client = reqwest::Client::builder()
            .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT)
            .user_agent(config.feed.user_agent.clone())
            .build()
            .map_err(|e| InstallerError::Network {
                operation: "initialize the HTTP client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            show_progress: true,
        })
    }

    /// Enable or disable the progress bar.
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, String> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| e.to_string())?;

        let file_name = destination
            .file_name()
            .map_or_else(|| "download".to_string(), |name| name.to_string_lossy().into_owned());
        let progress = if self.show_progress {
            TransferProgress::new(file_name, response.content_length())
        } else {
            TransferProgress::hidden()
        };

        let mut file = File::create(destination)
            .await
            .map_err(|e| format!("cannot create {}: {e}", destination.display()))?;

        while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
            file.write_all(&chunk)
                .await
                .map_err(|e| format!("cannot write {}: {e}", destination.display()))?;
            progress.inc(chunk.len() as u64);
        }
        file.flush().await.map_err(|e| e.to_string())?;
        progress.finish_and_clear();

        Ok(progress.position())
    }
}

impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<(), InstallerError> {
        debug!("Downloading {} to {}", url, destination.display());

        match self.fetch(url, destination).await {
            Ok(bytes) => {
                info!("Downloaded {} bytes to {}", bytes, destination.display());
                Ok(())
            }
            Err(reason) => Err(InstallerError::DownloadFailed {
                url: url.to_string(),
                reason,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unreachable_host_is_download_failed() {
        let temp = TempDir::new().unwrap();
        let downloader = HttpDownloader::new(&InstallerConfig::default()).unwrap().with_progress(false);

        let error = downloader
            .download("http://127.0.0.1:9/app.deb", &temp.path().join("app.deb"))
            .await
            .unwrap_err();
        assert!(
            matches!(error, InstallerError::DownloadFailed { ref url, .. } if url == "http://127.0.0.1:9/app.deb")
        );
    }
}
