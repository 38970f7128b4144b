use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

/// IBGE historical series archive for the IPCA
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://ftp.ibge.gov.br/Precos_Indices_de_Precos_ao_Consumidor/IPCA/Serie_Historica/ipca_SerieHist.zip";

const MAX_RETRIES: usize = 3;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("File not found (404): {0}")]
    NotFound(String),

    #[error("Server error (5xx): {0}")]
    ServerError(String),
}

impl DownloadError {
    /// Transport failures and 5xx responses are worth another attempt
    fn is_transient(&self) -> bool {
        match self {
            DownloadError::HttpError(e) => !e.is_status(),
            DownloadError::ServerError(_) => true,
            DownloadError::NotFound(_) => false,
        }
    }
}

/// Downloader for the IBGE IPCA series archive
pub struct IbgeDownloader {
    client: Client,
    url: String,
    min_retry_delay: Duration,
}

impl IbgeDownloader {
    /// Create a downloader for the default IBGE archive URL
    pub fn new() -> Self {
        Self::with_url(DEFAULT_ARCHIVE_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_timeout(url, Duration::from_secs(60))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url: url.into(),
            min_retry_delay: Duration::from_secs(2),
        }
    }

    /// Shorten the first backoff delay (tests use this to avoid sleeping)
    pub fn with_min_retry_delay(mut self, delay: Duration) -> Self {
        self.min_retry_delay = delay;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the series ZIP, retrying transient failures
    pub async fn download_archive(&self) -> Result<Vec<u8>, DownloadError> {
        info!("Downloading IPCA archive: {}", self.url);

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_retry_delay)
            .with_max_times(MAX_RETRIES)
            .with_jitter();

        (|| self.download_once())
            .retry(backoff)
            .when(DownloadError::is_transient)
            .notify(|err: &DownloadError, delay: Duration| {
                warn!("Download failed ({}), retrying in {:?}", err, delay);
            })
            .await
    }

    async fn download_once(&self) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            debug!("Downloaded {} ({} bytes)", self.url, bytes.len());
            Ok(bytes.to_vec())
        } else if status.as_u16() == 404 {
            Err(DownloadError::NotFound(format!(
                "{} not found on server",
                self.url
            )))
        } else if status.is_server_error() {
            Err(DownloadError::ServerError(format!(
                "Server error {status} while downloading {}",
                self.url
            )))
        } else {
            // error_for_status() always errors for non-2xx statuses
            match response.error_for_status() {
                Err(e) => Err(DownloadError::HttpError(e)),
                Ok(_) => Err(DownloadError::ServerError(format!(
                    "Unexpected status {status} while downloading {}",
                    self.url
                ))),
            }
        }
    }
}

impl Default for IbgeDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let downloader = IbgeDownloader::new();
        assert_eq!(downloader.url(), DEFAULT_ARCHIVE_URL);
    }

    #[test]
    fn test_not_found_is_not_transient() {
        assert!(!DownloadError::NotFound("x".to_string()).is_transient());
        assert!(DownloadError::ServerError("x".to_string()).is_transient());
    }
}
