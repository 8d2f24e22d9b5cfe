//! One-shot fetch of the audio asset.
//!
//! Known gap: nothing removes a partially written file when the transfer fails
//! halfway, and a later call sees the truncated file as already present.
use std::path::Path;

use futures_util::StreamExt;
use reqwest::{Client, Url};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::DownloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    AlreadyPresent,
    Downloaded { bytes: u64 },
}

/// Builds the HTTP client shared by every download.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialised.
pub fn build_client() -> Result<Client, DownloadError> {
    Client::builder()
        .user_agent(concat!("noise-machine/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| DownloadError::BuildClient { source: err })
}

/// Streams `url` into `target` unless `target` already exists.
///
/// # Errors
///
/// Returns an error when `target` cannot be checked, the request fails, the
/// server answers with a non-success status, or the file cannot be written.
pub async fn fetch_if_missing(
    client: &Client,
    target: &Path,
    url: &Url,
) -> Result<DownloadOutcome, DownloadError> {
    let present = tokio::fs::try_exists(target)
        .await
        .map_err(|err| DownloadError::CheckTarget {
            path: target.to_path_buf(),
            source: err,
        })?;
    if present {
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    info!("Downloading {} to {}", url, target.display());
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| DownloadError::Request {
            url: url.to_string(),
            source: err,
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status,
        });
    }

    let mut file = tokio::fs::File::create(target)
        .await
        .map_err(|err| DownloadError::CreateFile {
            path: target.to_path_buf(),
            source: err,
        })?;
    let mut bytes: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| DownloadError::ReadBody {
            url: url.to_string(),
            source: err,
        })?;
        file.write_all(&chunk)
            .await
            .map_err(|err| DownloadError::WriteFile {
                path: target.to_path_buf(),
                source: err,
            })?;
        bytes = bytes.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
    }
    file.flush().await.map_err(|err| DownloadError::WriteFile {
        path: target.to_path_buf(),
        source: err,
    })?;

    info!("Downloaded {} bytes to {}", bytes, target.display());
    Ok(DownloadOutcome::Downloaded { bytes })
}
