use std::time::Duration;

use tracing::debug;

use crate::error::FetchError;

/// Build the HTTP client used for snapshot downloads.
pub fn snapshot_client(timeout_secs: u64) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(FetchError::Network)
}

/// Download the full snapshot database from `url`.
///
/// Any non-2xx status is a failure; a timed-out request is reported as
/// `FetchError::Timeout`, everything else transport-level as `Network`.
/// Idempotent; no side effects beyond the request itself.
pub async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let resp = client.get(url).send().await.map_err(classify)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let bytes = resp.bytes().await.map_err(classify)?;
    debug!("fetched snapshot: {} bytes from {url}", bytes.len());
    Ok(bytes.to_vec())
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = e.status() {
        FetchError::HttpStatus(status.as_u16())
    } else {
        FetchError::Network(e)
    }
}
