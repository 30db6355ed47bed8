//! HTTP fetcher
//!
//! Builds the shared reqwest client and performs single-page fetches.
//! Transport details beyond the basics (manual redirect handling, retries,
//! TLS tuning) are deliberately left to reqwest's defaults.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after any redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Raw response body
    pub body: Vec<u8>,
}

/// Classified fetch failures
///
/// Every variant is non-fatal for the crawl as a whole; the orchestrator
/// decides whether a failure is terminal based on which fetch it was.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed")]
    Connect,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Builds the HTTP client shared by every fetch task of a crawl
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("carta/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single URL, returning the raw body on success
///
/// Any non-2xx status is reported as a `FetchError::Status`; network
/// failures are classified as timeout, connection, or generic transport
/// errors. Body-read failures count as transport errors too.
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client.get(url).send().await.map_err(classify)?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(classify)?;

    Ok(FetchedPage {
        final_url,
        status: status.as_u16(),
        body: body.to_vec(),
    })
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect
    } else {
        FetchError::Transport(error.without_url().to_string())
    }
}
