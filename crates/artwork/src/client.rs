//! HTTP client for artwork downloads.
//!
//! Thin wrapper over `reqwest` that applies a request timeout and a
//! browser-like User-Agent, which the CDN expects.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

/// Default User-Agent sent with artwork requests.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the artwork client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download failed with status {status}")]
    Status { status: u16 },

    #[error("invalid user agent: {0:?}")]
    InvalidUserAgent(String),
}

/// Artwork download client.
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with the given User-Agent and request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|_| Error::InvalidUserAgent(user_agent.to_string()))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http })
    }

    /// Downloads the body at `url`.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, Error> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
