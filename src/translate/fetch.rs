//! Remote dictionary client.
//! One GET per load, token in the `translations-token` header, body parsed
//! as a `Dictionary`. No retries: a failed load is reported by the caller.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::dictionary::Dictionary;
use crate::error::FetchError;

/// Header carrying the access token.
pub const TOKEN_HEADER: &str = "translations-token";

/// HTTP client for the translations endpoint.
pub struct RemoteFetcher {
    http: reqwest::Client,
}

impl RemoteFetcher {
    /// Build a client. `timeout` of `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(90));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::Client)?;
        Ok(Self { http })
    }

    pub async fn fetch_dictionary(&self, url: &str, token: &str) -> Result<Dictionary, FetchError> {
        let start = Instant::now();
        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Http)?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "translations endpoint rejected request");
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Http)?;
        let dictionary: Dictionary = serde_json::from_slice(&body)?;

        info!(
            url,
            locales = dictionary.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dictionary fetched"
        );
        Ok(dictionary)
    }
}
