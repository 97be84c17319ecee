use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Downloads documents over HTTP. One GET per call, no retries.
#[derive(Clone, Debug)]
pub struct Spider {
    http: Client,
}

impl Spider {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Every request is bounded by `timeout` on top of the transport defaults.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::new(http))
    }

    pub async fn fetch_str(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url)?;
        self.fetch(&url).await
    }

    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        debug!(url = %url, "download");

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus(status));
        }

        Ok(resp.text().await?)
    }
}
