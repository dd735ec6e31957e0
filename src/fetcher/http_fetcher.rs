use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::Client;
use url::Url;

use crate::app::{FeedDigestError, Result};
use crate::config::FeedConfig;
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
    max_response_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_response_bytes: usize, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_response_bytes,
        })
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            config.max_response_bytes,
            &config.user_agent,
        )
    }

    fn validate_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url)?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(FeedDigestError::UnsupportedScheme(other.to_string())),
        }
    }

    fn too_large(&self) -> FeedDigestError {
        FeedDigestError::ResponseTooLarge {
            limit: self.max_response_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = Self::validate_url(url)?;
        tracing::debug!(%url, "Fetching feed");

        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedDigestError::HttpStatus(status));
        }

        // Declared length of the encoded body; decoding may still grow it.
        let declared = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        if declared.is_some_and(|len| len > self.max_response_bytes as u64) {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        tracing::info!(%url, bytes = body.len(), "Fetched feed");
        Ok(body)
    }
}
