pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on the size of a feed response (10 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 10 << 20;

#[async_trait]
pub trait Fetcher {
    /// Retrieves the raw feed document at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
