use async_trait::async_trait;
use core_types::{Candle, QuoteProvider};
use std::time::Duration;

pub mod bingx;
pub mod bitget;
pub mod error;
pub mod resolver;
pub mod responses;
pub mod symbols;

// --- Public API ---
pub use bingx::BingxClient;
pub use bitget::BitgetClient;
pub use error::ApiError;
pub use resolver::{QuoteSources, resolve_candles};
pub use symbols::{provider_interval, provider_symbol};

/// The generic, abstract interface for a historical candle source.
/// The resolver only talks to this trait, allowing the underlying
/// implementation (live or mock) to be swapped out.
#[async_trait]
pub trait QuoteClient: Send + Sync {
    /// Which upstream this client talks to. Determines symbol and interval spelling.
    fn provider(&self) -> QuoteProvider;

    /// Fetches candles for an already provider-spelled `symbol` and `interval`
    /// between `start_ms` and `end_ms` (inclusive, epoch milliseconds).
    ///
    /// Implementations return candles in whatever order the upstream sends them.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Candle>, ApiError>;
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Sends a prepared GET request and returns the body of a successful response.
pub(crate) async fn get_body(request: reqwest::RequestBuilder) -> Result<String, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        Ok(text)
    } else {
        Err(ApiError::ApiError(format!("HTTP {status}: {text}")))
    }
}
