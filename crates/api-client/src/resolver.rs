use crate::error::ApiError;
use crate::symbols::{provider_interval, provider_symbol};
use crate::{BingxClient, BitgetClient, QuoteClient};
use configuration::QuotesConfig;
use core_types::{Candle, Interval, QuoteProvider};
use std::collections::HashMap;
use std::sync::Arc;

/// The set of quote clients available to the resolver, one per provider.
#[derive(Clone, Default)]
pub struct QuoteSources {
    clients: HashMap<QuoteProvider, Arc<dyn QuoteClient>>,
}

impl QuoteSources {
    /// Builds the live BingX and Bitget clients.
    pub fn from_config(config: &QuotesConfig) -> Result<Self, ApiError> {
        Ok(Self::default()
            .with_client(Arc::new(BingxClient::new(config)?))
            .with_client(Arc::new(BitgetClient::new(config)?)))
    }

    /// Registers `client` for its provider, replacing any earlier one.
    pub fn with_client(mut self, client: Arc<dyn QuoteClient>) -> Self {
        self.clients.insert(client.provider(), client);
        self
    }

    pub fn get(&self, provider: QuoteProvider) -> Result<&dyn QuoteClient, ApiError> {
        self.clients
            .get(&provider)
            .map(|client| client.as_ref())
            .ok_or(ApiError::UnsupportedProvider(provider))
    }
}

/// Resolves the candle series covering `[from_ms, to_ms]` for a position-index `pair`.
///
/// The pair and interval are rewritten into the client's spelling first. The result is
/// ordered oldest first. Any upstream failure, as well as an empty series, is reported as
/// [`ApiError::DataUnavailable`].
pub async fn resolve_candles(
    client: &dyn QuoteClient,
    pair: &str,
    interval: Interval,
    from_ms: i64,
    to_ms: i64,
) -> Result<Vec<Candle>, ApiError> {
    let provider = client.provider();
    let symbol = provider_symbol(provider, pair);
    let label = provider_interval(provider, interval);

    let unavailable = |reason: String| ApiError::DataUnavailable {
        symbol: symbol.clone(),
        interval: label.to_string(),
        reason,
    };

    let mut candles = client
        .fetch_candles(&symbol, label, from_ms, to_ms)
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    if candles.is_empty() {
        return Err(unavailable("provider returned no candles".to_string()));
    }

    candles.sort_by_key(|c| c.timestamp);
    tracing::debug!(%provider, %symbol, interval = label, count = candles.len(), "Resolved candle series.");

    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorded {
        provider: QuoteProvider,
        response: Vec<Candle>,
        fail: bool,
        calls: Mutex<Vec<(String, String, i64, i64)>>,
    }

    impl Recorded {
        fn new(provider: QuoteProvider, response: Vec<Candle>) -> Self {
            Self { provider, response, fail: false, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl QuoteClient for Recorded {
        fn provider(&self) -> QuoteProvider {
            self.provider
        }

        async fn fetch_candles(
            &self,
            symbol: &str,
            interval: &str,
            start_ms: i64,
            end_ms: i64,
        ) -> Result<Vec<Candle>, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((symbol.to_string(), interval.to_string(), start_ms, end_ms));
            if self.fail {
                Err(ApiError::ApiError("HTTP 500".to_string()))
            } else {
                Ok(self.response.clone())
            }
        }
    }

    fn candle(timestamp: i64, price: f64) -> Candle {
        Candle { timestamp, open: price, high: price, low: price, close: price }
    }

    #[tokio::test]
    async fn rewrites_symbol_and_interval_then_sorts_oldest_first() {
        let client = Recorded::new(
            QuoteProvider::Bitget,
            vec![candle(3_000, 3.0), candle(1_000, 1.0), candle(2_000, 2.0)],
        );

        let candles = resolve_candles(&client, "PEPE-USDT", Interval::OneHour, 1_000, 3_000)
            .await
            .unwrap();

        let timestamps: Vec<i64> = candles.iter().map(|c| c.timestamp).collect();
        assert_eq!(timestamps, vec![1_000, 2_000, 3_000]);
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0], ("PEPEUSDT".to_string(), "1H".to_string(), 1_000, 3_000));
    }

    #[tokio::test]
    async fn upstream_errors_become_data_unavailable() {
        let mut client = Recorded::new(QuoteProvider::BingX, vec![]);
        client.fail = true;

        let err = resolve_candles(&client, "BTC-USDT", Interval::OneMinute, 0, 60_000)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DataUnavailable { ref symbol, .. } if symbol == "BTC-USDT"));
    }

    #[tokio::test]
    async fn empty_series_is_not_fabricated() {
        let client = Recorded::new(QuoteProvider::BingX, vec![]);
        let err = resolve_candles(&client, "BTC-USDT", Interval::OneMinute, 0, 60_000)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DataUnavailable { .. }));
    }

    #[test]
    fn sources_report_missing_providers() {
        let sources = QuoteSources::default()
            .with_client(Arc::new(Recorded::new(QuoteProvider::BingX, vec![])));
        assert!(sources.get(QuoteProvider::BingX).is_ok());
        assert!(matches!(
            sources.get(QuoteProvider::Bitget),
            Err(ApiError::UnsupportedProvider(QuoteProvider::Bitget))
        ));
    }
}
