use crate::error::ApiError;
use crate::responses::{BingxEnvelope, BingxKline};
use crate::{QuoteClient, build_http_client, get_body};
use async_trait::async_trait;
use configuration::QuotesConfig;
use core_types::{Candle, QuoteProvider};

/// Perpetual-swap klines from BingX.
#[derive(Clone)]
pub struct BingxClient {
    client: reqwest::Client,
    url: String,
    limit: u32,
}

impl BingxClient {
    pub fn new(config: &QuotesConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_http_client(config.request_timeout_secs)?,
            url: config.bingx_url.clone(),
            limit: config.candle_limit,
        })
    }
}

#[async_trait]
impl QuoteClient for BingxClient {
    fn provider(&self) -> QuoteProvider {
        QuoteProvider::BingX
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Candle>, ApiError> {
        let request = self.client.get(&self.url).query(&[
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", self.limit.to_string()),
            ("startTime", start_ms.to_string()),
            ("endTime", end_ms.to_string()),
        ]);
        let body = get_body(request).await?;
        parse_klines(&body)
    }
}

/// Normalizes a BingX kline body. Rows arrive newest first.
pub(crate) fn parse_klines(body: &str) -> Result<Vec<Candle>, ApiError> {
    let envelope: BingxEnvelope =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if envelope.code != 0 {
        return Err(ApiError::ApiError(format!("code {}: {}", envelope.code, envelope.msg)));
    }

    let rows: Vec<BingxKline> = serde_json::from_value(envelope.data)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    rows.iter()
        .map(|row| {
            Ok(Candle {
                timestamp: row.time.to_millis("time")?,
                open: row.open.to_f64("open")?,
                high: row.high.to_f64("high")?,
                low: row.low.to_f64("low")?,
                close: row.close.to_f64("close")?,
            })
        })
        .collect()
}
