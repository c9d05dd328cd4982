use crate::error::ApiError;
use crate::responses::{BitgetEnvelope, NumberOrString};
use crate::{QuoteClient, build_http_client, get_body};
use async_trait::async_trait;
use configuration::QuotesConfig;
use core_types::{Candle, QuoteProvider};

const SUCCESS_CODE: &str = "00000";
const PRODUCT_TYPE: &str = "USDT-FUTURES";

/// USDT-margined futures candles from Bitget.
#[derive(Clone)]
pub struct BitgetClient {
    client: reqwest::Client,
    url: String,
    limit: u32,
}

impl BitgetClient {
    pub fn new(config: &QuotesConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_http_client(config.request_timeout_secs)?,
            url: config.bitget_url.clone(),
            limit: config.candle_limit,
        })
    }
}

#[async_trait]
impl QuoteClient for BitgetClient {
    fn provider(&self) -> QuoteProvider {
        QuoteProvider::Bitget
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
            ("productType", PRODUCT_TYPE.to_string()),
            ("granularity", interval.to_string()),
            ("limit", self.limit.to_string()),
            ("startTime", start_ms.to_string()),
            ("endTime", end_ms.to_string()),
        ]);
        let body = get_body(request).await?;
        parse_candles(&body)
    }
}

/// Normalizes a Bitget candle body of `[ts, open, high, low, close, ...]` rows.
pub(crate) fn parse_candles(body: &str) -> Result<Vec<Candle>, ApiError> {
    let envelope: BitgetEnvelope =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if envelope.code != SUCCESS_CODE {
        return Err(ApiError::ApiError(format!("code {}: {}", envelope.code, envelope.msg)));
    }

    let rows: Vec<Vec<NumberOrString>> = serde_json::from_value(envelope.data)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    rows.iter()
        .map(|row| {
            if row.len() < 5 {
                return Err(ApiError::InvalidData(format!(
                    "expected at least 5 columns, got {}",
                    row.len()
                )));
            }
            Ok(Candle {
                timestamp: row[0].to_millis("timestamp")?,
                open: row[1].to_f64("open")?,
                high: row[2].to_f64("high")?,
                low: row[3].to_f64("low")?,
                close: row[4].to_f64("close")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_columns_in_bitget_order() {
        let body = r#"{
            "code": "00000",
            "msg": "success",
            "requestTime": 1700000000123,
            "data": [
                ["1700000000000", "100", "104", "98", "103", "1.5", "150"],
                ["1700000300000", "103", "105", "101", "102", "2", "204"]
            ]
        }"#;
        let candles = parse_candles(body).unwrap();
        assert_eq!(
            candles[0],
            Candle { timestamp: 1_700_000_000_000, open: 100.0, high: 104.0, low: 98.0, close: 103.0 }
        );
        assert_eq!(candles[1].close, 102.0);
    }

    #[test]
    fn short_rows_are_rejected() {
        let body = r#"{"code":"00000","data":[["1700000000000","100","104"]]}"#;
        assert!(matches!(parse_candles(body), Err(ApiError::InvalidData(_))));
    }

    #[test]
    fn error_code_is_surfaced() {
        let body = r#"{"code":"40034","msg":"Parameter does not exist","data":null}"#;
        assert!(matches!(parse_candles(body), Err(ApiError::ApiError(_))));
    }
}
