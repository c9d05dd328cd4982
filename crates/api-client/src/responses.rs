use crate::error::ApiError;
use serde::Deserialize;

/// A price or timestamp field that providers send either as a JSON string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn to_f64(&self, field: &str) -> Result<f64, ApiError> {
        let value = match self {
            NumberOrString::Number(n) => *n,
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ApiError::InvalidData(format!("{field} is not numeric: {s:?}")))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ApiError::InvalidData(format!("{field} is not finite")))
        }
    }

    pub fn to_millis(&self, field: &str) -> Result<i64, ApiError> {
        match self {
            NumberOrString::Number(n) if n.fract() == 0.0 => Ok(*n as i64),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ApiError::InvalidData(format!("{field} is not a timestamp: {s:?}"))),
            NumberOrString::Number(n) => {
                Err(ApiError::InvalidData(format!("{field} is not a timestamp: {n}")))
            }
        }
    }
}

/// Outer body of `GET /openApi/swap/v3/quote/klines`.
#[derive(Debug, Clone, Deserialize)]
pub struct BingxEnvelope {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A single BingX kline object. Volume is present upstream but ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct BingxKline {
    pub open: NumberOrString,
    pub close: NumberOrString,
    pub high: NumberOrString,
    pub low: NumberOrString,
    pub time: NumberOrString,
}

/// Outer body of `GET /api/v2/mix/market/candles`.
///
/// `data` rows are `[ts, open, high, low, close, baseVolume, quoteVolume]`.
#[derive(Debug, Clone, Deserialize)]
pub struct BitgetEnvelope {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: serde_json::Value,
}
