use crate::enums::Interval;
use crate::error::CoreError;
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One OHLC sample of a resolved price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A completed trade as reported by the position index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub account: String,
    pub pair: String,
    /// Open time, milliseconds since the Unix epoch.
    pub open_time: i64,
    /// Close time, milliseconds since the Unix epoch.
    pub close_time: i64,
    pub leverage: f64,
    pub is_long: bool,
    /// Exchange-reported outcome. Never re-derived from the replayed trajectory.
    pub is_win: bool,
    pub realised_pnl: Decimal,
    pub realised_roi: f64,
    pub collateral: Option<f64>,
    pub size: Option<f64>,
}

impl ClosedPosition {
    pub fn duration_ms(&self) -> i64 {
        self.close_time - self.open_time
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration_ms() / 1000
    }

    /// The candle granularity used to replay this position.
    pub fn interval(&self) -> Interval {
        Interval::for_duration(self.duration_seconds())
    }
}

/// Converts an ISO-8601 block time into epoch milliseconds.
///
/// Timestamps without an offset are read as UTC.
pub fn parse_block_time(value: &str) -> Result<i64, CoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().timestamp_millis())
        .map_err(|_| CoreError::InvalidTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(open_time: i64, close_time: i64) -> ClosedPosition {
        ClosedPosition {
            account: "0xabc".to_string(),
            pair: "BTC-USDT".to_string(),
            open_time,
            close_time,
            leverage: 5.0,
            is_long: true,
            is_win: true,
            realised_pnl: dec!(12.5),
            realised_roi: 25.0,
            collateral: None,
            size: None,
        }
    }

    #[test]
    fn duration_and_interval_derive_from_timestamps() {
        let p = position(1_700_000_000_000, 1_700_000_000_000 + 7_200_000);
        assert_eq!(p.duration_seconds(), 7_200);
        assert_eq!(p.interval(), Interval::OneMinute);

        let long = position(0, 10 * 86_400_000);
        assert_eq!(long.interval(), Interval::ThirtyMinutes);
    }

    #[test]
    fn parses_block_times_with_and_without_offset() {
        assert_eq!(parse_block_time("2024-05-01T00:00:00Z").unwrap(), 1_714_521_600_000);
        assert_eq!(parse_block_time("2024-05-01T00:00:00.500+00:00").unwrap(), 1_714_521_600_500);
        assert_eq!(parse_block_time("2024-05-01T00:00:00").unwrap(), 1_714_521_600_000);
        assert!(parse_block_time("yesterday").is_err());
    }
}
