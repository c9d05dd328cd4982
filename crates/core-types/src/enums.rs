use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The most candles a quote provider returns for a single request.
pub const MAX_CANDLES_PER_REQUEST: i64 = 1000;

/// Candle granularity, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    /// The granularity ladder, finest first.
    pub const LADDER: [Interval; 6] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::FourHours,
        Interval::OneDay,
    ];

    pub fn seconds(&self) -> i64 {
        match self {
            Interval::OneMinute => 60,
            Interval::FiveMinutes => 300,
            Interval::ThirtyMinutes => 1_800,
            Interval::OneHour => 3_600,
            Interval::FourHours => 14_400,
            Interval::OneDay => 86_400,
        }
    }

    /// The canonical label (`"1m"`, `"1h"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
        }
    }

    /// Picks the finest interval whose candle count over `duration_secs` stays within
    /// [`MAX_CANDLES_PER_REQUEST`]. Durations too long for every step fall back to `1d`.
    pub fn for_duration(duration_secs: i64) -> Self {
        Self::LADDER
            .into_iter()
            .find(|interval| duration_secs <= interval.seconds() * MAX_CANDLES_PER_REQUEST)
            .unwrap_or(Interval::OneDay)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LADDER
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput("interval".to_string(), s.to_string()))
    }
}

/// The upstream quote source a candle series is resolved from.
///
/// Selected by the protocol a trader's positions originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuoteProvider {
    BingX,
    Bitget,
}

impl fmt::Display for QuoteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteProvider::BingX => f.write_str("BINGX"),
            QuoteProvider::Bitget => f.write_str("BITGET"),
        }
    }
}

impl FromStr for QuoteProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BINGX" => Ok(QuoteProvider::BingX),
            "BITGET" => Ok(QuoteProvider::Bitget),
            _ => Err(CoreError::InvalidInput("protocol".to_string(), s.to_string())),
        }
    }
}

/// The look-back window of a trader's aggregated position statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatisticWindow {
    D7,
    D15,
    D30,
    D60,
    #[serde(rename = "FULL")]
    Full,
}

impl StatisticWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticWindow::D7 => "D7",
            StatisticWindow::D15 => "D15",
            StatisticWindow::D30 => "D30",
            StatisticWindow::D60 => "D60",
            StatisticWindow::Full => "FULL",
        }
    }
}

impl fmt::Display for StatisticWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatisticWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "D7" => Ok(StatisticWindow::D7),
            "D15" => Ok(StatisticWindow::D15),
            "D30" => Ok(StatisticWindow::D30),
            "D60" => Ok(StatisticWindow::D60),
            "FULL" => Ok(StatisticWindow::Full),
            _ => Err(CoreError::InvalidInput("window".to_string(), s.to_string())),
        }
    }
}
