//! Provider-specific ticker and interval spellings.
//!
//! The position index reports pairs as `BASE-QUOTE` (e.g. `BTC-USDT`). Each quote provider
//! spells rebased tokens differently, so a pair is rewritten before it is queried.

use core_types::{Interval, QuoteProvider};

const BINGX_SYMBOLS: &[(&str, &str)] = &[
    ("RNDR-USDT", "RENDER-USDT"),
    ("PEPE-USDT", "1000PEPE-USDT"),
    ("BONK-USDT", "1000BONK-USDT"),
    ("1000DOGS-USDT", "DOGS-USDT"),
    ("1000FLOKI-USDT", "FLOKI-USDT"),
    ("1000SHIB-USDT", "SHIB-USDT"),
];

// Looked up after the dash has been removed.
const BITGET_SYMBOLS: &[(&str, &str)] = &[
    ("RNDRUSDT", "RENDERUSDT"),
    ("BONKUSDT", "1000BONKUSDT"),
    ("1000DOGSUSDT", "DOGSUSDT"),
    ("1000FLOKIUSDT", "FLOKIUSDT"),
    ("1000PEPEUSDT", "PEPEUSDT"),
    ("1000SHIBUSDT", "SHIBUSDT"),
];

fn lookup<'a>(table: &[(&str, &'a str)], symbol: &str) -> Option<&'a str> {
    table.iter().find(|(from, _)| *from == symbol).map(|(_, to)| *to)
}

/// Rewrites a position-index pair into the provider's ticker.
pub fn provider_symbol(provider: QuoteProvider, pair: &str) -> String {
    let pair = pair.replace('"', "");
    match provider {
        QuoteProvider::BingX => lookup(BINGX_SYMBOLS, &pair).map(str::to_string).unwrap_or(pair),
        QuoteProvider::Bitget => {
            let compact = pair.replace('-', "");
            lookup(BITGET_SYMBOLS, &compact).map(str::to_string).unwrap_or(compact)
        }
    }
}

/// The provider's label for an interval.
pub fn provider_interval(provider: QuoteProvider, interval: Interval) -> &'static str {
    match (provider, interval) {
        (QuoteProvider::Bitget, Interval::OneHour) => "1H",
        (QuoteProvider::Bitget, Interval::FourHours) => "4H",
        (QuoteProvider::Bitget, Interval::OneDay) => "1D",
        (_, interval) => interval.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bingx_rewrites_rebased_tokens_and_keeps_dashes() {
        assert_eq!(provider_symbol(QuoteProvider::BingX, "PEPE-USDT"), "1000PEPE-USDT");
        assert_eq!(provider_symbol(QuoteProvider::BingX, "1000SHIB-USDT"), "SHIB-USDT");
        assert_eq!(provider_symbol(QuoteProvider::BingX, "BTC-USDT"), "BTC-USDT");
    }

    #[test]
    fn bitget_strips_dashes_before_rewriting() {
        assert_eq!(provider_symbol(QuoteProvider::Bitget, "BTC-USDT"), "BTCUSDT");
        assert_eq!(provider_symbol(QuoteProvider::Bitget, "1000PEPE-USDT"), "PEPEUSDT");
        assert_eq!(provider_symbol(QuoteProvider::Bitget, "BONK-USDT"), "1000BONKUSDT");
        assert_eq!(provider_symbol(QuoteProvider::Bitget, "RNDR-USDT"), "RENDERUSDT");
    }

    #[test]
    fn quotes_in_pairs_are_removed() {
        assert_eq!(provider_symbol(QuoteProvider::BingX, "\"RNDR-USDT\""), "RENDER-USDT");
    }

    #[test]
    fn only_bitget_upper_cases_hour_and_day_labels() {
        assert_eq!(provider_interval(QuoteProvider::Bitget, Interval::OneHour), "1H");
        assert_eq!(provider_interval(QuoteProvider::Bitget, Interval::OneDay), "1D");
        assert_eq!(provider_interval(QuoteProvider::Bitget, Interval::FiveMinutes), "5m");
        assert_eq!(provider_interval(QuoteProvider::BingX, Interval::FourHours), "4h");
    }
}
