//! # Trader Profile Pipeline
//!
//! Wires the position gateway, the candle resolver and the analytics engine into the
//! single request the application serves: "what exposure does copying this trader imply?"
//!
//! Each request is independent. Positions are fetched, every position's candle series is
//! resolved and scored concurrently, and the scores are aggregated once all have arrived.

use crate::error::AnalyzerError;
use analytics::{AnalyticsEngine, PositionScore, RealizedSummary, TraderProfile, score_position};
use api_client::{QuoteClient, QuoteSources, resolve_candles};
use configuration::Config;
use core_types::{ClosedPosition, QuoteProvider, StatisticWindow};
use futures::stream::{self, StreamExt};
use gateway::{CopinGateway, PositionGateway, PositionStatistics};
use std::sync::Arc;

pub mod error;

pub struct TraderAnalyzer {
    gateway: Arc<dyn PositionGateway>,
    quotes: QuoteSources,
    engine: AnalyticsEngine,
    max_concurrent_requests: usize,
}

impl TraderAnalyzer {
    pub fn new(
        gateway: Arc<dyn PositionGateway>,
        quotes: QuoteSources,
        max_concurrent_requests: usize,
    ) -> Self {
        Self {
            gateway,
            quotes,
            engine: AnalyticsEngine::new(),
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    /// Builds the analyzer against the live position index and quote providers.
    pub fn from_config(config: &Config) -> Result<Self, AnalyzerError> {
        let gateway = CopinGateway::new(&config.gateway)?;
        let quotes = QuoteSources::from_config(&config.quotes)?;
        Ok(Self::new(
            Arc::new(gateway),
            quotes,
            config.quotes.max_concurrent_requests,
        ))
    }

    /// Profiles `account` by replaying its recent closed positions against `provider` candles.
    pub async fn get_trader_profile(
        &self,
        account: &str,
        provider: QuoteProvider,
    ) -> Result<TraderProfile, AnalyzerError> {
        let client = self.quotes.get(provider)?;

        let positions = self.gateway.fetch_recent_closed_positions(account).await?;
        if positions.is_empty() {
            return Err(analytics::AnalyticsError::NoPositionData(account.to_string()).into());
        }
        tracing::info!(account, %provider, positions = positions.len(), "Profiling trader.");

        // `buffered` keeps the output aligned with `positions`.
        let outcomes: Vec<Option<PositionScore>> = stream::iter(positions.iter())
            .map(|position| score_one(client, position))
            .buffered(self.max_concurrent_requests)
            .collect()
            .await;

        if outcomes.iter().all(Option::is_none) {
            return Err(AnalyzerError::DataUnavailable {
                account: account.to_string(),
                positions: positions.len(),
            });
        }

        let scores: Vec<PositionScore> = outcomes.into_iter().map(Option::unwrap_or_default).collect();
        Ok(self.engine.aggregate(account, &positions, &scores)?)
    }

    /// Summarizes the exchange-reported outcome of the recent positions, without candles.
    pub async fn get_realized_summary(&self, account: &str) -> Result<RealizedSummary, AnalyzerError> {
        let positions = self.gateway.fetch_recent_closed_positions(account).await?;
        Ok(self.engine.summarize(account, &positions)?)
    }

    pub async fn get_position_statistics(
        &self,
        account: &str,
        window: StatisticWindow,
    ) -> Result<Vec<PositionStatistics>, AnalyzerError> {
        Ok(self.gateway.fetch_position_statistics(account, window).await?)
    }
}

/// Resolves and scores a single position. `None` means its candle series was unavailable.
async fn score_one(client: &dyn QuoteClient, position: &ClosedPosition) -> Option<PositionScore> {
    let interval = position.interval();
    match resolve_candles(client, &position.pair, interval, position.open_time, position.close_time).await {
        Ok(candles) => {
            tracing::debug!(pair = %position.pair, %interval, candles = candles.len(), "Scoring position.");
            Some(score_position(position, &candles))
        }
        Err(e) => {
            tracing::warn!(pair = %position.pair, %interval, error = %e, "Position left unscored.");
            None
        }
    }
}
