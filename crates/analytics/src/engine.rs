use crate::error::AnalyticsError;
use crate::report::{RealizedSummary, TraderProfile};
use crate::score::PositionScore;
use core_types::ClosedPosition;
use rust_decimal::Decimal;

/// How many of the most recent positions decide a streak.
const STREAK_WINDOW: usize = 3;

/// Win rate at or below which a trader's exits are mirrored.
const REVERSE_COPY_WIN_RATE: f64 = 0.5;

/// A stateless calculator that turns scored positions into a trader profile.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for aggregating a trader's scored positions.
    ///
    /// # Arguments
    ///
    /// * `account` - The trader the positions belong to.
    /// * `positions` - Closed positions, most recent close first.
    /// * `scores` - One score per position, pairwise aligned with `positions`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `TraderProfile` or an `AnalyticsError`.
    pub fn aggregate(
        &self,
        account: &str,
        positions: &[ClosedPosition],
        scores: &[PositionScore],
    ) -> Result<TraderProfile, AnalyticsError> {
        if positions.is_empty() {
            return Err(AnalyticsError::NoPositionData(account.to_string()));
        }
        if positions.len() != scores.len() {
            return Err(AnalyticsError::Misaligned {
                positions: positions.len(),
                scores: scores.len(),
            });
        }

        let total = positions.len();
        let pairs = || positions.iter().zip(scores);
        let has_losers = positions.iter().any(|p| !p.is_win);

        // --- Trajectory averages ---
        let avg_roi_final = mean(scores.iter().filter_map(|s| s.final_roi));
        let avg_tp_efficiency = mean(scores.iter().filter_map(|s| s.tp_efficiency));
        let avg_loss_roi = mean(
            pairs()
                .filter(|(p, _)| !p.is_win)
                .filter_map(|(_, s)| s.final_roi),
        );
        // Without a single losing trade there is no loss side to size a stop from.
        let avg_loss_handling = if has_losers {
            mean(
                scores
                    .iter()
                    .filter_map(|s| s.loss_handling)
                    .filter(|lh| *lh != 0.0),
            )
        } else {
            None
        };

        // --- Exchange-reported outcome ---
        let wins = positions.iter().filter(|p| p.is_win).count();
        let win_rate = wins as f64 / total as f64;
        let profit_factor = profit_factor(positions.iter().map(|p| p.realised_pnl));
        let avg_leverage = positions.iter().map(|p| p.leverage).sum::<f64>() / total as f64;

        let recent = &positions[..total.min(STREAK_WINDOW)];
        let win_streak = recent.iter().all(|p| p.is_win);
        let lose_streak = recent.iter().all(|p| !p.is_win);

        // --- Exit levels ---
        let baseline_take_profit = mean(scores.iter().filter_map(|s| s.max_roi));
        // The less negative of the two loss measures is the operative stop.
        let baseline_stop_loss = match (avg_loss_handling, avg_loss_roi) {
            (Some(handling), Some(loss)) => Some(handling.max(loss)),
            (handling, loss) => handling.or(loss),
        };

        // Two independent predicates joined by a plain logical OR: a losing streak
        // mirrors the trader even when their overall win rate is healthy.
        let reverse_copy = lose_streak || win_rate <= REVERSE_COPY_WIN_RATE;
        let (take_profit, stop_loss) = if reverse_copy {
            (baseline_stop_loss.map(|sl| -sl), baseline_take_profit.map(|tp| -tp))
        } else {
            (baseline_take_profit, baseline_stop_loss)
        };

        let profile = TraderProfile {
            account: account.to_string(),
            total_positions: total,
            positions_analyzed: scores.iter().filter(|s| s.final_roi.is_some()).count(),
            avg_roi_final,
            avg_loss_roi,
            avg_tp_efficiency,
            avg_loss_handling,
            win_rate,
            profit_factor,
            avg_leverage,
            win_streak,
            lose_streak,
            baseline_take_profit,
            baseline_stop_loss,
            take_profit,
            stop_loss,
            reverse_copy,
        };

        tracing::info!(
            account,
            positions = total,
            analyzed = profile.positions_analyzed,
            win_rate,
            reverse_copy,
            "Aggregated trader profile."
        );

        Ok(profile)
    }

    /// Summarizes exchange-reported figures without replaying any candles.
    pub fn summarize(
        &self,
        account: &str,
        positions: &[ClosedPosition],
    ) -> Result<RealizedSummary, AnalyticsError> {
        if positions.is_empty() {
            return Err(AnalyticsError::NoPositionData(account.to_string()));
        }

        let total = positions.len();
        let wins = positions.iter().filter(|p| p.is_win).count();
        let losers: Vec<&ClosedPosition> = positions.iter().filter(|p| !p.is_win).collect();

        let gross_win: Decimal = positions.iter().filter(|p| p.is_win).map(|p| p.realised_pnl).sum();
        let gross_loss: Decimal = losers.iter().map(|p| p.realised_pnl).sum();
        let profit_factor = gain_loss_ratio(gross_win, gross_loss.abs());

        let max_drawdown = if losers.is_empty() {
            None
        } else {
            positions.iter().map(|p| p.realised_pnl).min()
        };

        Ok(RealizedSummary {
            account: account.to_string(),
            total_positions: total,
            pnl: positions.iter().map(|p| p.realised_pnl).sum(),
            win_rate: wins as f64 / total as f64,
            profit_factor,
            max_drawdown,
            avg_roi: positions.iter().map(|p| p.realised_roi).sum::<f64>() / total as f64,
            avg_duration_secs: positions.iter().map(|p| p.duration_seconds() as f64).sum::<f64>()
                / total as f64,
            avg_loss_roi: mean(losers.iter().map(|p| p.realised_roi)),
        })
    }
}

/// Arithmetic mean, or `None` for an empty sequence.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Gross profit over absolute gross loss. With no loss, the gross profit itself.
fn profit_factor(pnls: impl Iterator<Item = Decimal>) -> Decimal {
    let (gross_profit, gross_loss) = pnls.fold((Decimal::ZERO, Decimal::ZERO), |(gp, gl), pnl| {
        if pnl > Decimal::ZERO {
            (gp + pnl, gl)
        } else {
            (gp, gl + pnl.abs())
        }
    });

    gain_loss_ratio(gross_profit, gross_loss)
}

/// `gross_profit / gross_loss`, saturating at `Decimal::MAX` when the quotient leaves the
/// decimal range. A zero loss yields the gross profit.
fn gain_loss_ratio(gross_profit: Decimal, gross_loss: Decimal) -> Decimal {
    if gross_loss.is_zero() {
        return gross_profit;
    }
    gross_profit.checked_div(gross_loss).unwrap_or(Decimal::MAX)
}
