use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The exposure profile of one trader, derived from their most recent closed positions.
///
/// This struct is the final output of the `AnalyticsEngine`. It is recomputed from scratch
/// on every request; nothing about a trader is remembered between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderProfile {
    pub account: String,
    pub total_positions: usize,
    /// Positions whose replay produced a final ROI.
    pub positions_analyzed: usize,

    // I. Replayed trajectory averages (absent values are excluded, never zeroed)
    pub avg_roi_final: Option<f64>,
    pub avg_loss_roi: Option<f64>,
    pub avg_tp_efficiency: Option<f64>,
    pub avg_loss_handling: Option<f64>,

    // II. Exchange-reported outcome
    pub win_rate: f64,
    pub profit_factor: Decimal,
    pub avg_leverage: f64,
    pub win_streak: bool,
    pub lose_streak: bool,

    // III. Exit levels, in leveraged ROI percent
    pub baseline_take_profit: Option<f64>,
    pub baseline_stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    pub reverse_copy: bool,
}

impl TraderProfile {
    /// The four values a copy-trading caller acts on.
    pub fn recommendation(&self) -> Recommendation {
        Recommendation {
            reverse_copy: self.reverse_copy,
            leverage: self.avg_leverage,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub reverse_copy: bool,
    pub leverage: f64,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

/// A quick summary computed from exchange-reported figures only, without any replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedSummary {
    pub account: String,
    pub total_positions: usize,
    pub pnl: Decimal,
    pub win_rate: f64,
    pub profit_factor: Decimal,
    /// The single worst realised PnL. Only reported when the sample has a losing position.
    pub max_drawdown: Option<Decimal>,
    pub avg_roi: f64,
    pub avg_duration_secs: f64,
    pub avg_loss_roi: Option<f64>,
}
