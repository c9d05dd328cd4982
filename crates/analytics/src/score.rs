//! Replays a single closed position against its candle series.

use core_types::{Candle, ClosedPosition};
use serde::{Deserialize, Serialize};

/// How one position actually played out.
///
/// Every field is optional: a metric that is undefined for this position (or could not be
/// computed) is `None` and must be excluded from any average, never read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionScore {
    /// Leveraged close-ROI of the last candle, in percent.
    pub final_roi: Option<f64>,
    /// Worst leveraged excursion over the position's life.
    pub min_roi: Option<f64>,
    /// Best leveraged excursion over the position's life.
    pub max_roi: Option<f64>,
    /// For winners that spent time underwater: the worst drawdown endured (`min_roi`).
    pub loss_handling: Option<f64>,
    /// For winners: share of the best unrealised gain captured at close, in percent.
    pub tp_efficiency: Option<f64>,
    /// Whether the best exit came before the actual close. `None` if never in profit.
    pub tp_late: Option<bool>,
    /// Percentage of the position's wall-clock life spent underwater.
    pub loss_time_pct: Option<f64>,
    /// Same as `loss_time_pct` but for the longest uninterrupted underwater run.
    pub consecutive_loss_time_pct: Option<f64>,
    /// Length of the longest underwater run, in candles.
    pub longest_underwater_run: Option<usize>,
}

impl PositionScore {
    /// A score that carries no signal apart from the extremes, when they are known.
    pub fn unavailable(min_roi: Option<f64>, max_roi: Option<f64>) -> Self {
        Self { min_roi, max_roi, ..Self::default() }
    }
}

/// Leveraged ROI of one candle, oriented to the position's direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiPoint {
    pub timestamp: i64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

impl RoiPoint {
    /// The position was losing at this candle's close.
    pub fn is_underwater(&self) -> bool {
        self.close < 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    NoCandles,
    InvalidEntryPrice(f64),
    NonFiniteRoi { timestamp: i64 },
}

/// Builds the leveraged ROI trajectory, using the first candle's open as the entry price.
///
/// A short profits from falling prices, so its close ROI is negated and the raw high and
/// low swap roles: the raw low becomes its best excursion and the raw high its worst.
pub fn roi_trajectory(
    position: &ClosedPosition,
    candles: &[Candle],
) -> Result<Vec<RoiPoint>, TrajectoryError> {
    let entry = candles.first().ok_or(TrajectoryError::NoCandles)?.open;
    if !(entry.is_finite() && entry > 0.0) {
        return Err(TrajectoryError::InvalidEntryPrice(entry));
    }

    let scale = position.leverage * 100.0;
    let roi = |price: f64| (price / entry - 1.0) * scale;

    candles
        .iter()
        .map(|candle| {
            let (close, high, low) = (roi(candle.close), roi(candle.high), roi(candle.low));
            let point = if position.is_long {
                RoiPoint { timestamp: candle.timestamp, close, high, low }
            } else {
                RoiPoint { timestamp: candle.timestamp, close: -close, high: -low, low: -high }
            };
            if point.close.is_finite() && point.high.is_finite() && point.low.is_finite() {
                Ok(point)
            } else {
                Err(TrajectoryError::NonFiniteRoi { timestamp: candle.timestamp })
            }
        })
        .collect()
}

/// Length of the longest run of consecutive underwater candles.
pub fn longest_underwater_run(points: &[RoiPoint]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for point in points {
        if point.is_underwater() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Scores `position` against its resolved `candles`.
///
/// Never fails: a position whose trajectory cannot be built yields
/// [`PositionScore::unavailable`], so one bad trade cannot block the rest of a batch.
pub fn score_position(position: &ClosedPosition, candles: &[Candle]) -> PositionScore {
    let points = match roi_trajectory(position, candles) {
        Ok(points) => points,
        Err(reason) => {
            tracing::warn!(pair = %position.pair, ?reason, "Cannot replay position; no signal.");
            return PositionScore::unavailable(None, None);
        }
    };

    // `points` is non-empty and finite past this line.
    let min_roi = points.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    let max_roi = points.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
    let final_roi = points[points.len() - 1].close;

    let duration_ms = position.duration_ms();
    if duration_ms <= 0 {
        tracing::warn!(pair = %position.pair, duration_ms, "Position has no lifetime; keeping extremes only.");
        return PositionScore::unavailable(Some(min_roi), Some(max_roi));
    }

    let mut score = PositionScore {
        final_roi: Some(final_roi),
        min_roi: Some(min_roi),
        max_roi: Some(max_roi),
        ..PositionScore::default()
    };

    let underwater = points.iter().filter(|p| p.is_underwater()).count();
    if underwater > 0 {
        let longest = longest_underwater_run(&points);
        let candle_ms = (position.interval().seconds() * 1000) as f64;
        let share = |count: usize| count as f64 * candle_ms / duration_ms as f64 * 100.0;

        score.longest_underwater_run = Some(longest);
        score.loss_time_pct = Some(share(underwater));
        score.consecutive_loss_time_pct = Some(share(longest));
        if position.is_win {
            score.loss_handling = Some(min_roi);
        }
    }

    if position.is_win && max_roi != 0.0 {
        score.tp_efficiency = Some(final_roi / max_roi * 100.0);
    }

    if points.iter().any(|p| p.close > 0.0) {
        // First candle holding the global best excursion.
        let best = points
            .iter()
            .skip(1)
            .fold(&points[0], |best, p| if p.high > best.high { p } else { best });
        score.tp_late = Some(best.timestamp < position.close_time);
    }

    tracing::debug!(
        pair = %position.pair,
        candles = points.len(),
        final_roi,
        min_roi,
        max_roi,
        "Scored position."
    );

    score
}
