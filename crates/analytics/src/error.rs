use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("No closed positions found for trader {0}")]
    NoPositionData(String),

    #[error("Got {positions} positions but {scores} scores; they must be pairwise aligned")]
    Misaligned { positions: usize, scores: usize },
}
