//! # Profiler Analytics Engine
//!
//! This crate turns a trader's closed positions and the candles that covered them into
//! an exposure profile. It replays each position's leveraged ROI path, then aggregates
//! the per-position scores into take-profit, stop-loss and reverse-copy guidance.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No network, no clock, no files. It depends only on `core-types`.
//! - **Stateless Calculation:** `score_position` and the `AnalyticsEngine` are plain
//!   functions of their inputs, so every request recomputes the profile from scratch.
//!
//! ## Public API
//!
//! - `score_position`: replays one position against its candle series.
//! - `AnalyticsEngine`: aggregates scores into a `TraderProfile`, or summarizes exchange
//!   figures into a `RealizedSummary`.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod score;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{RealizedSummary, Recommendation, TraderProfile};
pub use score::{PositionScore, RoiPoint, TrajectoryError, roi_trajectory, score_position};
