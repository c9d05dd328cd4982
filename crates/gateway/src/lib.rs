//! # Position Index Gateway
//!
//! This crate is the system's window onto the remote position index. It supplies
//! a trader's recent closed positions and per-window summary statistics.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All GraphQL and HTTP details live here. The rest of the application
//!   only sees `ClosedPosition` records and `PositionStatistics` rows.
//! - **Trait Seam:** The analysis pipeline depends on the `PositionGateway` trait, so
//!   an in-memory implementation can stand in for the live index.
//!
//! ## Public API
//!
//! - `PositionGateway`: the read interface the pipeline depends on.
//! - `CopinGateway`: the GraphQL implementation.
//! - `GatewayError`: the specific error types that can be returned from this crate.

use async_trait::async_trait;
use core_types::{ClosedPosition, StatisticWindow};

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::GraphqlConnection;
pub use error::GatewayError;
pub use repository::{CopinGateway, PositionStatistics};

#[async_trait]
pub trait PositionGateway: Send + Sync {
    /// The trader's most recent closed two-leg positions, newest close first.
    async fn fetch_recent_closed_positions(
        &self,
        account: &str,
    ) -> Result<Vec<ClosedPosition>, GatewayError>;

    /// Summary statistics for `account` over `window`, one row per protocol.
    async fn fetch_position_statistics(
        &self,
        account: &str,
        window: StatisticWindow,
    ) -> Result<Vec<PositionStatistics>, GatewayError>;
}
