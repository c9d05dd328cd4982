pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Interval, MAX_CANDLES_PER_REQUEST, QuoteProvider, StatisticWindow};
pub use error::CoreError;
pub use structs::{Candle, ClosedPosition, parse_block_time};
