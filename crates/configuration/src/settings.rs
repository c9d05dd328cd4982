use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the position index.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// The GraphQL endpoint that serves the position and statistics indexes.
    pub graphql_url: String,
    /// How many recent closed positions are replayed per trader (at most 20).
    pub page_size: usize,
    /// Protocols whose positions are included in the search.
    pub protocols: Vec<String>,
    pub request_timeout_secs: u64,
}

/// Endpoints and limits for the historical candle providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuotesConfig {
    pub bingx_url: String,
    pub bitget_url: String,
    /// Upper bound of candles requested per call. Providers cap this at 1000.
    pub candle_limit: u32,
    /// How many positions are resolved and scored at the same time.
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When non-empty, logs are also written to a daily rolling file in this directory.
    pub directory: String,
}

// --- Default Implementations ---
// This allows a user to omit any section (or the whole file) and still
// have it work with sensible defaults.

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            graphql_url: "https://graphql.copin.io/graphql".to_string(),
            page_size: 20,
            protocols: DEFAULT_PROTOCOLS.iter().map(|p| p.to_string()).collect(),
            request_timeout_secs: 15,
        }
    }
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            bingx_url: "https://open-api.bingx.com/openApi/swap/v3/quote/klines".to_string(),
            bitget_url: "https://api.bitget.com/api/v2/mix/market/candles".to_string(),
            candle_limit: 1000,
            max_concurrent_requests: 4,
            request_timeout_secs: 15,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: String::new(),
        }
    }
}

const DEFAULT_PROTOCOLS: [&str; 29] = [
    "GMX",
    "GMX_V2",
    "KWENTA",
    "POLYNOMIAL",
    "GNS",
    "GNS_POLY",
    "GNS_BASE",
    "MUX_ARB",
    "AVANTIS_BASE",
    "CYBERDEX",
    "DEXTORO",
    "VELA_ARB",
    "EQUATION_ARB",
    "HMX_ARB",
    "LEVEL_ARB",
    "LEVEL_BNB",
    "APOLLOX_BNB",
    "KILOEX_OPBNB",
    "COPIN",
    "KTX_MANTLE",
    "LOGX_BLAST",
    "LOGX_MODE",
    "MYX_ARB",
    "PERENNIAL_ARB",
    "ROLLIE_SCROLL",
    "SYNTHETIX_V3",
    "TIGRIS_ARB",
    "YFX_ARB",
    "MUMMY_FANTOM",
];
