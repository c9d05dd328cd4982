use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Position gateway error: {0}")]
    Gateway(#[from] gateway::GatewayError),

    #[error("Quote client error: {0}")]
    Api(#[from] api_client::ApiError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("No candle data could be resolved for any of the {positions} positions of trader {account}")]
    DataUnavailable { account: String, positions: usize },
}
