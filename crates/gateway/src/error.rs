use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to reach the position index: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The position index returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("The position index rejected the query: {0}")]
    Query(String),

    #[error("An error occurred during JSON deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("The response did not contain the expected `{0}` result.")]
    MissingResult(String),
}
