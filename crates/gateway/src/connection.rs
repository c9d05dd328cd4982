use crate::error::GatewayError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// One page of a search operation.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub total_pages: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<HashMap<String, Option<SearchPage<T>>>>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

/// A thin GraphQL transport over a single HTTP endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlConnection {
    client: reqwest::Client,
    url: String,
}

impl GraphqlConnection {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, url: url.to_string() })
    }

    /// Posts `query` and returns the page produced by the top-level `operation`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
    ) -> Result<SearchPage<T>, GatewayError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "query": query }))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::Http { status: status.as_u16(), body: text });
        }

        extract_page(operation, &text)
    }
}

pub(crate) fn extract_page<T: DeserializeOwned>(
    operation: &str,
    body: &str,
) -> Result<SearchPage<T>, GatewayError> {
    let response: GraphqlResponse<T> = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(GatewayError::Query(messages.join("; ")));
    }

    response
        .data
        .and_then(|mut data| data.remove(operation))
        .flatten()
        .ok_or_else(|| GatewayError::MissingResult(operation.to_string()))
}

/// Renders `value` as a GraphQL string literal.
pub(crate) fn literal(value: &str) -> String {
    // A JSON string literal is also a valid GraphQL string literal.
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        pair: String,
    }

    #[test]
    fn extracts_the_named_operation() {
        let body = r#"{"data":{"searchTopOpeningPosition":{"data":[{"pair":"BTC-USDT"}],"meta":{"total":1,"limit":20,"offset":0,"totalPages":1}}}}"#;
        let page: SearchPage<Row> = extract_page("searchTopOpeningPosition", body).unwrap();
        assert_eq!(page.data[0].pair, "BTC-USDT");
        assert_eq!(page.meta.unwrap().total_pages, Some(1));
    }

    #[test]
    fn graphql_errors_are_surfaced() {
        let body = r#"{"data":null,"errors":[{"message":"bad filter"}]}"#;
        let err = extract_page::<Row>("searchTopOpeningPosition", body).unwrap_err();
        assert!(matches!(err, GatewayError::Query(ref m) if m == "bad filter"));
    }

    #[test]
    fn missing_operation_is_an_error() {
        let body = r#"{"data":{"other":null}}"#;
        assert!(matches!(
            extract_page::<Row>("searchTopOpeningPosition", body),
            Err(GatewayError::MissingResult(_))
        ));
    }

    #[test]
    fn literals_escape_quotes() {
        assert_eq!(literal("0xab\"c"), r#""0xab\"c""#);
    }
}
