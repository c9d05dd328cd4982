use crate::PositionGateway;
use crate::connection::{GraphqlConnection, literal};
use crate::error::GatewayError;
use async_trait::async_trait;
use configuration::GatewayConfig;
use core_types::{ClosedPosition, StatisticWindow, parse_block_time};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const POSITIONS_OPERATION: &str = "searchTopOpeningPosition";
const STATISTICS_OPERATION: &str = "searchPositionStatistic";
const STATISTICS_PAGE_SIZE: usize = 12;

/// A closed position as stored in the `copin.positions` index.
///
/// Every field may come back `null`; incomplete records are dropped in [`into_positions`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub open_block_time: Option<String>,
    pub close_block_time: Option<String>,
    pub pair: Option<String>,
    pub leverage: Option<f64>,
    pub is_win: Option<bool>,
    pub is_long: Option<bool>,
    pub realised_roi: Option<f64>,
    pub realised_pnl: Option<Decimal>,
    pub collateral: Option<f64>,
    pub size: Option<f64>,
}

/// Aggregated statistics of a trader over one look-back window, per protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStatistics {
    pub protocol: String,
    pub avg_duration: Option<f64>,
    pub total_trade: Option<u64>,
    pub win_rate: Option<f64>,
    pub avg_leverage: Option<f64>,
    pub realised_pnl: Option<Decimal>,
    pub realised_avg_roi: Option<f64>,
    pub realised_max_roi: Option<f64>,
    pub realised_max_drawdown: Option<f64>,
    pub realised_max_drawdown_pnl: Option<f64>,
    pub realised_gain_loss_ratio: Option<f64>,
}

/// Reads trader positions and statistics from the Copin GraphQL indexes.
#[derive(Debug, Clone)]
pub struct CopinGateway {
    connection: GraphqlConnection,
    page_size: usize,
    protocols: Vec<String>,
}

impl CopinGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            connection: GraphqlConnection::new(&config.graphql_url, config.request_timeout_secs)?,
            page_size: config.page_size,
            protocols: config.protocols.clone(),
        })
    }
}

#[async_trait]
impl PositionGateway for CopinGateway {
    async fn fetch_recent_closed_positions(
        &self,
        account: &str,
    ) -> Result<Vec<ClosedPosition>, GatewayError> {
        let query = closed_positions_query(account, &self.protocols, self.page_size);
        let page = self
            .connection
            .search::<PositionRecord>(POSITIONS_OPERATION, &query)
            .await?;

        tracing::debug!(account, records = page.data.len(), "Fetched closed positions.");
        Ok(into_positions(account, page.data))
    }

    async fn fetch_position_statistics(
        &self,
        account: &str,
        window: StatisticWindow,
    ) -> Result<Vec<PositionStatistics>, GatewayError> {
        let query = statistics_query(account, window);
        let page = self
            .connection
            .search::<PositionStatistics>(STATISTICS_OPERATION, &query)
            .await?;
        Ok(page.data)
    }
}

/// Converts index records into positions, preserving their most-recent-first order.
///
/// Records with missing fields, unreadable block times, a non-positive lifetime or a
/// non-positive leverage cannot be replayed and are dropped with a warning.
pub fn into_positions(account: &str, records: Vec<PositionRecord>) -> Vec<ClosedPosition> {
    records
        .into_iter()
        .filter_map(|record| match to_position(account, &record) {
            Some(position) => Some(position),
            None => {
                tracing::warn!(account, pair = ?record.pair, "Skipping malformed position record.");
                None
            }
        })
        .collect()
}

fn to_position(account: &str, record: &PositionRecord) -> Option<ClosedPosition> {
    let open_time = parse_block_time(record.open_block_time.as_deref()?).ok()?;
    let close_time = parse_block_time(record.close_block_time.as_deref()?).ok()?;
    let leverage = record.leverage?;
    if close_time <= open_time || !(leverage > 0.0) {
        return None;
    }

    Some(ClosedPosition {
        account: account.to_string(),
        pair: record.pair.as_deref()?.replace('"', ""),
        open_time,
        close_time,
        leverage,
        is_long: record.is_long?,
        is_win: record.is_win?,
        realised_pnl: record.realised_pnl?,
        realised_roi: record.realised_roi?,
        collateral: record.collateral,
        size: record.size,
    })
}

/// Closed two-leg positions of `account`, newest close first.
pub fn closed_positions_query(account: &str, protocols: &[String], page_size: usize) -> String {
    let protocols = protocols
        .iter()
        .map(|p| literal(p))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        r#"query {{
  {POSITIONS_OPERATION}(
    index: "copin.positions"
    protocols: [{protocols}]
    body: {{
      filter: {{
        and: [
          {{ field: "status", match: "CLOSE" }}
          {{ field: "account", match: {account} }}
          {{ field: "orderCount", match: "2" }}
        ]
      }}
      sorts: [{{ field: "closeBlockTime", direction: "desc" }}]
      paging: {{ size: {page_size}, from: 0 }}
    }}
  ) {{
    data {{
      openBlockTime
      closeBlockTime
      pair
      leverage
      isWin
      isLong
      realisedRoi
      realisedPnl
      collateral
      size
    }}
    meta {{ total limit offset totalPages }}
  }}
}}"#,
        account = literal(account),
    )
}

pub fn statistics_query(account: &str, window: StatisticWindow) -> String {
    format!(
        r#"query {{
  {STATISTICS_OPERATION}(
    index: "copin.position_statistics"
    body: {{
      filter: {{
        and: [
          {{ field: "account", match: {account} }}
          {{ field: "type", match: {window} }}
        ]
      }}
      sorts: [{{ field: "realisedPnl", direction: "desc" }}]
      paging: {{ size: {STATISTICS_PAGE_SIZE}, from: 0 }}
    }}
  ) {{
    data {{
      protocol
      avgDuration
      totalTrade
      winRate
      avgLeverage
      realisedPnl
      realisedAvgRoi
      realisedMaxRoi
      realisedMaxDrawdown
      realisedMaxDrawdownPnl
      realisedGainLossRatio
    }}
    meta {{ total limit offset totalPages }}
  }}
}}"#,
        account = literal(account),
        window = literal(window.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::extract_page;
    use rust_decimal_macros::dec;

    const BODY: &str = r#"{
        "data": {
            "searchTopOpeningPosition": {
                "data": [
                    {
                        "openBlockTime": "2024-05-01T10:00:00.000Z",
                        "closeBlockTime": "2024-05-01T12:00:00.000Z",
                        "pair": "\"ETH-USDT\"",
                        "leverage": 12.5,
                        "isWin": true,
                        "isLong": false,
                        "realisedRoi": 31.2,
                        "realisedPnl": 154.75,
                        "collateral": 500,
                        "size": 6250
                    },
                    {
                        "openBlockTime": "2024-05-01T09:00:00.000Z",
                        "closeBlockTime": "2024-05-01T08:00:00.000Z",
                        "pair": "BTC-USDT",
                        "leverage": 3,
                        "isWin": false,
                        "isLong": true,
                        "realisedRoi": -4.0,
                        "realisedPnl": -20,
                        "collateral": null,
                        "size": null
                    }
                ],
                "meta": {"total": 2, "limit": 20, "offset": 0, "totalPages": 1}
            }
        }
    }"#;

    #[test]
    fn converts_records_and_drops_inverted_lifetimes() {
        let page = extract_page::<PositionRecord>(POSITIONS_OPERATION, BODY).unwrap();
        let positions = into_positions("0xabc", page.data);

        assert_eq!(positions.len(), 1);
        let p = &positions[0];
        assert_eq!(p.account, "0xabc");
        assert_eq!(p.pair, "ETH-USDT");
        assert_eq!(p.duration_seconds(), 7_200);
        assert!(!p.is_long);
        assert_eq!(p.realised_pnl, dec!(154.75));
        assert_eq!(p.collateral, Some(500.0));
    }

    #[test]
    fn null_fields_drop_only_their_record() {
        let body = r#"{"data":{"searchTopOpeningPosition":{"data":[
            {"openBlockTime":"2024-05-01T10:00:00Z","closeBlockTime":"2024-05-01T11:00:00Z","pair":"BTC-USDT",
             "leverage":5,"isWin":true,"isLong":true,"realisedRoi":12.0,"realisedPnl":60,"collateral":500,"size":2500},
            {"openBlockTime":"2024-05-01T08:00:00Z","closeBlockTime":"2024-05-01T09:00:00Z","pair":"ETH-USDT",
             "leverage":null,"isWin":false,"isLong":true,"realisedRoi":-3.0,"realisedPnl":-15,"collateral":null,"size":null},
            {"openBlockTime":"2024-05-01T06:00:00Z","closeBlockTime":"2024-05-01T07:00:00Z","pair":"SOL-USDT",
             "leverage":3,"isWin":null,"isLong":false,"realisedRoi":null,"realisedPnl":null}
        ]}}}"#;

        let page = extract_page::<PositionRecord>(POSITIONS_OPERATION, body).unwrap();
        assert_eq!(page.data.len(), 3);

        let positions = into_positions("0xabc", page.data);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].pair, "BTC-USDT");
        assert_eq!(positions[0].leverage, 5.0);
        assert_eq!(positions[0].realised_pnl, dec!(60));
    }

    #[test]
    fn positions_query_filters_two_leg_closed_positions() {
        let query = closed_positions_query("0xabc", &["GMX".to_string(), "KWENTA".to_string()], 20);
        assert!(query.contains(r#"{ field: "account", match: "0xabc" }"#));
        assert!(query.contains(r#"{ field: "orderCount", match: "2" }"#));
        assert!(query.contains(r#"protocols: ["GMX" "KWENTA"]"#));
        assert!(query.contains("paging: { size: 20, from: 0 }"));
    }

    #[test]
    fn statistics_query_uses_window_label() {
        let query = statistics_query("0xabc", StatisticWindow::D30);
        assert!(query.contains(r#"{ field: "type", match: "D30" }"#));
    }

    #[test]
    fn statistics_rows_tolerate_missing_fields() {
        let body = r#"{"data":{"searchPositionStatistic":{"data":[{"protocol":"GMX","winRate":55.5,"totalTrade":40}]}}}"#;
        let page = extract_page::<PositionStatistics>(STATISTICS_OPERATION, body).unwrap();
        assert_eq!(page.data[0].win_rate, Some(55.5));
        assert_eq!(page.data[0].avg_leverage, None);
    }
}
