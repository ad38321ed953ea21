//! Hyperliquid Info API client.

use super::{AccountDataSource, DataSourceError};
use crate::config::EventSource;
use crate::domain::{Address, Coin, Decimal, PositionSnapshot, TimeMs};
use crate::engine::{FillEvent, LedgerUpdate, RawEvent};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Data source backed by the public Hyperliquid Info API.
///
/// Execution history comes from one of two endpoints depending on the
/// configured event source: the non-funding ledger feed (PnL derived by the
/// engine) or the fills-by-time feed (PnL reported per fill).
#[derive(Debug, Clone)]
pub struct HyperliquidDataSource {
    client: Client,
    base_url: String,
    event_source: EventSource,
}

impl HyperliquidDataSource {
    pub fn new(base_url: String, event_source: EventSource) -> Self {
        Self {
            client: Client::new(),
            base_url,
            event_source,
        }
    }

    async fn post_info(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, DataSourceError> {
        let url = format!("{}/info", self.base_url);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl AccountDataSource for HyperliquidDataSource {
    async fn fetch_execution_history(
        &self,
        user: &Address,
        from_ms: TimeMs,
        to_ms: TimeMs,
    ) -> Result<Vec<RawEvent>, DataSourceError> {
        debug!(
            "Fetching {:?} history for user={}, from_ms={}, to_ms={}",
            self.event_source,
            user,
            from_ms.as_i64(),
            to_ms.as_i64()
        );

        let payload = match self.event_source {
            EventSource::Ledger => serde_json::json!({
                "type": "userNonFundingLedgerUpdates",
                "user": user.as_str(),
                "startTime": from_ms.as_i64(),
                "endTime": to_ms.as_i64(),
            }),
            EventSource::Fills => serde_json::json!({
                "type": "userFillsByTime",
                "user": user.as_str(),
                "startTime": from_ms.as_i64(),
                "endTime": to_ms.as_i64(),
                "aggregateByTime": false,
            }),
        };

        let response = self.post_info(payload).await?;
        let entries = response
            .as_array()
            .ok_or_else(|| DataSourceError::ParseError("Expected array response".to_string()))?;

        let mut events = Vec::with_capacity(entries.len());
        for entry in entries {
            let parsed = match self.event_source {
                EventSource::Ledger => serde_json::from_value::<LedgerUpdate>(entry.clone())
                    .map(RawEvent::Ledger),
                EventSource::Fills => {
                    serde_json::from_value::<FillEvent>(entry.clone()).map(RawEvent::Fill)
                }
            };
            match parsed {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping unparseable history entry: {}", e),
            }
        }

        Ok(events)
    }

    async fn fetch_open_positions(
        &self,
        user: &Address,
    ) -> Result<Vec<PositionSnapshot>, DataSourceError> {
        debug!("Fetching open positions for user={}", user);

        let payload = serde_json::json!({
            "type": "clearinghouseState",
            "user": user.as_str(),
        });

        let response = self.post_info(payload).await?;
        let asset_positions = response
            .get("assetPositions")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                DataSourceError::ParseError("Missing assetPositions field".to_string())
            })?;

        let mut positions = Vec::new();
        for entry in asset_positions {
            match parse_position(entry) {
                Ok(position) => positions.push(position),
                Err(e) => warn!("Skipping unparseable position: {}", e),
            }
        }

        Ok(positions)
    }

    async fn fetch_mark_prices(&self) -> Result<HashMap<Coin, Decimal>, DataSourceError> {
        debug!("Fetching mark prices");

        let payload = serde_json::json!({ "type": "metaAndAssetCtxs" });
        let response = self.post_info(payload).await?;

        // Response is a pair: [meta, assetCtxs], with universe[i]
        // describing the instrument whose context is assetCtxs[i].
        let pair = response
            .as_array()
            .filter(|a| a.len() == 2)
            .ok_or_else(|| DataSourceError::ParseError("Expected [meta, ctxs] pair".to_string()))?;
        let universe = pair[0]
            .get("universe")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DataSourceError::ParseError("Missing universe field".to_string()))?;
        let contexts = pair[1]
            .as_array()
            .ok_or_else(|| DataSourceError::ParseError("Expected asset context array".to_string()))?;

        let mut marks = HashMap::new();
        for (asset, ctx) in universe.iter().zip(contexts) {
            let name = asset.get("name").and_then(|v| v.as_str());
            let mark = ctx
                .get("markPx")
                .and_then(|v| v.as_str())
                .and_then(|s| Decimal::from_str_canonical(s).ok());
            if let (Some(name), Some(mark)) = (name, mark) {
                marks.insert(Coin::new(name.to_string()), mark);
            }
        }

        Ok(marks)
    }
}

fn parse_position(entry: &serde_json::Value) -> Result<PositionSnapshot, DataSourceError> {
    let position = entry
        .get("position")
        .ok_or_else(|| DataSourceError::ParseError("Missing position field".to_string()))?;

    let coin = position
        .get("coin")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing coin field".to_string()))?;

    let szi_str = position
        .get("szi")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing szi field".to_string()))?;
    let szi = Decimal::from_str_canonical(szi_str)
        .map_err(|e| DataSourceError::ParseError(format!("Invalid szi: {}", e)))?;

    let decimal_field = |name: &str| {
        position
            .get(name)
            .and_then(|v| v.as_str())
            .and_then(|s| Decimal::from_str_canonical(s).ok())
    };

    let leverage = position
        .get("leverage")
        .and_then(|v| v.get("value"))
        .and_then(|v| v.as_u64())
        .map(|v| v as u32);

    Ok(PositionSnapshot {
        coin: Coin::new(coin.to_string()),
        szi,
        entry_px: decimal_field("entryPx"),
        position_value: decimal_field("positionValue"),
        unrealized_pnl: decimal_field("unrealizedPnl"),
        leverage,
    })
}
