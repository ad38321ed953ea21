//! Mock data source for tests, no network involved.

use super::{AccountDataSource, DataSourceError};
use crate::domain::{Address, Coin, Decimal, PositionSnapshot, TimeMs};
use crate::engine::RawEvent;
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory data source returning predefined records.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    events: Vec<RawEvent>,
    positions: Vec<PositionSnapshot>,
    mark_prices: HashMap<Coin, Decimal>,
    fail: bool,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: RawEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_events(mut self, events: Vec<RawEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn with_position(mut self, position: PositionSnapshot) -> Self {
        self.positions.push(position);
        self
    }

    pub fn with_mark_price(mut self, coin: Coin, px: Decimal) -> Self {
        self.mark_prices.insert(coin, px);
        self
    }

    /// Make every fetch fail, to exercise the upstream-failure path.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn check_available(&self) -> Result<(), DataSourceError> {
        if self.fail {
            Err(DataSourceError::NetworkError(
                "mock upstream unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AccountDataSource for MockDataSource {
    async fn fetch_execution_history(
        &self,
        _user: &Address,
        from_ms: TimeMs,
        to_ms: TimeMs,
    ) -> Result<Vec<RawEvent>, DataSourceError> {
        self.check_available()?;
        Ok(self
            .events
            .iter()
            .filter(|e| {
                let time = match e {
                    RawEvent::Ledger(update) => update.time,
                    RawEvent::Fill(fill) => fill.time,
                };
                time >= from_ms.as_i64() && time <= to_ms.as_i64()
            })
            .cloned()
            .collect())
    }

    async fn fetch_open_positions(
        &self,
        _user: &Address,
    ) -> Result<Vec<PositionSnapshot>, DataSourceError> {
        self.check_available()?;
        Ok(self.positions.clone())
    }

    async fn fetch_mark_prices(&self) -> Result<HashMap<Coin, Decimal>, DataSourceError> {
        self.check_available()?;
        Ok(self.mark_prices.clone())
    }
}
