//! Data source abstraction for the account/market data provider.

use crate::domain::{Address, Coin, Decimal, PositionSnapshot, TimeMs};
use crate::engine::RawEvent;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

pub mod hyperliquid;
pub mod mock;

pub use hyperliquid::HyperliquidDataSource;
pub use mock::MockDataSource;

/// Provider of account execution history, open positions, and mark prices.
#[async_trait]
pub trait AccountDataSource: Send + Sync + fmt::Debug {
    /// Fetch the raw execution/ledger records for an account over a time
    /// range, inclusive on both ends. Records arrive unnormalized; the
    /// engine decides what is usable.
    async fn fetch_execution_history(
        &self,
        user: &Address,
        from_ms: TimeMs,
        to_ms: TimeMs,
    ) -> Result<Vec<RawEvent>, DataSourceError>;

    /// Fetch the account's currently open positions.
    async fn fetch_open_positions(
        &self,
        user: &Address,
    ) -> Result<Vec<PositionSnapshot>, DataSourceError>;

    /// Fetch current mark prices per instrument.
    async fn fetch_mark_prices(&self) -> Result<HashMap<Coin, Decimal>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (connection timeout, DNS failure).
    NetworkError(String),
    /// HTTP error (non-2xx status).
    HttpError { status: u16, message: String },
    /// Malformed response body.
    ParseError(String),
    /// Rate limit exceeded.
    RateLimited,
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
        }
    }
}

impl std::error::Error for DataSourceError {}
