pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod service;

pub use config::{Config, EventSource};
pub use datasource::{AccountDataSource, DataSourceError, HyperliquidDataSource, MockDataSource};
pub use domain::{
    Address, AddressParseError, Coin, CompletedTrade, Decimal, Direction, ExecutionEvent,
    OpenTrade, PositionSnapshot, Side, TimeMs,
};
pub use engine::{reconstruct_trades, PositionState, PositionTracker, RawEvent};
pub use error::AppError;
pub use service::{TradeHistory, TradeHistoryService, TradeSummary};
