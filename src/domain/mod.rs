//! Domain types for trade reconstruction.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: TimeMs, Address, Coin, Side
//! - The canonical ExecutionEvent the engine consumes
//! - Reconstruction outputs: CompletedTrade, OpenTrade
//! - The provider-shaped PositionSnapshot record

pub mod decimal;
pub mod event;
pub mod primitives;
pub mod snapshot;
pub mod trade;

pub use decimal::Decimal;
pub use event::ExecutionEvent;
pub use primitives::{Address, AddressParseError, Coin, Side, TimeMs};
pub use snapshot::PositionSnapshot;
pub use trade::{CompletedTrade, Direction, OpenTrade};
