//! Reconstructed trade outputs.

use crate::domain::{Coin, Decimal, TimeMs};
use serde::{Deserialize, Serialize};

/// Direction of a position: long (bought first) or short (sold first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// One completed round-trip: a position leg from entry to (full or partial)
/// exit, with its realized PnL. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrade {
    pub coin: Coin,
    pub direction: Direction,
    pub entry_time_ms: TimeMs,
    pub exit_time_ms: TimeMs,
    pub duration_ms: i64,
    pub entry_px: Decimal,
    pub exit_px: Decimal,
    /// Closed quantity, always > 0.
    pub sz: Decimal,
    pub realized_pnl: Decimal,
}

/// A currently open position presented alongside completed trades.
///
/// Built from the provider's clearinghouse snapshot, not from event replay:
/// a bounded history window cannot establish the true entry of a still-open
/// leg, so no entry time is claimed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTrade {
    pub coin: Coin,
    pub direction: Direction,
    pub sz: Decimal,
    pub entry_px: Option<Decimal>,
    pub mark_px: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
}
