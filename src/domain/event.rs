//! Canonical execution event, the single shape the engine consumes.

use crate::domain::{Coin, Decimal, Side, TimeMs};
use serde::{Deserialize, Serialize};

/// One normalized execution for an account on an instrument.
///
/// Both provider shapes (ledger-delta records and fill records) normalize
/// into this; `reported_pnl` is `Some` only for fill-shaped sources, whose
/// records carry their own realized PnL. Ledger-shaped sources leave it
/// `None` and the tracker derives PnL from the average entry price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub coin: Coin,
    pub time_ms: TimeMs,
    pub side: Side,
    /// Base-asset quantity, always > 0.
    pub sz: Decimal,
    pub px: Decimal,
    pub reported_pnl: Option<Decimal>,
}

impl ExecutionEvent {
    /// Signed quantity: Buy = +sz, Sell = -sz.
    pub fn signed_qty(&self) -> Decimal {
        match self.side {
            Side::Buy => self.sz,
            Side::Sell => -self.sz,
        }
    }
}
