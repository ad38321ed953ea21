//! Provider-reported open position snapshot.

use crate::domain::{Coin, Decimal};
use serde::{Deserialize, Serialize};

/// One open position as reported by the clearinghouse snapshot.
///
/// `szi` keeps the provider's signed-size convention: positive long,
/// negative short. Everything beyond coin and size is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub coin: Coin,
    pub szi: Decimal,
    pub entry_px: Option<Decimal>,
    pub position_value: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
    pub leverage: Option<u32>,
}
