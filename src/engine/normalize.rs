//! Event normalization: provider records to canonical `ExecutionEvent`s.
//!
//! The provider exposes two record shapes for the same underlying
//! executions: non-funding ledger updates (a generic account-history feed
//! where only deltas tagged "trade" matter) and fill records (which carry
//! their own `closedPnl`). Both normalize into `ExecutionEvent`; anything
//! that fails the required-field checks is dropped, not an error, because
//! the upstream feed is allowed to contain non-trade entries.

use crate::domain::{Coin, Decimal, ExecutionEvent, Side, TimeMs};
use serde::{Deserialize, Serialize};

/// A raw provider record, prior to normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEvent {
    Ledger(LedgerUpdate),
    Fill(FillEvent),
}

/// Non-funding ledger update: `{ time, hash, delta: { type, ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerUpdate {
    pub time: i64,
    #[serde(default)]
    pub hash: Option<String>,
    pub delta: LedgerDelta,
}

/// The delta payload of a ledger update. Deposits, withdrawals, and trades
/// share this shape; only `type == "trade"` entries carry the trade fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDelta {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coin: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub sz: Option<String>,
    #[serde(default)]
    pub px: Option<String>,
    #[serde(default, rename = "closedPnl")]
    pub closed_pnl: Option<String>,
    #[serde(default)]
    pub usdc: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
}

/// Fill record from the fills-by-time endpoint. Side is the provider's
/// aggressor code: "A" is a buy, anything else a sell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillEvent {
    pub coin: String,
    pub time: i64,
    pub side: String,
    pub px: String,
    pub sz: String,
    #[serde(default, rename = "closedPnl")]
    pub closed_pnl: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub tid: Option<i64>,
    #[serde(default)]
    pub oid: Option<i64>,
}

/// Normalize one raw record. Returns None for records that are not trades
/// or fail the required-field checks.
pub fn normalize(raw: &RawEvent) -> Option<ExecutionEvent> {
    match raw {
        RawEvent::Ledger(update) => normalize_ledger(update),
        RawEvent::Fill(fill) => normalize_fill(fill),
    }
}

/// Normalize a batch, silently dropping unusable records.
pub fn normalize_events(raw: &[RawEvent]) -> Vec<ExecutionEvent> {
    raw.iter().filter_map(normalize).collect()
}

fn normalize_ledger(update: &LedgerUpdate) -> Option<ExecutionEvent> {
    if update.delta.kind != "trade" {
        return None;
    }
    let coin = nonempty(update.delta.coin.as_deref()?)?;
    let side = match update.delta.side.as_deref()? {
        "buy" => Side::Buy,
        "sell" => Side::Sell,
        _ => return None,
    };
    let sz = parse_positive(update.delta.sz.as_deref()?)?;
    let px = parse_positive(update.delta.px.as_deref()?)?;

    Some(ExecutionEvent {
        coin: Coin::new(coin.to_string()),
        time_ms: TimeMs::new(update.time),
        side,
        sz,
        px,
        // Ledger deltas get their PnL derived by the tracker.
        reported_pnl: None,
    })
}

fn normalize_fill(fill: &FillEvent) -> Option<ExecutionEvent> {
    let coin = nonempty(&fill.coin)?;
    let side = if fill.side == "A" { Side::Buy } else { Side::Sell };
    let sz = parse_positive(&fill.sz)?;
    let px = parse_positive(&fill.px)?;
    let reported_pnl =
        Decimal::from_str_canonical(fill.closed_pnl.as_deref().unwrap_or("0")).ok()?;

    Some(ExecutionEvent {
        coin: Coin::new(coin.to_string()),
        time_ms: TimeMs::new(fill.time),
        side,
        sz,
        px,
        reported_pnl: Some(reported_pnl),
    })
}

fn nonempty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn parse_positive(s: &str) -> Option<Decimal> {
    let value = Decimal::from_str_canonical(s).ok()?;
    value.is_positive().then_some(value)
}
