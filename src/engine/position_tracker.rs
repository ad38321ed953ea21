//! Position tracking state machine and completed-trade emission.

use crate::domain::{Coin, CompletedTrade, Decimal, Direction, ExecutionEvent, TimeMs};
use rust_decimal::Decimal as RustDecimal;

/// Below this absolute size a position counts as fully closed. Cumulative
/// fill accounting rarely lands on an exact zero lattice.
fn flat_tolerance() -> Decimal {
    Decimal::new(RustDecimal::new(1, 4))
}

/// Running state of one instrument's position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionState {
    /// Current net size: positive = long, negative = short, zero = flat.
    pub signed_size: Decimal,

    /// Weighted-average entry price (only meaningful when not flat).
    pub avg_entry_px: Decimal,

    /// Time the current position was first opened (only meaningful when
    /// not flat).
    pub entry_time_ms: TimeMs,

    /// Running entry notional; `total_entry_value / |signed_size|` equals
    /// `avg_entry_px` while the position is open.
    pub total_entry_value: Decimal,
}

impl PositionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_flat(&self) -> bool {
        self.signed_size.is_zero()
    }

    pub fn is_long(&self) -> bool {
        self.signed_size.is_positive()
    }

    pub fn is_short(&self) -> bool {
        self.signed_size.is_negative()
    }
}

/// Consumes the time-ordered event sequence for exactly one instrument and
/// emits a `CompletedTrade` for every close transition, partial closes
/// included. Callers must feed events sorted by `time_ms`.
pub struct PositionTracker {
    coin: Coin,
    pub state: PositionState,
    trades: Vec<CompletedTrade>,
}

impl PositionTracker {
    pub fn new(coin: Coin) -> Self {
        Self {
            coin,
            state: PositionState::new(),
            trades: Vec::new(),
        }
    }

    /// Process a single event, updating state and emitting any trade the
    /// transition completes.
    pub fn process_event(&mut self, event: &ExecutionEvent) {
        let signed_qty = event.signed_qty();
        if signed_qty.is_zero() {
            return;
        }

        let prev = self.state.signed_size;
        let next = prev + signed_qty;

        if prev.is_zero() {
            self.handle_open(next, event);
        } else if prev.is_positive() == signed_qty.is_positive() {
            self.handle_add(next, event);
        } else {
            self.handle_reduce(prev, next, event);
        }
    }

    /// Open from flat: the fill sets the entry price and time outright.
    fn handle_open(&mut self, next: Decimal, event: &ExecutionEvent) {
        self.state.signed_size = next;
        self.state.avg_entry_px = event.px;
        self.state.entry_time_ms = event.time_ms;
        self.state.total_entry_value = next.abs() * event.px;
    }

    /// Add in the direction of the open position: re-average the entry.
    fn handle_add(&mut self, next: Decimal, event: &ExecutionEvent) {
        self.state.signed_size = next;
        self.state.total_entry_value += event.sz * event.px;
        self.state.avg_entry_px = self.state.total_entry_value / next.abs();
    }

    /// The fill trades against the open position: emit a completed trade,
    /// then settle the remainder (flat, reduced, or flipped).
    fn handle_reduce(&mut self, prev: Decimal, next: Decimal, event: &ExecutionEvent) {
        let direction = if prev.is_positive() {
            Direction::Long
        } else {
            Direction::Short
        };

        let (close_sz, realized_pnl) = match event.reported_pnl {
            // The source already scoped this PnL to the full antecedent
            // position; take both verbatim.
            Some(pnl) => (prev.abs(), pnl),
            None => {
                let close_sz = std::cmp::min(prev.abs(), event.sz);
                let pnl = match direction {
                    Direction::Long => close_sz * (event.px - self.state.avg_entry_px),
                    Direction::Short => close_sz * (self.state.avg_entry_px - event.px),
                };
                (close_sz, pnl)
            }
        };

        self.trades.push(CompletedTrade {
            coin: self.coin.clone(),
            direction,
            entry_time_ms: self.state.entry_time_ms,
            exit_time_ms: event.time_ms,
            duration_ms: event.time_ms.as_i64() - self.state.entry_time_ms.as_i64(),
            entry_px: self.state.avg_entry_px,
            exit_px: event.px,
            sz: close_sz,
            realized_pnl,
        });

        if next.abs() < flat_tolerance() {
            self.state = PositionState::new();
        } else if next.is_positive() == prev.is_positive() {
            // Partial close: the entry price must not move, so the running
            // notional shrinks by the closed fraction.
            let ratio = next.abs() / prev.abs();
            self.state.total_entry_value = self.state.total_entry_value * ratio;
            self.state.signed_size = next;
        } else {
            // Reversal: the residual re-opens in the opposite direction at
            // the fill price. No trade is recorded for the open itself.
            self.handle_open(next, event);
        }
    }

    /// All trades emitted so far, in emission order.
    pub fn into_trades(self) -> Vec<CompletedTrade> {
        self.trades
    }
}
