//! Request-level orchestration over the data source and the engine.

use crate::datasource::AccountDataSource;
use crate::domain::{
    Address, Coin, CompletedTrade, Decimal, Direction, OpenTrade, PositionSnapshot, TimeMs,
};
use crate::engine::reconstruct_trades;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Reconstructed history for one account.
#[derive(Debug, Clone)]
pub struct TradeHistory {
    pub trades: Vec<CompletedTrade>,
    /// Present only when the caller asked for the open-trade view.
    pub open_trades: Option<Vec<OpenTrade>>,
    pub summary: TradeSummary,
}

/// Aggregate statistics over the completed trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeSummary {
    pub trade_count: usize,
    pub win_count: usize,
    pub total_realized_pnl: Decimal,
    /// Winning trades as a percentage of all trades; zero when empty.
    pub win_rate_pct: Decimal,
    pub avg_realized_pnl: Decimal,
}

/// Rebuilds an account's trade history from provider data on demand.
pub struct TradeHistoryService {
    datasource: Arc<dyn AccountDataSource>,
    lookback_ms: i64,
}

impl TradeHistoryService {
    pub fn new(datasource: Arc<dyn AccountDataSource>, lookback_ms: i64) -> Self {
        Self {
            datasource,
            lookback_ms,
        }
    }

    /// Fetch, reconstruct, and summarize.
    ///
    /// The history and the open-position snapshot are fetched concurrently
    /// and both must succeed; a failure of either surfaces as a single
    /// upstream error. Mark prices are fetched only for the open view.
    pub async fn trade_history(
        &self,
        user: &Address,
        include_open: bool,
    ) -> Result<TradeHistory, crate::datasource::DataSourceError> {
        let to_ms = TimeMs::new(chrono::Utc::now().timestamp_millis());
        let from_ms = TimeMs::new(to_ms.as_i64() - self.lookback_ms);

        let (events, positions) = tokio::try_join!(
            self.datasource.fetch_execution_history(user, from_ms, to_ms),
            self.datasource.fetch_open_positions(user),
        )?;

        let open_coins: HashSet<Coin> = positions.iter().map(|p| p.coin.clone()).collect();
        let trades = reconstruct_trades(&events, &open_coins);
        info!(
            "Reconstructed {} trades from {} raw events for {} ({} open instruments suppressed)",
            trades.len(),
            events.len(),
            user,
            open_coins.len()
        );

        let open_trades = if include_open {
            let marks = self.datasource.fetch_mark_prices().await?;
            Some(
                positions
                    .iter()
                    .filter(|p| !p.szi.is_zero())
                    .map(|p| open_trade_view(p, marks.get(&p.coin).copied()))
                    .collect(),
            )
        } else {
            None
        };

        let summary = summarize(&trades);

        Ok(TradeHistory {
            trades,
            open_trades,
            summary,
        })
    }

    /// The account's current open positions, as reported by the provider.
    pub async fn current_positions(
        &self,
        user: &Address,
    ) -> Result<Vec<PositionSnapshot>, crate::datasource::DataSourceError> {
        self.datasource.fetch_open_positions(user).await
    }
}

fn open_trade_view(position: &PositionSnapshot, mark_px: Option<Decimal>) -> OpenTrade {
    let direction = if position.szi.is_negative() {
        Direction::Short
    } else {
        Direction::Long
    };
    OpenTrade {
        coin: position.coin.clone(),
        direction,
        sz: position.szi.abs(),
        entry_px: position.entry_px,
        mark_px,
        unrealized_pnl: position.unrealized_pnl,
    }
}

fn summarize(trades: &[CompletedTrade]) -> TradeSummary {
    let trade_count = trades.len();
    let win_count = trades
        .iter()
        .filter(|t| t.realized_pnl.is_positive())
        .count();
    let mut total_realized_pnl = Decimal::zero();
    for trade in trades {
        total_realized_pnl += trade.realized_pnl;
    }

    let (win_rate_pct, avg_realized_pnl) = if trade_count == 0 {
        (Decimal::zero(), Decimal::zero())
    } else {
        let count = Decimal::from(trade_count as i64);
        (
            Decimal::from(win_count as i64) * Decimal::hundred() / count,
            total_realized_pnl / count,
        )
    };

    TradeSummary {
        trade_count,
        win_count,
        total_realized_pnl,
        win_rate_pct,
        avg_realized_pnl,
    }
}
