//! Aggregation across instruments: group, track, merge, sort.

use crate::domain::{Coin, CompletedTrade, ExecutionEvent};
use crate::engine::normalize::{normalize_events, RawEvent};
use crate::engine::position_tracker::PositionTracker;
use std::collections::{HashMap, HashSet};

/// Rebuild completed round-trip trades from raw provider records.
///
/// Pure function of its inputs: normalization drops unusable records, each
/// instrument's events run through an independent tracker in timestamp
/// order (stable, so same-timestamp records keep arrival order), and the
/// merged result is sorted by exit time descending.
///
/// Instruments in `open_coins` are skipped entirely: with a position still
/// open, a bounded history window cannot tell which closes belong to the
/// current leg, so their reconstruction is inconclusive.
pub fn reconstruct_trades(
    raw_events: &[RawEvent],
    open_coins: &HashSet<Coin>,
) -> Vec<CompletedTrade> {
    let events = normalize_events(raw_events);

    let mut trades = Vec::new();
    for (coin, mut group) in group_by_coin(events) {
        if open_coins.contains(&coin) {
            continue;
        }
        group.sort_by_key(|e| e.time_ms);

        let mut tracker = PositionTracker::new(coin);
        for event in &group {
            tracker.process_event(event);
        }
        trades.extend(tracker.into_trades());
    }

    trades.sort_by(|a, b| b.exit_time_ms.cmp(&a.exit_time_ms));
    trades
}

/// Group events per instrument, in deterministic first-appearance order.
fn group_by_coin(events: Vec<ExecutionEvent>) -> Vec<(Coin, Vec<ExecutionEvent>)> {
    let mut index: HashMap<Coin, usize> = HashMap::new();
    let mut groups: Vec<(Coin, Vec<ExecutionEvent>)> = Vec::new();

    for event in events {
        match index.get(&event.coin) {
            Some(&slot) => groups[slot].1.push(event),
            None => {
                index.insert(event.coin.clone(), groups.len());
                let coin = event.coin.clone();
                groups.push((coin, vec![event]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, Side, TimeMs};

    fn canonical(coin: &str, side: Side, sz: &str, px: &str, time_ms: i64) -> ExecutionEvent {
        ExecutionEvent {
            coin: Coin::new(coin.to_string()),
            time_ms: TimeMs::new(time_ms),
            side,
            sz: Decimal::from_str_canonical(sz).unwrap(),
            px: Decimal::from_str_canonical(px).unwrap(),
            reported_pnl: None,
        }
    }

    #[test]
    fn test_group_by_coin_keeps_first_appearance_order() {
        let events = vec![
            canonical("ETH", Side::Buy, "1", "100", 1),
            canonical("BTC", Side::Buy, "1", "100", 2),
            canonical("ETH", Side::Sell, "1", "110", 3),
        ];
        let groups = group_by_coin(events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Coin::new("ETH".to_string()));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Coin::new("BTC".to_string()));
    }
}
