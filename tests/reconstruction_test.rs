use std::collections::HashSet;
use tradelens::engine::{FillEvent, LedgerDelta, LedgerUpdate};
use tradelens::{reconstruct_trades, Coin, Decimal, Direction, RawEvent};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn coin(s: &str) -> Coin {
    Coin::new(s.to_string())
}

fn ledger(coin: &str, side: &str, sz: &str, px: &str, time: i64) -> RawEvent {
    RawEvent::Ledger(LedgerUpdate {
        time,
        hash: None,
        delta: LedgerDelta {
            kind: "trade".to_string(),
            coin: Some(coin.to_string()),
            side: Some(side.to_string()),
            sz: Some(sz.to_string()),
            px: Some(px.to_string()),
            closed_pnl: None,
            usdc: None,
            fee: None,
        },
    })
}

fn fill(coin: &str, side_code: &str, sz: &str, px: &str, closed_pnl: &str, time: i64) -> RawEvent {
    RawEvent::Fill(FillEvent {
        coin: coin.to_string(),
        time,
        side: side_code.to_string(),
        px: px.to_string(),
        sz: sz.to_string(),
        closed_pnl: Some(closed_pnl.to_string()),
        fee: None,
        tid: None,
        oid: None,
    })
}

fn no_open() -> HashSet<Coin> {
    HashSet::new()
}

#[test]
fn test_simple_round_trip() {
    let events = vec![
        ledger("BTC", "buy", "1", "100", 1000),
        ledger("BTC", "sell", "1", "110", 2000),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].coin, coin("BTC"));
    assert_eq!(trades[0].direction, Direction::Long);
    assert_eq!(trades[0].entry_px, d("100"));
    assert_eq!(trades[0].exit_px, d("110"));
    assert_eq!(trades[0].sz, d("1"));
    assert_eq!(trades[0].realized_pnl, d("10"));
    assert_eq!(trades[0].duration_ms, 1000);
}

#[test]
fn test_partial_close_sequence_emits_each_close() {
    let events = vec![
        ledger("BTC", "buy", "10", "100", 1000),
        ledger("BTC", "sell", "4", "120", 2000),
        ledger("BTC", "sell", "6", "130", 3000),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    // Most recent exit first.
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].sz, d("6"));
    assert_eq!(trades[0].entry_px, d("100"));
    assert_eq!(trades[0].exit_px, d("130"));
    assert_eq!(trades[0].realized_pnl, d("180"));

    assert_eq!(trades[1].sz, d("4"));
    assert_eq!(trades[1].entry_px, d("100"));
    assert_eq!(trades[1].exit_px, d("120"));
    assert_eq!(trades[1].realized_pnl, d("80"));
}

#[test]
fn test_reversal_emits_one_trade_and_reopens_short() {
    let events = vec![
        ledger("BTC", "buy", "10", "100", 1000),
        ledger("BTC", "sell", "15", "110", 2000),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].direction, Direction::Long);
    assert_eq!(trades[0].sz, d("10"));
    assert_eq!(trades[0].entry_px, d("100"));
    assert_eq!(trades[0].exit_px, d("110"));
    assert_eq!(trades[0].realized_pnl, d("100"));

    // The residual short of 5 at 110 is only observable through a later
    // close, which must price against the flip fill.
    let events = vec![
        ledger("BTC", "buy", "10", "100", 1000),
        ledger("BTC", "sell", "15", "110", 2000),
        ledger("BTC", "buy", "5", "104", 3000),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].direction, Direction::Short);
    assert_eq!(trades[0].sz, d("5"));
    assert_eq!(trades[0].entry_px, d("110"));
    assert_eq!(trades[0].exit_px, d("104"));
    assert_eq!(trades[0].realized_pnl, d("30"));
    assert_eq!(trades[0].entry_time_ms.as_i64(), 2000);
}

#[test]
fn test_conservation_against_whole_history_replay() {
    // Multi-leg long with adds and partial closes, ending flat. The sum of
    // per-close PnL must equal total proceeds minus total cost.
    let events = vec![
        ledger("BTC", "buy", "10", "100", 1000),
        ledger("BTC", "buy", "10", "110", 2000),
        ledger("BTC", "sell", "5", "120", 3000),
        ledger("BTC", "sell", "15", "90", 4000),
    ];
    let trades = reconstruct_trades(&events, &no_open());
    assert_eq!(trades.len(), 2);

    let mut emitted = Decimal::zero();
    for trade in &trades {
        emitted += trade.realized_pnl;
    }

    let proceeds = d("5") * d("120") + d("15") * d("90");
    let cost = d("10") * d("100") + d("10") * d("110");
    assert_eq!(emitted, proceeds - cost);
}

#[test]
fn test_average_entry_unchanged_by_partial_close() {
    // Both closes of the same leg must report the same entry price.
    let events = vec![
        ledger("ETH", "sell", "8", "200", 1000),
        ledger("ETH", "buy", "3", "190", 2000),
        ledger("ETH", "buy", "5", "180", 3000),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].entry_px, d("200"));
    assert_eq!(trades[1].entry_px, d("200"));
    assert_eq!(trades[1].realized_pnl, d("30"));
    assert_eq!(trades[0].realized_pnl, d("100"));
}

#[test]
fn test_grouping_is_insensitive_to_interleaving() {
    let btc = vec![
        ledger("BTC", "buy", "1", "100", 1000),
        ledger("BTC", "sell", "1", "110", 3000),
    ];
    let eth = vec![
        ledger("ETH", "buy", "2", "200", 2000),
        ledger("ETH", "sell", "2", "210", 4000),
    ];

    let mut interleaved = Vec::new();
    interleaved.push(btc[0].clone());
    interleaved.push(eth[0].clone());
    interleaved.push(btc[1].clone());
    interleaved.push(eth[1].clone());

    let mut concatenated = Vec::new();
    concatenated.extend(btc);
    concatenated.extend(eth);

    let a = reconstruct_trades(&interleaved, &no_open());
    let b = reconstruct_trades(&concatenated, &no_open());
    assert_eq!(a, b);
}

#[test]
fn test_open_instrument_is_suppressed() {
    let events = vec![
        ledger("BTC", "buy", "1", "100", 1000),
        ledger("BTC", "sell", "1", "110", 2000),
        ledger("ETH", "buy", "2", "200", 1500),
        ledger("ETH", "sell", "2", "210", 2500),
    ];
    let open: HashSet<Coin> = [coin("BTC")].into_iter().collect();
    let trades = reconstruct_trades(&events, &open);

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].coin, coin("ETH"));
}

#[test]
fn test_output_sorted_by_exit_time_descending() {
    let events = vec![
        ledger("BTC", "buy", "1", "10", 50),
        ledger("BTC", "sell", "1", "11", 100),
        ledger("ETH", "buy", "1", "10", 60),
        ledger("ETH", "sell", "1", "11", 300),
        ledger("SOL", "buy", "1", "10", 70),
        ledger("SOL", "sell", "1", "11", 200),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    let exits: Vec<i64> = trades.iter().map(|t| t.exit_time_ms.as_i64()).collect();
    assert_eq!(exits, vec![300, 200, 100]);
}

#[test]
fn test_fill_source_uses_reported_pnl() {
    let events = vec![
        fill("BTC", "A", "2", "100", "0", 1000),
        fill("BTC", "B", "2", "95", "-10", 2000),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].direction, Direction::Long);
    // Reported mode: PnL verbatim, size is the full antecedent position.
    assert_eq!(trades[0].realized_pnl, d("-10"));
    assert_eq!(trades[0].sz, d("2"));
}

#[test]
fn test_non_trade_ledger_entries_are_ignored() {
    let deposit = RawEvent::Ledger(LedgerUpdate {
        time: 1500,
        hash: Some("0xdead".to_string()),
        delta: LedgerDelta {
            kind: "deposit".to_string(),
            coin: None,
            side: None,
            sz: None,
            px: None,
            closed_pnl: None,
            usdc: Some("5000".to_string()),
            fee: None,
        },
    });
    let events = vec![
        ledger("BTC", "buy", "1", "100", 1000),
        deposit,
        ledger("BTC", "sell", "1", "110", 2000),
    ];
    let trades = reconstruct_trades(&events, &no_open());
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].realized_pnl, d("10"));
}

#[test]
fn test_dust_residual_closes_flat() {
    // Fill accounting that misses exact zero by less than the tolerance
    // must still produce a clean flat, so the next buy opens fresh.
    let events = vec![
        ledger("BTC", "buy", "1", "100", 1000),
        ledger("BTC", "sell", "0.99999", "110", 2000),
        ledger("BTC", "buy", "1", "120", 3000),
        ledger("BTC", "sell", "1", "125", 4000),
    ];
    let trades = reconstruct_trades(&events, &no_open());

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].entry_px, d("120"));
    assert_eq!(trades[0].realized_pnl, d("5"));
}

#[test]
fn test_deterministic_over_repeated_runs() {
    let events = vec![
        ledger("BTC", "buy", "3", "100", 1000),
        ledger("ETH", "sell", "2", "200", 1100),
        ledger("BTC", "sell", "1", "105", 1200),
        ledger("ETH", "buy", "2", "195", 1300),
        ledger("BTC", "sell", "2", "110", 1400),
    ];
    let first = reconstruct_trades(&events, &no_open());
    let second = reconstruct_trades(&events, &no_open());
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}
