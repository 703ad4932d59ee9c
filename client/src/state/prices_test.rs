use super::*;

fn price(amount: &str) -> Price {
    Price { base: Some("BTC".to_owned()), currency: "USD".to_owned(), amount: amount.to_owned() }
}

// =============================================================
// PriceBoard
// =============================================================

#[test]
fn new_board_tracks_pairs_in_order() {
    let board = PriceBoard::new(TRACKED_PAIRS);
    assert_eq!(board.pairs().collect::<Vec<_>>(), vec!["BTC-USD", "ETH-USD", "LTC-USD"]);
    assert_eq!(board.quote("BTC-USD"), Some(&Quote::default()));
    assert!(board.server_time.is_none());
    assert!(board.error.is_none());
}

#[test]
fn apply_fills_matching_slot() {
    let mut board = PriceBoard::new(["BTC-USD"]);
    board.apply("BTC-USD", PriceKind::Spot, price("100.00"));

    let quote = board.quote("BTC-USD").unwrap();
    assert_eq!(quote.get(PriceKind::Spot), Some(&price("100.00")));
    assert!(quote.get(PriceKind::Buy).is_none());
}

#[test]
fn apply_starts_tracking_unknown_pair() {
    let mut board = PriceBoard::default();
    board.apply("DOGE-USD", PriceKind::Buy, price("0.10"));
    assert_eq!(board.pairs().collect::<Vec<_>>(), vec!["DOGE-USD"]);
}

#[test]
fn spread_needs_both_sides() {
    let mut board = PriceBoard::new(["BTC-USD"]);
    assert_eq!(board.spread("BTC-USD"), None);

    board.apply("BTC-USD", PriceKind::Buy, price("101.50"));
    assert_eq!(board.spread("BTC-USD"), None);

    board.apply("BTC-USD", PriceKind::Sell, price("99.50"));
    let spread = board.spread("BTC-USD").unwrap();
    assert!((spread - 2.0).abs() < 1e-9);

    assert_eq!(board.spread("ETH-USD"), None);
}

#[test]
fn spread_ignores_unparseable_amounts() {
    let mut board = PriceBoard::new(["BTC-USD"]);
    board.apply("BTC-USD", PriceKind::Buy, price("n/a"));
    board.apply("BTC-USD", PriceKind::Sell, price("99.50"));
    assert_eq!(board.spread("BTC-USD"), None);
}

#[test]
fn fail_records_error_and_apply_clears_it() {
    let mut board = PriceBoard::new(["BTC-USD"]);
    board.fail("BTC-USD", PriceKind::Sell, "request failed: 502");
    assert_eq!(board.error.as_deref(), Some("BTC-USD sell: request failed: 502"));

    board.apply("BTC-USD", PriceKind::Sell, price("99.50"));
    assert!(board.error.is_none());
}

// =============================================================
// formatting
// =============================================================

#[test]
fn parse_amount_rejects_non_finite() {
    assert_eq!(parse_amount(" 42.5 "), Some(42.5));
    assert_eq!(parse_amount("inf"), None);
    assert_eq!(parse_amount("NaN"), None);
    assert_eq!(parse_amount(""), None);
}

#[test]
fn format_helpers_use_placeholder() {
    assert_eq!(format_price(Some(&price("101.50"))), "101.50 USD");
    assert_eq!(format_price(None), "--");
    assert_eq!(format_spread(Some(2.0)), "2.00");
    assert_eq!(format_spread(None), "--");
}
