//! The async trading loop against scripted collaborators and a manual clock.

use std::sync::Arc;
use std::time::Duration;

use pairlock::app::{Trader, WindowExit};
use pairlock::config::Config;
use pairlock::domain::{Side, StopReason, TokenId};
use pairlock::port::{Clock, QuotePair};
use pairlock::testkit::clock::ManualClock;
use pairlock::testkit::domain::{asks, book, fast_config, window, NO_TOKEN, YES_TOKEN};
use pairlock::testkit::venue::{FillMode, RecordingExecutor, ScriptedMarkets, ScriptedQuotes};
use rust_decimal_macros::dec;

struct Harness {
    clock: Arc<ManualClock>,
    executor: Arc<RecordingExecutor>,
    trader: Trader,
}

fn tokens() -> (TokenId, TokenId) {
    (TokenId::from(YES_TOKEN), TokenId::from(NO_TOKEN))
}

fn harness(config: &Config, markets: ScriptedMarkets, quotes: ScriptedQuotes, mode: FillMode) -> Harness {
    let clock = Arc::new(ManualClock::epoch());
    let executor = Arc::new(RecordingExecutor::new(mode));
    let trader = Trader::new(
        config,
        Arc::new(markets),
        Arc::new(quotes),
        executor.clone(),
        clock.clone(),
    );
    Harness {
        clock,
        executor,
        trader,
    }
}

fn scripted(ticks: Vec<QuotePair>) -> ScriptedQuotes {
    let (yes, no) = tokens();
    ScriptedQuotes::new().with_ticks(&yes, &no, ticks)
}

fn one_window(minutes: i64) -> ScriptedMarkets {
    ScriptedMarkets::new().with_window(window("w1", ManualClock::epoch().now(), minutes))
}

#[tokio::test]
async fn trades_both_sides_until_profit_locked() {
    let quotes = scripted(vec![
        asks(dec!(0.40), dec!(0.59)),
        asks(dec!(0.90), dec!(0.08)),
        asks(dec!(0.30), dec!(0.68)),
    ]);
    let mut h = harness(&fast_config(), one_window(15), quotes, FillMode::Full);

    let reports = h.trader.run(Some(1)).await;
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report.exit, WindowExit::ProfitLocked);
    assert_eq!(report.orders_submitted, 5);
    assert_eq!(report.orders_failed, 0);
    assert_eq!(report.summary.fills, 5);
    assert!(report.summary.profit_locked);
    assert!(report.summary.ledger.pair_cost < dec!(0.41));

    assert_eq!(h.executor.orders_for(Side::Yes), 4);
    assert_eq!(h.executor.orders_for(Side::No), 1);
    let first = &h.executor.orders()[0];
    assert_eq!(first.token_id, TokenId::from(YES_TOKEN));
    assert_eq!(first.size, dec!(25));
}

#[tokio::test]
async fn stops_at_close_cutoff() {
    let quotes = scripted(vec![asks(dec!(0.50), dec!(0.50))]);
    let mut h = harness(&fast_config(), one_window(1), quotes, FillMode::Full);

    let report = h.trader.run_window(window("w1", h.clock.now(), 1)).await;
    assert_eq!(report.exit, WindowExit::MarketClosed);
    // 60s window, 30s cutoff, 1s ticks.
    assert_eq!(report.summary.ticks, 30);
    assert_eq!(report.orders_submitted, 0);
}

#[tokio::test]
async fn honours_tick_limit() {
    let mut config = fast_config();
    config.runner.max_ticks_per_window = Some(3);
    let quotes = scripted(vec![asks(dec!(0.50), dec!(0.50))]);
    let mut h = harness(&config, one_window(15), quotes, FillMode::Full);

    let report = h.trader.run_window(window("w1", h.clock.now(), 15)).await;
    assert_eq!(report.exit, WindowExit::TickLimit);
    assert_eq!(report.summary.ticks, 3);
}

#[tokio::test]
async fn quote_outage_backs_off_and_retries() {
    let mut config = fast_config();
    config.runner.max_ticks_per_window = Some(2);
    config.runner.retry_interval_ms = 2_500;
    let (yes, no) = tokens();
    let quotes = ScriptedQuotes::new()
        .with_outage(&yes)
        .with_ticks(&yes, &no, vec![asks(dec!(0.50), dec!(0.50))]);
    let mut h = harness(&config, one_window(15), quotes, FillMode::Full);

    let report = h.trader.run_window(window("w1", h.clock.now(), 15)).await;
    assert_eq!(report.exit, WindowExit::TickLimit);
    // The failed fetch never reached the session.
    assert_eq!(report.summary.ticks, 1);
    assert_eq!(h.clock.sleeps()[0], Duration::from_millis(2_500));
}

#[tokio::test]
async fn rejected_orders_leave_ledger_flat() {
    let mut config = fast_config();
    config.runner.max_ticks_per_window = Some(3);
    let quotes = scripted(vec![asks(dec!(0.40), dec!(0.55))]);
    let mut h = harness(&config, one_window(15), quotes, FillMode::Reject);

    let report = h.trader.run_window(window("w1", h.clock.now(), 15)).await;
    assert_eq!(report.orders_submitted, 3);
    assert_eq!(report.orders_failed, 3);
    assert_eq!(report.summary.fills, 0);
    assert!(h.trader.session().ledger().is_flat());
}

#[tokio::test]
async fn transport_errors_count_as_failures() {
    let mut config = fast_config();
    config.runner.max_ticks_per_window = Some(2);
    let quotes = scripted(vec![asks(dec!(0.40), dec!(0.55))]);
    let mut h = harness(&config, one_window(15), quotes, FillMode::Error);

    let report = h.trader.run_window(window("w1", h.clock.now(), 15)).await;
    assert_eq!(report.orders_failed, 2);
    assert!(h.trader.session().ledger().is_flat());
}

#[tokio::test]
async fn partial_fills_record_filled_quantity() {
    let mut config = fast_config();
    config.runner.max_ticks_per_window = Some(1);
    let quotes = scripted(vec![asks(dec!(0.40), dec!(0.55))]);
    let mut h = harness(&config, one_window(15), quotes, FillMode::Half);

    let report = h.trader.run_window(window("w1", h.clock.now(), 15)).await;
    assert_eq!(report.summary.fills, 1);
    assert_eq!(report.summary.ledger.yes.quantity, dec!(12.5));
    assert_eq!(report.summary.ledger.yes.total_cost, dec!(5));
}

#[tokio::test]
async fn mark_to_bid_loss_ends_window() {
    let mut config = fast_config();
    config.risk.max_loss_per_window = dec!(5);
    let quotes = scripted(vec![
        book(dec!(0.39), dec!(0.40), dec!(0.54), dec!(0.55)),
        book(dec!(0.01), dec!(0.40), dec!(0.01), dec!(0.55)),
    ]);
    let mut h = harness(&config, one_window(15), quotes, FillMode::Full);

    let report = h.trader.run_window(window("w1", h.clock.now(), 15)).await;
    assert!(matches!(
        report.exit,
        WindowExit::Halted(StopReason::MaxLoss { .. })
    ));
    assert_eq!(report.summary.fills, 1);
}

#[tokio::test]
async fn waits_out_empty_and_failed_lookups() {
    let markets = ScriptedMarkets::new()
        .with_empty()
        .with_failure("gateway timeout")
        .with_window(window("w1", ManualClock::epoch().now(), 15));
    let mut config = fast_config();
    config.runner.max_ticks_per_window = Some(1);
    let quotes = scripted(vec![asks(dec!(0.50), dec!(0.50))]);
    let mut h = harness(&config, markets, quotes, FillMode::Full);

    let reports = h.trader.run(Some(1)).await;
    assert_eq!(reports.len(), 1);

    let sleeps = h.clock.sleeps();
    assert_eq!(sleeps[0], Duration::from_secs(10));
    assert_eq!(sleeps[1], Duration::from_secs(1));
}

#[test]
fn scripted_quotes_repeat_last_tick() {
    let (yes, _) = tokens();
    let quotes = scripted(vec![asks(dec!(0.42), dec!(0.50))]);

    tokio_test::block_on(async {
        use pairlock::port::QuoteSource;
        let first = quotes.quote(&yes).await.unwrap();
        let again = quotes.quote(&yes).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(first.ask, Some(dec!(0.42)));
        assert!(quotes.quote(&TokenId::from("other")).await.is_err());
    });
}
