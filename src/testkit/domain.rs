//! Builders for windows, quotes and configurations used across tests.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::config::{Config, RunnerConfig};
use crate::domain::{MarketId, MarketWindow, TokenId};
use crate::port::{Quote, QuotePair};

pub const YES_TOKEN: &str = "yes-token";
pub const NO_TOKEN: &str = "no-token";

/// A window on [`YES_TOKEN`]/[`NO_TOKEN`] closing `minutes` after `now`.
pub fn window(id: &str, now: DateTime<Utc>, minutes: i64) -> MarketWindow {
    MarketWindow::new(
        MarketId::from(id),
        format!("Test window {id}"),
        TokenId::from(YES_TOKEN),
        TokenId::from(NO_TOKEN),
        now + Duration::minutes(minutes),
    )
}

/// Ask-only quotes for both sides.
pub fn asks(yes: Decimal, no: Decimal) -> QuotePair {
    QuotePair::new(Quote::new(None, Some(yes)), Quote::new(None, Some(no)))
}

/// Two-sided quotes for both sides.
pub fn book(yes_bid: Decimal, yes_ask: Decimal, no_bid: Decimal, no_ask: Decimal) -> QuotePair {
    QuotePair::new(
        Quote::two_sided(yes_bid, yes_ask),
        Quote::two_sided(no_bid, no_ask),
    )
}

/// Default strategy settings with round-number pacing: ticks and retries 1s
/// apart, idle 10s, no cooldown, 30s close cutoff.
pub fn fast_config() -> Config {
    Config {
        runner: RunnerConfig {
            tick_interval_ms: 1_000,
            idle_interval_ms: 10_000,
            retry_interval_ms: 1_000,
            cooldown_ms: 0,
            close_cutoff_secs: 30,
            halt_ends_window: true,
            max_ticks_per_window: None,
        },
        ..Config::default()
    }
}
