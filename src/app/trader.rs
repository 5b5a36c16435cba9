//! Async trading loop.
//!
//! The trader asks the market provider for a window, then repeatedly fetches
//! both sides' quotes, ticks the [`WindowSession`] and executes any trade it
//! proposes, until the window nears its close, profit is locked or the risk
//! manager halts trading. Every suspension point (quotes, orders, markets,
//! sleeps) goes through a port, so the loop runs the same against a venue,
//! the simulator or a test clock.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};

use super::session::{TickDecision, TradeIntent, WindowSession, WindowSummary};
use crate::config::{Config, RunnerConfig};
use crate::domain::{MarketWindow, Side, StopReason};
use crate::error::Result;
use crate::port::{Clock, MarketProvider, OrderExecutor, OrderRequest, QuotePair, QuoteSource};

/// Why a window stopped trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum WindowExit {
    /// Remaining time fell to the close cutoff.
    MarketClosed,
    ProfitLocked,
    Halted(StopReason),
    /// `max_ticks_per_window` was reached.
    TickLimit,
}

/// Outcome of trading one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub exit: WindowExit,
    pub summary: WindowSummary,
    pub orders_submitted: u64,
    pub orders_failed: u64,
}

#[derive(Debug, Default)]
struct OrderCounts {
    submitted: u64,
    failed: u64,
}

/// Drives a [`WindowSession`] against live collaborators.
pub struct Trader {
    runner: RunnerConfig,
    session: WindowSession,
    markets: Arc<dyn MarketProvider>,
    quotes: Arc<dyn QuoteSource>,
    executor: Arc<dyn OrderExecutor>,
    clock: Arc<dyn Clock>,
}

impl Trader {
    pub fn new(
        config: &Config,
        markets: Arc<dyn MarketProvider>,
        quotes: Arc<dyn QuoteSource>,
        executor: Arc<dyn OrderExecutor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            runner: config.runner.clone(),
            session: WindowSession::new(config),
            markets,
            quotes,
            executor,
            clock,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &WindowSession {
        &self.session
    }

    /// Trade windows until `max_windows` have completed, or forever when
    /// `None`. Provider failures are logged and retried.
    pub async fn run(&mut self, max_windows: Option<usize>) -> Vec<WindowReport> {
        let mut reports = Vec::new();

        while max_windows.map_or(true, |max| reports.len() < max) {
            match self.markets.next_market().await {
                Ok(Some(market)) => {
                    reports.push(self.run_window(market).await);
                    self.clock.sleep(self.runner.cooldown()).await;
                }
                Ok(None) => {
                    info!("No active market found, waiting");
                    self.clock.sleep(self.runner.idle_interval()).await;
                }
                Err(e) => {
                    warn!(error = %e, "Market lookup failed");
                    self.clock.sleep(self.runner.retry_interval()).await;
                }
            }
        }

        reports
    }

    /// Trade a single window to completion.
    pub async fn run_window(&mut self, market: MarketWindow) -> WindowReport {
        let span = info_span!("window", market_id = %market.market_id());
        self.trade_window(market).instrument(span).await
    }

    async fn trade_window(&mut self, market: MarketWindow) -> WindowReport {
        self.session.begin_window(market.clone());
        let mut orders = OrderCounts::default();
        let mut ticks = 0u64;

        let exit = loop {
            let remaining = market
                .time_remaining(self.clock.now())
                .to_std()
                .unwrap_or_default();
            if remaining <= self.runner.close_cutoff() {
                break WindowExit::MarketClosed;
            }
            if self
                .runner
                .max_ticks_per_window
                .is_some_and(|max| ticks >= max)
            {
                break WindowExit::TickLimit;
            }
            ticks += 1;

            let quotes = match self.fetch_quotes(&market).await {
                Ok(quotes) => quotes,
                Err(e) => {
                    warn!(error = %e, "Could not get prices, retrying");
                    self.clock.sleep(self.runner.retry_interval()).await;
                    continue;
                }
            };

            match self.session.tick(&quotes) {
                TickDecision::Trade(intent) => {
                    self.execute(&market, &intent, &mut orders).await;
                }
                TickDecision::Halt(reason) if self.runner.halt_ends_window => {
                    break WindowExit::Halted(reason);
                }
                TickDecision::Skip(reason) => {
                    warn!(reason = ?reason, "Quotes unusable, retrying");
                    self.clock.sleep(self.runner.retry_interval()).await;
                    continue;
                }
                TickDecision::Halt(_) | TickDecision::Hold | TickDecision::Blocked(_) => {}
            }

            if self.session.is_complete() {
                info!(
                    locked_profit = %self.session.ledger().locked_profit().round_dp(2),
                    "Profit locked"
                );
                break WindowExit::ProfitLocked;
            }

            self.clock.sleep(self.runner.tick_interval()).await;
        };

        let summary = self.session.summary();
        info!(
            exit = ?exit,
            ticks = summary.ticks,
            fills = summary.fills,
            pair_cost = %summary.ledger.pair_cost.round_dp(4),
            locked_profit = %summary.ledger.locked_profit.round_dp(2),
            "Window finished"
        );

        WindowReport {
            exit,
            summary,
            orders_submitted: orders.submitted,
            orders_failed: orders.failed,
        }
    }

    async fn fetch_quotes(&self, market: &MarketWindow) -> Result<QuotePair> {
        let (yes, no) = tokio::join!(
            self.quotes.quote(market.token(Side::Yes)),
            self.quotes.quote(market.token(Side::No)),
        );
        Ok(QuotePair::new(yes?, no?))
    }

    async fn execute(
        &mut self,
        market: &MarketWindow,
        intent: &TradeIntent,
        orders: &mut OrderCounts,
    ) {
        let signal = &intent.signal;
        let order = OrderRequest {
            token_id: market.token(signal.side).clone(),
            side: signal.side,
            price: signal.price,
            size: signal.quantity,
        };

        info!(
            side = %signal.side,
            quantity = %signal.quantity.round_dp(2),
            price = %signal.price.round_dp(4),
            exchange = self.executor.exchange_name(),
            "Executing"
        );
        orders.submitted += 1;

        let result = match self.executor.execute(&order).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Order submission failed");
                orders.failed += 1;
                return;
            }
        };

        let Some((quantity, price)) = result.filled() else {
            warn!(result = ?result, "Trade failed");
            orders.failed += 1;
            return;
        };

        if let Err(e) = self.session.record_fill(signal.side, quantity, price) {
            warn!(error = %e, "Fill could not be recorded");
            orders.failed += 1;
        }
    }
}
