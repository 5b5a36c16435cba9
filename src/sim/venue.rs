//! Simulated collaborators for paper trading.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use super::SimulatedMarket;
use crate::domain::{MarketId, MarketWindow, OrderId, Side, TokenId};
use crate::error::{Error, ExecutionError};
use crate::port::{
    Clock, ExecutionResult, MarketProvider, OrderExecutor, OrderRequest, Quote, QuoteSource,
};

/// Fills every order in full at its limit price.
#[derive(Debug, Default)]
pub struct PaperExecutor {
    orders: AtomicU64,
}

impl PaperExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders filled so far.
    #[must_use]
    pub fn order_count(&self) -> u64 {
        self.orders.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl OrderExecutor for PaperExecutor {
    async fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult, Error> {
        self.orders.fetch_add(1, Ordering::Relaxed);
        Ok(ExecutionResult::Success {
            order_id: OrderId::new(Uuid::new_v4().to_string()),
            filled_amount: order.size,
            average_price: order.price,
        })
    }

    fn exchange_name(&self) -> &'static str {
        "paper"
    }
}

#[derive(Debug)]
struct QuoteState {
    market: SimulatedMarket,
    /// Other half of the last generated pair, not yet handed out.
    pending: Option<(Side, Quote)>,
}

/// Serves a [`SimulatedMarket`] through [`QuoteSource`].
///
/// The walk advances once per pair of requests: whichever side is asked for
/// first triggers a tick, and the opposite side then receives the matching
/// quote from the same tick.
#[derive(Debug)]
pub struct SimulatedQuotes {
    yes_token: TokenId,
    no_token: TokenId,
    state: Mutex<QuoteState>,
}

impl SimulatedQuotes {
    #[must_use]
    pub fn new(market: SimulatedMarket, yes_token: TokenId, no_token: TokenId) -> Self {
        Self {
            yes_token,
            no_token,
            state: Mutex::new(QuoteState {
                market,
                pending: None,
            }),
        }
    }

    fn side_of(&self, token: &TokenId) -> Option<Side> {
        if *token == self.yes_token {
            Some(Side::Yes)
        } else if *token == self.no_token {
            Some(Side::No)
        } else {
            None
        }
    }
}

#[async_trait]
impl QuoteSource for SimulatedQuotes {
    async fn quote(&self, token: &TokenId) -> Result<Quote, Error> {
        let side = self.side_of(token).ok_or_else(|| ExecutionError::QuoteUnavailable {
            token_id: token.to_string(),
            reason: "unknown token".into(),
        })?;

        let mut state = self.state.lock();
        if let Some((pending_side, quote)) = state.pending.take() {
            if pending_side == side {
                return Ok(quote);
            }
        }

        let pair = state.market.tick();
        state.pending = Some((side.opposite(), *pair.quote(side.opposite())));
        Ok(*pair.quote(side))
    }
}

/// Emits back-to-back windows of a fixed duration on the same token pair.
pub struct ScheduledMarkets {
    yes_token: TokenId,
    no_token: TokenId,
    duration: Duration,
    clock: Arc<dyn Clock>,
    issued: AtomicU64,
}

impl ScheduledMarkets {
    pub fn new(
        yes_token: TokenId,
        no_token: TokenId,
        duration: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            yes_token,
            no_token,
            duration,
            clock,
            issued: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl MarketProvider for ScheduledMarkets {
    async fn next_market(&self) -> Result<Option<MarketWindow>, Error> {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        let duration = chrono::Duration::from_std(self.duration).map_err(|e| {
            ExecutionError::MarketUnavailable(format!("window duration out of range: {e}"))
        })?;

        Ok(Some(MarketWindow::new(
            MarketId::new(format!("paper-{n}")),
            format!("Paper window #{n}"),
            self.yes_token.clone(),
            self.no_token.clone(),
            self.clock.now() + duration,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::SystemClock;
    use rust_decimal_macros::dec;

    fn quotes() -> SimulatedQuotes {
        SimulatedQuotes::new(
            SimulatedMarket::new(0.5, 0.05, 1),
            TokenId::from("y"),
            TokenId::from("n"),
        )
    }

    #[tokio::test]
    async fn paired_requests_share_one_tick() {
        let source = quotes();
        let mut reference = SimulatedMarket::new(0.5, 0.05, 1);
        let expected = reference.tick();

        let no = source.quote(&TokenId::from("n")).await.unwrap();
        let yes = source.quote(&TokenId::from("y")).await.unwrap();
        assert_eq!(yes, expected.yes);
        assert_eq!(no, expected.no);
    }

    #[tokio::test]
    async fn unknown_token_is_an_error() {
        let err = quotes().quote(&TokenId::from("x")).await.unwrap_err();
        assert!(err.to_string().contains("unknown token"));
    }

    #[tokio::test]
    async fn paper_executor_fills_at_limit() {
        let executor = PaperExecutor::new();
        let order = OrderRequest {
            token_id: TokenId::from("y"),
            side: Side::Yes,
            price: dec!(0.41),
            size: dec!(24.39),
        };
        let result = executor.execute(&order).await.unwrap();
        assert_eq!(result.filled(), Some((dec!(24.39), dec!(0.41))));
        assert_eq!(executor.order_count(), 1);
    }

    #[tokio::test]
    async fn scheduled_markets_are_numbered() {
        let markets = ScheduledMarkets::new(
            TokenId::from("y"),
            TokenId::from("n"),
            Duration::from_secs(900),
            Arc::new(SystemClock),
        );
        let first = markets.next_market().await.unwrap().unwrap();
        let second = markets.next_market().await.unwrap().unwrap();
        assert_eq!(first.market_id().as_str(), "paper-1");
        assert_eq!(second.market_id().as_str(), "paper-2");
        assert_eq!(first.token(Side::No).as_str(), "n");
    }
}
