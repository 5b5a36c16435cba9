//! Scripted collaborators for the trading loop.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::{MarketWindow, OrderId, Side, TokenId};
use crate::error::{Error, ExecutionError};
use crate::port::{
    ExecutionResult, MarketProvider, OrderExecutor, OrderRequest, Quote, QuotePair, QuoteSource,
};

/// Replays quotes per token in order.
///
/// `None` entries fail that request. Once a token's script is exhausted its
/// last quote keeps being served; a token with no script at all fails.
#[derive(Default)]
pub struct ScriptedQuotes {
    scripts: Mutex<HashMap<TokenId, VecDeque<Option<Quote>>>>,
    last: Mutex<HashMap<TokenId, Quote>>,
}

impl ScriptedQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script consecutive ticks for a token pair.
    pub fn with_ticks(self, yes: &TokenId, no: &TokenId, ticks: Vec<QuotePair>) -> Self {
        {
            let mut scripts = self.scripts.lock();
            for pair in ticks {
                scripts
                    .entry(yes.clone())
                    .or_default()
                    .push_back(Some(pair.yes));
                scripts.entry(no.clone()).or_default().push_back(Some(pair.no));
            }
        }
        self
    }

    /// Queue one failed request for `token`.
    pub fn with_outage(self, token: &TokenId) -> Self {
        self.scripts
            .lock()
            .entry(token.clone())
            .or_default()
            .push_back(None);
        self
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuotes {
    async fn quote(&self, token: &TokenId) -> Result<Quote, Error> {
        let next = self
            .scripts
            .lock()
            .get_mut(token)
            .and_then(VecDeque::pop_front);

        let unavailable = |reason: &str| ExecutionError::QuoteUnavailable {
            token_id: token.to_string(),
            reason: reason.to_string(),
        };

        match next {
            Some(Some(quote)) => {
                self.last.lock().insert(token.clone(), quote);
                Ok(quote)
            }
            Some(None) => Err(unavailable("scripted outage").into()),
            None => self
                .last
                .lock()
                .get(token)
                .copied()
                .ok_or_else(|| unavailable("no script").into()),
        }
    }
}

/// How [`RecordingExecutor`] answers orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Fill everything at the limit price.
    Full,
    /// Fill half the size at the limit price.
    Half,
    /// Answer with `ExecutionResult::Failed`.
    Reject,
    /// Return an error from `execute`.
    Error,
}

/// Records every order it receives.
pub struct RecordingExecutor {
    mode: FillMode,
    orders: Mutex<Vec<OrderRequest>>,
}

impl RecordingExecutor {
    pub fn new(mode: FillMode) -> Self {
        Self {
            mode,
            orders: Mutex::new(Vec::new()),
        }
    }

    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().clone()
    }

    pub fn orders_for(&self, side: Side) -> usize {
        self.orders.lock().iter().filter(|o| o.side == side).count()
    }
}

#[async_trait]
impl OrderExecutor for RecordingExecutor {
    async fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult, Error> {
        self.orders.lock().push(order.clone());
        let order_id = OrderId::new(Uuid::new_v4().to_string());

        match self.mode {
            FillMode::Full => Ok(ExecutionResult::Success {
                order_id,
                filled_amount: order.size,
                average_price: order.price,
            }),
            FillMode::Half => {
                let filled = order.size / rust_decimal::Decimal::TWO;
                Ok(ExecutionResult::PartialFill {
                    order_id,
                    filled_amount: filled,
                    remaining_amount: order.size - filled,
                    average_price: order.price,
                })
            }
            FillMode::Reject => Ok(ExecutionResult::Failed {
                reason: "scripted rejection".into(),
            }),
            FillMode::Error => {
                Err(ExecutionError::SubmissionFailed("scripted transport error".into()).into())
            }
        }
    }

    fn exchange_name(&self) -> &'static str {
        "recording"
    }
}

/// Hands out scripted lookups in order, then reports no market.
#[derive(Default)]
pub struct ScriptedMarkets {
    script: Mutex<VecDeque<Result<Option<MarketWindow>, String>>>,
}

impl ScriptedMarkets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(self, window: MarketWindow) -> Self {
        self.script.lock().push_back(Ok(Some(window)));
        self
    }

    pub fn with_empty(self) -> Self {
        self.script.lock().push_back(Ok(None));
        self
    }

    pub fn with_failure(self, reason: &str) -> Self {
        self.script.lock().push_back(Err(reason.to_string()));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl MarketProvider for ScriptedMarkets {
    async fn next_market(&self) -> Result<Option<MarketWindow>, Error> {
        match self.script.lock().pop_front() {
            Some(Ok(window)) => Ok(window),
            Some(Err(reason)) => Err(ExecutionError::MarketUnavailable(reason).into()),
            None => Ok(None),
        }
    }
}
