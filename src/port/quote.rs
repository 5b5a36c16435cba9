//! Best bid/ask quotes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Price, Side, TokenId};
use crate::error::Error;

/// Top of book for one outcome token. Either side of the book may be empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub bid: Option<Price>,
    pub ask: Option<Price>,
}

impl Quote {
    #[must_use]
    pub const fn new(bid: Option<Price>, ask: Option<Price>) -> Self {
        Self { bid, ask }
    }

    /// Quote with both sides of the book present.
    #[must_use]
    pub const fn two_sided(bid: Price, ask: Price) -> Self {
        Self::new(Some(bid), Some(ask))
    }

    /// Ask minus bid, when both are present.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.ask? - self.bid?)
    }
}

/// Quotes for both sides of one market, taken in the same tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuotePair {
    pub yes: Quote,
    pub no: Quote,
}

impl QuotePair {
    #[must_use]
    pub const fn new(yes: Quote, no: Quote) -> Self {
        Self { yes, no }
    }

    #[must_use]
    pub const fn quote(&self, side: Side) -> &Quote {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }

    #[must_use]
    pub const fn ask(&self, side: Side) -> Option<Price> {
        self.quote(side).ask
    }

    #[must_use]
    pub const fn bid(&self, side: Side) -> Option<Price> {
        self.quote(side).bid
    }
}

/// Source of top-of-book quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Current best bid and ask for `token`.
    async fn quote(&self, token: &TokenId) -> Result<Quote, Error>;
}
