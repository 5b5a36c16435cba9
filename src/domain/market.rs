//! Settlement window metadata.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{MarketId, Side, TokenId};

/// One bounded-duration binary market instance.
///
/// Each side trades under its own token; the window resolves at `end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketWindow {
    market_id: MarketId,
    question: String,
    yes_token: TokenId,
    no_token: TokenId,
    end_time: DateTime<Utc>,
}

impl MarketWindow {
    pub fn new(
        market_id: MarketId,
        question: impl Into<String>,
        yes_token: TokenId,
        no_token: TokenId,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            market_id,
            question: question.into(),
            yes_token,
            no_token,
            end_time,
        }
    }

    #[must_use]
    pub const fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Token traded for `side`.
    #[must_use]
    pub const fn token(&self, side: Side) -> &TokenId {
        match side {
            Side::Yes => &self.yes_token,
            Side::No => &self.no_token,
        }
    }

    #[must_use]
    pub const fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Time left until resolution, floored at zero.
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end_time - now).max(Duration::zero())
    }

    #[must_use]
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(end_time: DateTime<Utc>) -> MarketWindow {
        MarketWindow::new(
            MarketId::from("m-1"),
            "Will BTC close higher?",
            TokenId::from("yes-1"),
            TokenId::from("no-1"),
            end_time,
        )
    }

    #[test]
    fn time_remaining_counts_down() {
        let now = Utc::now();
        let market = window(now + Duration::seconds(90));
        assert_eq!(market.time_remaining(now), Duration::seconds(90));
        assert!(!market.is_closed(now));
    }

    #[test]
    fn time_remaining_floors_at_zero() {
        let now = Utc::now();
        let market = window(now - Duration::seconds(5));
        assert_eq!(market.time_remaining(now), Duration::zero());
        assert!(market.is_closed(now));
    }

    #[test]
    fn token_per_side() {
        let market = window(Utc::now());
        assert_eq!(market.token(Side::Yes).as_str(), "yes-1");
        assert_eq!(market.token(Side::No).as_str(), "no-1");
    }
}
