//! Position ledger for one settlement window.
//!
//! The ledger is the authoritative record of confirmed fills on both sides of
//! a binary market. Every arbitrage metric the strategy relies on (pair cost,
//! hedged quantity, locked profit, balance) is derived from it on demand and
//! never cached.
//!
//! The core relation is:
//!
//! ```text
//! pair_cost     = avg(YES) + avg(NO)
//! locked_profit = min(qty YES, qty NO) * (1 - pair_cost)
//! ```
//!
//! A pair cost below 1.0 with both sides held means the hedged quantity pays
//! out more than it cost, whichever side settles true.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{DomainError, Price, Side, Volume};

/// One executed purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    side: Side,
    quantity: Volume,
    price: Price,
    cost: Price,
    filled_at: DateTime<Utc>,
}

impl Fill {
    fn new(side: Side, quantity: Volume, price: Price) -> Self {
        Self {
            side,
            quantity,
            price,
            cost: quantity * price,
            filled_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn quantity(&self) -> Volume {
        self.quantity
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Quantity times price, computed at construction.
    #[must_use]
    pub const fn cost(&self) -> Price {
        self.cost
    }

    #[must_use]
    pub const fn filled_at(&self) -> DateTime<Utc> {
        self.filled_at
    }
}

/// Accumulated holdings on one side.
#[derive(Debug, Clone, Default)]
pub struct Position {
    quantity: Volume,
    total_cost: Price,
    fills: Vec<Fill>,
}

impl Position {
    #[must_use]
    pub const fn quantity(&self) -> Volume {
        self.quantity
    }

    #[must_use]
    pub const fn total_cost(&self) -> Price {
        self.total_cost
    }

    /// Fills in the order they were recorded.
    #[must_use]
    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Average price paid per share, zero when nothing is held.
    #[must_use]
    pub fn average_price(&self) -> Price {
        if self.quantity.is_zero() {
            return Decimal::ZERO;
        }
        self.total_cost / self.quantity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Average price after adding `quantity` at `price`, without recording it.
    fn projected_average(&self, quantity: Volume, price: Price) -> Price {
        let new_quantity = self.quantity + quantity;
        if new_quantity.is_zero() {
            return Decimal::ZERO;
        }
        (self.total_cost + quantity * price) / new_quantity
    }

    fn push(&mut self, fill: Fill) {
        self.quantity += fill.quantity;
        self.total_cost += fill.cost;
        self.fills.push(fill);
    }
}

/// Both sides' holdings for the current settlement window.
///
/// Mutated only by [`Ledger::record_fill`] and [`Ledger::reset`]; every other
/// method is a read-only derivation.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    yes: Position,
    no: Position,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Position held on `side`.
    #[must_use]
    pub const fn position(&self, side: Side) -> &Position {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }

    fn position_mut(&mut self, side: Side) -> &mut Position {
        match side {
            Side::Yes => &mut self.yes,
            Side::No => &mut self.no,
        }
    }

    /// Record a confirmed fill.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFill`] if `quantity` or `price` is not
    /// strictly positive. No upper bound is enforced here.
    pub fn record_fill(
        &mut self,
        side: Side,
        quantity: Volume,
        price: Price,
    ) -> Result<&Fill, DomainError> {
        let invalid = |reason| DomainError::InvalidFill {
            side,
            quantity,
            price,
            reason,
        };
        if quantity <= Decimal::ZERO {
            return Err(invalid("quantity must be positive"));
        }
        if price <= Decimal::ZERO {
            return Err(invalid("price must be positive"));
        }

        self.position_mut(side).push(Fill::new(side, quantity, price));

        let position = self.position(side);
        info!(
            side = %side,
            quantity = %quantity.round_dp(2),
            price = %price.round_dp(4),
            average = %position.average_price().round_dp(4),
            pair_cost = %self.pair_cost().round_dp(4),
            "Fill recorded"
        );

        let fill = position
            .fills
            .last()
            .ok_or_else(|| invalid("fill was not retained"))?;
        Ok(fill)
    }

    /// Pair cost that would result from filling `quantity` at `price` on `side`.
    ///
    /// The opposite side's average is taken as-is. Nothing is recorded.
    #[must_use]
    pub fn simulate_fill(&self, side: Side, quantity: Volume, price: Price) -> Price {
        let projected = self.position(side).projected_average(quantity, price);
        projected + self.average_price(side.opposite())
    }

    /// Average price for `side`, zero when empty.
    #[must_use]
    pub fn average_price(&self, side: Side) -> Price {
        self.position(side).average_price()
    }

    /// Sum of both sides' average prices.
    #[must_use]
    pub fn pair_cost(&self) -> Price {
        self.yes.average_price() + self.no.average_price()
    }

    /// Total spent across both sides.
    #[must_use]
    pub fn total_cost(&self) -> Price {
        self.yes.total_cost + self.no.total_cost
    }

    /// Hedged quantity: the smaller of the two sides.
    #[must_use]
    pub fn min_quantity(&self) -> Volume {
        self.yes.quantity.min(self.no.quantity)
    }

    /// YES quantity minus NO quantity. Positive means YES-heavy.
    #[must_use]
    pub fn quantity_imbalance(&self) -> Volume {
        self.yes.quantity - self.no.quantity
    }

    /// Smaller side over larger side; zero if either side is empty.
    #[must_use]
    pub fn balance_ratio(&self) -> Decimal {
        if self.yes.is_empty() || self.no.is_empty() {
            return Decimal::ZERO;
        }
        let min = self.yes.quantity.min(self.no.quantity);
        let max = self.yes.quantity.max(self.no.quantity);
        min / max
    }

    /// Dollars redeemed at settlement regardless of outcome.
    #[must_use]
    pub fn guaranteed_payout(&self) -> Price {
        self.min_quantity()
    }

    /// Profit guaranteed on the hedged quantity.
    #[must_use]
    pub fn locked_profit(&self) -> Price {
        self.min_quantity() * (Decimal::ONE - self.pair_cost())
    }

    /// Profit if the larger side settles true.
    #[must_use]
    pub fn max_potential_profit(&self) -> Price {
        self.yes.quantity.max(self.no.quantity) - self.total_cost()
    }

    /// Profit if the smaller side settles true.
    #[must_use]
    pub fn min_potential_profit(&self) -> Price {
        self.yes.quantity.min(self.no.quantity) - self.total_cost()
    }

    /// Realized profit if `winner` settles true.
    #[must_use]
    pub fn settle(&self, winner: Side) -> Price {
        self.position(winner).quantity - self.total_cost()
    }

    /// Whether no fill has been recorded on either side.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.yes.fills.is_empty() && self.no.fills.is_empty()
    }

    /// Number of fills across both sides.
    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.yes.fills.len() + self.no.fills.len()
    }

    /// Clear both positions and their fill history.
    pub fn reset(&mut self) {
        self.yes = Position::default();
        self.no = Position::default();
        info!("Positions reset for new trading window");
    }

    /// Point-in-time status view.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            yes: SideSnapshot::from(&self.yes),
            no: SideSnapshot::from(&self.no),
            pair_cost: self.pair_cost(),
            total_cost: self.total_cost(),
            guaranteed_payout: self.guaranteed_payout(),
            locked_profit: self.locked_profit(),
            balance_ratio: self.balance_ratio(),
            min_quantity: self.min_quantity(),
        }
    }
}

/// Serializable per-side status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideSnapshot {
    pub quantity: Volume,
    pub average_price: Price,
    pub total_cost: Price,
    pub fills: usize,
}

impl From<&Position> for SideSnapshot {
    fn from(position: &Position) -> Self {
        Self {
            quantity: position.quantity,
            average_price: position.average_price(),
            total_cost: position.total_cost,
            fills: position.fills.len(),
        }
    }
}

/// Serializable ledger status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub yes: SideSnapshot,
    pub no: SideSnapshot,
    pub pair_cost: Price,
    pub total_cost: Price,
    pub guaranteed_payout: Price,
    pub locked_profit: Price,
    pub balance_ratio: Decimal,
    pub min_quantity: Volume,
}
