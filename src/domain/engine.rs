//! Arbitrage decision engine.
//!
//! Turns the current best asks and the ledger into at most one buy signal.
//! The engine only reads the ledger; recording fills is the caller's job
//! once an order is confirmed.
//!
//! Each side is evaluated independently:
//!
//! 1. Size the trade from the remaining budget.
//! 2. Simulate the fill and reject it if the projected pair cost exceeds the
//!    configured maximum.
//! 3. If the opposite side is held, reject asks at or above
//!    `1 - opposite average`.
//!
//! When both sides qualify, the lower projected pair cost wins. Within a
//! 0.001 margin the side that reduces the quantity imbalance wins instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Ledger, Price, Side, Volume};

/// Projected pair costs closer than this are treated as equal.
pub const PAIR_COST_TIE_MARGIN: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Balance required, alongside the profit target, to call a window complete.
pub const LOCKED_BALANCE_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Advisory price ceilings never exceed this.
pub const MAX_ADVISORY_PRICE: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

/// Advisory price ceilings never fall below this.
pub const MIN_ADVISORY_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Strategy thresholds for the decision engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrategyConfig {
    /// Maximum `avg YES + avg NO` a fill may project to.
    #[serde(default = "default_max_pair_cost")]
    pub max_pair_cost: Decimal,

    /// Maximum dollars spent on a single trade.
    #[serde(default = "default_max_trade_amount")]
    pub max_trade_amount: Decimal,

    /// Maximum dollars deployed across the window.
    #[serde(default = "default_max_total_exposure")]
    pub max_total_exposure: Decimal,

    /// Locked profit at which the window is considered complete.
    #[serde(default = "default_min_profit_target")]
    pub min_profit_target: Decimal,
}

fn default_max_pair_cost() -> Decimal {
    Decimal::new(99, 2)
}

fn default_max_trade_amount() -> Decimal {
    Decimal::from(10)
}

fn default_max_total_exposure() -> Decimal {
    Decimal::from(1000)
}

fn default_min_profit_target() -> Decimal {
    Decimal::from(5)
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            max_pair_cost: default_max_pair_cost(),
            max_trade_amount: default_max_trade_amount(),
            max_total_exposure: default_max_total_exposure(),
            min_profit_target: default_min_profit_target(),
        }
    }
}

/// A recommended purchase. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSignal {
    pub side: Side,
    pub price: Price,
    pub quantity: Volume,
    pub projected_pair_cost: Price,
    pub reason: String,
}

impl TradeSignal {
    /// Dollars the trade would spend.
    #[must_use]
    pub fn cost(&self) -> Price {
        self.price * self.quantity
    }
}

/// A buy recommendation with the context it was made in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeProposal {
    pub signal: TradeSignal,
    pub cost: Price,
    pub market_pair_cost: Price,
    pub current_pair_cost: Price,
}

/// Tagged recommendation for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Hold {
        market_pair_cost: Price,
        pair_cost: Price,
        locked_profit: Price,
    },
    BuyYes(TradeProposal),
    BuyNo(TradeProposal),
}

impl Recommendation {
    /// The proposal, unless holding.
    #[must_use]
    pub const fn proposal(&self) -> Option<&TradeProposal> {
        match self {
            Self::Hold { .. } => None,
            Self::BuyYes(proposal) | Self::BuyNo(proposal) => Some(proposal),
        }
    }

    #[must_use]
    pub const fn is_hold(&self) -> bool {
        matches!(self, Self::Hold { .. })
    }
}

/// Maximum price worth paying on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimalPrices {
    pub max_yes_price: Price,
    pub max_no_price: Price,
}

impl OptimalPrices {
    #[must_use]
    pub const fn for_side(&self, side: Side) -> Price {
        match side {
            Side::Yes => self.max_yes_price,
            Side::No => self.max_no_price,
        }
    }
}

/// Stateless decision engine over a borrowed ledger.
#[derive(Debug, Clone)]
pub struct ArbitrageEngine {
    config: StrategyConfig,
}

impl ArbitrageEngine {
    #[must_use]
    pub const fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Decide whether to buy a side at the given asks.
    #[must_use]
    pub fn analyze_opportunity(
        &self,
        ledger: &Ledger,
        yes_ask: Price,
        no_ask: Price,
    ) -> Option<TradeSignal> {
        if ledger.total_cost() >= self.config.max_total_exposure {
            debug!(total_cost = %ledger.total_cost(), "Max exposure reached, no new trades");
            return None;
        }

        if self.is_profit_locked(ledger) {
            debug!(locked_profit = %ledger.locked_profit().round_dp(2), "Profit locked");
            return None;
        }

        let market_pair_cost = yes_ask + no_ask;
        if market_pair_cost >= Decimal::ONE {
            debug!(market_pair_cost = %market_pair_cost, "No arbitrage: market pair cost >= 1");
            return None;
        }

        let yes = self.evaluate(ledger, Side::Yes, yes_ask);
        let no = self.evaluate(ledger, Side::No, no_ask);

        match (yes, no) {
            (Some(yes), Some(no)) => Some(self.choose(ledger, yes, no)),
            (yes, no) => yes.or(no),
        }
    }

    /// Candidate purchase on `side` at `price`, if it passes every bound.
    fn evaluate(&self, ledger: &Ledger, side: Side, price: Price) -> Option<TradeSignal> {
        if price <= Decimal::ZERO {
            return None;
        }

        let remaining = self.config.max_total_exposure - ledger.total_cost();
        let budget = self.config.max_trade_amount.min(remaining);
        if budget <= Decimal::ZERO {
            return None;
        }

        let quantity = budget / price;
        let projected_pair_cost = ledger.simulate_fill(side, quantity, price);
        if projected_pair_cost > self.config.max_pair_cost {
            return None;
        }

        let opposite = ledger.position(side.opposite());
        if !opposite.is_empty() {
            let ceiling = Decimal::ONE - opposite.average_price();
            if price >= ceiling {
                return None;
            }
        }

        Some(TradeSignal {
            side,
            price,
            quantity,
            projected_pair_cost,
            reason: format!("{side} cheap at ${:.4}", price),
        })
    }

    fn choose(&self, ledger: &Ledger, yes: TradeSignal, no: TradeSignal) -> TradeSignal {
        if yes.projected_pair_cost < no.projected_pair_cost - PAIR_COST_TIE_MARGIN {
            return yes;
        }
        if no.projected_pair_cost < yes.projected_pair_cost - PAIR_COST_TIE_MARGIN {
            return no;
        }

        let imbalance = ledger.quantity_imbalance();
        if imbalance > Decimal::ZERO {
            no
        } else if imbalance < Decimal::ZERO {
            yes
        } else if yes.price < no.price {
            yes
        } else {
            no
        }
    }

    /// Whether the locked profit target is met with enough balance.
    #[must_use]
    pub fn is_profit_locked(&self, ledger: &Ledger) -> bool {
        ledger.locked_profit() >= self.config.min_profit_target
            && ledger.balance_ratio() >= LOCKED_BALANCE_RATIO
    }

    /// Tagged recommendation for the given asks.
    #[must_use]
    pub fn recommend(&self, ledger: &Ledger, yes_ask: Price, no_ask: Price) -> Recommendation {
        let market_pair_cost = yes_ask + no_ask;
        let Some(signal) = self.analyze_opportunity(ledger, yes_ask, no_ask) else {
            return Recommendation::Hold {
                market_pair_cost,
                pair_cost: ledger.pair_cost(),
                locked_profit: ledger.locked_profit(),
            };
        };

        let side = signal.side;
        let proposal = TradeProposal {
            cost: signal.cost(),
            signal,
            market_pair_cost,
            current_pair_cost: ledger.pair_cost(),
        };
        match side {
            Side::Yes => Recommendation::BuyYes(proposal),
            Side::No => Recommendation::BuyNo(proposal),
        }
    }

    /// Advisory price ceilings that keep the pair cost within bounds.
    #[must_use]
    pub fn calculate_optimal_prices(&self, ledger: &Ledger) -> OptimalPrices {
        if ledger.total_cost().is_zero() {
            let half = self.config.max_pair_cost / Decimal::TWO;
            return OptimalPrices {
                max_yes_price: half,
                max_no_price: half,
            };
        }

        let ceiling = |side: Side| {
            let opposite = ledger.position(side.opposite());
            let raw = if opposite.is_empty() {
                self.config.max_pair_cost
            } else {
                (self.config.max_pair_cost - opposite.average_price()).min(MAX_ADVISORY_PRICE)
            };
            raw.max(MIN_ADVISORY_PRICE)
        };

        OptimalPrices {
            max_yes_price: ceiling(Side::Yes),
            max_no_price: ceiling(Side::No),
        }
    }
}

impl Default for ArbitrageEngine {
    fn default() -> Self {
        Self::new(StrategyConfig::default())
    }
}
