//! Rolling "cheap vs. rich" price analysis.
//!
//! A side's ask is cheap when it sits materially below its recent rolling
//! average while recent volatility is high enough to suggest a mispricing
//! rather than a new stable level. With too few observations the analyzer
//! falls back to an absolute price rule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::stats::RollingWindow;
use super::{Price, Side};

/// Observations required before the discount rule replaces the absolute rule.
pub const MIN_SAMPLES: usize = 5;

/// Below this ask a side is cheap while the window is still warming up.
pub const FALLBACK_CHEAP_PRICE: Decimal = Decimal::from_parts(45, 0, 0, false, 2);

/// Confidence reported for a cheap side is capped here.
pub const MAX_CONFIDENCE: Decimal = Decimal::TWO;

/// Configuration for the price analyzer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyzerConfig {
    /// Retained samples per side.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Fractional discount to the rolling average that counts as cheap.
    #[serde(default = "default_cheap_threshold")]
    pub cheap_threshold: Decimal,

    /// Minimum rolling volatility for the discount rule to fire.
    #[serde(default = "default_volatility_threshold")]
    pub volatility_threshold: Decimal,

    /// Market pair costs at or above this are ignored and not recorded.
    #[serde(default = "default_max_pair_cost_guard")]
    pub max_pair_cost_guard: Decimal,
}

const fn default_window_size() -> usize {
    50
}

fn default_cheap_threshold() -> Decimal {
    Decimal::new(15, 2) // 15% below average
}

fn default_volatility_threshold() -> Decimal {
    Decimal::new(5, 2)
}

fn default_max_pair_cost_guard() -> Decimal {
    Decimal::new(99, 2)
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            cheap_threshold: default_cheap_threshold(),
            volatility_threshold: default_volatility_threshold(),
            max_pair_cost_guard: default_max_pair_cost_guard(),
        }
    }
}

/// Outcome of a cheapness check on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cheapness {
    pub is_cheap: bool,
    /// `(avg - price) / avg`; zero on the warm-up path.
    pub discount: Decimal,
}

/// A side the analyzer considers cheap right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub side: Side,
    pub price: Price,
    pub discount: Decimal,
    /// `discount / cheap_threshold`, capped at [`MAX_CONFIDENCE`].
    pub confidence: Decimal,
    /// `yes_price + no_price` at observation time.
    pub pair_cost: Price,
}

/// Summary of the retained samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerStats {
    pub observations: usize,
    pub yes_average: Price,
    pub no_average: Price,
    pub yes_volatility: Decimal,
    pub no_volatility: Decimal,
    pub average_pair_cost: Price,
}

/// Rolling price statistics for both sides of one market.
#[derive(Debug, Clone)]
pub struct PriceAnalyzer {
    config: AnalyzerConfig,
    yes_prices: RollingWindow,
    no_prices: RollingWindow,
    pair_costs: RollingWindow,
}

impl PriceAnalyzer {
    /// Create an analyzer with empty sample windows.
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        let size = config.window_size;
        Self {
            config,
            yes_prices: RollingWindow::new(size),
            no_prices: RollingWindow::new(size),
            pair_costs: RollingWindow::new(size),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn window(&self, side: Side) -> &RollingWindow {
        match side {
            Side::Yes => &self.yes_prices,
            Side::No => &self.no_prices,
        }
    }

    /// Record one observed pair of asks.
    pub fn observe(&mut self, yes_price: Price, no_price: Price) {
        self.yes_prices.push(yes_price);
        self.no_prices.push(no_price);
        self.pair_costs.push(yes_price + no_price);
    }

    /// Number of retained observations.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.yes_prices.len()
    }

    /// Rolling mean for `side`; 0.5 before any observation.
    #[must_use]
    pub fn average(&self, side: Side) -> Price {
        self.window(side).mean().unwrap_or(Decimal::new(5, 1))
    }

    /// Sample standard deviation for `side`; zero below two observations.
    #[must_use]
    pub fn volatility(&self, side: Side) -> Decimal {
        self.window(side).sample_std_dev().unwrap_or(Decimal::ZERO)
    }

    /// Rolling mean of observed market pair costs; 1.0 before any observation.
    #[must_use]
    pub fn average_pair_cost(&self) -> Price {
        self.pair_costs.mean().unwrap_or(Decimal::ONE)
    }

    /// Whether `price` is cheap for `side` given the retained samples.
    #[must_use]
    pub fn is_cheap(&self, side: Side, price: Price) -> Cheapness {
        if self.window(side).len() < MIN_SAMPLES {
            return Cheapness {
                is_cheap: price < FALLBACK_CHEAP_PRICE,
                discount: Decimal::ZERO,
            };
        }

        let average = self.average(side);
        if average.is_zero() {
            return Cheapness {
                is_cheap: false,
                discount: Decimal::ZERO,
            };
        }

        let discount = (average - price) / average;
        let is_cheap = discount >= self.config.cheap_threshold
            && self.volatility(side) >= self.config.volatility_threshold;

        Cheapness { is_cheap, discount }
    }

    /// Observe the asks and report the cheap side, if any.
    ///
    /// Pairs at or above the pair-cost guard are rejected before they are
    /// recorded, so they never influence the rolling statistics.
    pub fn get_opportunity(&mut self, yes_price: Price, no_price: Price) -> Option<Opportunity> {
        let pair_cost = yes_price + no_price;
        if pair_cost >= self.config.max_pair_cost_guard {
            return None;
        }

        self.observe(yes_price, no_price);

        let yes = self.is_cheap(Side::Yes, yes_price);
        let no = self.is_cheap(Side::No, no_price);

        let (side, price, discount) = match (yes.is_cheap, no.is_cheap) {
            (true, true) if yes.discount > no.discount => (Side::Yes, yes_price, yes.discount),
            (true, true) | (false, true) => (Side::No, no_price, no.discount),
            (true, false) => (Side::Yes, yes_price, yes.discount),
            (false, false) => return None,
        };

        Some(Opportunity {
            side,
            price,
            discount,
            confidence: self.confidence(discount),
            pair_cost,
        })
    }

    fn confidence(&self, discount: Decimal) -> Decimal {
        if self.config.cheap_threshold.is_zero() {
            return MAX_CONFIDENCE;
        }
        (discount / self.config.cheap_threshold).min(MAX_CONFIDENCE)
    }

    #[must_use]
    pub fn stats(&self) -> AnalyzerStats {
        AnalyzerStats {
            observations: self.sample_count(),
            yes_average: self.average(Side::Yes),
            no_average: self.average(Side::No),
            yes_volatility: self.volatility(Side::Yes),
            no_volatility: self.volatility(Side::No),
            average_pair_cost: self.average_pair_cost(),
        }
    }

    /// Drop every retained sample.
    pub fn reset(&mut self) {
        self.yes_prices.clear();
        self.no_prices.clear();
        self.pair_costs.clear();
    }
}

impl Default for PriceAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
