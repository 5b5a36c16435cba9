//! Mean-reverting random walk over the YES probability.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::config::SimulationConfig;
use crate::domain::{price_from_f64, to_f64, Side};
use crate::port::{Quote, QuotePair};

const TREND_STEP_STD_DEV: f64 = 0.02;
const MAX_TREND: f64 = 0.1;
const MIN_TRUE_PRICE: f64 = 0.05;
const MAX_TRUE_PRICE: f64 = 0.95;
const MIN_SPREAD: f64 = 0.01;
const MAX_SPREAD: f64 = 0.03;
const MAX_ASK: f64 = 0.99;
const MIN_BID: f64 = 0.01;
const PRICE_DP: u32 = 4;

/// A volatile binary market whose YES probability drifts each tick.
#[derive(Debug, Clone)]
pub struct SimulatedMarket {
    base_price: f64,
    volatility: f64,
    trend: f64,
    rng: StdRng,
}

impl SimulatedMarket {
    #[must_use]
    pub fn new(base_price: f64, volatility: f64, seed: u64) -> Self {
        Self {
            base_price: base_price.clamp(MIN_TRUE_PRICE, MAX_TRUE_PRICE),
            volatility,
            trend: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Starting price drawn uniformly from the configured range; the walk's
    /// own RNG is seeded from `rng`.
    pub fn from_config<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        let low = to_f64(config.initial_price_min);
        let high = to_f64(config.initial_price_max);
        let base_price = if high > low {
            rng.gen_range(low..high)
        } else {
            low
        };
        Self::new(base_price, to_f64(config.volatility), rng.gen())
    }

    /// Current true YES probability.
    #[must_use]
    pub const fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Advance one step and quote both sides around the true price.
    pub fn tick(&mut self) -> QuotePair {
        let trend_step = gaussian(&mut self.rng, 0.0, TREND_STEP_STD_DEV);
        self.trend = (self.trend + trend_step).clamp(-MAX_TREND, MAX_TREND);

        let change = gaussian(&mut self.rng, self.trend, self.volatility);
        self.base_price = (self.base_price + change).clamp(MIN_TRUE_PRICE, MAX_TRUE_PRICE);

        let yes = self.quote_around(self.base_price);
        let no = self.quote_around(1.0 - self.base_price);
        QuotePair::new(yes, no)
    }

    /// Draw the winner with P(YES) equal to the current true price.
    pub fn resolve(&mut self) -> Side {
        if self.rng.gen::<f64>() < self.base_price {
            Side::Yes
        } else {
            Side::No
        }
    }

    fn quote_around(&mut self, true_price: f64) -> Quote {
        let ask = (true_price + self.rng.gen_range(MIN_SPREAD..MAX_SPREAD)).min(MAX_ASK);
        let bid = (true_price - self.rng.gen_range(MIN_SPREAD..MAX_SPREAD)).max(MIN_BID);
        Quote::new(round_price(bid), round_price(ask))
    }
}

fn round_price(value: f64) -> Option<Decimal> {
    price_from_f64(value).map(|price| price.round_dp(PRICE_DP))
}

/// Normal sample via the Box-Muller transform.
fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
