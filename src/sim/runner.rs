//! Synchronous simulation driver and batch aggregation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::SimulatedMarket;
use crate::app::{TickDecision, WindowSession};
use crate::config::Config;
use crate::domain::{
    LedgerSnapshot, MarketId, MarketWindow, Price, Side, StopReason, TokenId, Volume,
};

/// Why a simulated window ended before its last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum StopCause {
    /// Every tick was processed.
    Completed,
    ProfitLocked,
    ExposureExhausted,
    Halted(StopReason),
}

/// One executed simulated trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub tick: usize,
    pub side: Side,
    pub quantity: Volume,
    pub price: Price,
    /// Ledger pair cost after the fill.
    pub pair_cost: Price,
    pub locked_profit: Price,
}

/// Result of one simulated window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub ticks: usize,
    pub opportunities: u64,
    pub trades: Vec<TradeRecord>,
    pub stop: StopCause,
    pub ledger: LedgerSnapshot,
    pub winner: Side,
    /// Shares of the winning side, each redeemed at $1.
    pub final_value: Price,
    pub profit: Price,
}

/// Aggregate over many simulated windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub runs: usize,
    pub win_rate: Decimal,
    pub average_profit: Price,
    pub total_profit: Price,
    pub max_profit: Price,
    pub min_profit: Price,
    pub profits: Vec<Price>,
}

/// Run one window of `config.simulation.ticks` ticks, filling every trade
/// intent at its signal price, then settle it.
pub fn run_simulation<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> SimulationOutcome {
    let mut market = SimulatedMarket::from_config(&config.simulation, rng);
    let mut session = WindowSession::new(config);
    session.begin_window(simulated_window());

    let mut trades = Vec::new();
    let mut processed = 0;
    let mut stop = StopCause::Completed;

    for tick in 0..config.simulation.ticks {
        processed = tick + 1;
        let quotes = market.tick();

        match session.tick(&quotes) {
            TickDecision::Trade(intent) => {
                let signal = intent.signal;
                // Signal prices and quantities are positive by construction.
                if session
                    .record_fill(signal.side, signal.quantity, signal.price)
                    .is_ok()
                {
                    let ledger = session.ledger();
                    trades.push(TradeRecord {
                        tick,
                        side: signal.side,
                        quantity: signal.quantity,
                        price: signal.price,
                        pair_cost: ledger.pair_cost(),
                        locked_profit: ledger.locked_profit(),
                    });
                }
            }
            TickDecision::Halt(reason) => {
                stop = StopCause::Halted(reason);
                break;
            }
            TickDecision::Hold | TickDecision::Blocked(_) | TickDecision::Skip(_) => {}
        }

        if session.is_complete() {
            stop = StopCause::ProfitLocked;
            break;
        }
        if session.is_exposure_exhausted() {
            stop = StopCause::ExposureExhausted;
            break;
        }
    }

    let winner = market.resolve();
    let ledger = session.ledger();
    let final_value = ledger.position(winner).quantity();
    let profit = ledger.settle(winner);
    let summary = session.summary();

    debug!(
        ticks = processed,
        trades = trades.len(),
        winner = %winner,
        profit = %profit.round_dp(2),
        "Simulation finished"
    );

    SimulationOutcome {
        ticks: processed,
        opportunities: summary.opportunities,
        trades,
        stop,
        ledger: summary.ledger,
        winner,
        final_value,
        profit,
    }
}

/// Run `runs` independent simulations from one seed.
pub fn run_batch(runs: usize, config: &Config, seed: u64) -> BatchReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let profits: Vec<Price> = (0..runs)
        .map(|_| run_simulation(config, &mut rng).profit)
        .collect();

    let report = BatchReport::from_profits(profits);
    info!(
        runs = report.runs,
        win_rate = %report.win_rate.round_dp(3),
        average_profit = %report.average_profit.round_dp(2),
        "Batch finished"
    );
    report
}

impl BatchReport {
    /// Aggregate per-run profits. A run wins when its profit is positive.
    #[must_use]
    pub fn from_profits(profits: Vec<Price>) -> Self {
        let runs = profits.len();
        if runs == 0 {
            return Self {
                runs,
                win_rate: Decimal::ZERO,
                average_profit: Decimal::ZERO,
                total_profit: Decimal::ZERO,
                max_profit: Decimal::ZERO,
                min_profit: Decimal::ZERO,
                profits,
            };
        }

        let count = Decimal::from(runs);
        let wins = profits.iter().filter(|p| **p > Decimal::ZERO).count();
        let total_profit: Decimal = profits.iter().copied().sum();
        let max_profit = profits.iter().copied().fold(Decimal::MIN, Decimal::max);
        let min_profit = profits.iter().copied().fold(Decimal::MAX, Decimal::min);

        Self {
            runs,
            win_rate: Decimal::from(wins) / count,
            average_profit: total_profit / count,
            total_profit,
            max_profit,
            min_profit,
            profits,
        }
    }
}

fn simulated_window() -> MarketWindow {
    MarketWindow::new(
        MarketId::from("sim"),
        "Simulated 15-minute market",
        TokenId::from("sim-yes"),
        TokenId::from("sim-no"),
        chrono::Utc::now() + chrono::Duration::minutes(15),
    )
}
