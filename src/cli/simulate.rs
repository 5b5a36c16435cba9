//! `pairlock simulate` and `pairlock batch`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use super::command::{BatchArgs, SimulateArgs};
use crate::cli::output;
use crate::config::Config;
use crate::domain::{LedgerSnapshot, SideSnapshot};
use crate::error::Result;
use crate::sim::{run_batch, run_simulation, SimulationOutcome, StopCause};

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Shares")]
    quantity: String,
    #[tabled(rename = "Avg price")]
    average_price: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Fills")]
    fills: usize,
}

impl PositionRow {
    fn new(side: &'static str, snapshot: &SideSnapshot) -> Self {
        Self {
            side,
            quantity: format!("{:.2}", snapshot.quantity),
            average_price: format!("${:.4}", snapshot.average_price),
            cost: format!("${:.2}", snapshot.total_cost),
            fills: snapshot.fills,
        }
    }
}

fn resolve_seed(explicit: Option<u64>, config: &Config) -> u64 {
    explicit
        .or(config.simulation.seed)
        .unwrap_or_else(rand::random)
}

/// Simulate one window and print its tick log and final status.
pub fn execute(config: &Config, args: &SimulateArgs) -> Result<()> {
    let mut config = config.clone();
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    config.validate()?;

    let seed = resolve_seed(args.seed, &config);
    let outcome = run_simulation(&config, &mut StdRng::seed_from_u64(seed));

    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "simulate",
            "seed": seed,
            "outcome": serde_json::to_value(&outcome)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Simulation");
    output::field("Seed", seed);
    output::field("Ticks", config.simulation.ticks);
    output::field("Max pair cost", config.strategy.max_pair_cost);
    output::field("Max trade", format!("${}", config.strategy.max_trade_amount));
    output::field("Max exposure", format!("${}", config.strategy.max_total_exposure));

    output::section("Trades");
    if outcome.trades.is_empty() {
        output::note("No trades executed");
    }
    for trade in &outcome.trades {
        output::trade(
            trade.tick,
            trade.side,
            &format!(
                "{:>8.2} @ ${:.3} | Pair: ${:.4} | Locked: ${:.2}",
                trade.quantity, trade.price, trade.pair_cost, trade.locked_profit
            ),
        );
    }
    print_stop(&outcome);

    print_ledger(&outcome.ledger);

    output::section("Resolution");
    output::field("Ticks processed", outcome.ticks);
    output::field("Opportunities", outcome.opportunities);
    output::field("Trades", outcome.trades.len());
    output::field("Winner", output::highlight(outcome.winner));
    output::field("Final value", format!("${:.2}", outcome.final_value));
    output::field("Total cost", format!("${:.2}", outcome.ledger.total_cost));
    output::field("Profit", output::dollars(outcome.profit));
    Ok(())
}

fn print_stop(outcome: &SimulationOutcome) {
    match outcome.stop {
        StopCause::Completed => {}
        StopCause::ProfitLocked => output::success("Profit locked, stopping"),
        StopCause::ExposureExhausted => output::warning("Max exposure reached"),
        StopCause::Halted(reason) => output::warning(&reason.to_string()),
    }
}

fn print_ledger(ledger: &LedgerSnapshot) {
    output::section("Positions");
    let rows = vec![
        PositionRow::new("YES", &ledger.yes),
        PositionRow::new("NO", &ledger.no),
    ];
    output::lines(&Table::new(rows).to_string());
    output::field("Pair cost", format!("${:.4}", ledger.pair_cost));
    output::field("Hedged shares", format!("{:.2}", ledger.min_quantity));
    output::field("Balance", format!("{:.2}", ledger.balance_ratio));
    output::field("Locked profit", output::dollars(ledger.locked_profit));
}

/// Simulate many windows and print aggregate results.
pub fn execute_batch(config: &Config, args: &BatchArgs) -> Result<()> {
    let mut config = config.clone();
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    config.validate()?;

    let runs = args.runs.unwrap_or(config.simulation.runs);
    let seed = resolve_seed(args.seed, &config);
    let report = run_batch(runs, &config, seed);

    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "batch",
            "seed": seed,
            "report": serde_json::to_value(&report)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(&format!("Aggregate results ({runs} simulations)"));
    output::field("Seed", seed);
    let win_rate = report.win_rate * Decimal::ONE_HUNDRED;
    output::field("Win rate", output::highlight(format!("{win_rate:.1}%")));
    output::field("Average profit", output::dollars(report.average_profit));
    output::field("Total profit", output::dollars(report.total_profit));
    output::field("Max profit", output::dollars(report.max_profit));
    output::field("Min profit", output::dollars(report.min_profit));
    Ok(())
}
