//! `pairlock paper`: the live loop against simulated collaborators.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tabled::{Table, Tabled};
use tokio::signal;
use tracing::info;

use super::command::PaperArgs;
use crate::app::{Trader, WindowReport};
use crate::cli::output;
use crate::config::Config;
use crate::domain::TokenId;
use crate::error::Result;
use crate::port::{Clock, SystemClock};
use crate::sim::{PaperExecutor, ScheduledMarkets, SimulatedMarket, SimulatedQuotes};

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "Window")]
    market: String,
    #[tabled(rename = "Exit")]
    exit: String,
    #[tabled(rename = "Ticks")]
    ticks: u64,
    #[tabled(rename = "Fills")]
    fills: u64,
    #[tabled(rename = "Pair cost")]
    pair_cost: String,
    #[tabled(rename = "Locked")]
    locked_profit: String,
}

impl From<&WindowReport> for WindowRow {
    fn from(report: &WindowReport) -> Self {
        let summary = &report.summary;
        Self {
            market: summary
                .market_id
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            exit: format!("{:?}", report.exit),
            ticks: summary.ticks,
            fills: summary.fills,
            pair_cost: format!("${:.4}", summary.ledger.pair_cost),
            locked_profit: format!("${:.2}", summary.ledger.locked_profit),
        }
    }
}

/// Trade `args.windows` simulated windows in real time. Ctrl-C stops early.
pub async fn execute(config: &Config, args: &PaperArgs) -> Result<()> {
    let seed = args
        .seed
        .or(config.simulation.seed)
        .unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let yes_token = TokenId::from("paper-yes");
    let no_token = TokenId::from("paper-no");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let market = SimulatedMarket::from_config(&config.simulation, &mut rng);
    let quotes = Arc::new(SimulatedQuotes::new(
        market,
        yes_token.clone(),
        no_token.clone(),
    ));
    let markets = Arc::new(ScheduledMarkets::new(
        yes_token,
        no_token,
        Duration::from_secs(args.window_secs),
        Arc::clone(&clock),
    ));
    let executor = Arc::new(PaperExecutor::new());

    let mut trader = Trader::new(config, markets, quotes, executor.clone(), clock);

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Paper trading");
    output::field("Seed", seed);
    output::field("Windows", args.windows);
    output::field("Window length", format!("{}s", args.window_secs));
    output::note("Press Ctrl-C to stop");
    info!(seed, windows = args.windows, "Paper trading started");

    let reports = tokio::select! {
        reports = trader.run(Some(args.windows)) => reports,
        _ = signal::ctrl_c() => {
            output::warning("Interrupted");
            info!("Shutdown signal received");
            Vec::new()
        }
    };

    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "paper",
            "seed": seed,
            "orders": executor.order_count(),
            "windows": serde_json::to_value(&reports)?,
        }));
        return Ok(());
    }

    if !reports.is_empty() {
        output::section("Windows");
        let rows: Vec<WindowRow> = reports.iter().map(WindowRow::from).collect();
        output::lines(&Table::new(rows).to_string());
    }
    output::field("Orders filled", executor.order_count());
    Ok(())
}
