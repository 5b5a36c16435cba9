//! `pairlock check config`.

use std::path::Path;

use serde_json::json;

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Load and validate a configuration file without trading.
pub fn execute_config(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "path": path.display().to_string(),
            "valid": true,
            "strategy": {
                "max_pair_cost": config.strategy.max_pair_cost,
                "max_trade_amount": config.strategy.max_trade_amount,
                "max_total_exposure": config.strategy.max_total_exposure,
                "min_profit_target": config.strategy.min_profit_target,
            },
            "initial_capital": config.initial_capital(),
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Strategy");
    output::field("Max pair cost", config.strategy.max_pair_cost);
    output::field("Max trade", format!("${}", config.strategy.max_trade_amount));
    output::field("Max exposure", format!("${}", config.strategy.max_total_exposure));
    output::field("Profit target", format!("${}", config.strategy.min_profit_target));

    output::section("Analyzer");
    output::field("Window size", config.analyzer.window_size);
    output::field("Cheap", config.analyzer.cheap_threshold);
    output::field("Volatility", config.analyzer.volatility_threshold);

    output::section("Risk");
    output::field("Max loss", format!("${}", config.risk.max_loss_per_window));
    output::field("Max drawdown", config.risk.max_drawdown_pct);
    output::field("Max unhedged", config.risk.max_unhedged_exposure);
    output::field("Capital", format!("${}", config.initial_capital()));
    if config.risk.initial_capital.is_none() {
        output::note("initial_capital unset; using max_total_exposure");
    }

    output::success("Configuration check complete");
    Ok(())
}
