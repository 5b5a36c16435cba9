use std::io::Write;

use pairlock::config::Config;
use pairlock::error::{ConfigError, Error};
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn loads_every_section() {
    let file = write_temp_config(
        r#"
[strategy]
max_pair_cost = 0.97
max_trade_amount = 15
max_total_exposure = 300
min_profit_target = 2

[analyzer]
window_size = 20
cheap_threshold = 0.2

[risk]
max_loss_per_window = 25
max_drawdown_pct = 0.05

[runner]
tick_interval_ms = 250
close_cutoff_secs = 45
max_ticks_per_window = 100

[simulation]
ticks = 50
seed = 11

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.strategy.max_pair_cost, dec!(0.97));
    assert_eq!(config.analyzer.window_size, 20);
    assert_eq!(config.analyzer.volatility_threshold, dec!(0.05));
    assert_eq!(config.risk.max_unhedged_exposure, dec!(200));
    assert_eq!(config.initial_capital(), dec!(300));
    assert_eq!(config.runner.max_ticks_per_window, Some(100));
    assert_eq!(config.runner.close_cutoff().as_secs(), 45);
    assert_eq!(config.simulation.seed, Some(11));
    assert_eq!(config.logging.format, "json");
}

#[test]
fn load_rejects_invalid_drawdown() {
    let file = write_temp_config("[risk]\nmax_drawdown_pct = 1.5\n");
    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
            assert_eq!(field, "max_drawdown_pct");
        }
        other => panic!("expected invalid drawdown, got {other:?}"),
    }
}

#[test]
fn load_reports_toml_errors() {
    let file = write_temp_config("[strategy\nmax_pair_cost = ");
    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn load_reports_missing_file() {
    assert!(matches!(
        Config::load("/nonexistent/pairlock.toml"),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn inverted_simulation_price_range_is_rejected() {
    let file = write_temp_config(
        "[simulation]\ninitial_price_min = 0.6\ninitial_price_max = 0.4\n",
    );
    assert!(Config::load(file.path()).is_err());
}
