//! Application configuration loading and validation.
//!
//! Configuration is read from a TOML file in which every table and field is
//! optional. A handful of strategy limits can be overridden from the
//! environment (`MAX_PAIR_COST`, `MAX_TRADE_AMOUNT`, `MAX_TOTAL_EXPOSURE`,
//! `MIN_PROFIT_TARGET`, `LOG_LEVEL`), which lets a `.env` file tune a run
//! without editing the config.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{AnalyzerConfig, RiskConfig, StrategyConfig};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pacing of the live trading loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunnerConfig {
    /// Pause between ticks within a window.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Pause when no market window is available.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
    /// Pause after a failed quote fetch.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    /// Pause between consecutive windows.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Trading stops this long before a window closes.
    #[serde(default = "default_close_cutoff_secs")]
    pub close_cutoff_secs: u64,
    /// Leave the window as soon as the risk manager halts trading.
    #[serde(default = "default_true")]
    pub halt_ends_window: bool,
    /// Optional upper bound on ticks per window.
    #[serde(default)]
    pub max_ticks_per_window: Option<u64>,
}

const fn default_tick_interval_ms() -> u64 {
    500
}

const fn default_idle_interval_ms() -> u64 {
    30_000
}

const fn default_retry_interval_ms() -> u64 {
    1_000
}

const fn default_cooldown_ms() -> u64 {
    5_000
}

const fn default_close_cutoff_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

impl RunnerConfig {
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub const fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    #[must_use]
    pub const fn close_cutoff(&self) -> Duration {
        Duration::from_secs(self.close_cutoff_secs)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            idle_interval_ms: default_idle_interval_ms(),
            retry_interval_ms: default_retry_interval_ms(),
            cooldown_ms: default_cooldown_ms(),
            close_cutoff_secs: default_close_cutoff_secs(),
            halt_ends_window: default_true(),
            max_ticks_per_window: None,
        }
    }
}

/// Parameters for the offline market simulator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Price updates per simulated window.
    #[serde(default = "default_ticks")]
    pub ticks: usize,
    /// Windows simulated by `batch`.
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Standard deviation of each random-walk step.
    #[serde(default = "default_volatility")]
    pub volatility: Decimal,
    /// Lower bound of the uniformly drawn starting YES price.
    #[serde(default = "default_initial_price_min")]
    pub initial_price_min: Decimal,
    /// Upper bound of the uniformly drawn starting YES price.
    #[serde(default = "default_initial_price_max")]
    pub initial_price_max: Decimal,
    /// Fixed RNG seed; a fresh seed is drawn per run when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_ticks() -> usize {
    200
}

const fn default_runs() -> usize {
    100
}

fn default_volatility() -> Decimal {
    Decimal::new(8, 2)
}

fn default_initial_price_min() -> Decimal {
    Decimal::new(3, 1)
}

fn default_initial_price_max() -> Decimal {
    Decimal::new(7, 1)
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            runs: default_runs(),
            volatility: default_volatility(),
            initial_price_min: default_initial_price_min(),
            initial_price_max: default_initial_price_max(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load from a TOML file, apply environment overrides and validate.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse(&content)?;
        config.apply_env_map(&std::env::vars().collect())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, validated.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_map(&std::env::vars().collect())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without validating.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    /// Apply overrides from an environment snapshot.
    #[allow(clippy::result_large_err)]
    pub fn apply_env_map(&mut self, env_map: &HashMap<String, String>) -> Result<()> {
        if let Some(value) = decimal_var(env_map, "MAX_PAIR_COST")? {
            self.strategy.max_pair_cost = value;
        }
        if let Some(value) = decimal_var(env_map, "MAX_TRADE_AMOUNT")? {
            self.strategy.max_trade_amount = value;
        }
        if let Some(value) = decimal_var(env_map, "MAX_TOTAL_EXPOSURE")? {
            self.strategy.max_total_exposure = value;
        }
        if let Some(value) = decimal_var(env_map, "MIN_PROFIT_TARGET")? {
            self.strategy.min_profit_target = value;
        }
        if let Some(level) = env_map.get("LOG_LEVEL") {
            self.logging.level = level.trim().to_lowercase();
        }
        Ok(())
    }

    /// Check every bound the strategy relies on.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let strategy = &self.strategy;
        if strategy.max_pair_cost >= Decimal::ONE {
            return Err(invalid("max_pair_cost", "must be less than 1.0"));
        }
        if strategy.max_pair_cost < Decimal::new(9, 1) {
            return Err(invalid("max_pair_cost", "must be at least 0.9"));
        }
        if strategy.max_trade_amount <= Decimal::ZERO {
            return Err(invalid("max_trade_amount", "must be positive"));
        }
        if strategy.max_total_exposure <= Decimal::ZERO {
            return Err(invalid("max_total_exposure", "must be positive"));
        }
        if strategy.min_profit_target < Decimal::ZERO {
            return Err(invalid("min_profit_target", "must not be negative"));
        }

        let analyzer = &self.analyzer;
        if analyzer.window_size == 0 {
            return Err(invalid("window_size", "must be greater than 0"));
        }
        if analyzer.cheap_threshold <= Decimal::ZERO {
            return Err(invalid("cheap_threshold", "must be positive"));
        }
        if analyzer.volatility_threshold < Decimal::ZERO {
            return Err(invalid("volatility_threshold", "must not be negative"));
        }
        if analyzer.max_pair_cost_guard <= Decimal::ZERO {
            return Err(invalid("max_pair_cost_guard", "must be positive"));
        }

        let risk = &self.risk;
        if risk.max_loss_per_window < Decimal::ZERO {
            return Err(invalid("max_loss_per_window", "must not be negative"));
        }
        if risk.max_drawdown_pct <= Decimal::ZERO || risk.max_drawdown_pct > Decimal::ONE {
            return Err(invalid("max_drawdown_pct", "must be in (0, 1]"));
        }
        if risk.max_unhedged_exposure < Decimal::ZERO {
            return Err(invalid("max_unhedged_exposure", "must not be negative"));
        }
        if risk.initial_capital.is_some_and(|capital| capital <= Decimal::ZERO) {
            return Err(invalid("initial_capital", "must be positive when set"));
        }

        if self.runner.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be greater than 0"));
        }

        let simulation = &self.simulation;
        if simulation.ticks == 0 {
            return Err(invalid("ticks", "must be greater than 0"));
        }
        if simulation.volatility < Decimal::ZERO {
            return Err(invalid("volatility", "must not be negative"));
        }
        if simulation.initial_price_min <= Decimal::ZERO
            || simulation.initial_price_max >= Decimal::ONE
            || simulation.initial_price_min > simulation.initial_price_max
        {
            return Err(invalid(
                "initial_price_min",
                "initial price range must satisfy 0 < min <= max < 1",
            ));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("format", "must be pretty or json"));
        }

        Ok(())
    }

    /// Capital baseline the risk manager starts each window with.
    #[must_use]
    pub fn initial_capital(&self) -> Decimal {
        self.risk
            .initial_capital
            .unwrap_or(self.strategy.max_total_exposure)
    }

    /// Install the global tracing subscriber. `RUST_LOG` takes precedence
    /// over the configured level. Logs go to stderr so `--json` output on
    /// stdout stays parseable.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn decimal_var(env_map: &HashMap<String, String>, key: &'static str) -> Result<Option<Decimal>> {
    let Some(raw) = env_map.get(key) else {
        return Ok(None);
    };
    raw.trim().parse::<Decimal>().map(Some).map_err(|_| {
        ConfigError::InvalidValue {
            field: key,
            reason: format!("expected a decimal, got '{raw}'"),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn invalid_field(result: Result<()>) -> &'static str {
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.strategy.max_pair_cost, dec!(0.99));
        assert_eq!(config.analyzer.window_size, 50);
        assert_eq!(config.runner.close_cutoff(), Duration::from_secs(30));
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.strategy, StrategyConfig::default());
        assert_eq!(config.runner, RunnerConfig::default());
    }

    #[test]
    fn partial_tables_fill_missing_fields() {
        let config = Config::parse(
            r#"
            [strategy]
            max_trade_amount = 25

            [risk]
            initial_capital = 400
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy.max_trade_amount, dec!(25));
        assert_eq!(config.strategy.max_total_exposure, dec!(1000));
        assert_eq!(config.initial_capital(), dec!(400));
    }

    #[test]
    fn initial_capital_falls_back_to_exposure_cap() {
        let mut config = Config::default();
        config.strategy.max_total_exposure = dec!(750);
        assert_eq!(config.initial_capital(), dec!(750));
    }

    #[test]
    fn env_overrides_strategy_limits() {
        let mut config = Config::default();
        config
            .apply_env_map(&env(&[
                ("MAX_PAIR_COST", "0.97"),
                ("MAX_TRADE_AMOUNT", " 20 "),
                ("MIN_PROFIT_TARGET", "2.5"),
                ("LOG_LEVEL", "DEBUG"),
            ]))
            .unwrap();
        assert_eq!(config.strategy.max_pair_cost, dec!(0.97));
        assert_eq!(config.strategy.max_trade_amount, dec!(20));
        assert_eq!(config.strategy.max_total_exposure, dec!(1000));
        assert_eq!(config.strategy.min_profit_target, dec!(2.5));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn env_override_rejects_garbage() {
        let mut config = Config::default();
        let err = config
            .apply_env_map(&env(&[("MAX_TOTAL_EXPOSURE", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_TOTAL_EXPOSURE"));
    }

    #[test]
    fn max_pair_cost_bounds() {
        let mut config = Config::default();
        config.strategy.max_pair_cost = dec!(1.0);
        assert_eq!(invalid_field(config.validate()), "max_pair_cost");

        config.strategy.max_pair_cost = dec!(0.89);
        assert_eq!(invalid_field(config.validate()), "max_pair_cost");

        config.strategy.max_pair_cost = dec!(0.9);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let mut config = Config::default();
        config.strategy.max_trade_amount = Decimal::ZERO;
        assert_eq!(invalid_field(config.validate()), "max_trade_amount");

        let mut config = Config::default();
        config.strategy.max_total_exposure = dec!(-1);
        assert_eq!(invalid_field(config.validate()), "max_total_exposure");

        let mut config = Config::default();
        config.strategy.min_profit_target = dec!(-0.01);
        assert_eq!(invalid_field(config.validate()), "min_profit_target");
    }

    #[test]
    fn rejects_bad_analyzer_settings() {
        let mut config = Config::default();
        config.analyzer.window_size = 0;
        assert_eq!(invalid_field(config.validate()), "window_size");

        let mut config = Config::default();
        config.analyzer.cheap_threshold = Decimal::ZERO;
        assert_eq!(invalid_field(config.validate()), "cheap_threshold");
    }

    #[test]
    fn rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        assert_eq!(invalid_field(config.validate()), "format");
    }

    #[test]
    fn parse_error_is_reported() {
        let err = Config::parse("[strategy\nmax_pair_cost = ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
