//! CLI module graph and command dispatch.

pub mod banner;
pub mod check;
pub mod command;
pub mod output;
pub mod paper;
pub mod simulate;

use std::path::{Path, PathBuf};

pub use command::{CheckCommand, Cli, ColorChoice, Commands};

use crate::config::Config;
use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Run the parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    if let Commands::Check(CheckCommand::Config) = cli.command {
        let path = cli
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        return check::execute_config(&path);
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.init_logging();

    if !cli.no_banner && !output::is_json() && !output::is_quiet() {
        banner::print_banner();
    }

    match cli.command {
        Commands::Simulate(args) => simulate::execute(&config, &args),
        Commands::Batch(args) => simulate::execute_batch(&config, &args),
        Commands::Paper(args) => paper::execute(&config, &args).await,
        Commands::Check(_) => Ok(()),
    }
}

/// Explicit path, else `./config.toml` when present, else defaults plus
/// environment overrides.
#[allow(clippy::result_large_err)]
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH),
        None => Config::from_env(),
    }
}
