//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Two-sided YES/NO accumulation strategy for binary prediction markets
#[derive(Parser, Debug)]
#[command(name = "pairlock")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// Skip ASCII art banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate one settlement window against a random-walk market
    Simulate(SimulateArgs),

    /// Simulate many windows and report aggregate profit
    Batch(BatchArgs),

    /// Run the live trading loop against simulated collaborators
    Paper(PaperArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `pairlock check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file
    Config,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Number of price ticks (overrides [simulation].ticks)
    #[arg(long)]
    pub ticks: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Number of simulated windows (overrides [simulation].runs)
    #[arg(long)]
    pub runs: Option<usize>,

    /// Number of price ticks per window
    #[arg(long)]
    pub ticks: Option<usize>,

    /// RNG seed for a reproducible batch
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct PaperArgs {
    /// Number of windows to trade before exiting
    #[arg(long, default_value = "1")]
    pub windows: usize,

    /// Length of each simulated window in seconds
    #[arg(long, default_value = "120")]
    pub window_secs: u64,

    /// RNG seed for the simulated market
    #[arg(long)]
    pub seed: Option<u64>,
}
