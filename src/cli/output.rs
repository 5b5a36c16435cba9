//! Shared CLI output helpers.
//!
//! Every operator-facing line goes through here so JSON mode (for scripting)
//! and quiet mode behave the same across commands. Commands that produce a
//! single structured result emit it with [`json_output`] and skip the
//! human-readable lines entirely.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::Side;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON instead of text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

#[must_use]
pub fn is_quiet() -> bool {
    read_config().quiet
}

/// Whether human-readable lines should be printed at all.
fn text_enabled() -> bool {
    let config = read_config();
    !config.json && !config.quiet
}

/// Print the application name and version.
pub fn header(version: &str) {
    if !text_enabled() {
        return;
    }
    println!("{} {}", "pairlock".bold(), version.dimmed());
}

/// Print a section header.
pub fn section(title: &str) {
    if !text_enabled() {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    if !text_enabled() {
        return;
    }
    println!("  {:<16} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    if !text_enabled() {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

/// Warnings print even in quiet mode.
pub fn warning(message: &str) {
    if is_json() {
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

/// Errors always go to stderr, as JSON in JSON mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

pub fn note(message: &str) {
    if !text_enabled() {
        return;
    }
    println!("  {}", message.dimmed());
}

/// Print multiple lines of content, each indented.
pub fn lines(content: &str) {
    if !text_enabled() {
        return;
    }
    for line in content.lines() {
        println!("  {line}");
    }
}

/// Emit a JSON value directly.
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

/// One executed trade in a tick log.
pub fn trade(tick: usize, side: Side, detail: &str) {
    if !text_enabled() {
        return;
    }
    let label = format!("{:<3}", side.as_str());
    let label = match side {
        Side::Yes => label.green().to_string(),
        Side::No => label.magenta().to_string(),
    };
    println!("  {} {} {}", format!("[{tick:>4}]").dimmed(), label, detail);
}

/// Format a dollar amount, green when positive and red otherwise.
pub fn dollars(value: Decimal) -> String {
    let text = format!("${value:.2}");
    if is_json() {
        return text;
    }
    if value > Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    value.cyan().to_string()
}
