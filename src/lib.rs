//! Pairlock - two-sided YES/NO arbitrage for binary prediction markets.
//!
//! The strategy accumulates shares of both outcomes of a short-lived binary
//! market at different moments, buying whichever side is temporarily cheap,
//! so that the average cost of one YES plus one NO stays below $1. Once the
//! smaller side covers the money spent, profit is locked regardless of the
//! outcome.
//!
//! # Modules
//!
//! - [`domain`] - Pure strategy core: [`Ledger`](domain::Ledger),
//!   [`PriceAnalyzer`](domain::PriceAnalyzer), [`RiskManager`](domain::RiskManager)
//!   and [`ArbitrageEngine`](domain::ArbitrageEngine)
//! - [`app`] - Per-window session and the async trading loop
//! - [`port`] - Traits for quotes, execution, market discovery and time
//! - [`sim`] - Random-walk simulator and paper-trading collaborators
//! - [`config`] - TOML configuration with environment overrides
//! - [`cli`] - Command-line interface
//! - [`error`] - Crate error types
//!
//! # Example
//!
//! ```
//! use pairlock::domain::{ArbitrageEngine, Ledger};
//! use rust_decimal_macros::dec;
//!
//! let engine = ArbitrageEngine::default();
//! let ledger = Ledger::new();
//! let signal = engine.analyze_opportunity(&ledger, dec!(0.48), dec!(0.50));
//! assert!(signal.is_some());
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod sim;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
