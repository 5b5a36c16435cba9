//! Offline market simulation.
//!
//! - [`SimulatedMarket`] - seeded random walk producing two-sided quotes
//! - [`run_simulation`] / [`run_batch`] - drive a [`WindowSession`](crate::app::WindowSession)
//!   synchronously and settle the outcome
//! - [`PaperExecutor`], [`SimulatedQuotes`], [`ScheduledMarkets`] - port
//!   implementations for running the async trader without a venue

mod market;
mod runner;
mod venue;

pub use market::SimulatedMarket;
pub use runner::{
    run_batch, run_simulation, BatchReport, SimulationOutcome, StopCause, TradeRecord,
};
pub use venue::{PaperExecutor, ScheduledMarkets, SimulatedQuotes};
