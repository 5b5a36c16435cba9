//! Collaborator contracts for the live trading loop.
//!
//! The strategy core never performs I/O. The [`Trader`](crate::app::Trader)
//! reaches quotes, order execution, market discovery and time through these
//! traits, so the same loop runs against a real venue, the simulator or a
//! scripted test double.

mod clock;
mod exchange;
mod market;
mod quote;

pub use clock::{Clock, SystemClock};
pub use exchange::{ExecutionResult, OrderExecutor, OrderRequest};
pub use market::MarketProvider;
pub use quote::{Quote, QuotePair, QuoteSource};
