//! Exchange-agnostic strategy core.
//!
//! Everything here is synchronous and owns no I/O:
//!
//! - [`Ledger`] - confirmed fills and the pair-cost metrics derived from them
//! - [`PriceAnalyzer`] - rolling cheapness detection per side
//! - [`RiskManager`] - mark-to-bid stop-loss and unhedged exposure guard
//! - [`ArbitrageEngine`] - turns asks plus the ledger into a buy signal

pub mod analyzer;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod risk;

mod ids;
mod market;
mod money;
mod side;
mod stats;

pub use analyzer::{AnalyzerConfig, AnalyzerStats, Cheapness, Opportunity, PriceAnalyzer};
pub use engine::{
    ArbitrageEngine, OptimalPrices, Recommendation, StrategyConfig, TradeProposal, TradeSignal,
};
pub use error::DomainError;
pub use ids::{MarketId, OrderId, TokenId};
pub use ledger::{Fill, Ledger, LedgerSnapshot, Position, SideSnapshot};
pub use market::MarketWindow;
pub use money::{price_from_f64, to_f64, Price, Volume};
pub use risk::{RiskCheck, RiskConfig, RiskManager, RiskRejection, RiskState, StopReason};
pub use side::Side;
pub use stats::RollingWindow;
