//! Application layer: the per-window decision session and the async trader
//! that drives it against real or simulated collaborators.

mod session;
mod trader;

pub use session::{SkipReason, TickDecision, TradeIntent, WindowSession, WindowSummary};
pub use trader::{Trader, WindowExit, WindowReport};
