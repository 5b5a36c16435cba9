//! Market discovery port.

use async_trait::async_trait;

use crate::domain::MarketWindow;
use crate::error::Error;

/// Supplies the next settlement window to trade.
#[async_trait]
pub trait MarketProvider: Send + Sync {
    /// The next open window, or `None` when nothing is tradeable right now.
    async fn next_market(&self) -> Result<Option<MarketWindow>, Error>;
}
