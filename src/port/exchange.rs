//! Order execution port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{OrderId, Price, Side, TokenId, Volume};
use crate::error::Error;

/// A limit buy for one outcome token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub token_id: TokenId,
    /// Outcome side the token represents.
    pub side: Side,
    /// Limit price.
    pub price: Price,
    /// Shares to buy.
    pub size: Volume,
}

/// Result of attempting to execute an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Order was fully filled.
    Success {
        order_id: OrderId,
        filled_amount: Volume,
        average_price: Price,
    },
    /// Order was partially filled.
    PartialFill {
        order_id: OrderId,
        filled_amount: Volume,
        remaining_amount: Volume,
        average_price: Price,
    },
    /// Order failed to execute.
    Failed { reason: String },
}

impl ExecutionResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::PartialFill { .. })
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub const fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::Success { order_id, .. } | Self::PartialFill { order_id, .. } => Some(order_id),
            Self::Failed { .. } => None,
        }
    }

    /// Filled quantity and average price, if anything filled.
    #[must_use]
    pub const fn filled(&self) -> Option<(Volume, Price)> {
        match self {
            Self::Success {
                filled_amount,
                average_price,
                ..
            }
            | Self::PartialFill {
                filled_amount,
                average_price,
                ..
            } => Some((*filled_amount, *average_price)),
            Self::Failed { .. } => None,
        }
    }
}

/// Executor for submitting orders to a venue.
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Submit `order` and wait for the outcome.
    async fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult, Error>;

    /// Venue name for logging.
    fn exchange_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn filled_reports_partial_amount() {
        let result = ExecutionResult::PartialFill {
            order_id: OrderId::new("o-1"),
            filled_amount: dec!(4),
            remaining_amount: dec!(6),
            average_price: dec!(0.41),
        };
        assert!(result.is_partial());
        assert_eq!(result.filled(), Some((dec!(4), dec!(0.41))));
        assert_eq!(result.order_id().map(OrderId::as_str), Some("o-1"));
    }

    #[test]
    fn failed_has_no_fill() {
        let result = ExecutionResult::Failed {
            reason: "insufficient balance".into(),
        };
        assert!(result.is_failed());
        assert!(result.filled().is_none());
        assert!(result.order_id().is_none());
    }
}
