//! Domain validation errors for core domain types.
//!
//! These errors are returned when a ledger mutation would violate a domain
//! invariant. They are fatal to the call that produced them; the caller must
//! not retry with the same arguments.
//!
//! # Examples
//!
//! ```
//! use pairlock::domain::{DomainError, Ledger, Side};
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = Ledger::new();
//! let result = ledger.record_fill(Side::Yes, dec!(0), dec!(0.40));
//!
//! assert!(matches!(result, Err(DomainError::InvalidFill { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::Side;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A fill had a non-positive quantity or price.
    #[error("invalid {side} fill of {quantity} @ {price}: {reason}")]
    InvalidFill {
        /// Side the fill was recorded against.
        side: Side,
        /// The rejected quantity.
        quantity: Decimal,
        /// The rejected price.
        price: Decimal,
        /// Which invariant was violated.
        reason: &'static str,
    },
}
