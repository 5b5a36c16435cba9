//! Monetary types for price and volume representation.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume (share count) represented as a Decimal for precision.
pub type Volume = Decimal;

/// Convert a float quote into a [`Price`].
///
/// Returns `None` for NaN and infinities, which have no decimal form.
#[must_use]
pub fn price_from_f64(value: f64) -> Option<Price> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Lossy conversion for display and statistics output.
#[must_use]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
