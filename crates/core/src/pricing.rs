//! Discount and total computation in fixed-point decimal.
//!
//! All money flows through `rust_decimal::Decimal`. Binary floating point
//! is forbidden here: it produces non-reproducible cent-level drift when
//! summing many line items. Rounding is round-half-up (midpoint away from
//! zero), not banker's rounding - money rounds predictably toward the cent
//! boundary nearest the mathematical value.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;

/// Largest discount the catalog permits, in percent.
pub const MAX_DISCOUNT_PERCENT: u32 = 90;

/// Decimal places kept for every monetary value.
const MONEY_SCALE: u32 = 2;

/// A quantity plus the unit price snapshotted when the line entered the
/// cart.
///
/// The snapshot is decoupled from the live catalog price so historical
/// orders stay stable when prices change later. It is copied verbatim
/// into order items at checkout and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// Number of units. Positive by upstream validation; a quantity of
    /// zero legitimately computes a zero total (callers treat zero as
    /// "remove the item" before ever reaching this type).
    pub quantity: u32,
    /// Unit price captured at cart-add time.
    pub price_snapshot: Decimal,
}

impl PricedLine {
    /// Create a line from a quantity and a snapshotted unit price.
    #[must_use]
    pub const fn new(quantity: u32, price_snapshot: Decimal) -> Self {
        Self {
            quantity,
            price_snapshot,
        }
    }
}

/// Compute the discounted unit price for a catalog entry.
///
/// A discount of zero returns `base_price` unchanged, avoiding a
/// needless rounding step. Otherwise the result is
/// `base_price * (1 - percent/100)` rounded to two decimal places,
/// ties away from zero.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] when `discount_percent`
/// exceeds [`MAX_DISCOUNT_PERCENT`] or `base_price` is negative.
/// Upstream validation should prevent both; the calculator re-checks
/// rather than silently clamping financial values.
pub fn discounted_price(base_price: Decimal, discount_percent: u32) -> Result<Decimal, CoreError> {
    if base_price.is_sign_negative() {
        return Err(CoreError::invalid_argument(format!(
            "base price must be non-negative, got {base_price}"
        )));
    }
    if discount_percent > MAX_DISCOUNT_PERCENT {
        return Err(CoreError::invalid_argument(format!(
            "discount percent must be 0..={MAX_DISCOUNT_PERCENT}, got {discount_percent}"
        )));
    }
    if discount_percent == 0 {
        return Ok(base_price);
    }

    let multiplier = Decimal::from(100 - discount_percent) / Decimal::from(100u32);
    Ok((base_price * multiplier)
        .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Total for a single line: snapshot price times quantity.
#[must_use]
pub fn line_total(line: &PricedLine) -> Decimal {
    line.price_snapshot * Decimal::from(line.quantity)
}

/// Total across an order or cart.
///
/// Accumulates in decimal; summation order is irrelevant at fixed
/// precision.
pub fn order_total<'a, I>(items: I) -> Decimal
where
    I: IntoIterator<Item = &'a PricedLine>,
{
    items.into_iter().map(line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_zero_discount_returns_price_unchanged() {
        assert_eq!(discounted_price(dec!(100.00), 0).unwrap(), dec!(100.00));
    }

    #[test]
    fn test_quarter_discount() {
        assert_eq!(discounted_price(dec!(100.00), 25).unwrap(), dec!(75.00));
    }

    #[test]
    fn test_rounding_half_up() {
        // 19.99 * 0.90 = 17.991 -> 17.99
        assert_eq!(discounted_price(dec!(19.99), 10).unwrap(), dec!(17.99));
        // 9.99 * 0.95 = 9.4905 -> 9.49
        assert_eq!(discounted_price(dec!(9.99), 5).unwrap(), dec!(9.49));
        // 12.50 * 0.85 = 10.625 -> ties round away from zero -> 10.63
        assert_eq!(discounted_price(dec!(12.50), 15).unwrap(), dec!(10.63));
    }

    #[test]
    fn test_max_discount_boundary() {
        assert_eq!(discounted_price(dec!(50.00), 90).unwrap(), dec!(5.00));
    }

    #[test]
    fn test_out_of_range_discount_rejected() {
        let err = discounted_price(dec!(100.00), 95).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = discounted_price(dec!(-1.00), 10).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_line_total() {
        let line = PricedLine::new(3, dec!(9.99));
        assert_eq!(line_total(&line), dec!(29.97));
    }

    #[test]
    fn test_order_total() {
        let items = [PricedLine::new(2, dec!(9.99)), PricedLine::new(1, dec!(5.00))];
        assert_eq!(order_total(&items), dec!(24.98));
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total([].iter()), Decimal::ZERO);
    }

    #[test]
    fn test_zero_quantity_computes_zero() {
        let line = PricedLine::new(0, dec!(9.99));
        assert_eq!(line_total(&line), dec!(0.00));
    }

    #[test]
    fn test_no_cent_drift_across_many_items() {
        // 100 lines of 0.10 must sum to exactly 10.00.
        let items: Vec<PricedLine> = (0..100).map(|_| PricedLine::new(1, dec!(0.10))).collect();
        assert_eq!(order_total(&items), dec!(10.00));
    }
}
