//! Money math on exact decimals.
//!
//! Prices are `rust_decimal::Decimal` end to end (NUMERIC in Postgres),
//! never binary floats, so discount and total computations cannot drift.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Orders with a subtotal strictly above this ship free.
#[must_use]
pub fn free_shipping_threshold() -> Decimal {
    Decimal::from(150)
}

/// Flat shipping fee charged below the free-shipping threshold.
#[must_use]
pub fn flat_shipping_fee() -> Decimal {
    Decimal::from(12)
}

/// Shipping charge for a cart subtotal.
///
/// Free only when the subtotal strictly exceeds the threshold, so a
/// subtotal of exactly 150 still pays the flat fee.
#[must_use]
pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal > free_shipping_threshold() {
        Decimal::ZERO
    } else {
        flat_shipping_fee()
    }
}

/// Percentage discount implied by a crossed-out old price.
///
/// `floor((old_price - price) / old_price * 100)` when `old_price > price`,
/// otherwise 0.
#[must_use]
pub fn discount_percent(price: Decimal, old_price: Option<Decimal>) -> u32 {
    let Some(old) = old_price else {
        return 0;
    };
    if old <= price || old <= Decimal::ZERO {
        return 0;
    }

    ((old - price) * Decimal::from(100) / old)
        .floor()
        .to_u32()
        .unwrap_or(0)
}

/// Price of one cart line: unit price times quantity.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("literal decimal")
    }

    #[test]
    fn test_no_old_price_means_no_discount() {
        assert_eq!(discount_percent(dec("49.99"), None), 0);
    }

    #[test]
    fn test_old_price_not_above_price_means_no_discount() {
        assert_eq!(discount_percent(dec("50"), Some(dec("50"))), 0);
        assert_eq!(discount_percent(dec("50"), Some(dec("40"))), 0);
    }

    #[test]
    fn test_discount_floors() {
        // (80 - 59.99) / 80 * 100 = 25.0125 -> 25
        assert_eq!(discount_percent(dec("59.99"), Some(dec("80"))), 25);
        // (100 - 66.67) / 100 * 100 = 33.33 -> 33
        assert_eq!(discount_percent(dec("66.67"), Some(dec("100"))), 33);
        assert_eq!(discount_percent(dec("75"), Some(dec("100"))), 25);
    }

    #[test]
    fn test_shipping_threshold_is_strict() {
        assert_eq!(shipping_for(dec("200")), Decimal::ZERO);
        assert_eq!(shipping_for(dec("150.01")), Decimal::ZERO);
        assert_eq!(shipping_for(dec("150")), dec("12"));
        assert_eq!(shipping_for(dec("100")), dec("12"));
    }

    #[test]
    fn test_line_total_is_exact() {
        assert_eq!(line_total(dec("19.99"), 3), dec("59.97"));
    }
}
