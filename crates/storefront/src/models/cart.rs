//! Cart and wishlist view types.

use rust_decimal::Decimal;
use serde::Serialize;

use akvrix_core::{CartLineId, ProductId, WishlistEntryId, pricing};

/// One cart line joined with its product, as shown on the cart page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_slug: String,
    pub image: String,
    pub price: Decimal,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub in_stock: bool,
}

impl CartLine {
    /// Line price: unit price times quantity.
    #[must_use]
    pub fn total(&self) -> Decimal {
        pricing::line_total(self.price, self.quantity)
    }
}

/// A cart with its totals, ready for the cart or checkout page.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    /// Sum of quantities across all lines (the header badge count).
    pub item_count: i64,
}

impl CartSummary {
    /// Compute totals from the given lines.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let subtotal: Decimal = lines.iter().map(CartLine::total).sum();
        let shipping = pricing::shipping_for(subtotal);
        let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();

        Self {
            total: subtotal + shipping,
            lines,
            subtotal,
            shipping,
            item_count,
        }
    }
}

/// One wishlist entry joined with its product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WishlistItem {
    pub id: WishlistEntryId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_slug: String,
    pub image: String,
    pub price: Decimal,
    pub old_price: Option<Decimal>,
    pub in_stock: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, price: &str, quantity: i32) -> CartLine {
        CartLine {
            id: CartLineId::new(id),
            product_id: ProductId::new(id),
            product_name: format!("Product {id}"),
            product_slug: format!("product-{id}"),
            image: String::new(),
            price: price.parse().unwrap(),
            size: "M".to_owned(),
            color: "#000".to_owned(),
            quantity,
            in_stock: true,
        }
    }

    #[test]
    fn test_summary_charges_flat_shipping_below_threshold() {
        let summary = CartSummary::from_lines(vec![line(1, "40", 2), line(2, "20", 1)]);
        assert_eq!(summary.subtotal, Decimal::from(100));
        assert_eq!(summary.shipping, Decimal::from(12));
        assert_eq!(summary.total, Decimal::from(112));
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_summary_free_shipping_above_threshold() {
        let summary = CartSummary::from_lines(vec![line(1, "200", 1)]);
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::from(200));
    }

    #[test]
    fn test_empty_cart_summary() {
        let summary = CartSummary::from_lines(Vec::new());
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.item_count, 0);
    }
}
