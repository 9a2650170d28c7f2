//! Product catalog types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use akvrix_core::{Category, ProductId, pricing};

/// A catalog product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    /// Unique URL key.
    pub slug: String,
    pub name: String,
    pub price: Decimal,
    /// Crossed-out compare-at price, when the product is discounted.
    pub old_price: Option<Decimal>,
    pub category: Category,
    pub description: String,
    pub image: String,
    pub image_hover: String,
    /// Comma-delimited size options, e.g. `S,M,L,XL`.
    pub sizes: String,
    /// Comma-delimited color swatches, e.g. `#000,#FFF`.
    pub colors: String,
    pub rating: f64,
    pub review_count: i32,
    /// Optional merchandising tag, e.g. "Best Seller".
    pub badge: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Size options parsed from the comma-delimited column.
    #[must_use]
    pub fn sizes_list(&self) -> Vec<&str> {
        self.sizes.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    /// Color swatches parsed from the comma-delimited column.
    #[must_use]
    pub fn colors_list(&self) -> Vec<&str> {
        self.colors.split(',').map(str::trim).filter(|c| !c.is_empty()).collect()
    }

    /// Percentage discount implied by `old_price`, 0 when not discounted.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        pricing::discount_percent(self.price, self.old_price)
    }
}

/// Typed product fields for staff create/edit forms.
///
/// The admin form submits exactly these fields; anything else in the
/// payload is rejected by deserialization rather than silently persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFields {
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    #[serde(default)]
    pub old_price: Option<Decimal>,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub image_hover: String,
    #[serde(default = "default_sizes")]
    pub sizes: String,
    #[serde(default = "default_colors")]
    pub colors: String,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub badge: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

fn default_sizes() -> String {
    "S,M,L,XL".to_owned()
}

fn default_colors() -> String {
    "#000,#FFF".to_owned()
}

fn default_rating() -> f64 {
    4.5
}

fn default_true() -> bool {
    true
}

impl ProductFields {
    /// Validate field values before persistence.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_owned());
        }
        if self.slug.trim().is_empty() {
            return Err("slug is required".to_owned());
        }
        if self.price <= Decimal::ZERO {
            return Err("price must be positive".to_owned());
        }
        if self.old_price.is_some_and(|p| p <= Decimal::ZERO) {
            return Err("old_price must be positive".to_owned());
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err("rating must be between 0 and 5".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            slug: "oversized-graphic-tee".to_owned(),
            name: "Oversized Graphic Tee".to_owned(),
            price: "59.99".parse().unwrap(),
            old_price: Some("80".parse().unwrap()),
            category: Category::Streetwear,
            description: String::new(),
            image: String::new(),
            image_hover: String::new(),
            sizes: "S, M ,L,XL".to_owned(),
            colors: "#000,#FFF,".to_owned(),
            rating: 4.5,
            review_count: 0,
            badge: String::new(),
            in_stock: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sizes_and_colors_lists_trim_and_skip_empties() {
        let p = product();
        assert_eq!(p.sizes_list(), ["S", "M", "L", "XL"]);
        assert_eq!(p.colors_list(), ["#000", "#FFF"]);
    }

    #[test]
    fn test_discount_percent() {
        let mut p = product();
        assert_eq!(p.discount_percent(), 25);
        p.old_price = None;
        assert_eq!(p.discount_percent(), 0);
    }

    #[test]
    fn test_product_fields_rejects_unknown_fields() {
        let payload = r#"{"name":"Tee","slug":"tee","price":"10","category":"new",
                          "image":"x","inventory":5}"#;
        assert!(serde_json::from_str::<ProductFields>(payload).is_err());
    }

    #[test]
    fn test_product_fields_validation() {
        let payload = r#"{"name":"Tee","slug":"tee","price":"10","category":"new","image":"x"}"#;
        let fields: ProductFields = serde_json::from_str(payload).unwrap();
        assert!(fields.validate().is_ok());
        assert_eq!(fields.sizes, "S,M,L,XL");

        let bad = ProductFields {
            price: Decimal::ZERO,
            ..fields
        };
        assert!(bad.validate().is_err());
    }
}
