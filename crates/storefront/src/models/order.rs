//! Order and order-line types.
//!
//! Order lines are immutable snapshots of cart lines at checkout time;
//! they keep the product name and price even if the product is later
//! edited or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use akvrix_core::{OrderId, OrderLineId, OrderStatus, ProductId, TrackingStep, UserId};

/// A placed order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Human-readable unique reference, e.g. `AKV-483920`.
    pub order_number: String,
    /// Owning account; null when placed anonymously or the account was
    /// deleted afterwards.
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    /// Free-text label; no gateway integration.
    pub payment_method: String,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub tracking_number: String,
    pub carrier: String,
    pub estimated_delivery: Option<NaiveDate>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Progress-bar steps for this order's current status.
    #[must_use]
    pub fn tracking_steps(&self) -> Vec<TrackingStep> {
        self.status.tracking_steps()
    }
}

/// Frozen copy of one cart line at order time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    /// Null once the product is deleted; the snapshot columns remain.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub price: Decimal,
    pub size: String,
    pub color: String,
    pub quantity: i32,
}

/// Shipping/contact fields submitted at checkout.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ShippingFields {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_country() -> String {
    "India".to_owned()
}

fn default_payment_method() -> String {
    "card".to_owned()
}
