//! Product review types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use akvrix_core::{ProductId, ReviewId, UserId};

/// A customer review of a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    /// Null for legacy/anonymous reviews or deleted accounts.
    pub user_id: Option<UserId>,
    /// Display name captured at submission time.
    pub name: String,
    /// Star rating, 1-5.
    pub rating: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
