//! Read-only aggregates for the staff dashboard.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use akvrix_core::UserId;

use super::RepositoryError;
use crate::models::order::Order;
use crate::models::product::Product;

/// Headline counters shown at the top of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub product_count: i64,
    pub order_count: i64,
    pub review_count: i64,
    pub customer_count: i64,
    /// Sum of order totals, cancelled orders excluded.
    pub revenue: Decimal,
}

/// One row of the staff customer list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerSummary {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub order_count: i64,
    pub total_spent: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Repository for dashboard aggregates.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Headline counts and revenue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let (product_count, order_count, review_count, customer_count, revenue) =
            sqlx::query_as::<_, (i64, i64, i64, i64, Option<Decimal>)>(
                "SELECT \
                 (SELECT COUNT(*) FROM products), \
                 (SELECT COUNT(*) FROM orders), \
                 (SELECT COUNT(*) FROM reviews), \
                 (SELECT COUNT(*) FROM users WHERE NOT is_staff), \
                 (SELECT SUM(total) FROM orders WHERE status <> 'cancelled')",
            )
            .fetch_one(self.pool)
            .await?;

        Ok(DashboardStats {
            product_count,
            order_count,
            review_count,
            customer_count,
            revenue: revenue.unwrap_or_default(),
        })
    }

    /// Most recent orders for the dashboard feed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_orders(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, order_number, user_id, first_name, last_name, email, phone, \
                    address, city, state, zip_code, country, payment_method, \
                    subtotal, shipping, total, status, tracking_number, carrier, \
                    estimated_delivery, shipped_at, delivered_at, created_at \
             FROM orders ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Products currently flagged out of stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn out_of_stock(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, slug, name, price, old_price, category, description, \
                    image, image_hover, sizes, colors, rating, review_count, \
                    badge, in_stock, created_at \
             FROM products WHERE NOT in_stock ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Highest-rated products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_rated(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, slug, name, price, old_price, category, description, \
                    image, image_hover, sizes, colors, rating, review_count, \
                    badge, in_stock, created_at \
             FROM products ORDER BY rating DESC, review_count DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Non-staff accounts with their order counts and lifetime spend.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn customers(&self) -> Result<Vec<CustomerSummary>, RepositoryError> {
        let customers = sqlx::query_as::<_, CustomerSummary>(
            "SELECT u.id, u.email, u.first_name, u.last_name, \
                    COUNT(o.id) AS order_count, \
                    COALESCE(SUM(o.total) FILTER (WHERE o.status <> 'cancelled'), 0) \
                        AS total_spent, \
                    u.created_at \
             FROM users u \
             LEFT JOIN orders o ON o.user_id = u.id \
             WHERE NOT u.is_staff \
             GROUP BY u.id \
             ORDER BY u.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }
}
