//! Order repository: checkout, lookups, and staff mutations.

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use akvrix_core::{Identity, OrderId, OrderStatus, UserId, pricing};

use super::RepositoryError;
use crate::models::order::{Order, OrderLine, ShippingFields};

/// Prefix for human-readable order numbers.
const ORDER_NUMBER_PREFIX: &str = "AKV";

/// Attempts at generating a non-colliding order number before giving up.
const ORDER_NUMBER_ATTEMPTS: usize = 8;

/// Errors specific to order placement.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// The identity has no cart lines to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Order number generation kept colliding.
    #[error("could not allocate an order number")]
    NumberExhausted,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

const ORDER_COLUMNS: &str = "id, order_number, user_id, first_name, last_name, email, phone, \
     address, city, state, zip_code, country, payment_method, subtotal, shipping, total, \
     status, tracking_number, carrier, estimated_delivery, shipped_at, delivered_at, created_at";

const ORDER_LINE_COLUMNS: &str =
    "id, order_id, product_id, product_name, price, size, color, quantity";

/// Cart line data needed to snapshot an order line.
#[derive(sqlx::FromRow)]
struct SnapshotSource {
    product_id: i32,
    product_name: String,
    price: Decimal,
    size: String,
    color: String,
    quantity: i32,
}

/// Tracking fields staff may edit on an order.
#[derive(Debug, Clone, Default)]
pub struct TrackingUpdate {
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub estimated_delivery: Option<chrono::NaiveDate>,
}

/// Repository for orders and order lines.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the identity's cart.
    ///
    /// Loads the cart, computes totals, allocates a unique order number,
    /// snapshots every cart line, and empties the cart - all in one
    /// transaction, so a crash can neither duplicate the order nor leave
    /// the cart partially cleared.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when the cart has no lines.
    pub async fn place(
        &self,
        identity: &Identity,
        fields: &ShippingFields,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let sources = match identity {
            Identity::Account(user_id) => {
                sqlx::query_as::<_, SnapshotSource>(
                    "SELECT c.product_id, p.name AS product_name, p.price, \
                            c.size, c.color, c.quantity \
                     FROM cart_lines c JOIN products p ON p.id = c.product_id \
                     WHERE c.user_id = $1 ORDER BY c.id",
                )
                .bind(user_id)
                .fetch_all(&mut *tx)
                .await?
            }
            Identity::Anonymous(token) => {
                sqlx::query_as::<_, SnapshotSource>(
                    "SELECT c.product_id, p.name AS product_name, p.price, \
                            c.size, c.color, c.quantity \
                     FROM cart_lines c JOIN products p ON p.id = c.product_id \
                     WHERE c.session_token = $1 ORDER BY c.id",
                )
                .bind(token.as_str())
                .fetch_all(&mut *tx)
                .await?
            }
        };

        if sources.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let subtotal: Decimal = sources
            .iter()
            .map(|s| pricing::line_total(s.price, s.quantity))
            .sum();
        let shipping = pricing::shipping_for(subtotal);
        let total = subtotal + shipping;

        // Allocate the order number, retrying on collision.
        let mut order: Option<Order> = None;
        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let number = generate_order_number();
            let sql = format!(
                "INSERT INTO orders \
                 (order_number, session_token, user_id, first_name, last_name, email, phone, \
                  address, city, state, zip_code, country, payment_method, \
                  subtotal, shipping, total) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
                 ON CONFLICT (order_number) DO NOTHING \
                 RETURNING {ORDER_COLUMNS}"
            );

            let inserted = sqlx::query_as::<_, Order>(&sql)
                .bind(&number)
                .bind(match identity {
                    Identity::Anonymous(token) => Some(token.as_str()),
                    Identity::Account(_) => None,
                })
                .bind(identity.user_id())
                .bind(fields.first_name.trim())
                .bind(fields.last_name.trim())
                .bind(fields.email.trim())
                .bind(fields.phone.trim())
                .bind(&fields.address)
                .bind(&fields.city)
                .bind(&fields.state)
                .bind(&fields.zip_code)
                .bind(&fields.country)
                .bind(&fields.payment_method)
                .bind(subtotal)
                .bind(shipping)
                .bind(total)
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(row) = inserted {
                order = Some(row);
                break;
            }
        }

        let order = order.ok_or(OrderError::NumberExhausted)?;

        for source in &sources {
            sqlx::query(
                "INSERT INTO order_lines \
                 (order_id, product_id, product_name, price, size, color, quantity) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(order.id)
            .bind(source.product_id)
            .bind(&source.product_name)
            .bind(source.price)
            .bind(&source.size)
            .bind(&source.color)
            .bind(source.quantity)
            .execute(&mut *tx)
            .await?;
        }

        match identity {
            Identity::Account(user_id) => {
                sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
            Identity::Anonymous(token) => {
                sqlx::query("DELETE FROM cart_lines WHERE session_token = $1")
                    .bind(token.as_str())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(order)
    }

    /// An account's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// Look up an account's order by its order number, with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order is owned by the
    /// account.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_number: &str,
    ) -> Result<(Order, Vec<OrderLine>), RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1 AND user_id = $2"
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_number)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let lines = self.lines(order.id).await?;

        Ok((order, lines))
    }

    /// All orders, optionally filtered by status, newest first (staff).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE $1::text IS NULL OR status = $1 \
             ORDER BY created_at DESC"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(status.map(OrderStatus::as_str))
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// Look up any order by id, with its lines (staff).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn get_by_id(
        &self,
        id: OrderId,
    ) -> Result<(Order, Vec<OrderLine>), RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let lines = self.lines(order.id).await?;

        Ok((order, lines))
    }

    /// Set an order's status and tracking fields (staff).
    ///
    /// Blank tracking fields leave the stored values untouched. Moving to
    /// `shipped` or `delivered` stamps the matching timestamp the first
    /// time. Cancelled orders accept no further status changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist and
    /// `RepositoryError::Conflict` for a transition out of a terminal state.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        tracking: &TrackingUpdate,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, OrderStatus>(
            "SELECT status FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let next = status.unwrap_or(current);
        if !current.can_become(next) {
            return Err(RepositoryError::Conflict(format!(
                "order is {current} and cannot become {next}"
            )));
        }

        let now = Utc::now();
        let sql = format!(
            "UPDATE orders SET \
             status = $2, \
             tracking_number = COALESCE($3, tracking_number), \
             carrier = COALESCE($4, carrier), \
             estimated_delivery = COALESCE($5, estimated_delivery), \
             shipped_at = CASE WHEN $2 = 'shipped' THEN COALESCE(shipped_at, $6) \
                               ELSE shipped_at END, \
             delivered_at = CASE WHEN $2 = 'delivered' THEN COALESCE(delivered_at, $6) \
                                 ELSE delivered_at END \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(next)
            .bind(tracking.tracking_number.as_deref().filter(|s| !s.is_empty()))
            .bind(tracking.carrier.as_deref().filter(|s| !s.is_empty()))
            .bind(tracking.estimated_delivery)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Lines of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = $1 ORDER BY id"
        );

        let lines = sqlx::query_as::<_, OrderLine>(&sql)
            .bind(order_id)
            .fetch_all(self.pool)
            .await?;

        Ok(lines)
    }
}

/// Generate a candidate order number: the fixed prefix plus six digits.
fn generate_order_number() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{ORDER_NUMBER_PREFIX}-{n:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        for _ in 0..50 {
            let number = generate_order_number();
            let (prefix, digits) = number.split_once('-').expect("has a dash");
            assert_eq!(prefix, "AKV");
            assert_eq!(digits.len(), 6);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
