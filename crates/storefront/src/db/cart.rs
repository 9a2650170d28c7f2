//! Cart and wishlist repository.
//!
//! All rows here are keyed by a [`Identity`]: either an anonymous session
//! token or an account id, never both. Uniqueness is scoped per identity
//! by partial unique indexes, which the upserts below target.

use serde::Deserialize;
use sqlx::PgPool;

use akvrix_core::{CartLineId, Identity, ProductId, SessionToken, UserId};

use super::RepositoryError;
use crate::models::cart::{CartLine, WishlistItem};

/// Cart line mutation actions accepted by the update API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    /// Add one to the quantity.
    Increase,
    /// Subtract one; a line reaching zero is deleted.
    Decrease,
    /// Delete the line unconditionally.
    Remove,
}

const CART_LINE_COLUMNS: &str = "c.id, c.product_id, p.name AS product_name, \
     p.slug AS product_slug, p.image, p.price, c.size, c.color, c.quantity, p.in_stock";

/// Repository for cart and wishlist operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a cart line for the identity.
    ///
    /// An existing (product, size, color) line has its quantity incremented
    /// by `quantity`; otherwise a new line is inserted. Two concurrent adds
    /// for the same tuple both land on the same row.
    ///
    /// # Returns
    ///
    /// The identity's updated total item count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn add_line(
        &self,
        identity: &Identity,
        product_id: ProductId,
        size: &str,
        color: &str,
        quantity: i32,
    ) -> Result<i64, RepositoryError> {
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let quantity = quantity.max(1);

        match identity {
            Identity::Account(user_id) => {
                sqlx::query(
                    "INSERT INTO cart_lines (user_id, product_id, size, color, quantity) \
                     VALUES ($1, $2, $3, $4, $5) \
                     ON CONFLICT (user_id, product_id, size, color) WHERE user_id IS NOT NULL \
                     DO UPDATE SET quantity = cart_lines.quantity + EXCLUDED.quantity",
                )
                .bind(user_id)
                .bind(product_id)
                .bind(size)
                .bind(color)
                .bind(quantity)
                .execute(self.pool)
                .await?;
            }
            Identity::Anonymous(token) => {
                sqlx::query(
                    "INSERT INTO cart_lines (session_token, product_id, size, color, quantity) \
                     VALUES ($1, $2, $3, $4, $5) \
                     ON CONFLICT (session_token, product_id, size, color) \
                         WHERE session_token IS NOT NULL \
                     DO UPDATE SET quantity = cart_lines.quantity + EXCLUDED.quantity",
                )
                .bind(token.as_str())
                .bind(product_id)
                .bind(size)
                .bind(color)
                .bind(quantity)
                .execute(self.pool)
                .await?;
            }
        }

        self.item_count(identity).await
    }

    /// Total item count for the identity (sum of quantities).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, identity: &Identity) -> Result<i64, RepositoryError> {
        let count = match identity {
            Identity::Account(user_id) => {
                sqlx::query_scalar::<_, Option<i64>>(
                    "SELECT SUM(quantity) FROM cart_lines WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_one(self.pool)
                .await?
            }
            Identity::Anonymous(token) => {
                sqlx::query_scalar::<_, Option<i64>>(
                    "SELECT SUM(quantity) FROM cart_lines WHERE session_token = $1",
                )
                .bind(token.as_str())
                .fetch_one(self.pool)
                .await?
            }
        };

        Ok(count.unwrap_or(0))
    }

    /// Apply a quantity action to a cart line.
    ///
    /// A line id that does not exist or is owned by another identity is a
    /// silent no-op, matching idempotent-delete semantics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update_line(
        &self,
        identity: &Identity,
        line_id: CartLineId,
        action: CartAction,
    ) -> Result<(), RepositoryError> {
        // Ownership check doubles as the existence check.
        let owned = match identity {
            Identity::Account(user_id) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT quantity FROM cart_lines WHERE id = $1 AND user_id = $2",
                )
                .bind(line_id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?
            }
            Identity::Anonymous(token) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT quantity FROM cart_lines WHERE id = $1 AND session_token = $2",
                )
                .bind(line_id)
                .bind(token.as_str())
                .fetch_optional(self.pool)
                .await?
            }
        };

        let Some(quantity) = owned else {
            return Ok(());
        };

        match action {
            CartAction::Increase => {
                sqlx::query("UPDATE cart_lines SET quantity = quantity + 1 WHERE id = $1")
                    .bind(line_id)
                    .execute(self.pool)
                    .await?;
            }
            CartAction::Decrease if quantity > 1 => {
                sqlx::query("UPDATE cart_lines SET quantity = quantity - 1 WHERE id = $1")
                    .bind(line_id)
                    .execute(self.pool)
                    .await?;
            }
            CartAction::Decrease | CartAction::Remove => {
                sqlx::query("DELETE FROM cart_lines WHERE id = $1")
                    .bind(line_id)
                    .execute(self.pool)
                    .await?;
            }
        }

        Ok(())
    }

    /// All cart lines for the identity, joined with their products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, identity: &Identity) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = match identity {
            Identity::Account(user_id) => {
                let sql = format!(
                    "SELECT {CART_LINE_COLUMNS} FROM cart_lines c \
                     JOIN products p ON p.id = c.product_id \
                     WHERE c.user_id = $1 ORDER BY c.id"
                );
                sqlx::query_as::<_, CartLine>(&sql)
                    .bind(user_id)
                    .fetch_all(self.pool)
                    .await?
            }
            Identity::Anonymous(token) => {
                let sql = format!(
                    "SELECT {CART_LINE_COLUMNS} FROM cart_lines c \
                     JOIN products p ON p.id = c.product_id \
                     WHERE c.session_token = $1 ORDER BY c.id"
                );
                sqlx::query_as::<_, CartLine>(&sql)
                    .bind(token.as_str())
                    .fetch_all(self.pool)
                    .await?
            }
        };

        Ok(lines)
    }

    /// Toggle a product in the identity's wishlist.
    ///
    /// # Returns
    ///
    /// The resulting membership: `true` when the product was added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn toggle_wishlist(
        &self,
        identity: &Identity,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let deleted = match identity {
            Identity::Account(user_id) => {
                sqlx::query(
                    "DELETE FROM wishlist_entries WHERE user_id = $1 AND product_id = $2",
                )
                .bind(user_id)
                .bind(product_id)
                .execute(self.pool)
                .await?
                .rows_affected()
            }
            Identity::Anonymous(token) => {
                sqlx::query(
                    "DELETE FROM wishlist_entries WHERE session_token = $1 AND product_id = $2",
                )
                .bind(token.as_str())
                .bind(product_id)
                .execute(self.pool)
                .await?
                .rows_affected()
            }
        };

        if deleted > 0 {
            return Ok(false);
        }

        match identity {
            Identity::Account(user_id) => {
                sqlx::query(
                    "INSERT INTO wishlist_entries (user_id, product_id) VALUES ($1, $2) \
                     ON CONFLICT DO NOTHING",
                )
                .bind(user_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;
            }
            Identity::Anonymous(token) => {
                sqlx::query(
                    "INSERT INTO wishlist_entries (session_token, product_id) VALUES ($1, $2) \
                     ON CONFLICT DO NOTHING",
                )
                .bind(token.as_str())
                .bind(product_id)
                .execute(self.pool)
                .await?;
            }
        }

        Ok(true)
    }

    /// Product ids in the identity's wishlist (for heart icons in listings).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn wishlist_product_ids(
        &self,
        identity: &Identity,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        let ids = match identity {
            Identity::Account(user_id) => {
                sqlx::query_scalar::<_, ProductId>(
                    "SELECT product_id FROM wishlist_entries WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_all(self.pool)
                .await?
            }
            Identity::Anonymous(token) => {
                sqlx::query_scalar::<_, ProductId>(
                    "SELECT product_id FROM wishlist_entries WHERE session_token = $1",
                )
                .bind(token.as_str())
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(ids)
    }

    /// The identity's wishlist, joined with product display data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn wishlist(
        &self,
        identity: &Identity,
    ) -> Result<Vec<WishlistItem>, RepositoryError> {
        const COLUMNS: &str = "w.id, w.product_id, p.name AS product_name, \
             p.slug AS product_slug, p.image, p.price, p.old_price, p.in_stock";

        let items = match identity {
            Identity::Account(user_id) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM wishlist_entries w \
                     JOIN products p ON p.id = w.product_id \
                     WHERE w.user_id = $1 ORDER BY w.id DESC"
                );
                sqlx::query_as::<_, WishlistItem>(&sql)
                    .bind(user_id)
                    .fetch_all(self.pool)
                    .await?
            }
            Identity::Anonymous(token) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM wishlist_entries w \
                     JOIN products p ON p.id = w.product_id \
                     WHERE w.session_token = $1 ORDER BY w.id DESC"
                );
                sqlx::query_as::<_, WishlistItem>(&sql)
                    .bind(token.as_str())
                    .fetch_all(self.pool)
                    .await?
            }
        };

        Ok(items)
    }

    /// Reassign everything owned by an anonymous session to an account.
    ///
    /// Invoked exactly once, when the session authenticates. Colliding cart
    /// lines (the account already has the same product/size/color) sum
    /// their quantities; colliding wishlist rows keep the account's row.
    /// The whole merge is one transaction: a half-merged cart is a
    /// user-visible data-loss bug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is applied in that case.
    pub async fn merge_identity(
        &self,
        token: &SessionToken,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Fold colliding session lines into the account's lines.
        sqlx::query(
            "UPDATE cart_lines a \
             SET quantity = a.quantity + s.quantity \
             FROM cart_lines s \
             WHERE a.user_id = $2 AND s.session_token = $1 \
               AND a.product_id = s.product_id AND a.size = s.size AND a.color = s.color",
        )
        .bind(token.as_str())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM cart_lines s \
             USING cart_lines a \
             WHERE s.session_token = $1 AND a.user_id = $2 \
               AND a.product_id = s.product_id AND a.size = s.size AND a.color = s.color",
        )
        .bind(token.as_str())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE cart_lines SET user_id = $2, session_token = NULL \
             WHERE session_token = $1",
        )
        .bind(token.as_str())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        // Wishlist: drop session rows the account already has, move the rest.
        sqlx::query(
            "DELETE FROM wishlist_entries s \
             USING wishlist_entries a \
             WHERE s.session_token = $1 AND a.user_id = $2 \
               AND a.product_id = s.product_id",
        )
        .bind(token.as_str())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE wishlist_entries SET user_id = $2, session_token = NULL \
             WHERE session_token = $1",
        )
        .bind(token.as_str())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Check whether a product is in the identity's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn wishlist_contains(
        &self,
        identity: &Identity,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let found = match identity {
            Identity::Account(user_id) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT 1 FROM wishlist_entries WHERE user_id = $1 AND product_id = $2",
                )
                .bind(user_id)
                .bind(product_id)
                .fetch_optional(self.pool)
                .await?
            }
            Identity::Anonymous(token) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT 1 FROM wishlist_entries \
                     WHERE session_token = $1 AND product_id = $2",
                )
                .bind(token.as_str())
                .bind(product_id)
                .fetch_optional(self.pool)
                .await?
            }
        };

        Ok(found.is_some())
    }
}
