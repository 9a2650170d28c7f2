//! Review repository.

use sqlx::PgPool;

use akvrix_core::{ProductId, ReviewId, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::review::Review;

const REVIEW_COLUMNS: &str = "id, product_id, user_id, name, rating, body, created_at";

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews of a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE product_id = $1 ORDER BY created_at DESC"
        );

        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;

        Ok(reviews)
    }

    /// Submit a review and refresh the product's aggregate rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist
    /// and `RepositoryError::Conflict` if the account has already reviewed
    /// this product.
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        name: &str,
        rating: i32,
        body: &str,
    ) -> Result<Review, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Err(RepositoryError::NotFound);
        }

        let sql = format!(
            "INSERT INTO reviews (product_id, user_id, name, rating, body) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {REVIEW_COLUMNS}"
        );

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(product_id)
            .bind(user_id)
            .bind(name)
            .bind(rating)
            .bind(body)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "you have already reviewed this product"))?;

        refresh_product_rating(&mut tx, product_id).await?;

        tx.commit().await?;

        Ok(review)
    }

    /// Delete a review (staff) and refresh the product's aggregate rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product_id = sqlx::query_scalar::<_, ProductId>(
            "DELETE FROM reviews WHERE id = $1 RETURNING product_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        refresh_product_rating(&mut tx, product_id).await?;

        tx.commit().await?;

        Ok(())
    }

    /// All reviews across the catalog, newest first (staff).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Review>, RepositoryError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC");

        let reviews = sqlx::query_as::<_, Review>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(reviews)
    }
}

/// Recompute a product's `rating` and `review_count` from its reviews.
///
/// A product with no reviews keeps its seeded rating and a zero count.
async fn refresh_product_rating(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: ProductId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE products SET \
         rating = COALESCE( \
             (SELECT ROUND(AVG(rating)::numeric, 1)::float8 \
              FROM reviews WHERE product_id = $1), rating), \
         review_count = (SELECT COUNT(*) FROM reviews WHERE product_id = $1) \
         WHERE id = $1",
    )
    .bind(product_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
