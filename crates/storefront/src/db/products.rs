//! Product catalog repository.

use serde::Deserialize;
use sqlx::PgPool;

use akvrix_core::{Category, ProductId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::product::{Product, ProductFields};

/// Shop listing sort orders.
///
/// Deserialized from the `?sort=` query parameter; unknown values fall
/// back to [`SortOrder::Featured`] at the route layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Catalog order, no explicit sort.
    #[default]
    Featured,
    /// Price ascending.
    Low,
    /// Price descending.
    High,
    /// Most recently added first.
    Newest,
    /// Best rated first.
    Rating,
}

impl SortOrder {
    /// Parse a `?sort=` query value; unknown values mean featured.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "high" => Self::High,
            "newest" => Self::Newest,
            "rating" => Self::Rating,
            _ => Self::Featured,
        }
    }

    fn order_by(self) -> &'static str {
        match self {
            Self::Featured => "id",
            Self::Low => "price ASC, id",
            Self::High => "price DESC, id",
            Self::Newest => "created_at DESC, id",
            Self::Rating => "rating DESC, id",
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, slug, name, price, old_price, category, description, \
     image, image_hover, sizes, colors, rating, review_count, badge, in_stock, created_at";

/// Repository for catalog queries.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by category, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<Category>,
        sort: SortOrder,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE $1::text IS NULL OR category = $1 \
             ORDER BY {}",
            sort.order_by()
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category.map(Category::as_str))
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Look up a product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has the slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Product, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1");

        sqlx::query_as::<_, Product>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Same-category products shown under "You may also like".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn related(
        &self,
        product: &Product,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE category = $1 AND id <> $2 LIMIT $3"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(product.category)
            .bind(product.id)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Best sellers for the home page.
    ///
    /// Products badged "Best Seller" by rating; when fewer than four carry
    /// the badge, falls back to the top-rated products overall.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn best_sellers(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE badge = 'Best Seller' ORDER BY rating DESC LIMIT $1"
        );

        let badged = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        if badged.len() >= 4 {
            return Ok(badged);
        }

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rating DESC LIMIT $1"
        );

        let top = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(top)
    }

    /// Create a product from validated staff form fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    pub async fn create(&self, fields: &ProductFields) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products \
             (slug, name, price, old_price, category, description, image, image_hover, \
              sizes, colors, rating, review_count, badge, in_stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(fields.slug.trim())
            .bind(fields.name.trim())
            .bind(fields.price)
            .bind(fields.old_price)
            .bind(fields.category)
            .bind(&fields.description)
            .bind(&fields.image)
            .bind(&fields.image_hover)
            .bind(&fields.sizes)
            .bind(&fields.colors)
            .bind(fields.rating)
            .bind(fields.review_count)
            .bind(&fields.badge)
            .bind(fields.in_stock)
            .fetch_one(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "slug already exists"))
    }

    /// Update every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist and
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products SET \
             slug = $2, name = $3, price = $4, old_price = $5, category = $6, \
             description = $7, image = $8, image_hover = $9, sizes = $10, colors = $11, \
             rating = $12, review_count = $13, badge = $14, in_stock = $15 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(fields.slug.trim())
            .bind(fields.name.trim())
            .bind(fields.price)
            .bind(fields.old_price)
            .bind(fields.category)
            .bind(&fields.description)
            .bind(&fields.image)
            .bind(&fields.image_hover)
            .bind(&fields.sizes)
            .bind(&fields.colors)
            .bind(fields.rating)
            .bind(fields.review_count)
            .bind(&fields.badge)
            .bind(fields.in_stock)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "slug already exists"))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Cart lines and wishlist entries cascade; order lines keep their
    /// snapshot and null the product reference.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
