//! Database operations for the storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` - accounts (staff flag gates the dashboard)
//! - `products` - the catalog
//! - `cart_lines` / `wishlist_entries` - identity-scoped, ephemeral
//! - `orders` / `order_lines` - immutable checkout snapshots
//! - `reviews` - one per account per product
//! - `addresses` - saved addresses with a single-default invariant
//!
//! Migrations live in `crates/storefront/migrations/` and run on startup.
//!
//! All queries are runtime-checked (`sqlx::query_as` with `FromRow`), so
//! the workspace builds without a live database.

pub mod addresses;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reports;
pub mod reviews;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors produced by the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist (or is not owned by the caller).
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The row exists but belongs to another account.
    #[error("forbidden")]
    Forbidden,

    /// A stored value failed domain validation on read.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation.
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
