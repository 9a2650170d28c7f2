//! Saved-address repository.
//!
//! The single-default invariant (at most one `is_default` address per
//! account) is backed by a partial unique index; writes that set a new
//! default clear the old one in the same transaction.

use sqlx::PgPool;

use akvrix_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::address::{Address, AddressFields};

const ADDRESS_COLUMNS: &str = "id, user_id, label, first_name, last_name, phone, \
     address, city, state, zip_code, country, is_default, created_at";

/// Repository for saved shipping addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// An account's addresses, default first, then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses \
             WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC"
        );

        let addresses = sqlx::query_as::<_, Address>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(addresses)
    }

    /// Insert a new address or update one the account already owns.
    ///
    /// The first address an account saves becomes the default regardless
    /// of the submitted flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when updating an id that does
    /// not exist or belongs to another account.
    pub async fn save(
        &self,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM addresses WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let make_default = fields.is_default || existing_count == 0;
        if make_default {
            sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let address = if let Some(id) = fields.id {
            let sql = format!(
                "UPDATE addresses SET \
                 label = $3, first_name = $4, last_name = $5, phone = $6, \
                 address = $7, city = $8, state = $9, zip_code = $10, \
                 country = $11, is_default = $12 \
                 WHERE id = $1 AND user_id = $2 \
                 RETURNING {ADDRESS_COLUMNS}"
            );

            sqlx::query_as::<_, Address>(&sql)
                .bind(id)
                .bind(user_id)
                .bind(&fields.label)
                .bind(&fields.first_name)
                .bind(&fields.last_name)
                .bind(&fields.phone)
                .bind(&fields.address)
                .bind(&fields.city)
                .bind(&fields.state)
                .bind(&fields.zip_code)
                .bind(&fields.country)
                .bind(make_default)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?
        } else {
            let sql = format!(
                "INSERT INTO addresses \
                 (user_id, label, first_name, last_name, phone, address, \
                  city, state, zip_code, country, is_default) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
                 RETURNING {ADDRESS_COLUMNS}"
            );

            sqlx::query_as::<_, Address>(&sql)
                .bind(user_id)
                .bind(&fields.label)
                .bind(&fields.first_name)
                .bind(&fields.last_name)
                .bind(&fields.phone)
                .bind(&fields.address)
                .bind(&fields.city)
                .bind(&fields.state)
                .bind(&fields.zip_code)
                .bind(&fields.country)
                .bind(make_default)
                .fetch_one(&mut *tx)
                .await?
        };

        tx.commit().await?;

        Ok(address)
    }

    /// Mark one of the account's addresses as the default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist or
    /// belongs to another account.
    pub async fn set_default(
        &self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result =
            sqlx::query("UPDATE addresses SET is_default = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    /// Delete one of the account's addresses.
    ///
    /// When the deleted address was the default, the most recently created
    /// remaining address is promoted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist or
    /// belongs to another account.
    pub async fn delete(&self, user_id: UserId, id: AddressId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let was_default = sqlx::query_scalar::<_, bool>(
            "DELETE FROM addresses WHERE id = $1 AND user_id = $2 RETURNING is_default",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if was_default {
            sqlx::query(
                "UPDATE addresses SET is_default = TRUE WHERE id = ( \
                     SELECT id FROM addresses WHERE user_id = $1 \
                     ORDER BY created_at DESC LIMIT 1)",
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
