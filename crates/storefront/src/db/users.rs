//! Account repository.
//!
//! Password hashes are read and written here but never appear on the
//! [`User`] model, so they cannot leak through a serialized response.

use sqlx::PgPool;

use akvrix_core::{Email, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::user::User;

const USER_COLUMNS: &str = "id, email, first_name, last_name, phone, is_staff, created_at";

/// Profile fields editable from the account page.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Repository for storefront accounts.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(email.as_str())
            .bind(password_hash)
            .bind(first_name)
            .bind(last_name)
            .fetch_one(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "an account with this email already exists"))
    }

    /// Look up an account by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has the email.
    pub async fn get_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Look up an account by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn get_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Fetch an account's password hash for verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn get_password_hash(&self, id: UserId) -> Result<String, RepositoryError> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Replace an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Update the editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist and
    /// `RepositoryError::Conflict` if the new email belongs to another
    /// account.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "UPDATE users SET email = $2, first_name = $3, last_name = $4, phone = $5 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(update.email.as_str())
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.phone)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "an account with this email already exists"))?
            .ok_or(RepositoryError::NotFound)
    }
}
