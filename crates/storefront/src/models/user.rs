//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use akvrix_core::UserId;

/// A storefront account row.
///
/// The password hash never leaves the db layer; see
/// [`crate::db::users::UserRepository::get_password_hash`].
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Grants access to the staff dashboard.
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name: "first last", falling back to the email local part.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.split('@').next().unwrap_or_default().to_owned()
        } else {
            full.to_owned()
        }
    }
}

/// The slice of account state kept in the session after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub is_staff: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.display_name(),
            is_staff: user.is_staff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str, email: &str) -> User {
        User {
            id: UserId::new(1),
            email: email.to_owned(),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            phone: String::new(),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(user("Priya", "Nair", "p@example.com").display_name(), "Priya Nair");
        assert_eq!(user("Priya", "", "p@example.com").display_name(), "Priya");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        assert_eq!(user("", "", "priya.n@example.com").display_name(), "priya.n");
    }
}
