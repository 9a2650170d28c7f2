//! Saved address types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use akvrix_core::{AddressId, UserId};

/// A saved shipping address.
///
/// At most one address per account has `is_default` set; the repository
/// maintains that invariant transactionally.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    /// Short label shown in the address picker, e.g. "Home" or "Office".
    pub label: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted by the save-address API.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressFields {
    /// Present when updating an existing address.
    #[serde(default)]
    pub id: Option<AddressId>,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

fn default_label() -> String {
    "Home".to_owned()
}

fn default_country() -> String {
    "India".to_owned()
}
