//! Visitor identity: the key all cart and wishlist ownership is scoped by.
//!
//! Every visitor is exactly one of:
//!
//! - [`Identity::Anonymous`] - a browser session identified by a random
//!   [`SessionToken`], minted the first time the visitor touches the cart
//!   or wishlist.
//! - [`Identity::Account`] - an authenticated user.
//!
//! Promotion from anonymous to account happens exactly once, at login or
//! registration, when the session's rows are merged onto the account. It is
//! never reversed.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::UserId;

/// An opaque token identifying an anonymous browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh random token.
    #[must_use]
    pub fn mint() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an existing token value (e.g. read back from the session store).
    #[must_use]
    pub fn from_string(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The visitor key used by all cart, wishlist, and order operations.
///
/// Threaded as an explicit parameter through every operation rather than
/// read from ambient session state, so ownership is always visible at the
/// call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// An anonymous browser session.
    Anonymous(SessionToken),
    /// An authenticated account.
    Account(UserId),
}

impl Identity {
    /// Returns the account id when this identity is authenticated.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Account(id) => Some(*id),
            Self::Anonymous(_) => None,
        }
    }

    /// Returns true for authenticated identities.
    #[must_use]
    pub const fn is_account(&self) -> bool {
        matches!(self, Self::Account(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_tokens_are_unique() {
        assert_ne!(SessionToken::mint(), SessionToken::mint());
    }

    #[test]
    fn test_identity_user_id() {
        let account = Identity::Account(UserId::new(9));
        assert_eq!(account.user_id(), Some(UserId::new(9)));
        assert!(account.is_account());

        let anon = Identity::Anonymous(SessionToken::mint());
        assert_eq!(anon.user_id(), None);
        assert!(!anon.is_account());
    }
}
