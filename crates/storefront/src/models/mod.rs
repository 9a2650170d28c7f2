//! Domain models and view types.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

/// Keys used for session storage.
///
/// Centralized here to avoid typos and collisions between handlers.
pub mod session_keys {
    /// The authenticated user ([`super::user::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// Anonymous visitor token owning session-scoped cart/wishlist rows.
    pub const VISITOR_TOKEN: &str = "visitor_token";
}
