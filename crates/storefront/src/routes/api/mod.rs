//! JSON API route handlers.
//!
//! Successful responses carry `{"success": true, ...}`; failures render
//! through [`crate::error::AppError`] as `{"success": false, "error": msg}`.

pub mod addresses;
pub mod cart;
pub mod orders;
pub mod profile;
pub mod reviews;
pub mod wishlist;
