//! AKVRIX Core - Shared types library.
//!
//! This crate provides common domain types used across the AKVRIX
//! storefront: the public shop, the JSON APIs, and the staff dashboard.
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, visitor
//!   identity, categories, order status, and decimal pricing helpers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
