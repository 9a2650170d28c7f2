//! Core types for the AKVRIX storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod identity;
pub mod pricing;
pub mod status;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{Identity, SessionToken};
pub use status::{OrderStatus, OrderStatusError, TrackingStep};
