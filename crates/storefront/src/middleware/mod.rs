//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Identity and auth are handled by extractors rather than layers, so each
//! route states what it needs in its signature.

pub mod auth;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, RequireStaff, VisitorIdentity, clear_current_user,
    set_current_user,
};
pub use session::create_session_layer;
