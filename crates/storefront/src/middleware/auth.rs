//! Authentication middleware and extractors.
//!
//! `VisitorIdentity` resolves every request to exactly one identity: the
//! logged-in account, or an anonymous token minted into the session on
//! first contact. Cart and wishlist routes work the same for both.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use akvrix_core::{Identity, SessionToken};

use crate::models::{session_keys, user::CurrentUser};

/// Extractor that requires a logged-in account.
///
/// Page routes redirect to the login form with a `next` parameter; API
/// routes get a plain 401.
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a logged-in staff account.
///
/// Non-staff accounts get 403; anonymous visitors are sent to the staff
/// login form.
pub struct RequireStaff(pub CurrentUser);

/// Error returned when authentication is required but missing.
pub enum AuthRejection {
    /// Redirect to a login page (for HTML requests).
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Authenticated but not staff.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(target) => Redirect::to(&target).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

/// Read the current user out of the request's session.
async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await {
            Some(user) => Ok(Self(user)),
            None if parts.uri.path().starts_with("/api/") => Err(AuthRejection::Unauthorized),
            None => Err(AuthRejection::RedirectToLogin(format!(
                "/login?next={}",
                parts.uri.path()
            ))),
        }
    }
}

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await {
            Some(user) if user.is_staff => Ok(Self(user)),
            Some(_) => Err(AuthRejection::Forbidden),
            None => Err(AuthRejection::RedirectToLogin("/admin/login".to_owned())),
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}

/// Extractor resolving the request to a cart/wishlist identity.
///
/// Logged-in requests resolve to the account. Anonymous requests reuse the
/// visitor token already in the session, minting and storing a fresh one
/// when the session has none yet.
pub struct VisitorIdentity(pub Identity);

impl<S> FromRequestParts<S> for VisitorIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = current_user(parts).await {
            return Ok(Self(Identity::Account(user.id)));
        }

        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let existing: Option<String> = session
            .get(session_keys::VISITOR_TOKEN)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let token = match existing {
            Some(raw) => SessionToken::from_string(raw),
            None => {
                let token = SessionToken::mint();
                session
                    .insert(session_keys::VISITOR_TOKEN, token.as_str())
                    .await
                    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
                token
            }
        };

        Ok(Self(Identity::Anonymous(token)))
    }
}

/// Helper to set the current user in the session.
///
/// Cycles the session id to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
