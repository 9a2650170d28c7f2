//! Authentication route handlers.
//!
//! Login and registration promote the session's anonymous cart and
//! wishlist to the account in the same request, so nothing a visitor
//! added before signing in is lost.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use akvrix_core::SessionToken;

use crate::db::cart::CartRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::session_keys;
use crate::models::user::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Local return path from the `?next=` redirect.
    #[serde(default)]
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Query parameters for login/register pages.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Pages
// =============================================================================

/// Display the login page; already-authenticated visitors go home.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    Json(json!({
        "page": "login",
        "error": query.error,
        "next": query.next,
    }))
    .into_response()
}

/// Display the registration page; already-authenticated visitors go home.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    Json(json!({
        "page": "register",
        "error": query.error,
    }))
    .into_response()
}

/// Display the forgot-password page.
pub async fn forgot_password_page() -> Json<Value> {
    Json(json!({ "page": "forgot_password" }))
}

// =============================================================================
// Actions
// =============================================================================

/// Login action: verify credentials, merge the visitor's cart, redirect.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    let user = match auth.login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            return Ok(Redirect::to("/login?error=invalid_credentials").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    establish_session(&state, &session, &user).await?;

    let target = form
        .next
        .as_deref()
        .filter(|next| is_local_path(next))
        .unwrap_or("/");

    Ok(Redirect::to(target).into_response())
}

/// Registration action: create the account, merge, auto-login.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    let user = match auth
        .register(&form.name, &form.email, &form.password, &form.confirm_password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::UserAlreadyExists) => {
            return Ok(Redirect::to("/register?error=email_taken").into_response());
        }
        Err(AuthError::PasswordMismatch) => {
            return Ok(Redirect::to("/register?error=password_mismatch").into_response());
        }
        Err(AuthError::WeakPassword(_)) => {
            return Ok(Redirect::to("/register?error=weak_password").into_response());
        }
        Err(AuthError::InvalidEmail(_)) => {
            return Ok(Redirect::to("/register?error=invalid_email").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    establish_session(&state, &session, &user).await?;

    Ok(Redirect::to("/").into_response())
}

/// Forgot-password action.
///
/// Acknowledges the address without sending anything; there is no email
/// delivery. The response is identical whether or not an account exists.
#[instrument(skip_all)]
pub async fn forgot_password(Form(form): Form<ForgotPasswordForm>) -> Json<Value> {
    tracing::info!(email = %form.email, "password reset requested");
    Json(json!({
        "success": true,
        "message": "If an account exists for that address, reset instructions will follow.",
    }))
}

/// Logout action: clear the session user and go home.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

// =============================================================================
// Helpers
// =============================================================================

/// Store the logged-in user in the session, merging any anonymous cart.
async fn establish_session(
    state: &AppState,
    session: &Session,
    user: &crate::models::user::User,
) -> Result<(), AppError> {
    // Merge before the visitor token leaves the session.
    let token: Option<String> = session
        .get(session_keys::VISITOR_TOKEN)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if let Some(raw) = token {
        let carts = CartRepository::new(state.pool());
        carts
            .merge_identity(&SessionToken::from_string(raw), user.id)
            .await?;
        session
            .remove::<String>(session_keys::VISITOR_TOKEN)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    let current = CurrentUser::from(user);
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    set_sentry_user(&user.id, Some(&user.email));

    Ok(())
}

/// A `next` target is honored only when it is a local absolute path.
fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_validation() {
        assert!(is_local_path("/account"));
        assert!(is_local_path("/order/AKV-123456"));
        assert!(!is_local_path("//evil.example.com"));
        assert!(!is_local_path("https://evil.example.com"));
        assert!(!is_local_path("/\\evil.example.com"));
        assert!(!is_local_path(""));
    }
}
