//! Profile and password API handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use akvrix_core::Email;

use crate::db::users::{ProfileUpdate, UserRepository};
use crate::error::AppError;
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::user::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Payload for `POST /api/profile/update`.
#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

/// Payload for `POST /api/password/change`.
#[derive(Debug, Deserialize)]
pub struct PasswordPayload {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Update the account's profile fields.
///
/// The session's cached user is refreshed so the header shows the new
/// name immediately.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<Value>, AppError> {
    let email = Email::parse(&payload.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let users = UserRepository::new(state.pool());
    let updated = users
        .update_profile(
            user.id,
            &ProfileUpdate {
                email,
                first_name: payload.first_name.trim().to_owned(),
                last_name: payload.last_name.trim().to_owned(),
                phone: payload.phone.trim().to_owned(),
            },
        )
        .await?;

    let current = CurrentUser::from(&updated);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true, "profile": updated })))
}

/// Change the account's password.
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<PasswordPayload>,
) -> Result<Json<Value>, AppError> {
    let auth = AuthService::new(state.pool());
    auth.change_password(
        user.id,
        &payload.current_password,
        &payload.new_password,
        &payload.confirm_password,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}
