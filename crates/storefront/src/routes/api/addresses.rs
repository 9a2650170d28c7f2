//! Saved-address API handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::instrument;

use akvrix_core::AddressId;

use crate::db::addresses::AddressRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::address::AddressFields;
use crate::state::AppState;

/// List the account's saved addresses.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>, AppError> {
    let addresses = AddressRepository::new(state.pool());
    let saved = addresses.list_for_user(user.id).await?;

    Ok(Json(json!({ "success": true, "addresses": saved })))
}

/// Create or update a saved address.
#[instrument(skip(state, user, fields))]
pub async fn save(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(fields): Json<AddressFields>,
) -> Result<Json<Value>, AppError> {
    validate_address(&fields)?;

    let addresses = AddressRepository::new(state.pool());
    let address = addresses.save(user.id, &fields).await?;

    Ok(Json(json!({ "success": true, "address": address })))
}

/// Delete a saved address.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<Value>, AppError> {
    let addresses = AddressRepository::new(state.pool());
    addresses.delete(user.id, id).await?;

    Ok(Json(json!({ "success": true })))
}

/// Mark a saved address as the default.
#[instrument(skip(state, user))]
pub async fn set_default(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<Value>, AppError> {
    let addresses = AddressRepository::new(state.pool());
    addresses.set_default(user.id, id).await?;

    Ok(Json(json!({ "success": true })))
}

/// Required address fields must be non-blank.
fn validate_address(fields: &AddressFields) -> Result<(), AppError> {
    let required = [
        ("first_name", &fields.first_name),
        ("last_name", &fields.last_name),
        ("phone", &fields.phone),
        ("address", &fields.address),
        ("city", &fields.city),
        ("state", &fields.state),
        ("zip_code", &fields.zip_code),
    ];

    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{name} is required")));
        }
    }

    Ok(())
}
