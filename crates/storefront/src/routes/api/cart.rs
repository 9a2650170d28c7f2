//! Cart API handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use akvrix_core::{CartLineId, ProductId};

use crate::db::cart::{CartAction, CartRepository};
use crate::error::AppError;
use crate::middleware::VisitorIdentity;
use crate::state::AppState;

/// Payload for `POST /api/cart/add`.
#[derive(Debug, Deserialize)]
pub struct AddPayload {
    pub product_id: ProductId,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_size() -> String {
    "M".to_owned()
}

fn default_color() -> String {
    "#000".to_owned()
}

const fn default_quantity() -> i32 {
    1
}

/// Payload for `POST /api/cart/update`.
#[derive(Debug, Deserialize)]
pub struct UpdatePayload {
    pub item_id: CartLineId,
    pub action: CartAction,
}

/// Add a product to the cart (or bump an existing line's quantity).
#[instrument(skip(state, identity))]
pub async fn add(
    State(state): State<AppState>,
    VisitorIdentity(identity): VisitorIdentity,
    Json(payload): Json<AddPayload>,
) -> Result<Json<Value>, AppError> {
    if payload.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_owned()));
    }

    let carts = CartRepository::new(state.pool());
    let cart_count = carts
        .add_line(
            &identity,
            payload.product_id,
            &payload.size,
            &payload.color,
            payload.quantity,
        )
        .await?;

    Ok(Json(json!({ "success": true, "cart_count": cart_count })))
}

/// Increase, decrease, or remove a cart line.
///
/// A line the caller does not own is a silent no-op; the response still
/// reports the caller's current count.
#[instrument(skip(state, identity))]
pub async fn update(
    State(state): State<AppState>,
    VisitorIdentity(identity): VisitorIdentity,
    Json(payload): Json<UpdatePayload>,
) -> Result<Json<Value>, AppError> {
    let carts = CartRepository::new(state.pool());
    carts
        .update_line(&identity, payload.item_id, payload.action)
        .await?;
    let cart_count = carts.item_count(&identity).await?;

    Ok(Json(json!({ "success": true, "cart_count": cart_count })))
}
