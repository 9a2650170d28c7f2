//! Wishlist API handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use akvrix_core::ProductId;

use crate::db::cart::CartRepository;
use crate::error::AppError;
use crate::middleware::VisitorIdentity;
use crate::state::AppState;

/// Payload for `POST /api/wishlist/toggle`.
#[derive(Debug, Deserialize)]
pub struct TogglePayload {
    pub product_id: ProductId,
}

/// Toggle a product in and out of the wishlist.
#[instrument(skip(state, identity))]
pub async fn toggle(
    State(state): State<AppState>,
    VisitorIdentity(identity): VisitorIdentity,
    Json(payload): Json<TogglePayload>,
) -> Result<Json<Value>, AppError> {
    let carts = CartRepository::new(state.pool());
    let added = carts.toggle_wishlist(&identity, payload.product_id).await?;

    Ok(Json(json!({ "success": true, "added": added })))
}
