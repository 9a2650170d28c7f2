//! Review submission API handler.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::products::ProductRepository;
use crate::db::reviews::ReviewRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Payload for `POST /api/review/{slug}`.
#[derive(Debug, Deserialize)]
pub struct ReviewPayload {
    pub rating: i32,
    pub text: String,
}

/// Submit a review for a product.
///
/// One review per account per product; the account's display name is
/// captured on the review at submission time.
#[instrument(skip(state, user, payload))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(slug): Path<String>,
    Json(payload): Json<ReviewPayload>,
) -> Result<Json<Value>, AppError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_owned(),
        ));
    }
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("review text is required".to_owned()));
    }

    let products = ProductRepository::new(state.pool());
    let product = products.get_by_slug(&slug).await?;

    let reviews = ReviewRepository::new(state.pool());
    let review = reviews
        .create(product.id, user.id, &user.name, payload.rating, text)
        .await?;

    Ok(Json(json!({ "success": true, "review": review })))
}
