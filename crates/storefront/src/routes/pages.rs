//! Page route handlers.
//!
//! Rendering is handled by an external template layer; these handlers
//! assemble the page's view model and return it as JSON. Redirect
//! semantics (login with return path) live in the extractors.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use akvrix_core::{Category, Identity};

use crate::db::addresses::AddressRepository;
use crate::db::cart::CartRepository;
use crate::db::orders::OrderRepository;
use crate::db::products::{ProductRepository, SortOrder};
use crate::db::reviews::ReviewRepository;
use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::middleware::{OptionalAuth, RequireAuth, VisitorIdentity};
use crate::models::cart::CartSummary;
use crate::state::AppState;

/// Products shown in the best-sellers rail.
const BEST_SELLER_COUNT: i64 = 8;

/// Products shown under "You may also like".
const RELATED_COUNT: i64 = 4;

/// Category tiles for the home and shop pages.
fn category_tiles() -> Vec<Value> {
    Category::ALL
        .iter()
        .map(|c| json!({ "key": c.as_str(), "label": c.label() }))
        .collect()
}

/// Home page: best sellers and category tiles.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    VisitorIdentity(identity): VisitorIdentity,
) -> Result<Json<Value>, AppError> {
    let products = ProductRepository::new(state.pool());
    let carts = CartRepository::new(state.pool());

    let best_sellers = products.best_sellers(BEST_SELLER_COUNT).await?;
    let cart_count = carts.item_count(&identity).await?;
    let wishlist_ids = carts.wishlist_product_ids(&identity).await?;

    Ok(Json(json!({
        "page": "home",
        "user": user,
        "cart_count": cart_count,
        "best_sellers": best_sellers,
        "categories": category_tiles(),
        "wishlist_product_ids": wishlist_ids,
    })))
}

/// Shop listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    /// Category filter; unknown values show the full catalog.
    pub cat: Option<String>,
    /// Sort order; unknown values fall back to featured.
    pub sort: Option<String>,
}

/// Shop listing, filterable by category and sortable.
#[instrument(skip(state, user, identity))]
pub async fn shop(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    VisitorIdentity(identity): VisitorIdentity,
    Query(query): Query<ShopQuery>,
) -> Result<Json<Value>, AppError> {
    let category = query.cat.as_deref().and_then(|c| c.parse::<Category>().ok());
    let sort = query
        .sort
        .as_deref()
        .map_or(SortOrder::default(), SortOrder::from_param);

    let products = ProductRepository::new(state.pool());
    let carts = CartRepository::new(state.pool());

    let listing = products.list(category, sort).await?;
    let cart_count = carts.item_count(&identity).await?;
    let wishlist_ids = carts.wishlist_product_ids(&identity).await?;

    Ok(Json(json!({
        "page": "shop",
        "user": user,
        "cart_count": cart_count,
        "category": category.map(|c| c.as_str()),
        "categories": category_tiles(),
        "products": listing,
        "wishlist_product_ids": wishlist_ids,
    })))
}

/// Product detail with reviews and related products.
#[instrument(skip(state, user, identity))]
pub async fn product_detail(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    VisitorIdentity(identity): VisitorIdentity,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let products = ProductRepository::new(state.pool());
    let carts = CartRepository::new(state.pool());
    let reviews = ReviewRepository::new(state.pool());

    let product = products.get_by_slug(&slug).await?;
    let related = products.related(&product, RELATED_COUNT).await?;
    let product_reviews = reviews.list_for_product(product.id).await?;
    let wishlisted = carts.wishlist_contains(&identity, product.id).await?;
    let cart_count = carts.item_count(&identity).await?;

    let sizes = serde_json::to_value(product.sizes_list()).unwrap_or_default();
    let colors = serde_json::to_value(product.colors_list()).unwrap_or_default();
    let discount_percent = product.discount_percent();

    Ok(Json(json!({
        "page": "product",
        "user": user,
        "cart_count": cart_count,
        "product": product,
        "sizes": sizes,
        "colors": colors,
        "discount_percent": discount_percent,
        "wishlisted": wishlisted,
        "reviews": product_reviews,
        "related": related,
    })))
}

/// Cart page with line items and totals.
#[instrument(skip_all)]
pub async fn cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>, AppError> {
    let identity = Identity::Account(user.id);
    let carts = CartRepository::new(state.pool());

    let lines = carts.lines(&identity).await?;
    let summary = CartSummary::from_lines(lines);

    Ok(Json(json!({
        "page": "cart",
        "user": user,
        "cart": summary,
    })))
}

/// Checkout page: cart totals plus saved addresses for prefill.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>, AppError> {
    let identity = Identity::Account(user.id);
    let carts = CartRepository::new(state.pool());
    let addresses = AddressRepository::new(state.pool());

    let lines = carts.lines(&identity).await?;
    let summary = CartSummary::from_lines(lines);
    let saved_addresses = addresses.list_for_user(user.id).await?;

    Ok(Json(json!({
        "page": "checkout",
        "user": user,
        "cart": summary,
        "addresses": saved_addresses,
    })))
}

/// Wishlist page.
#[instrument(skip_all)]
pub async fn wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>, AppError> {
    let identity = Identity::Account(user.id);
    let carts = CartRepository::new(state.pool());

    let items = carts.wishlist(&identity).await?;
    let cart_count = carts.item_count(&identity).await?;

    Ok(Json(json!({
        "page": "wishlist",
        "user": user,
        "cart_count": cart_count,
        "items": items,
    })))
}

/// Account page: profile fields and saved addresses.
#[instrument(skip_all)]
pub async fn account(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>, AppError> {
    let users = UserRepository::new(state.pool());
    let addresses = AddressRepository::new(state.pool());

    let profile = users.get_by_id(user.id).await?;
    let saved_addresses = addresses.list_for_user(user.id).await?;

    Ok(Json(json!({
        "page": "account",
        "user": user,
        "profile": profile,
        "addresses": saved_addresses,
    })))
}

/// Order history, newest first.
#[instrument(skip_all)]
pub async fn my_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let list = orders.list_for_user(user.id).await?;

    Ok(Json(json!({
        "page": "my_orders",
        "user": user,
        "orders": list,
    })))
}

/// Order detail with its lines and tracking progress.
#[instrument(skip(state, user))]
pub async fn order_detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_number): Path<String>,
) -> Result<Json<Value>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let (order, lines) = orders.get_for_user(user.id, &order_number).await?;

    Ok(Json(json!({
        "page": "order_detail",
        "user": user,
        "order": order,
        "lines": lines,
        "tracking_steps": order.tracking_steps(),
    })))
}
