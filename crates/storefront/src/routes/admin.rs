//! Staff dashboard route handlers.
//!
//! Everything here sits behind [`RequireStaff`] except the login pair.
//! The dashboard runs in the same binary as the storefront but on its own
//! authenticated path with an independent login form.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use akvrix_core::{Category, OrderId, OrderStatus, ProductId, ReviewId};

use crate::db::orders::{OrderRepository, TrackingUpdate};
use crate::db::products::{ProductRepository, SortOrder};
use crate::db::reports::ReportRepository;
use crate::db::reviews::ReviewRepository;
use crate::error::{AppError, set_sentry_user};
use crate::middleware::{OptionalAuth, RequireStaff, clear_current_user, set_current_user};
use crate::models::product::ProductFields;
use crate::models::user::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Orders shown in the dashboard's recent feed.
const RECENT_ORDER_COUNT: i64 = 5;

/// Products shown in the dashboard's top-rated panel.
const TOP_RATED_COUNT: i64 = 5;

// =============================================================================
// Login / logout
// =============================================================================

/// Staff login form data.
#[derive(Debug, Deserialize)]
pub struct StaffLoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for the staff login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

/// Display the staff login page; staff already signed in go to the dashboard.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if user.as_ref().is_some_and(|u| u.is_staff) {
        return Redirect::to("/admin").into_response();
    }
    Json(json!({ "page": "admin_login", "error": query.error })).into_response()
}

/// Staff login action: credentials must belong to a staff account.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<StaffLoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    let user = match auth.login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            return Ok(Redirect::to("/admin/login?error=invalid_credentials").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    if !user.is_staff {
        return Ok(Redirect::to("/admin/login?error=not_staff").into_response());
    }

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    set_sentry_user(&user.id, Some(&user.email));

    Ok(Redirect::to("/admin").into_response())
}

/// Staff logout action.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    crate::error::clear_sentry_user();

    Ok(Redirect::to("/admin/login"))
}

// =============================================================================
// Dashboard
// =============================================================================

/// Dashboard: headline stats, recent orders, stock and rating panels.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Value>, AppError> {
    let reports = ReportRepository::new(state.pool());

    let stats = reports.dashboard_stats().await?;
    let recent_orders = reports.recent_orders(RECENT_ORDER_COUNT).await?;
    let out_of_stock = reports.out_of_stock().await?;
    let top_rated = reports.top_rated(TOP_RATED_COUNT).await?;

    Ok(Json(json!({
        "page": "admin_dashboard",
        "staff": staff,
        "stats": stats,
        "recent_orders": recent_orders,
        "out_of_stock": out_of_stock,
        "top_rated": top_rated,
    })))
}

// =============================================================================
// Products
// =============================================================================

/// Full product list for the management table.
#[instrument(skip_all)]
pub async fn products(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Value>, AppError> {
    let repo = ProductRepository::new(state.pool());
    let listing = repo.list(None, SortOrder::Newest).await?;

    Ok(Json(json!({
        "page": "admin_products",
        "staff": staff,
        "products": listing,
    })))
}

/// New-product form view model.
#[instrument(skip_all)]
pub async fn new_product_page(RequireStaff(staff): RequireStaff) -> Json<Value> {
    Json(json!({
        "page": "admin_product_new",
        "staff": staff,
        "categories": Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
    }))
}

/// Create a product.
#[instrument(skip(state, fields))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Json(fields): Json<ProductFields>,
) -> Result<Json<Value>, AppError> {
    fields.validate().map_err(AppError::BadRequest)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo.create(&fields).await?;

    tracing::info!(slug = %product.slug, "product created");

    Ok(Json(json!({ "success": true, "product": product })))
}

/// Edit-product form view model.
#[instrument(skip(state, staff))]
pub async fn edit_product_page(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>, AppError> {
    let repo = ProductRepository::new(state.pool());
    let product = repo.get_by_id(id).await?;

    Ok(Json(json!({
        "page": "admin_product_edit",
        "staff": staff,
        "product": product,
        "categories": Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
    })))
}

/// Update a product.
#[instrument(skip(state, fields))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<ProductId>,
    Json(fields): Json<ProductFields>,
) -> Result<Json<Value>, AppError> {
    fields.validate().map_err(AppError::BadRequest)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo.update(id, &fields).await?;

    Ok(Json(json!({ "success": true, "product": product })))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>, AppError> {
    let repo = ProductRepository::new(state.pool());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound("product".to_owned()));
    }

    tracing::info!(product_id = %id, "product deleted");

    Ok(Json(json!({ "success": true })))
}

// =============================================================================
// Orders
// =============================================================================

/// Query parameters for the order list.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

/// Order list, optionally filtered by status.
#[instrument(skip(state, staff))]
pub async fn orders(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Value>, AppError> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(|_| AppError::BadRequest(format!("unknown status: {raw}")))?,
        ),
    };

    let repo = OrderRepository::new(state.pool());
    let listing = repo.list_all(status).await?;

    Ok(Json(json!({
        "page": "admin_orders",
        "staff": staff,
        "status": status.map(OrderStatus::as_str),
        "orders": listing,
    })))
}

/// Order detail with its lines.
#[instrument(skip(state, staff))]
pub async fn order_detail(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>, AppError> {
    let repo = OrderRepository::new(state.pool());
    let (order, lines) = repo.get_by_id(id).await?;

    Ok(Json(json!({
        "page": "admin_order_detail",
        "staff": staff,
        "order": order,
        "lines": lines,
        "statuses": OrderStatus::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    })))
}

/// Payload for updating an order's status and tracking fields.
#[derive(Debug, Deserialize)]
pub struct OrderUpdatePayload {
    pub status: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub estimated_delivery: Option<chrono::NaiveDate>,
}

/// Update an order's status and tracking fields.
#[instrument(skip(state, payload))]
pub async fn update_order(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<OrderId>,
    Json(payload): Json<OrderUpdatePayload>,
) -> Result<Json<Value>, AppError> {
    let status = match payload.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(|_| AppError::BadRequest(format!("unknown status: {raw}")))?,
        ),
    };

    let tracking = TrackingUpdate {
        tracking_number: payload.tracking_number,
        carrier: payload.carrier,
        estimated_delivery: payload.estimated_delivery,
    };

    let repo = OrderRepository::new(state.pool());
    let order = repo.update_status(id, status, &tracking).await?;

    tracing::info!(order_number = %order.order_number, status = %order.status, "order updated");

    Ok(Json(json!({ "success": true, "order": order })))
}

// =============================================================================
// Reviews & customers
// =============================================================================

/// All reviews, newest first.
#[instrument(skip_all)]
pub async fn reviews(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Value>, AppError> {
    let repo = ReviewRepository::new(state.pool());
    let listing = repo.list_all().await?;

    Ok(Json(json!({
        "page": "admin_reviews",
        "staff": staff,
        "reviews": listing,
    })))
}

/// Delete a review.
#[instrument(skip(state))]
pub async fn delete_review(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<ReviewId>,
) -> Result<Json<Value>, AppError> {
    let repo = ReviewRepository::new(state.pool());
    repo.delete(id).await?;

    Ok(Json(json!({ "success": true })))
}

/// Customer list with order counts and lifetime spend.
#[instrument(skip_all)]
pub async fn customers(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Value>, AppError> {
    let repo = ReportRepository::new(state.pool());
    let listing = repo.customers().await?;

    Ok(Json(json!({
        "page": "admin_customers",
        "staff": staff,
        "customers": listing,
    })))
}
