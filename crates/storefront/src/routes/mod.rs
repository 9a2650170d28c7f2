//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /shop?cat=&sort=         - Shop listing
//! GET  /product/{slug}          - Product detail
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action (merges visitor cart)
//! GET  /register                - Register page
//! POST /register                - Register action
//! GET  /forgot-password         - Forgot-password page
//! POST /forgot-password         - Acknowledge without sending email
//! GET  /logout                  - Logout action
//!
//! # Protected pages (redirect to /login?next= when anonymous)
//! GET  /cart                    - Cart page
//! GET  /checkout                - Checkout page
//! GET  /wishlist                - Wishlist page
//! GET  /account                 - Account page
//! GET  /my-orders               - Order history
//! GET  /order/{order_number}    - Order detail with tracking steps
//!
//! # JSON API
//! POST /api/cart/add            - Upsert a cart line
//! POST /api/cart/update         - Increase/decrease/remove a line
//! POST /api/wishlist/toggle     - Toggle wishlist membership
//! POST /api/order/place         - Checkout the current cart
//! POST /api/review/{slug}       - Submit a review (auth)
//! GET  /api/addresses           - List saved addresses (auth)
//! POST /api/address/save        - Create or update an address (auth)
//! POST /api/address/{id}/delete - Delete an address (auth)
//! POST /api/address/{id}/default - Mark address default (auth)
//! POST /api/profile/update      - Update profile fields (auth)
//! POST /api/password/change     - Change password (auth)
//!
//! # Staff dashboard (staff capability required)
//! GET|POST /admin/login         - Staff login
//! GET  /admin/logout            - Staff logout
//! GET  /admin                   - Dashboard
//! GET  /admin/products          - Product list
//! GET|POST /admin/products/new  - Create product
//! GET|POST /admin/products/{id}/edit - Edit product
//! POST /admin/products/{id}/delete   - Delete product
//! GET  /admin/orders            - Order list (?status= filter)
//! GET|POST /admin/orders/{id}   - Order detail / status+tracking update
//! GET  /admin/reviews           - Review list
//! POST /admin/reviews/{id}/delete - Delete review
//! GET  /admin/customers         - Customer list
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route("/logout", get(auth::logout))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/add", post(api::cart::add))
        .route("/cart/update", post(api::cart::update))
        .route("/wishlist/toggle", post(api::wishlist::toggle))
        .route("/order/place", post(api::orders::place))
        .route("/review/{slug}", post(api::reviews::submit))
        .route("/addresses", get(api::addresses::list))
        .route("/address/save", post(api::addresses::save))
        .route("/address/{id}/delete", post(api::addresses::delete))
        .route("/address/{id}/default", post(api::addresses::set_default))
        .route("/profile/update", post(api::profile::update))
        .route("/password/change", post(api::profile::change_password))
}

/// Create the staff dashboard router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(admin::login_page).post(admin::login))
        .route("/logout", get(admin::logout))
        .route("/", get(admin::dashboard))
        .route("/products", get(admin::products))
        .route(
            "/products/new",
            get(admin::new_product_page).post(admin::create_product),
        )
        .route(
            "/products/{id}/edit",
            get(admin::edit_product_page).post(admin::update_product),
        )
        .route("/products/{id}/delete", post(admin::delete_product))
        .route("/orders", get(admin::orders))
        .route(
            "/orders/{id}",
            get(admin::order_detail).post(admin::update_order),
        )
        .route("/reviews", get(admin::reviews))
        .route("/reviews/{id}/delete", post(admin::delete_review))
        .route("/customers", get(admin::customers))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/shop", get(pages::shop))
        .route("/product/{slug}", get(pages::product_detail))
        .route("/cart", get(pages::cart))
        .route("/checkout", get(pages::checkout))
        .route("/wishlist", get(pages::wishlist))
        .route("/account", get(pages::account))
        .route("/my-orders", get(pages::my_orders))
        .route("/order/{order_number}", get(pages::order_detail))
        .merge(auth_routes())
        .nest("/api", api_routes())
        .nest("/admin", admin_routes())
}
