//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health                      - Health check
//!
//! # Auth
//! POST   /api/auth/register               - Create account, returns {user, token}
//! POST   /api/auth/login                  - Sign in, returns {user, token}
//! POST   /api/auth/logout                 - Revoke the presented token
//! GET    /api/auth/profile                - Current user
//! PUT    /api/auth/profile                - Update current user
//!
//! # Marketplace (requires auth)
//! GET    /api/marketplace/websites        - Filtered listings
//! GET    /api/marketplace/websites/{id}   - Listing detail
//! GET    /api/marketplace/facets          - Filter picker values
//!
//! # Orders (requires auth)
//! GET    /api/orders                      - Order history
//! POST   /api/orders                      - Checkout
//! GET    /api/orders/summary              - Dashboard counters
//! GET    /api/orders/{id}                 - Order detail
//! PATCH  /api/orders/{id}/status          - Set status
//! POST   /api/orders/{id}/cancel          - Cancel
//!
//! # Billing (requires auth)
//! GET    /api/billing                     - Balance and transactions
//! GET    /api/billing/offers              - Deposit bonus tiers
//! POST   /api/billing/funds               - Add funds
//! ```
//!
//! Any other `/api/*` path answers `404 {"message":"Resource not found"}`.

pub mod auth;
pub mod billing;
pub mod health;
pub mod marketplace;
pub mod orders;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let mut credentials = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));
    if rate_limit {
        credentials = credentials.layer(auth_rate_limiter());
    }

    Router::new()
        .merge(credentials)
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile).put(auth::update_profile))
}

/// Create the marketplace routes router.
pub fn marketplace_routes() -> Router<AppState> {
    Router::new()
        .route("/websites", get(marketplace::list_websites))
        .route("/websites/{id}", get(marketplace::get_website))
        .route("/facets", get(marketplace::facets))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/summary", get(orders::summary))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/status", patch(orders::update_status))
        .route("/{id}/cancel", post(orders::cancel_order))
}

/// Create the billing routes router.
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(billing::show))
        .route("/offers", get(billing::offers))
        .route("/funds", post(billing::add_funds))
}

/// Create the `/api` router.
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_routes(config.auth_rate_limit))
        .nest("/marketplace", marketplace_routes())
        .nest("/orders", order_routes())
        .nest("/billing", billing_routes())
        .fallback(not_found)
}

/// Create all routes for the server.
pub fn routes(config: &ServerConfig) -> Router<AppState> {
    Router::new().nest("/api", api_routes(config))
}

/// JSON 404 for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}
