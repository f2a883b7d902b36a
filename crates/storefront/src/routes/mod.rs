//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//! GET  /static/*                        - Static assets
//!
//! # Account (requires auth)
//! GET  /account/orders/{id}             - Order page (loading shell)
//! GET  /account/orders/{id}/panel?view= - Order panel fragment (HTMX)
//!
//! # Auth
//! GET  /auth/login                      - Login page
//! POST /auth/login                      - Request a login link by e-mail
//! GET  /auth/callback/{token}           - Exchange the login link token
//! POST /auth/logout                     - Logout action
//! ```

pub mod auth;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/callback/{token}", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/panel", get(orders::panel))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
}
