//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (503 until Stripe is configured)
//!
//! # Content (JSON, CMS-backed)
//! GET  /api/pages/{slug}       - Static page (chi-siamo, contatti, ...)
//! GET  /api/blog               - Blog post listing
//! GET  /api/blog/{slug}        - Blog post detail
//! GET  /api/projects           - Project gallery
//! GET  /api/offers             - Current offers
//! GET  /api/news               - News (novita) entries
//!
//! # Shop
//! POST /api/checkout           - Create a hosted checkout session
//! ```

pub mod checkout;
pub mod content;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/pages/{slug}", get(content::page))
        .route("/blog", get(content::posts))
        .route("/blog/{slug}", get(content::post))
        .route("/projects", get(content::projects))
        .route("/offers", get(content::offers))
        .route("/news", get(content::news))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/checkout", post(checkout::create_session))
        .nest("/api", content_routes())
}
