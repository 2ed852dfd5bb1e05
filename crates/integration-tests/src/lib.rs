//! Black-box integration tests for the Fotoceramica site.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the site with test credentials
//! cargo run -p fotoceramica-site
//!
//! # Run the ignored integration tests against it
//! cargo test -p fotoceramica-integration-tests -- --ignored
//! ```
//!
//! The site under test is addressed via `SITE_BASE_URL` (default
//! `http://localhost:3000`). Checkout tests additionally need a Stripe
//! test-mode key configured on the site.

/// Base URL of the site under test.
#[must_use]
pub fn site_base_url() -> String {
    std::env::var("SITE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
