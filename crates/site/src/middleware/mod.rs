//! HTTP middleware stack for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (correlation ID on every request)
//! 4. Geofence (deny requests from blocked countries)

pub mod geofence;
pub mod request_id;

pub use geofence::{COUNTRY_HEADER, geofence_middleware, is_denied};
pub use request_id::request_id_middleware;
