//! Geofencing gate.
//!
//! Every inbound request passes through this middleware. The upstream proxy
//! (Cloudflare) stamps requests with the visitor's origin country; requests
//! from a compiled-in denylist of countries get a terminal 403 before any
//! route handler runs. Requests with no country signal are allowed.
//!
//! The decision is a pure, total function over the header value - no I/O,
//! no state, no failure mode.

use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Header carrying the two-letter origin country code, set by the proxy.
pub const COUNTRY_HEADER: &str = "cf-ipcountry";

/// Body returned for denied requests.
const DENY_BODY: &str = "Access denied";

/// African country codes (ISO 3166-1 alpha-2).
const AFRICA: &[&str] = &[
    "DZ", "AO", "BJ", "BW", "BF", "BI", "CV", "CM", "CF", "TD", "KM", "CG", "CD", "CI", "DJ", "EG",
    "GQ", "ER", "SZ", "ET", "GA", "GM", "GH", "GN", "GW", "KE", "LS", "LR", "LY", "MG", "MW", "ML",
    "MR", "MU", "MA", "MZ", "NA", "NE", "NG", "RW", "ST", "SN", "SC", "SL", "SO", "ZA", "SS", "SD",
    "TZ", "TG", "TN", "UG", "ZM", "ZW",
];

/// South Asian country codes (ISO 3166-1 alpha-2).
const SOUTH_ASIA: &[&str] = &["AF", "BD", "BT", "IN", "LK", "MV", "NP", "PK"];

/// Decide whether a request with the given country header value is denied.
///
/// `None` (header absent) and anything that is not a denylisted code are
/// allowed. Matching is case-insensitive and ignores surrounding whitespace.
#[must_use]
pub fn is_denied(country: Option<&str>) -> bool {
    let Some(raw) = country else {
        return false;
    };
    let code = raw.trim().to_ascii_uppercase();
    AFRICA.contains(&code.as_str()) || SOUTH_ASIA.contains(&code.as_str())
}

/// Middleware that rejects requests from denylisted countries.
///
/// Denied requests get `403 Forbidden` with a plain-text body and never
/// reach a route handler. Everything else passes through unchanged.
pub async fn geofence_middleware(request: Request, next: Next) -> Response {
    let country = request
        .headers()
        .get(COUNTRY_HEADER)
        .and_then(|value| value.to_str().ok());

    if is_denied(country) {
        tracing::debug!(country = country.unwrap_or("-"), "Geofence denied request");
        return (
            StatusCode::FORBIDDEN,
            [(header::CONTENT_TYPE, "text/plain")],
            DENY_BODY,
        )
            .into_response();
    }

    next.run(request).await
}
