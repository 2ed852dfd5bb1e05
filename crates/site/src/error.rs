//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Error responses are JSON: `{"error": "...",
//! "details": ...}` with `details` omitted when there is nothing to add.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cms::CmsError;
use crate::services::stripe::StripeError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// CMS query failed.
    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),

    /// Checkout session creation failed at the payment processor.
    #[error("Stripe error: {0}")]
    Stripe(#[from] StripeError),

    /// Payment processor configuration is missing or invalid.
    #[error("Checkout not configured")]
    NotConfigured(Vec<String>),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(self, Self::Cms(_) | Self::Stripe(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Cms(_) => StatusCode::BAD_GATEWAY,
            Self::Stripe(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = match self {
            Self::Cms(_) => ErrorBody {
                error: "Content service error".to_string(),
                details: None,
            },
            // The processor message is passed through verbatim so a failed
            // checkout can be diagnosed from the client side.
            Self::Stripe(err) => ErrorBody {
                error: "Failed to create checkout session".to_string(),
                details: Some(serde_json::Value::String(err.to_string())),
            },
            Self::NotConfigured(problems) => ErrorBody {
                error: "Checkout is not configured".to_string(),
                details: Some(serde_json::json!(problems)),
            },
            Self::BadRequest(message) => ErrorBody {
                error: message,
                details: None,
            },
            Self::NotFound(what) => ErrorBody {
                error: format!("Not found: {what}"),
                details: None,
            },
            Self::Internal(_) => ErrorBody {
                error: "Internal server error".to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
