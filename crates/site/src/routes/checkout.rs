//! Checkout route handler.
//!
//! `POST /api/checkout` turns a cart snapshot into a hosted Stripe Checkout
//! session. Single-pass and non-resumable: at most three dependent Stripe
//! calls (customer lookup, customer upsert, session creation), no retries -
//! a failed session creation is terminal for the request and the caller
//! must submit a new one.

use axum::{Json, extract::State};
use fotoceramica_core::{CurrencyCode, Email, Price};
use serde::Serialize;
use tracing::instrument;

use crate::checkout::{
    CheckoutRequest, CustomerAction, ShippingAddress, assemble_session_params, customer_action,
    validate_items,
};
use crate::error::{AppError, Result};
use crate::services::stripe::{StripeClient, StripeError};
use crate::state::AppState;

/// JSON response of a successful checkout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

/// Create a hosted checkout session from the posted cart.
#[instrument(skip(state, request), fields(order_number = %request.order_number))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    // Configuration check comes before anything else; without a usable
    // Stripe client no external call is ever attempted.
    let stripe = state
        .stripe()
        .map_err(|problems| AppError::NotConfigured(problems.to_vec()))?;

    validate_items(&request.items).map_err(AppError::BadRequest)?;

    // Only a string that parses as an email takes part in customer
    // resolution or prefill; anything else is ignored entirely.
    let email = request
        .customer_email
        .as_deref()
        .and_then(|raw| Email::parse(raw).ok());

    let resolved_customer = match (&email, &request.shipping_address) {
        (Some(email), Some(address)) => resolve_customer(stripe, email, address).await,
        _ => None,
    };

    let params = assemble_session_params(
        &state.config().base_url,
        &request,
        email.as_ref().map(Email::as_str),
        resolved_customer,
    )
    .ok_or_else(|| AppError::BadRequest("Order total is too large".to_string()))?;

    let session = stripe.create_checkout_session(&params.to_form()).await?;
    let url = session
        .url
        .ok_or_else(|| AppError::Internal("Checkout session has no redirect URL".to_string()))?;

    let total = Price::from_minor(params.order_total, CurrencyCode::Eur);
    tracing::info!(session_id = %session.id, %total, "Checkout session created");

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url,
    }))
}

/// Resolve a Stripe customer for the session, soft-failing to `None`.
///
/// Lookup and upsert errors are logged and swallowed: a missing customer
/// attachment degrades the session to email prefill, it does not abort the
/// checkout.
async fn resolve_customer(
    stripe: &StripeClient,
    email: &Email,
    address: &ShippingAddress,
) -> Option<String> {
    match try_resolve_customer(stripe, email, address).await {
        Ok(customer_id) => Some(customer_id),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Customer resolution failed; continuing without a customer"
            );
            None
        }
    }
}

/// Look up the customer by email (at most one match) and create or update.
async fn try_resolve_customer(
    stripe: &StripeClient,
    email: &Email,
    address: &ShippingAddress,
) -> std::result::Result<String, StripeError> {
    let stripe_address = address.to_stripe();
    let existing = stripe.find_customer_by_email(email.as_str()).await?;

    // The front end has never sent a separate name field, so the email
    // doubles as the display name.
    match customer_action(existing.as_ref()) {
        CustomerAction::Update(customer_id) => {
            stripe
                .update_customer(&customer_id, email.as_str(), email.as_str(), &stripe_address)
                .await?;
            Ok(customer_id)
        }
        CustomerAction::Create => {
            let customer = stripe
                .create_customer(email.as_str(), email.as_str(), &stripe_address)
                .await?;
            Ok(customer.id)
        }
    }
}
