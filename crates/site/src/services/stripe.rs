//! Stripe API client for customers and hosted checkout sessions.
//!
//! Thin transport over the Stripe REST API: form-encoded requests, Bearer
//! auth, JSON responses. All payment state lives at Stripe; this client
//! keeps nothing locally.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::StripeConfig;

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com/v1";

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A Stripe customer, reduced to the fields the checkout flow reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect URL for the customer. Present for freshly created sessions.
    pub url: Option<String>,
}

/// Shipping address payload in Stripe's shape.
///
/// Fields default to the empty string when the caller has no value, matching
/// what the site has always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripeAddress {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl StripeAddress {
    /// Flatten into form fields under the given prefix
    /// (e.g. `shipping[address]`).
    fn append_form(&self, prefix: &str, form: &mut Vec<(String, String)>) {
        form.push((format!("{prefix}[line1]"), self.line1.clone()));
        form.push((format!("{prefix}[city]"), self.city.clone()));
        form.push((format!("{prefix}[postal_code]"), self.postal_code.clone()));
        form.push((format!("{prefix}[country]"), self.country.clone()));
    }
}

/// Wrapper for Stripe list responses.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

/// Wrapper for Stripe error responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StripeError::Parse(format!("Invalid secret key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Find a customer by exact email match, consulting at most one result.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Customer>, StripeError> {
        let response = self
            .client
            .get(format!("{BASE_URL}/customers"))
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await?;

        let list: ListResponse<Customer> = Self::read_json(response).await?;
        Ok(list.data.into_iter().next())
    }

    /// Create a customer with an email, display name, and shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_customer(
        &self,
        email: &str,
        name: &str,
        address: &StripeAddress,
    ) -> Result<Customer, StripeError> {
        let form = customer_form(email, name, address);

        let response = self
            .client
            .post(format!("{BASE_URL}/customers"))
            .form(&form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Update an existing customer's email, name, and shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_customer(
        &self,
        customer_id: &str,
        email: &str,
        name: &str,
        address: &StripeAddress,
    ) -> Result<Customer, StripeError> {
        let form = customer_form(email, name, address);

        let response = self
            .client
            .post(format!("{BASE_URL}/customers/{customer_id}"))
            .form(&form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Create a hosted checkout session from pre-assembled form fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Stripe rejects the
    /// session parameters.
    pub async fn create_checkout_session(
        &self,
        form: &[(String, String)],
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .client
            .post(format!("{BASE_URL}/checkout/sessions"))
            .form(form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Read a JSON body, converting non-success statuses into
    /// [`StripeError::Api`] with Stripe's own message where available.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| StripeError::Parse(e.to_string()))
    }
}

/// Form fields shared by customer create and update.
fn customer_form(email: &str, name: &str, address: &StripeAddress) -> Vec<(String, String)> {
    let mut form = vec![
        ("email".to_string(), email.to_string()),
        ("name".to_string(), name.to_string()),
        ("shipping[name]".to_string(), name.to_string()),
    ];
    address.append_form("shipping[address]", &mut form);
    form
}
