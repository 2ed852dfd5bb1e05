//! Application state shared across handlers.
//!
//! Clients are constructed once here and injected through axum state - there
//! are no process-wide singletons, so handlers stay testable in isolation.

use std::sync::Arc;

use crate::cms::CmsClient;
use crate::config::SiteConfig;
use crate::services::stripe::StripeClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    cms: CmsClient,
    /// Stripe client, or the configuration problems that prevented building
    /// one. A broken Stripe setup degrades checkout to 503 without taking
    /// the content site down.
    stripe: Result<StripeClient, Vec<String>>,
}

impl AppState {
    /// Create a new application state from loaded configuration.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let cms = CmsClient::new(&config.cms);

        let stripe = match &config.stripe {
            Ok(stripe_config) => StripeClient::new(stripe_config)
                .map_err(|e| vec![format!("Failed to build Stripe client: {e}")]),
            Err(problems) => Err(problems.clone()),
        };
        if let Err(problems) = &stripe {
            tracing::warn!(
                problems = ?problems,
                "Stripe is not configured; checkout will answer 503"
            );
        }

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cms,
                stripe,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the CMS client.
    #[must_use]
    pub fn cms(&self) -> &CmsClient {
        &self.inner.cms
    }

    /// Get the Stripe client, or the configuration problem list.
    ///
    /// # Errors
    ///
    /// Returns the validation details collected at startup when Stripe is
    /// not usable.
    pub fn stripe(&self) -> Result<&StripeClient, &[String]> {
        match &self.inner.stripe {
            Ok(client) => Ok(client),
            Err(problems) => Err(problems),
        }
    }

    /// Whether the checkout route can serve requests.
    #[must_use]
    pub fn checkout_configured(&self) -> bool {
        self.inner.stripe.is_ok()
    }
}
