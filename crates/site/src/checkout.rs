//! Checkout session assembly.
//!
//! Everything here is pure: compute order totals, the packaging surcharge,
//! the Stripe line items, and the full session parameter set from a cart
//! snapshot. The route handler owns the I/O (customer resolution, session
//! creation); this module owns the decisions, so the whole flow is testable
//! without a Stripe account.
//!
//! Amounts are integer minor currency units (euro cents) throughout.

use fotoceramica_core::{CountryCode, CurrencyCode};
use serde::{Deserialize, Serialize};

use crate::services::stripe::{Customer, StripeAddress};

/// Fee rate applied to the order total: 0.5%, expressed as a ratio.
const PACKAGING_FEE_NUMERATOR: i64 = 5;
const PACKAGING_FEE_DENOMINATOR: i64 = 1000;

/// Floor for the packaging fee: EUR 2.00.
const PACKAGING_FEE_MINIMUM: i64 = 200;

/// Line-item label for the packaging surcharge.
const PACKAGING_FEE_LABEL: &str = "Contributo imballaggio";

/// Countries the shop ships to.
pub const ALLOWED_SHIPPING_COUNTRIES: &[&str] = &[
    "IT", "FR", "DE", "ES", "PT", "AT", "BE", "NL", "LU", "CH", "GB", "US",
];

/// Free shipping threshold for domestic orders: EUR 100.00.
const FREE_SHIPPING_THRESHOLD: i64 = 10_000;

/// Domestic flat shipping rate: EUR 9.00.
const DOMESTIC_SHIPPING_RATE: i64 = 900;

/// International flat shipping rate: EUR 19.00.
const INTERNATIONAL_SHIPPING_RATE: i64 = 1_900;

// =============================================================================
// Request payload
// =============================================================================

/// JSON body of `POST /api/checkout`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Opaque correlation id; passed through to metadata and the success
    /// URL, never validated or deduplicated here.
    #[serde(default)]
    pub order_number: String,
    /// Destination country; selects the shipping options.
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

fn default_country() -> String {
    "IT".to_string()
}

/// One cart line as sent by the front end.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub product: ProductInfo,
    pub quantity: i64,
}

/// The slice of a product the checkout needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInfo {
    /// Unit price in minor currency units.
    pub price: i64,
    pub title: String,
}

/// Structured shipping address from the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ShippingAddress {
    /// Convert to Stripe's shape, defaulting absent fields to empty strings.
    #[must_use]
    pub fn to_stripe(&self) -> StripeAddress {
        StripeAddress {
            line1: self.line1.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            postal_code: self.postal_code.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Validation and money math
// =============================================================================

/// Check the cart snapshot before any external call is made.
///
/// # Errors
///
/// Returns a human-readable message when the cart is empty or contains a
/// non-positive price or quantity.
pub fn validate_items(items: &[CartItem]) -> Result<(), String> {
    if items.is_empty() {
        return Err("Missing items".to_string());
    }
    for item in items {
        if item.product.price <= 0 {
            return Err(format!(
                "Invalid price for \"{}\"",
                item.product.title
            ));
        }
        if item.quantity <= 0 {
            return Err(format!(
                "Invalid quantity for \"{}\"",
                item.product.title
            ));
        }
    }
    // Positivity alone does not bound the payload; the total and the scaled
    // fee must both fit in i64.
    order_total(items)
        .and_then(packaging_fee)
        .ok_or_else(|| "Order total is too large".to_string())?;
    Ok(())
}

/// Order total in minor units: sum of `price * quantity` over all items.
///
/// `None` when the sum overflows `i64`.
#[must_use]
pub fn order_total(items: &[CartItem]) -> Option<i64> {
    items.iter().try_fold(0_i64, |total, item| {
        let line = item.product.price.checked_mul(item.quantity)?;
        total.checked_add(line)
    })
}

/// Packaging surcharge: 0.5% of the order total, floored at EUR 2.00.
///
/// Monotonic in the order total; the proportional part rounds up so the fee
/// never loses a fraction of a cent. `None` when the scaled total overflows
/// `i64`.
#[must_use]
pub fn packaging_fee(order_total: i64) -> Option<i64> {
    let scaled = order_total.checked_mul(PACKAGING_FEE_NUMERATOR)?;
    let proportional =
        scaled.checked_add(PACKAGING_FEE_DENOMINATOR - 1)? / PACKAGING_FEE_DENOMINATOR;
    Some(proportional.max(PACKAGING_FEE_MINIMUM))
}

// =============================================================================
// Session parameters
// =============================================================================

/// One Stripe line item in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: i64,
}

/// A flat shipping option offered on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingOption {
    pub display_name: &'static str,
    pub amount: i64,
}

/// Fully assembled parameters for one hosted checkout session.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub line_items: Vec<LineItem>,
    /// Cart total in minor units, before the fee and shipping.
    pub order_total: i64,
    pub success_url: String,
    pub cancel_url: String,
    pub order_number: String,
    pub metadata_email: String,
    pub metadata_shipping: String,
    pub shipping_options: Vec<ShippingOption>,
    /// Resolved Stripe customer id. Mutually exclusive with
    /// `customer_email`.
    pub customer: Option<String>,
    /// Prefill email for sessions without a resolved customer.
    pub customer_email: Option<String>,
}

/// Build the Stripe line items: one per cart line, plus the packaging fee.
///
/// `None` when the totals overflow.
#[must_use]
pub fn build_line_items(items: &[CartItem]) -> Option<Vec<LineItem>> {
    let fee = packaging_fee(order_total(items)?)?;

    let mut lines: Vec<LineItem> = items
        .iter()
        .map(|item| LineItem {
            name: item.product.title.clone(),
            unit_amount: item.product.price,
            quantity: item.quantity,
        })
        .collect();

    lines.push(LineItem {
        name: PACKAGING_FEE_LABEL.to_string(),
        unit_amount: fee,
        quantity: 1,
    });

    Some(lines)
}

/// Shipping options for a destination country and order total.
///
/// Domestic orders ship free above the threshold; everywhere else on the
/// allow-list pays the international flat rate. Anything that does not
/// parse as a country code falls through to the international rate.
#[must_use]
pub fn shipping_options(order_total: i64, country: &str) -> Vec<ShippingOption> {
    let domestic = CountryCode::parse(country).is_ok_and(|code| code.as_str() == "IT");
    if domestic {
        if order_total >= FREE_SHIPPING_THRESHOLD {
            vec![ShippingOption {
                display_name: "Spedizione gratuita",
                amount: 0,
            }]
        } else {
            vec![ShippingOption {
                display_name: "Spedizione standard",
                amount: DOMESTIC_SHIPPING_RATE,
            }]
        }
    } else {
        vec![ShippingOption {
            display_name: "Spedizione internazionale",
            amount: INTERNATIONAL_SHIPPING_RATE,
        }]
    }
}

/// Decision for step 4 of the flow: create a new customer or update the one
/// the email lookup found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerAction {
    Create,
    Update(String),
}

/// Pick the customer action from the (at most one) lookup result.
#[must_use]
pub fn customer_action(existing: Option<&Customer>) -> CustomerAction {
    existing.map_or(CustomerAction::Create, |customer| {
        CustomerAction::Update(customer.id.clone())
    })
}

/// Assemble the full session parameter set.
///
/// `resolved_customer` wins over the prefill email: a session gets either a
/// `customer` id or a bare `customer_email`, never both. `None` when the
/// cart totals overflow (already rejected by [`validate_items`]).
#[must_use]
pub fn assemble_session_params(
    base_url: &str,
    request: &CheckoutRequest,
    valid_email: Option<&str>,
    resolved_customer: Option<String>,
) -> Option<SessionParams> {
    let base = base_url.trim_end_matches('/');
    let total = order_total(&request.items)?;
    let line_items = build_line_items(&request.items)?;

    let metadata_shipping = request
        .shipping_address
        .as_ref()
        .and_then(|address| serde_json::to_string(address).ok())
        .unwrap_or_default();

    let customer_email = if resolved_customer.is_none() {
        valid_email.map(String::from)
    } else {
        None
    };

    Some(SessionParams {
        line_items,
        order_total: total,
        success_url: format!(
            "{base}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}&order={}",
            request.order_number
        ),
        cancel_url: format!("{base}/carrello"),
        order_number: request.order_number.clone(),
        metadata_email: valid_email.unwrap_or_default().to_string(),
        metadata_shipping,
        shipping_options: shipping_options(total, &request.country),
        customer: resolved_customer,
        customer_email,
    })
}

impl SessionParams {
    /// Flatten into the form fields `POST /v1/checkout/sessions` expects.
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        let currency = CurrencyCode::Eur.as_stripe_code();
        let mut form = vec![
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            (
                "metadata[order_number]".to_string(),
                self.order_number.clone(),
            ),
            ("metadata[email]".to_string(), self.metadata_email.clone()),
            (
                "metadata[shipping]".to_string(),
                self.metadata_shipping.clone(),
            ),
        ];

        for (index, line) in self.line_items.iter().enumerate() {
            form.push((
                format!("line_items[{index}][price_data][currency]"),
                currency.to_string(),
            ));
            form.push((
                format!("line_items[{index}][price_data][unit_amount]"),
                line.unit_amount.to_string(),
            ));
            form.push((
                format!("line_items[{index}][price_data][product_data][name]"),
                line.name.clone(),
            ));
            form.push((
                format!("line_items[{index}][quantity]"),
                line.quantity.to_string(),
            ));
        }

        for (index, country) in ALLOWED_SHIPPING_COUNTRIES.iter().enumerate() {
            form.push((
                format!("shipping_address_collection[allowed_countries][{index}]"),
                (*country).to_string(),
            ));
        }

        for (index, option) in self.shipping_options.iter().enumerate() {
            form.push((
                format!("shipping_options[{index}][shipping_rate_data][type]"),
                "fixed_amount".to_string(),
            ));
            form.push((
                format!("shipping_options[{index}][shipping_rate_data][fixed_amount][amount]"),
                option.amount.to_string(),
            ));
            form.push((
                format!("shipping_options[{index}][shipping_rate_data][fixed_amount][currency]"),
                currency.to_string(),
            ));
            form.push((
                format!("shipping_options[{index}][shipping_rate_data][display_name]"),
                option.display_name.to_string(),
            ));
        }

        if let Some(customer) = &self.customer {
            form.push(("customer".to_string(), customer.clone()));
        } else if let Some(email) = &self.customer_email {
            form.push(("customer_email".to_string(), email.clone()));
        }

        form
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(price: i64, title: &str, quantity: i64) -> CartItem {
        CartItem {
            product: ProductInfo {
                price,
                title: title.to_string(),
            },
            quantity,
        }
    }

    fn request(items: Vec<CartItem>) -> CheckoutRequest {
        CheckoutRequest {
            items,
            customer_email: None,
            order_number: "FC-1042".to_string(),
            country: "IT".to_string(),
            shipping_address: None,
        }
    }

    #[test]
    fn order_total_is_exact_sum() {
        let items = vec![item(2500, "Piastrella A", 2), item(990, "Cornice", 3)];
        assert_eq!(order_total(&items), Some(2500 * 2 + 990 * 3));
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert_eq!(validate_items(&[]), Err("Missing items".to_string()));
    }

    #[test]
    fn non_positive_price_or_quantity_is_rejected() {
        assert!(validate_items(&[item(0, "Gratis", 1)]).is_err());
        assert!(validate_items(&[item(-100, "Sconto", 1)]).is_err());
        assert!(validate_items(&[item(2500, "Piastrella", 0)]).is_err());
    }

    #[test]
    fn packaging_fee_has_a_floor() {
        // 0.5% of 50.00 is 0.25, below the 2.00 floor
        assert_eq!(packaging_fee(5000), Some(200));
        assert_eq!(packaging_fee(1), Some(200));
    }

    #[test]
    fn packaging_fee_is_proportional_above_the_floor() {
        // 0.5% of 500.00 is exactly 2.50
        assert_eq!(packaging_fee(50_000), Some(250));
        // fractions of a cent round up
        assert_eq!(packaging_fee(50_001), Some(251));
    }

    #[test]
    fn packaging_fee_is_monotonic() {
        let mut previous = 0;
        for total in (0..200_000).step_by(997) {
            let fee = packaging_fee(total).unwrap();
            assert!(fee >= previous);
            previous = fee;
        }
    }

    #[test]
    fn line_items_end_with_the_fee() {
        let items = vec![item(2500, "Piastrella A", 2)];
        let lines = build_line_items(&items).unwrap();
        assert_eq!(lines.len(), 2);
        let fee = lines.last().unwrap();
        assert_eq!(fee.name, PACKAGING_FEE_LABEL);
        assert_eq!(fee.unit_amount, 200);
        assert_eq!(fee.quantity, 1);
    }

    #[test]
    fn two_tiles_come_to_fifty_euros_plus_fee() {
        // 2 x 25.00 = 50.00, plus the 2.00 fee floor
        let items = vec![item(2500, "Tile A", 2)];
        let total = order_total(&items).unwrap();
        assert_eq!(total, 5000);
        assert_eq!(packaging_fee(total), Some(200));
        let session_total: i64 = build_line_items(&items)
            .unwrap()
            .iter()
            .map(|line| line.unit_amount * line.quantity)
            .sum();
        assert_eq!(session_total, 5200);
    }

    #[test]
    fn domestic_shipping_depends_on_total() {
        assert_eq!(
            shipping_options(5000, "IT"),
            vec![ShippingOption {
                display_name: "Spedizione standard",
                amount: 900
            }]
        );
        assert_eq!(
            shipping_options(10_000, "IT"),
            vec![ShippingOption {
                display_name: "Spedizione gratuita",
                amount: 0
            }]
        );
    }

    #[test]
    fn international_shipping_is_flat() {
        for country in ["DE", "fr", "US"] {
            let options = shipping_options(100_000, country);
            assert_eq!(options.first().unwrap().amount, 1900);
        }
    }

    #[test]
    fn lookup_miss_creates_lookup_hit_updates() {
        assert_eq!(customer_action(None), CustomerAction::Create);

        let existing = Customer {
            id: "cus_123".to_string(),
            email: Some("cliente@example.com".to_string()),
            name: None,
        };
        assert_eq!(
            customer_action(Some(&existing)),
            CustomerAction::Update("cus_123".to_string())
        );
    }

    #[test]
    fn resolved_customer_wins_over_prefill() {
        let req = request(vec![item(2500, "Piastrella A", 2)]);
        let params = assemble_session_params(
            "https://fotoceramica.example",
            &req,
            Some("cliente@example.com"),
            Some("cus_123".to_string()),
        )
        .unwrap();
        assert_eq!(params.customer.as_deref(), Some("cus_123"));
        assert!(params.customer_email.is_none());

        let form = params.to_form();
        assert!(form.iter().any(|(k, v)| k == "customer" && v == "cus_123"));
        assert!(!form.iter().any(|(k, _)| k == "customer_email"));
    }

    #[test]
    fn bare_email_becomes_prefill() {
        let req = request(vec![item(2500, "Piastrella A", 2)]);
        let params = assemble_session_params(
            "https://fotoceramica.example",
            &req,
            Some("cliente@example.com"),
            None,
        )
        .unwrap();
        assert!(params.customer.is_none());
        assert_eq!(params.customer_email.as_deref(), Some("cliente@example.com"));
    }

    #[test]
    fn no_email_means_no_customer_fields() {
        let req = request(vec![item(2500, "Piastrella A", 2)]);
        let params =
            assemble_session_params("https://fotoceramica.example", &req, None, None).unwrap();
        let form = params.to_form();
        assert!(!form.iter().any(|(k, _)| k == "customer"));
        assert!(!form.iter().any(|(k, _)| k == "customer_email"));
        assert_eq!(
            form.iter().find(|(k, _)| k == "metadata[email]").unwrap().1,
            ""
        );
    }

    #[test]
    fn success_url_carries_session_placeholder_and_order() {
        let req = request(vec![item(2500, "Piastrella A", 2)]);
        let params =
            assemble_session_params("https://fotoceramica.example/", &req, None, None).unwrap();
        assert_eq!(
            params.success_url,
            "https://fotoceramica.example/checkout/success?session_id={CHECKOUT_SESSION_ID}&order=FC-1042"
        );
        assert_eq!(params.cancel_url, "https://fotoceramica.example/carrello");
    }

    #[test]
    fn form_lists_every_allowed_country() {
        let req = request(vec![item(2500, "Piastrella A", 2)]);
        let form = assemble_session_params("https://fotoceramica.example", &req, None, None)
            .unwrap()
            .to_form();
        let countries: Vec<_> = form
            .iter()
            .filter(|(k, _)| k.starts_with("shipping_address_collection[allowed_countries]"))
            .collect();
        assert_eq!(countries.len(), ALLOWED_SHIPPING_COUNTRIES.len());
        assert!(countries.iter().any(|(_, v)| v == "IT"));
    }

    #[test]
    fn shipping_metadata_serializes_the_address() {
        let mut req = request(vec![item(2500, "Piastrella A", 2)]);
        req.shipping_address = Some(ShippingAddress {
            line1: Some("Via Roma 1".to_string()),
            city: Some("Firenze".to_string()),
            postal_code: None,
            country: Some("IT".to_string()),
        });
        let params =
            assemble_session_params("https://fotoceramica.example", &req, None, None).unwrap();
        assert!(params.metadata_shipping.contains("Via Roma 1"));

        let stripe = req.shipping_address.unwrap().to_stripe();
        assert_eq!(stripe.postal_code, "");
        assert_eq!(stripe.city, "Firenze");
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let items = vec![item(i64::MAX, "Pannello", 2)];
        assert_eq!(order_total(&items), None);
        assert_eq!(
            validate_items(&items),
            Err("Order total is too large".to_string())
        );
    }

    #[test]
    fn total_that_only_overflows_when_scaled_is_rejected() {
        // The sum fits in i64 but multiplying by the fee rate does not.
        let items = vec![item(i64::MAX / 2, "Pannello", 1)];
        assert_eq!(order_total(&items), Some(i64::MAX / 2));
        assert_eq!(packaging_fee(i64::MAX / 2), None);
        assert!(validate_items(&items).is_err());
        assert!(
            assemble_session_params("https://fotoceramica.example", &request(items), None, None)
                .is_none()
        );
    }

    #[test]
    fn form_has_card_payment_mode() {
        let req = request(vec![item(2500, "Piastrella A", 2)]);
        let form = assemble_session_params("https://fotoceramica.example", &req, None, None)
            .unwrap()
            .to_form();
        assert!(
            form.iter()
                .any(|(k, v)| k == "payment_method_types[0]" && v == "card")
        );
        assert!(form.iter().any(|(k, v)| k == "mode" && v == "payment"));
    }
}
