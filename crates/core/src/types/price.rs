//! Minor-unit price representation.
//!
//! Prices travel through the shop as integer minor currency units (cents)
//! because both the request payload and the payment processor speak cents.
//! Decimal conversion exists only for display formatting.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in minor currency units (e.g. euro cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a price from minor units.
    #[must_use]
    pub const fn from_minor(amount: i64, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// The amount as a decimal in major units (two fractional digits).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.amount, 2)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.currency.symbol(), self.to_decimal())
    }
}

/// ISO 4217 currency codes the shop deals in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Eur,
    Usd,
    Gbp,
    Chf,
}

impl CurrencyCode {
    /// The lowercase code the payment processor expects.
    #[must_use]
    pub const fn as_stripe_code(self) -> &'static str {
        match self {
            Self::Eur => "eur",
            Self::Usd => "usd",
            Self::Gbp => "gbp",
            Self::Chf => "chf",
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eur => "€",
            Self::Usd => "$",
            Self::Gbp => "£",
            Self::Chf => "CHF ",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decimal_conversion_keeps_cents() {
        let price = Price::from_minor(5200, CurrencyCode::Eur);
        assert_eq!(price.to_decimal(), Decimal::new(5200, 2));
        assert_eq!(price.to_decimal().to_string(), "52.00");
    }

    #[test]
    fn display_uses_symbol() {
        let price = Price::from_minor(250, CurrencyCode::Eur);
        assert_eq!(price.to_string(), "€2.50");
    }

    #[test]
    fn default_currency_is_eur() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::Eur);
        assert_eq!(CurrencyCode::default().as_stripe_code(), "eur");
    }
}
