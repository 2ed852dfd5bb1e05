//! Core types for Fotoceramica.
//!
//! Type-safe wrappers for common domain concepts.

pub mod country;
pub mod email;
pub mod price;

pub use country::{CountryCode, CountryCodeError};
pub use email::{Email, EmailError};
pub use price::{CurrencyCode, Price};
