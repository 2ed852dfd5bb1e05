//! ISO 3166-1 alpha-2 country code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input is not exactly two characters after trimming.
    #[error("country code must be exactly two letters")]
    WrongLength,
    /// The input contains a non-alphabetic character.
    #[error("country code must contain only ASCII letters")]
    NotAlphabetic,
}

/// A two-letter uppercase ISO 3166-1 country code.
///
/// Parsing trims and uppercases, so `"it"` and `" IT "` both yield `IT`.
/// No membership check against the full ISO list is performed; the geofence
/// denylist and the shipping allow-list each carry their own fixed sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a country code from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is not two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let trimmed = s.trim();
        if trimmed.len() != 2 {
            return Err(CountryCodeError::WrongLength);
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::NotAlphabetic);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Get the code as an uppercase string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_uppercases() {
        assert_eq!(CountryCode::parse("it").unwrap().as_str(), "IT");
        assert_eq!(CountryCode::parse(" DE ").unwrap().as_str(), "DE");
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(CountryCode::parse("ITA"), Err(CountryCodeError::WrongLength));
        assert_eq!(CountryCode::parse(""), Err(CountryCodeError::WrongLength));
    }

    #[test]
    fn rejects_non_letters() {
        assert_eq!(
            CountryCode::parse("1T"),
            Err(CountryCodeError::NotAlphabetic)
        );
    }
}
