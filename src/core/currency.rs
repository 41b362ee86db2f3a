use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code.
///
/// Supports standard fiat currencies (USD, EUR, JPY, etc.) as well as
/// arbitrary identifiers for digital currencies or experimental units.
/// Codes are opaque values: equality and hashing are by value, and the
/// engine never inspects their contents.
///
/// # Examples
///
/// ```
/// use arbitrage_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(usd, eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_equality() {
        let a = CurrencyCode::new("USD");
        let b = CurrencyCode::new("USD");
        let c = CurrencyCode::new("JPY");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_currency_display() {
        let c = CurrencyCode::new("CHF");
        assert_eq!(format!("{}", c), "CHF");
    }

    #[test]
    fn test_currency_ordering() {
        let a = CurrencyCode::new("AUD");
        let b = CurrencyCode::new("BRL");
        assert!(a < b);
    }

    #[test]
    fn test_serde_transparent() {
        let c = CurrencyCode::new("GBP");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"GBP\"");
        let back: CurrencyCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
