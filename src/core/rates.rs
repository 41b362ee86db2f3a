use crate::core::currency::CurrencyCode;
use std::collections::HashMap;
use thiserror::Error;

/// Errors arising from rate lookups.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("no exchange rate available for {base} -> {quote}")]
    MissingRate {
        base: CurrencyCode,
        quote: CurrencyCode,
    },
}

/// Pairwise exchange-rate matrix.
///
/// Maps `(base, quote)` to the number of `quote` units one `base` unit
/// buys. Only strictly positive, finite rates are ever stored: zero,
/// negative, NaN and infinite values are treated as unknown and leave the
/// pair absent. The diagonal (`base == quote`) is always 1.0 and is not
/// stored explicitly.
///
/// A matrix is filled once by the fetch phase and read-only afterwards,
/// so it can be shared freely across detection workers.
///
/// # Examples
///
/// ```
/// use arbitrage_engine::core::currency::CurrencyCode;
/// use arbitrage_engine::core::rates::RateMatrix;
///
/// let mut rates = RateMatrix::new();
/// rates.set(CurrencyCode::new("USD"), CurrencyCode::new("EUR"), 0.92);
/// rates.set(CurrencyCode::new("USD"), CurrencyCode::new("JPY"), f64::NAN);
///
/// assert_eq!(rates.get(&CurrencyCode::new("USD"), &CurrencyCode::new("EUR")), Some(0.92));
/// assert_eq!(rates.get(&CurrencyCode::new("USD"), &CurrencyCode::new("JPY")), None);
/// assert_eq!(rates.get(&CurrencyCode::new("USD"), &CurrencyCode::new("USD")), Some(1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateMatrix {
    rates: HashMap<(CurrencyCode, CurrencyCode), f64>,
}

impl RateMatrix {
    pub fn new() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// Record a rate for `(base, quote)`.
    ///
    /// Non-positive or non-finite values are not stored; they clear any
    /// previously recorded rate for the pair instead. Diagonal entries
    /// are ignored (the self-rate is fixed at 1.0).
    pub fn set(&mut self, base: CurrencyCode, quote: CurrencyCode, rate: f64) {
        if base == quote {
            return;
        }
        if rate.is_finite() && rate > 0.0 {
            self.rates.insert((base, quote), rate);
        } else {
            self.rates.remove(&(base, quote));
        }
    }

    /// Merge one base currency's quote row into the matrix.
    ///
    /// Invalid entries are dropped individually; a row may end up
    /// partially filled.
    pub fn insert_row(&mut self, base: &CurrencyCode, row: HashMap<CurrencyCode, f64>) {
        for (quote, rate) in row {
            self.set(base.clone(), quote, rate);
        }
    }

    /// The rate from `base` to `quote`, or `None` if unknown.
    pub fn get(&self, base: &CurrencyCode, quote: &CurrencyCode) -> Option<f64> {
        if base == quote {
            return Some(1.0);
        }
        self.rates.get(&(base.clone(), quote.clone())).copied()
    }

    /// Like [`get`](Self::get), but reports the missing pair as an error.
    pub fn require(&self, base: &CurrencyCode, quote: &CurrencyCode) -> Result<f64, RateError> {
        self.get(base, quote).ok_or_else(|| RateError::MissingRate {
            base: base.clone(),
            quote: quote.clone(),
        })
    }

    pub fn contains(&self, base: &CurrencyCode, quote: &CurrencyCode) -> bool {
        base == quote || self.rates.contains_key(&(base.clone(), quote.clone()))
    }

    /// Number of stored off-diagonal entries.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All stored entries as `(base, quote, rate)`.
    pub fn entries(&self) -> impl Iterator<Item = (&CurrencyCode, &CurrencyCode, f64)> {
        self.rates.iter().map(|((b, q), &r)| (b, q, r))
    }

    /// Ordered pairs from `universe` that have no stored rate.
    ///
    /// Used after the fetch phase to audit how much of the matrix the
    /// quote service actually delivered.
    pub fn missing_pairs(&self, universe: &[CurrencyCode]) -> Vec<(CurrencyCode, CurrencyCode)> {
        let mut missing = Vec::new();
        for base in universe {
            for quote in universe {
                if !self.contains(base, quote) {
                    missing.push((base.clone(), quote.clone()));
                }
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    #[test]
    fn test_set_and_get() {
        let mut m = RateMatrix::new();
        m.set(code("USD"), code("EUR"), 0.92);
        assert_eq!(m.get(&code("USD"), &code("EUR")), Some(0.92));
        assert_eq!(m.get(&code("EUR"), &code("USD")), None);
    }

    #[test]
    fn test_diagonal_is_one() {
        let m = RateMatrix::new();
        assert_eq!(m.get(&code("USD"), &code("USD")), Some(1.0));
        assert!(m.contains(&code("USD"), &code("USD")));
    }

    #[test]
    fn test_invalid_rates_are_absent() {
        let mut m = RateMatrix::new();
        m.set(code("USD"), code("EUR"), 0.0);
        m.set(code("USD"), code("JPY"), -3.0);
        m.set(code("USD"), code("GBP"), f64::NAN);
        m.set(code("USD"), code("CHF"), f64::INFINITY);
        assert!(m.is_empty());
    }

    #[test]
    fn test_invalid_rate_clears_existing() {
        let mut m = RateMatrix::new();
        m.set(code("USD"), code("EUR"), 0.92);
        m.set(code("USD"), code("EUR"), f64::NAN);
        assert_eq!(m.get(&code("USD"), &code("EUR")), None);
    }

    #[test]
    fn test_insert_row_filters() {
        let mut m = RateMatrix::new();
        let row = HashMap::from([
            (code("EUR"), 0.92),
            (code("JPY"), f64::NAN),
            (code("GBP"), 0.78),
        ]);
        m.insert_row(&code("USD"), row);
        assert_eq!(m.len(), 2);
        assert!(m.contains(&code("USD"), &code("EUR")));
        assert!(!m.contains(&code("USD"), &code("JPY")));
    }

    #[test]
    fn test_require_missing() {
        let m = RateMatrix::new();
        let err = m.require(&code("USD"), &code("EUR")).unwrap_err();
        assert!(err.to_string().contains("USD -> EUR"));
    }

    #[test]
    fn test_missing_pairs_audit() {
        let mut m = RateMatrix::new();
        let universe = vec![code("USD"), code("EUR")];
        m.set(code("USD"), code("EUR"), 0.92);
        let missing = m.missing_pairs(&universe);
        assert_eq!(missing, vec![(code("EUR"), code("USD"))]);
    }
}
