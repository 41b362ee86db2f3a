use crate::core::currency::CurrencyCode;
use crate::core::rates::RateMatrix;
use crate::provider::{ProviderError, RateProvider};
use async_trait::async_trait;
use std::collections::HashMap;

/// Provider backed by a prebuilt rate matrix.
///
/// Serves offline runs (`detect --input`) and tests through the same
/// pipeline as the live quote service. Rows absent from the matrix come
/// back empty rather than failing, matching the partial-data tolerance
/// of the real provider.
#[derive(Debug, Clone)]
pub struct StaticRates {
    matrix: RateMatrix,
}

impl StaticRates {
    pub fn new(matrix: RateMatrix) -> Self {
        Self { matrix }
    }
}

#[async_trait]
impl RateProvider for StaticRates {
    async fn fetch_row(
        &self,
        base: &CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ProviderError> {
        let mut row = HashMap::new();
        for quote in quotes {
            if let Some(rate) = self.matrix.get(base, quote) {
                row.insert(quote.clone(), rate);
            }
        }
        Ok(row)
    }
}
