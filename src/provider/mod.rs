//! Rate acquisition boundary.
//!
//! A [`RateProvider`] delivers one base currency's quote row at a time;
//! the orchestrator decides how rows are fetched concurrently and merged.
//! Failures are per-row: one base failing never aborts the others, the
//! affected row is simply left out of the matrix.

use crate::core::currency::CurrencyCode;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub mod exchange_rate_api;
pub mod static_rates;

pub use exchange_rate_api::ExchangeRateApi;
pub use static_rates::StaticRates;

/// Errors from fetching a single base currency's quote row.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate request for {base} failed: {source}")]
    Request {
        base: CurrencyCode,
        #[source]
        source: reqwest::Error,
    },
    #[error("rate payload for {base} is malformed: {detail}")]
    MalformedPayload { base: CurrencyCode, detail: String },
}

/// Source of exchange-rate quotes.
///
/// `fetch_row` returns the rates from `base` into each requested quote
/// currency. Quotes the provider does not know are absent from the map;
/// the self-rate is always present and fixed at 1.0.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_row(
        &self,
        base: &CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ProviderError>;
}
