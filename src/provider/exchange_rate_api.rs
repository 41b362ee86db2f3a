use crate::core::currency::CurrencyCode;
use crate::provider::{ProviderError, RateProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Per-request timeout on quote calls. A base whose request exceeds this
/// is dropped for the run; there are no retries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const API_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Client for the exchangerate-api.com quote service.
///
/// One `GET {API_BASE_URL}/{key}/latest/{base}` call per base currency
/// returns that base's full conversion table, from which the requested
/// quotes are projected.
#[derive(Debug, Clone)]
pub struct ExchangeRateApi {
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

/// Quote-service response body. Fields other than the conversion table
/// are ignored.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    conversion_rates: HashMap<String, f64>,
}

impl ExchangeRateApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApi {
    async fn fetch_row(
        &self,
        base: &CurrencyCode,
        quotes: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ProviderError> {
        let url = format!("{}/{}/latest/{}", API_BASE_URL, self.api_key, base);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ProviderError::Request {
                base: base.clone(),
                source,
            })?;

        let payload: LatestRatesResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedPayload {
                    base: base.clone(),
                    detail: e.to_string(),
                })?;

        Ok(project_row(base, quotes, &payload.conversion_rates))
    }
}

/// Project a raw conversion table onto the requested quote currencies.
/// Unknown quotes are omitted; the self-rate is pinned to 1.0.
fn project_row(
    base: &CurrencyCode,
    quotes: &[CurrencyCode],
    table: &HashMap<String, f64>,
) -> HashMap<CurrencyCode, f64> {
    let mut row = HashMap::new();
    for quote in quotes {
        if quote == base {
            row.insert(quote.clone(), 1.0);
        } else if let Some(&rate) = table.get(quote.as_str()) {
            row.insert(quote.clone(), rate);
        }
    }
    row
}
