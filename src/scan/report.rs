use crate::core::currency::CurrencyCode;
use crate::core::opportunity::ArbitrageOpportunity;
use crate::scan::orchestrator::ScanConfig;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Machine-readable rendering of one opportunity.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityJson {
    pub cycle: Vec<CurrencyCode>,
    pub gain: f64,
    pub detected_after_seconds: f64,
}

/// Aggregated outcome of one scan run.
///
/// Holds every profitable opportunity together with the scan parameters
/// that produced them. Rendering is either human-readable via `Display`
/// or structured via [`json_entries`](Self::json_entries).
#[derive(Debug, Clone)]
pub struct ScanReport {
    opportunities: Vec<ArbitrageOpportunity>,
    currencies_scanned: usize,
    chunk_count: usize,
    chunk_size: usize,
    elapsed_seconds: f64,
}

impl ScanReport {
    pub fn new(
        opportunities: Vec<ArbitrageOpportunity>,
        config: &ScanConfig,
        elapsed: Duration,
    ) -> Self {
        Self {
            opportunities,
            currencies_scanned: config.currencies.len(),
            chunk_count: config.chunk_count,
            chunk_size: config.chunk_size,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }

    pub fn opportunities(&self) -> &[ArbitrageOpportunity] {
        &self.opportunities
    }

    pub fn len(&self) -> usize {
        self.opportunities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }

    pub fn currencies_scanned(&self) -> usize {
        self.currencies_scanned
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Opportunities in the structured output shape.
    pub fn json_entries(&self) -> Vec<OpportunityJson> {
        self.opportunities
            .iter()
            .map(|opp| OpportunityJson {
                cycle: opp.cycle().to_vec(),
                gain: opp.gain(),
                detected_after_seconds: opp.detected_after_seconds(),
            })
            .collect()
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opportunities.is_empty() {
            writeln!(f, "No arbitrage opportunities found.")?;
        } else {
            writeln!(f, "Profitable arbitrage cycles:")?;
            for opp in &self.opportunities {
                writeln!(
                    f,
                    "  Gain: {:.2} | Path: {} | Detected after {:.2} sec",
                    opp.gain(),
                    opp.path(),
                    opp.detected_after_seconds()
                )?;
            }
        }
        writeln!(
            f,
            "Scanned {} currencies across {} chunks of {} in {:.2} sec",
            self.currencies_scanned, self.chunk_count, self.chunk_size, self.elapsed_seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    fn sample_config() -> ScanConfig {
        ScanConfig {
            currencies: vec![code("A"), code("B"), code("C")],
            chunk_count: 2,
            chunk_size: 3,
            ..ScanConfig::default()
        }
    }

    fn sample_opportunity() -> ArbitrageOpportunity {
        ArbitrageOpportunity::new(
            vec![code("A"), code("B"), code("A")],
            25.0,
            Duration::from_millis(420),
        )
    }

    #[test]
    fn test_empty_report_message() {
        let report = ScanReport::new(Vec::new(), &sample_config(), Duration::from_secs(1));
        let text = report.to_string();
        assert!(text.contains("No arbitrage opportunities found."));
    }

    #[test]
    fn test_report_lists_opportunities() {
        let report = ScanReport::new(
            vec![sample_opportunity()],
            &sample_config(),
            Duration::from_secs(1),
        );
        let text = report.to_string();
        assert!(text.contains("Gain: 25.00"));
        assert!(text.contains("A → B → A"));
    }

    #[test]
    fn test_json_entry_shape() {
        let report = ScanReport::new(
            vec![sample_opportunity()],
            &sample_config(),
            Duration::from_secs(1),
        );
        let value = serde_json::to_value(report.json_entries()).unwrap();
        let entry = &value[0];
        assert_eq!(entry["cycle"][0], "A");
        assert_eq!(entry["gain"], 25.0);
        assert!(entry["detected_after_seconds"].is_number());
        assert!(entry.get("id").is_none());
    }
}
