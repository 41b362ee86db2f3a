use crate::core::currency::CurrencyCode;
use crate::core::opportunity::ArbitrageOpportunity;
use crate::core::rates::RateMatrix;
use crate::graph::cycle_detection::find_negative_cycles;
use crate::graph::gain::evaluate_gain;
use crate::graph::rate_graph::RateGraph;
use crate::provider::RateProvider;
use crate::scan::report::ScanReport;
use futures::future::join_all;
use log::{debug, error, info, warn};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// The currency universe scanned when none is configured explicitly.
const DEFAULT_UNIVERSE: &[&str] = &[
    "USD", "EUR", "JPY", "GBP", "CNY", "AUD", "CAD", "CHF", "HKD", "SGD", "INR", "RUB", "BRL",
    "ZAR", "NZD", "SEK", "NOK", "DKK", "PLN", "THB", "IDR", "MYR", "PHP", "KRW", "ILS", "CZK",
    "HUF", "MXN", "TRY", "SAR",
];

/// Configuration for one scan run.
///
/// Immutable once handed to the [`Orchestrator`]; every knob that the
/// run needs is carried here explicitly rather than read from globals.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// The currency universe to fetch and search.
    pub currencies: Vec<CurrencyCode>,
    /// Concurrent workers in the fetch phase.
    pub fetch_workers: usize,
    /// Number of randomly sampled detection chunks.
    pub chunk_count: usize,
    /// Currencies per detection chunk.
    pub chunk_size: usize,
    /// Smallest reported cycle, in vertices including the repeated endpoint.
    pub min_cycle_len: usize,
    /// Largest reported cycle, in vertices including the repeated endpoint.
    pub max_cycle_len: usize,
    /// A cycle is profitable only if its gain strictly exceeds this.
    pub gain_threshold: f64,
}

impl ScanConfig {
    pub fn default_universe() -> Vec<CurrencyCode> {
        DEFAULT_UNIVERSE.iter().map(|c| CurrencyCode::new(*c)).collect()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            currencies: Self::default_universe(),
            fetch_workers: 4,
            chunk_count: 8,
            chunk_size: 16,
            min_cycle_len: 3,
            max_cycle_len: 5,
            gain_threshold: 0.25,
        }
    }
}

/// Runs a scan as two concurrent phases.
///
/// The fetch phase partitions the currency universe across workers that
/// each retrieve their bases' quote rows and merge them into one shared
/// matrix; it completes only when every worker has joined. The detection
/// phase then samples random chunks of the universe and searches each on
/// its own worker, appending profitable cycles to a shared collection.
/// The matrix is never written after the fetch phase, so detection reads
/// it without locking.
///
/// Neither phase has a fatal path: missing rows shrink the graph, and a
/// run over whatever data was obtainable always yields a (possibly
/// empty) report.
pub struct Orchestrator {
    config: ScanConfig,
    started: Instant,
}

impl Orchestrator {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Fetch phase: fill a rate matrix for the configured universe.
    ///
    /// The universe is split into contiguous ranges, one worker per
    /// range; workers do not communicate and each failure is local to
    /// its base currency. Merging goes through a single lock held only
    /// for the row insert.
    pub async fn fetch_rates(&self, provider: Arc<dyn RateProvider>) -> RateMatrix {
        let universe = &self.config.currencies;
        if universe.is_empty() {
            return RateMatrix::new();
        }

        let workers = self.config.fetch_workers.max(1);
        let span = ((universe.len() + workers - 1) / workers).max(1);
        let shared = Arc::new(Mutex::new(RateMatrix::new()));

        let mut handles = Vec::new();
        for range in universe.chunks(span) {
            let bases = range.to_vec();
            let quotes = universe.clone();
            let provider = Arc::clone(&provider);
            let shared = Arc::clone(&shared);
            handles.push(tokio::spawn(async move {
                for base in bases {
                    match provider.fetch_row(&base, &quotes).await {
                        Ok(row) => {
                            debug!("fetched {} quotes for {}", row.len(), base);
                            shared.lock().await.insert_row(&base, row);
                        }
                        Err(e) => warn!("leaving {} unfilled: {}", base, e),
                    }
                }
            }));
        }
        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!("fetch worker panicked: {}", e);
            }
        }

        let matrix = match Arc::try_unwrap(shared) {
            Ok(mutex) => mutex.into_inner(),
            Err(arc) => arc.lock().await.clone(),
        };

        let missing = matrix.missing_pairs(universe);
        if missing.is_empty() {
            info!("rate matrix complete over {} currencies", universe.len());
        } else {
            let total = universe.len() * universe.len().saturating_sub(1);
            warn!(
                "rate matrix incomplete: {} of {} pairs missing",
                missing.len(),
                total
            );
            for (base, quote) in &missing {
                debug!("missing rate: {} → {}", base, quote);
            }
        }
        matrix
    }

    /// Detection phase: search random chunks of the universe for
    /// profitable cycles.
    ///
    /// Chunks are sampled without replacement internally but may overlap
    /// each other, so the same underlying cycle can surface from several
    /// chunks (and, within a chunk, from several relaxation sources);
    /// duplicates are reported as found. Cycles spanning chunk
    /// boundaries are missed by construction.
    pub async fn detect(&self, rates: Arc<RateMatrix>) -> Vec<ArbitrageOpportunity> {
        let cfg = &self.config;
        if cfg.currencies.len() < 2 || cfg.chunk_count == 0 {
            return Vec::new();
        }
        let chunk_size = cfg.chunk_size.clamp(2, cfg.currencies.len());

        let chunks: Vec<Vec<CurrencyCode>> = {
            let mut rng = rand::thread_rng();
            (0..cfg.chunk_count)
                .map(|_| {
                    cfg.currencies
                        .choose_multiple(&mut rng, chunk_size)
                        .cloned()
                        .collect()
                })
                .collect()
        };

        let results: Arc<Mutex<Vec<ArbitrageOpportunity>>> = Arc::new(Mutex::new(Vec::new()));
        let mut handles = Vec::new();
        for chunk in chunks {
            let rates = Arc::clone(&rates);
            let results = Arc::clone(&results);
            let started = self.started;
            let min_len = cfg.min_cycle_len;
            let max_len = cfg.max_cycle_len;
            let threshold = cfg.gain_threshold;
            handles.push(tokio::spawn(async move {
                let graph = RateGraph::new(chunk, &rates);
                let cycles = find_negative_cycles(&graph, min_len, max_len);
                let mut found = Vec::new();
                for cycle in cycles {
                    match evaluate_gain(&cycle, graph.rates()) {
                        // Strictly above the threshold; an exact hit is not profitable.
                        Ok(gain) if gain > threshold => {
                            found.push(ArbitrageOpportunity::new(
                                cycle.into_codes(),
                                gain,
                                started.elapsed(),
                            ));
                        }
                        Ok(_) => {}
                        Err(e) => warn!("skipping cycle with unknown leg: {}", e),
                    }
                }
                if !found.is_empty() {
                    results.lock().await.append(&mut found);
                }
            }));
        }
        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!("detection worker panicked: {}", e);
            }
        }

        match Arc::try_unwrap(results) {
            Ok(mutex) => mutex.into_inner(),
            Err(arc) => arc.lock().await.clone(),
        }
    }

    /// Fetch, then detect, then report. Always completes.
    pub async fn run(&self, provider: Arc<dyn RateProvider>) -> ScanReport {
        let fetch_started = Instant::now();
        let matrix = self.fetch_rates(provider).await;
        info!(
            "fetched {} rate pairs in {:.2} sec",
            matrix.len(),
            fetch_started.elapsed().as_secs_f64()
        );

        let detect_started = Instant::now();
        let opportunities = self.detect(Arc::new(matrix)).await;
        info!(
            "searched {} chunks in {:.2} sec",
            self.config.chunk_count,
            detect_started.elapsed().as_secs_f64()
        );

        ScanReport::new(opportunities, &self.config, self.started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderError, StaticRates};
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    /// A -> B -> A with exact rate product 1.25 (gain 25.0 from 100).
    fn round_trip_matrix() -> RateMatrix {
        let mut m = RateMatrix::new();
        m.set(code("A"), code("B"), 0.5);
        m.set(code("B"), code("A"), 2.5);
        m
    }

    fn config_for(currencies: Vec<CurrencyCode>, threshold: f64) -> ScanConfig {
        ScanConfig {
            chunk_count: 4,
            chunk_size: currencies.len(),
            fetch_workers: 2,
            min_cycle_len: 3,
            max_cycle_len: 5,
            gain_threshold: threshold,
            currencies,
        }
    }

    #[tokio::test]
    async fn test_run_finds_round_trip() {
        let provider = Arc::new(StaticRates::new(round_trip_matrix()));
        let config = config_for(vec![code("A"), code("B")], 1.0);
        let report = Orchestrator::new(config).run(provider).await;

        assert!(!report.is_empty());
        for opp in report.opportunities() {
            assert!((opp.gain() - 25.0).abs() < 1e-9);
            assert_eq!(opp.cycle().first(), opp.cycle().last());
            assert!(opp.detected_after_seconds() >= 0.0);
        }
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        // Gain is exactly 25.0; an equal threshold must exclude it.
        let provider = Arc::new(StaticRates::new(round_trip_matrix()));
        let config = config_for(vec![code("A"), code("B")], 25.0);
        let report = Orchestrator::new(config).run(provider).await;
        assert!(report.is_empty());

        let provider = Arc::new(StaticRates::new(round_trip_matrix()));
        let config = config_for(vec![code("A"), code("B")], 24.999);
        let report = Orchestrator::new(config).run(provider).await;
        assert!(!report.is_empty());
    }

    #[tokio::test]
    async fn test_empty_universe_reports_nothing() {
        let provider = Arc::new(StaticRates::new(RateMatrix::new()));
        let config = config_for(Vec::new(), 0.0);
        let report = Orchestrator::new(config).run(provider).await;
        assert!(report.is_empty());
    }

    /// Provider that fails for one base and delegates for the rest.
    struct FlakyProvider {
        inner: StaticRates,
        failing: CurrencyCode,
    }

    #[async_trait]
    impl RateProvider for FlakyProvider {
        async fn fetch_row(
            &self,
            base: &CurrencyCode,
            quotes: &[CurrencyCode],
        ) -> Result<HashMap<CurrencyCode, f64>, ProviderError> {
            if *base == self.failing {
                return Err(ProviderError::MalformedPayload {
                    base: base.clone(),
                    detail: "truncated body".to_string(),
                });
            }
            self.inner.fetch_row(base, quotes).await
        }
    }

    #[tokio::test]
    async fn test_failed_base_leaves_row_absent() {
        let provider = Arc::new(FlakyProvider {
            inner: StaticRates::new(round_trip_matrix()),
            failing: code("A"),
        });
        let config = config_for(vec![code("A"), code("B")], 1.0);
        let orchestrator = Orchestrator::new(config);

        let matrix = orchestrator.fetch_rates(provider).await;
        assert!(!matrix.contains(&code("A"), &code("B")));
        assert!(matrix.contains(&code("B"), &code("A")));

        // The surviving half-edge cannot form a cycle.
        let opportunities = orchestrator.detect(Arc::new(matrix)).await;
        assert!(opportunities.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_merges_all_workers() {
        let mut m = RateMatrix::new();
        let codes: Vec<CurrencyCode> = ["A", "B", "C", "D", "E"].iter().map(|s| code(s)).collect();
        for from in &codes {
            for to in &codes {
                if from != to {
                    m.set(from.clone(), to.clone(), 1.0);
                }
            }
        }
        let provider = Arc::new(StaticRates::new(m));
        let config = ScanConfig {
            currencies: codes.clone(),
            fetch_workers: 3,
            ..ScanConfig::default()
        };
        let matrix = Orchestrator::new(config).fetch_rates(provider).await;
        assert!(matrix.missing_pairs(&codes).is_empty());
    }
}
