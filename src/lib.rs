//! # arbitrage-engine
//!
//! Currency arbitrage detection engine.
//!
//! Given pairwise exchange rates between a set of currencies, this engine
//! searches for conversion cycles whose compounded rate product exceeds 1.
//! Rates are mapped into a directed graph with edge weights `-ln(rate)`;
//! a negative-weight cycle in that graph is exactly a profitable cycle in
//! rate space.
//!
//! ## Architecture
//!
//! - **core** - Foundational types: currency codes, the rate matrix,
//!   detected opportunities
//! - **graph** - Log-weight rate graph, negative-cycle detection, gain
//!   evaluation
//! - **provider** - Rate acquisition: live quote-service client and
//!   in-memory provider
//! - **scan** - Two-phase concurrent orchestration (fetch, detect) and
//!   report rendering
//! - **simulation** - Synthetic market generation for testing

pub mod core;
pub mod graph;
pub mod provider;
pub mod scan;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::opportunity::ArbitrageOpportunity;
    pub use crate::core::rates::RateMatrix;
    pub use crate::graph::cycle_detection::{find_negative_cycles, ArbitrageCycle};
    pub use crate::graph::gain::evaluate_gain;
    pub use crate::graph::rate_graph::RateGraph;
    pub use crate::provider::{ExchangeRateApi, RateProvider, StaticRates};
    pub use crate::scan::orchestrator::{Orchestrator, ScanConfig};
    pub use crate::scan::report::ScanReport;
}
