use crate::core::currency::CurrencyCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// A detected arbitrage opportunity.
///
/// Records one profitable conversion cycle: the ordered currency path
/// (closed, first == last), the gain above the starting notional, and
/// when the cycle was found relative to the start of the run.
///
/// Opportunities are immutable once created. Detection workers append
/// them to a shared collection; they live until the run's report is
/// emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Unique identifier for this opportunity.
    id: Uuid,
    /// The conversion cycle, origin first and last.
    cycle: Vec<CurrencyCode>,
    /// Units gained above the starting notional after one traversal.
    gain: f64,
    /// Seconds elapsed between run start and detection.
    detected_after_seconds: f64,
    /// Wall-clock time of detection.
    detected_at: DateTime<Utc>,
}

impl ArbitrageOpportunity {
    pub fn new(cycle: Vec<CurrencyCode>, gain: f64, detected_after: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            cycle,
            gain,
            detected_after_seconds: detected_after.as_secs_f64(),
            detected_at: Utc::now(),
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cycle(&self) -> &[CurrencyCode] {
        &self.cycle
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn detected_after_seconds(&self) -> f64 {
        self.detected_after_seconds
    }

    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// The cycle rendered as an arrow-joined path, e.g. `USD → EUR → USD`.
    pub fn path(&self) -> String {
        self.cycle
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}
