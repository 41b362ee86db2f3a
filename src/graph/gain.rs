use crate::core::rates::{RateError, RateMatrix};
use crate::graph::cycle_detection::ArbitrageCycle;

/// Notional amount, in units of the cycle's origin currency, that a
/// traversal starts from.
pub const STARTING_NOTIONAL: f64 = 100.0;

/// Compute the gain realized by traversing `cycle` once.
///
/// Starting from [`STARTING_NOTIONAL`] units of the origin currency, the
/// amount is multiplied by the matrix rate of each consecutive pair; the
/// gain is the final amount minus the notional. The original rates are
/// used here, never the log weights: the log transform exists only for
/// cycle detection.
///
/// Returns [`RateError::MissingRate`] if any leg of the cycle has no
/// known rate.
///
/// # Examples
///
/// ```
/// use arbitrage_engine::prelude::*;
///
/// let mut rates = RateMatrix::new();
/// rates.set(CurrencyCode::new("A"), CurrencyCode::new("B"), 2.0);
/// rates.set(CurrencyCode::new("B"), CurrencyCode::new("C"), 2.0);
/// rates.set(CurrencyCode::new("C"), CurrencyCode::new("A"), 0.30);
///
/// let graph = RateGraph::new(
///     vec![CurrencyCode::new("A"), CurrencyCode::new("B"), CurrencyCode::new("C")],
///     &rates,
/// );
/// let cycles = find_negative_cycles(&graph, 3, 5);
/// let gain = evaluate_gain(&cycles[0], &rates).unwrap();
/// assert!((gain - 20.0).abs() < 1e-9);
/// ```
pub fn evaluate_gain(cycle: &ArbitrageCycle, rates: &RateMatrix) -> Result<f64, RateError> {
    let mut amount = STARTING_NOTIONAL;
    for leg in cycle.codes().windows(2) {
        amount *= rates.require(&leg[0], &leg[1])?;
    }
    Ok(amount - STARTING_NOTIONAL)
}
