//! Synthetic market generation.
//!
//! Produces random rate matrices for testing and benchmarking. Rates are
//! derived from a hidden fair-value vector, which makes the noise-free
//! market perfectly arbitrage-free: every cycle's rate product
//! telescopes to 1. A noise knob perturbs individual rates and can
//! create real arbitrage cycles.

use crate::core::currency::CurrencyCode;
use crate::core::rates::RateMatrix;
use rand::Rng;

/// Configuration for generating a synthetic market.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Currencies in the market.
    pub currencies: Vec<CurrencyCode>,
    /// Relative perturbation applied to each rate; 0 disables noise.
    pub noise: f64,
}

impl MarketConfig {
    /// Placeholder currency codes `CUR-00`, `CUR-01`, ...
    pub fn synthetic_codes(count: usize) -> Vec<CurrencyCode> {
        (0..count)
            .map(|i| CurrencyCode::new(format!("CUR-{:02}", i)))
            .collect()
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            currencies: Self::synthetic_codes(10),
            noise: 0.002,
        }
    }
}

/// Generate a dense random rate matrix.
///
/// Each currency gets a random fair value; the rate from `a` to `b` is
/// `value(a) / value(b)`, perturbed by the configured noise. Perturbed
/// rates that end up non-positive are dropped, leaving the pair absent.
pub fn generate_market(config: &MarketConfig) -> RateMatrix {
    let mut rng = rand::thread_rng();
    let values: Vec<f64> = config
        .currencies
        .iter()
        .map(|_| rng.gen_range(-2.0..2.0f64).exp())
        .collect();

    let mut matrix = RateMatrix::new();
    for (i, from) in config.currencies.iter().enumerate() {
        for (j, to) in config.currencies.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut rate = values[i] / values[j];
            if config.noise > 0.0 {
                rate *= 1.0 + rng.gen_range(-config.noise..config.noise);
            }
            matrix.set(from.clone(), to.clone(), rate);
        }
    }
    matrix
}

/// Generate a perfectly consistent (arbitrage-free) market.
pub fn generate_consistent_market(currencies: &[CurrencyCode]) -> RateMatrix {
    generate_market(&MarketConfig {
        currencies: currencies.to_vec(),
        noise: 0.0,
    })
}

/// Force a profitable cycle through `path` (closed implicitly back to
/// its first element) by boosting the closing leg until the cycle's
/// rate product equals `product`. Missing legs are created at rate 1.0.
pub fn inject_cycle(matrix: &mut RateMatrix, path: &[CurrencyCode], product: f64) {
    assert!(path.len() >= 2, "cycle needs at least two currencies");
    assert!(product > 0.0, "rate product must be positive");

    let mut legs: Vec<(CurrencyCode, CurrencyCode)> = Vec::new();
    for pair in path.windows(2) {
        legs.push((pair[0].clone(), pair[1].clone()));
    }
    legs.push((path[path.len() - 1].clone(), path[0].clone()));

    let mut current = 1.0;
    for (from, to) in &legs {
        let rate = match matrix.get(from, to) {
            Some(r) => r,
            None => {
                matrix.set(from.clone(), to.clone(), 1.0);
                1.0
            }
        };
        current *= rate;
    }

    let (from, to) = legs.last().expect("at least one leg");
    let closing = matrix.get(from, to).expect("leg just ensured");
    matrix.set(from.clone(), to.clone(), closing * product / current);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::cycle_detection::find_negative_cycles;
    use crate::graph::gain::evaluate_gain;
    use crate::graph::rate_graph::RateGraph;
    use approx::assert_relative_eq;

    #[test]
    fn test_generated_rates_are_positive() {
        let config = MarketConfig::default();
        let matrix = generate_market(&config);
        for (_, _, rate) in matrix.entries() {
            assert!(rate.is_finite() && rate > 0.0);
        }
        assert_eq!(matrix.len(), 10 * 9);
    }

    #[test]
    fn test_consistent_market_is_arbitrage_free() {
        let currencies = MarketConfig::synthetic_codes(8);
        let matrix = generate_consistent_market(&currencies);
        let graph = RateGraph::new(currencies, &matrix);
        assert!(find_negative_cycles(&graph, 3, 8).is_empty());
    }

    #[test]
    fn test_injected_cycle_is_detectable() {
        let currencies = MarketConfig::synthetic_codes(6);
        let mut matrix = generate_consistent_market(&currencies);
        let path = [currencies[0].clone(), currencies[1].clone(), currencies[2].clone()];
        inject_cycle(&mut matrix, &path, 1.3);

        let graph = RateGraph::new(currencies, &matrix);
        let cycles = find_negative_cycles(&graph, 3, 6);
        assert!(!cycles.is_empty());
        assert!(cycles
            .iter()
            .any(|c| evaluate_gain(c, &matrix).map(|g| g > 0.0).unwrap_or(false)));
    }

    #[test]
    fn test_injected_product_is_exact() {
        let codes = MarketConfig::synthetic_codes(3);
        let mut matrix = RateMatrix::new();
        inject_cycle(&mut matrix, &codes, 1.2);

        let mut product = 1.0;
        product *= matrix.get(&codes[0], &codes[1]).unwrap();
        product *= matrix.get(&codes[1], &codes[2]).unwrap();
        product *= matrix.get(&codes[2], &codes[0]).unwrap();
        assert_relative_eq!(product, 1.2, max_relative = 1e-12);
    }
}
