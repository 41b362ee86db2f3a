//! Triangular arbitrage detection example.
//!
//! Demonstrates how a rate product above 1 around a three-currency loop
//! shows up as a negative cycle in log space, and how the realized gain
//! is priced from the original rates.

use arbitrage_engine::core::currency::CurrencyCode;
use arbitrage_engine::core::rates::RateMatrix;
use arbitrage_engine::graph::cycle_detection::find_negative_cycles;
use arbitrage_engine::graph::gain::evaluate_gain;
use arbitrage_engine::graph::rate_graph::RateGraph;

fn main() {
    println!("╔══════════════════════════════════════════════════╗");
    println!("║  arbitrage-engine: Triangular Cycle Detection    ║");
    println!("╚══════════════════════════════════════════════════╝\n");

    let a = CurrencyCode::new("USD");
    let b = CurrencyCode::new("EUR");
    let c = CurrencyCode::new("JPY");

    println!("Rates:");
    println!("  USD → EUR: 2.00");
    println!("  EUR → JPY: 2.00");
    println!("  JPY → USD: 0.30   (product: 1.20)\n");

    let mut rates = RateMatrix::new();
    rates.set(a.clone(), b.clone(), 2.0);
    rates.set(b.clone(), c.clone(), 2.0);
    rates.set(c.clone(), a.clone(), 0.30);

    let graph = RateGraph::new(vec![a.clone(), b.clone(), c.clone()], &rates);

    println!("━━━ Log Weights ━━━\n");
    for (u, v, w) in graph.edges() {
        println!("  {} → {}: {:+.4}", graph.code(u), graph.code(v), w);
    }
    let total: f64 = graph.edges().map(|(_, _, w)| w).sum();
    println!("  cycle total: {:+.4} (negative ⇒ arbitrage)\n", total);

    println!("━━━ Detected Cycles ━━━\n");
    let cycles = find_negative_cycles(&graph, 3, 5);
    for (i, cycle) in cycles.iter().enumerate() {
        let gain = evaluate_gain(cycle, &rates).unwrap();
        println!("  Cycle {}: {}", i, cycle);
        println!("    Gain on 100 units: {:.2}", gain);
        println!();
    }

    println!("━━━ Interpretation ━━━\n");
    println!("  Converting 100 USD around the loop returns 120 USD. The");
    println!("  same underlying triangle is rediscovered from each source");
    println!("  vertex, so rotations of one cycle may appear repeatedly.");
}
