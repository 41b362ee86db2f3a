use crate::core::currency::CurrencyCode;
use crate::graph::rate_graph::RateGraph;
use std::fmt;

/// Slack required in the post-convergence relaxability scan.
///
/// Summing independently rounded `-ln(rate)` weights around a cycle with
/// rate product exactly 1 can land a hair below zero; requiring this much
/// improvement keeps rounding noise from reading as an arbitrage cycle.
const RELAX_MARGIN: f64 = 1e-9;

/// A closed conversion cycle in the rate graph.
///
/// The currency sequence starts and ends at the same code; length is
/// counted in vertices including the repeated endpoint, so the shortest
/// cycle (a round trip through one counterparty) has length 3.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArbitrageCycle {
    codes: Vec<CurrencyCode>,
}

impl ArbitrageCycle {
    fn new(codes: Vec<CurrencyCode>) -> Self {
        debug_assert!(codes.len() >= 2);
        debug_assert_eq!(codes.first(), codes.last());
        Self { codes }
    }

    /// Build a cycle from an explicit closed path.
    ///
    /// # Panics
    ///
    /// Panics if the path has fewer than two vertices or does not end
    /// where it starts.
    pub fn from_path(codes: Vec<CurrencyCode>) -> Self {
        assert!(codes.len() >= 2, "cycle needs at least two vertices");
        assert_eq!(
            codes.first(),
            codes.last(),
            "cycle must end at its origin"
        );
        Self { codes }
    }

    /// The conversion path, origin first and last.
    pub fn codes(&self) -> &[CurrencyCode] {
        &self.codes
    }

    pub fn into_codes(self) -> Vec<CurrencyCode> {
        self.codes
    }

    /// Number of vertices including the repeated endpoint.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The currency the cycle starts from and returns to.
    pub fn origin(&self) -> &CurrencyCode {
        &self.codes[0]
    }
}

impl fmt::Display for ArbitrageCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self.codes.iter().map(|c| c.as_str()).collect();
        write!(f, "{}", path.join(" → "))
    }
}

/// Find negative-weight cycles in the log-weight graph.
///
/// Runs a Bellman-Ford relaxation from every vertex as source: after the
/// standard V-1 relaxation passes, any edge that can still be relaxed
/// proves a negative cycle reachable through its tail, and the cycle is
/// recovered by walking predecessor links backward until a vertex
/// repeats. Only cycles whose vertex count (including the repeated
/// endpoint) lies within `[min_len, max_len]` are returned.
///
/// Cycles reached from different sources may be rotations or overlaps of
/// the same underlying cycle; no deduplication is performed, so callers
/// should expect (and tolerate) such duplicates.
pub fn find_negative_cycles(
    graph: &RateGraph,
    min_len: usize,
    max_len: usize,
) -> Vec<ArbitrageCycle> {
    let n = graph.vertex_count();
    let edges: Vec<(usize, usize, f64)> = graph.edges().collect();
    let mut cycles = Vec::new();

    for source in 0..n {
        let mut dist = vec![f64::INFINITY; n];
        let mut pred: Vec<Option<usize>> = vec![None; n];
        dist[source] = 0.0;

        for _ in 1..n {
            for &(u, v, w) in &edges {
                if dist[u] + w < dist[v] {
                    dist[v] = dist[u] + w;
                    pred[v] = Some(u);
                }
            }
        }

        for &(u, v, w) in &edges {
            if dist[u] + w + RELAX_MARGIN < dist[v] {
                if let Some(cycle) = extract_cycle(graph, &pred, u, v) {
                    if (min_len..=max_len).contains(&cycle.len()) {
                        cycles.push(cycle);
                    }
                }
            }
        }
    }

    cycles
}

/// Walk predecessor links backward from `u`, collecting vertices until
/// one repeats, then close the walk with `v` and reverse it into forward
/// order. Returns `None` if the chain breaks before a vertex repeats.
fn extract_cycle(
    graph: &RateGraph,
    pred: &[Option<usize>],
    u: usize,
    v: usize,
) -> Option<ArbitrageCycle> {
    let mut walk = vec![v];
    let mut cur = u;
    while !walk.contains(&cur) {
        walk.push(cur);
        cur = pred[cur]?;
    }
    walk.push(v);
    walk.reverse();

    Some(ArbitrageCycle::new(
        walk.into_iter().map(|i| graph.code(i).clone()).collect(),
    ))
}
