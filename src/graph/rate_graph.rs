use crate::core::currency::CurrencyCode;
use crate::core::rates::RateMatrix;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashSet;

/// Log-weight view of a [`RateMatrix`] restricted to a vertex subset.
///
/// Every ordered pair of distinct vertices with a known rate becomes a
/// directed edge weighted `-ln(rate)`, so a cycle whose rate product
/// exceeds 1 has negative total weight. The original rates for the
/// subset are retained alongside the weights: cycle search runs on the
/// log weights, profit accounting on the rates.
///
/// Construction is O(V²) over the vertex subset and the graph is
/// immutable afterwards. Rebuilding from the same matrix and subset
/// yields an identical graph.
///
/// # Examples
///
/// ```
/// use arbitrage_engine::core::currency::CurrencyCode;
/// use arbitrage_engine::core::rates::RateMatrix;
/// use arbitrage_engine::graph::rate_graph::RateGraph;
///
/// let usd = CurrencyCode::new("USD");
/// let eur = CurrencyCode::new("EUR");
/// let mut rates = RateMatrix::new();
/// rates.set(usd.clone(), eur.clone(), 2.0);
///
/// let graph = RateGraph::new(vec![usd, eur], &rates);
/// assert_eq!(graph.edge_count(), 1);
/// assert!((graph.weight(0, 1).unwrap() - (-f64::ln(2.0))).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct RateGraph {
    /// Vertex currencies, in construction order. Vertex `i` in the
    /// weight graph is `vertices[i]`.
    vertices: Vec<CurrencyCode>,
    /// Directed log-weight graph over vertex indices.
    graph: DiGraphMap<usize, f64>,
    /// Original rates restricted to the vertex subset.
    rates: RateMatrix,
}

impl RateGraph {
    /// Build the log-weight graph for `vertices` from `rates`.
    ///
    /// Pairs with absent rates are simply omitted as edges; self-edges
    /// are never created. Duplicate vertices are collapsed, keeping
    /// first-occurrence order.
    pub fn new(vertices: Vec<CurrencyCode>, rates: &RateMatrix) -> Self {
        let mut seen = HashSet::new();
        let vertices: Vec<CurrencyCode> = vertices
            .into_iter()
            .filter(|v| seen.insert(v.clone()))
            .collect();

        let mut graph = DiGraphMap::new();
        let mut restricted = RateMatrix::new();
        for i in 0..vertices.len() {
            graph.add_node(i);
        }
        for (i, from) in vertices.iter().enumerate() {
            for (j, to) in vertices.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(rate) = rates.get(from, to) {
                    restricted.set(from.clone(), to.clone(), rate);
                    graph.add_edge(i, j, -rate.ln());
                }
            }
        }

        Self {
            vertices,
            graph,
            rates: restricted,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertices(&self) -> &[CurrencyCode] {
        &self.vertices
    }

    /// The currency at vertex index `i`.
    pub fn code(&self, i: usize) -> &CurrencyCode {
        &self.vertices[i]
    }

    /// The log weight of edge `from -> to`, if the edge exists.
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        self.graph.edge_weight(from, to).copied()
    }

    /// All edges as `(from, to, weight)` triples, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph.all_edges().map(|(u, v, &w)| (u, v, w))
    }

    /// The retained original rates for this vertex subset.
    pub fn rates(&self) -> &RateMatrix {
        &self.rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    fn sample_matrix() -> RateMatrix {
        let mut m = RateMatrix::new();
        m.set(code("USD"), code("EUR"), 0.9);
        m.set(code("EUR"), code("USD"), 1.1);
        m.set(code("USD"), code("JPY"), 150.0);
        m
    }

    #[test]
    fn test_edges_follow_known_rates() {
        let graph = RateGraph::new(vec![code("USD"), code("EUR"), code("JPY")], &sample_matrix());
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.weight(0, 1).is_some()); // USD -> EUR
        assert!(graph.weight(1, 0).is_some()); // EUR -> USD
        assert!(graph.weight(0, 2).is_some()); // USD -> JPY
        assert!(graph.weight(2, 0).is_none()); // JPY -> USD unknown
        assert!(graph.weight(1, 2).is_none()); // EUR -> JPY unknown
    }

    #[test]
    fn test_weight_is_negative_log_rate() {
        let graph = RateGraph::new(vec![code("USD"), code("JPY")], &sample_matrix());
        let w = graph.weight(0, 1).unwrap();
        assert!((w - (-(150.0f64).ln())).abs() < 1e-12);
    }

    #[test]
    fn test_no_self_edges() {
        let graph = RateGraph::new(vec![code("USD"), code("EUR")], &sample_matrix());
        assert!(graph.weight(0, 0).is_none());
        assert!(graph.weight(1, 1).is_none());
    }

    #[test]
    fn test_restriction_drops_outside_rates() {
        let graph = RateGraph::new(vec![code("USD"), code("EUR")], &sample_matrix());
        // JPY is outside the subset, so its rate is not retained.
        assert!(!graph.rates().contains(&code("USD"), &code("JPY")));
        assert_eq!(graph.rates().get(&code("USD"), &code("EUR")), Some(0.9));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let m = sample_matrix();
        let vs = vec![code("USD"), code("EUR"), code("JPY")];
        let a = RateGraph::new(vs.clone(), &m);
        let b = RateGraph::new(vs, &m);
        let ea: Vec<_> = a.edges().collect();
        let eb: Vec<_> = b.edges().collect();
        assert_eq!(ea, eb);
    }

    #[test]
    fn test_duplicate_vertices_collapse() {
        let graph = RateGraph::new(
            vec![code("USD"), code("EUR"), code("USD")],
            &sample_matrix(),
        );
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.code(0), &code("USD"));
    }

    #[test]
    fn test_empty_subset() {
        let graph = RateGraph::new(Vec::new(), &sample_matrix());
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
