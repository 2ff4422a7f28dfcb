use std::collections::HashMap;

use crate::backend::RawGraph;

/// Hard cap on rendered nodes. Degree ranking keeps the structurally most
/// important hubs when a graph exceeds it.
pub const VISIBILITY_CEILING: usize = 150;

pub struct VisibleSet {
    /// Indices into `graph.nodes`, sorted by descending degree with original
    /// input order as the tie-break, truncated to the ceiling.
    pub order: Vec<usize>,
    /// Undirected degree per node id, over the full (untruncated) graph.
    pub degrees: HashMap<String, usize>,
}

/// Compute undirected degrees and the capped, ranked visible subset. Each
/// edge counts toward both endpoints; a self-edge adds two to its node.
pub fn select_visible(graph: &RawGraph, ceiling: usize) -> VisibleSet {
    let mut degrees = HashMap::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        degrees.insert(node.id.clone(), 0usize);
    }

    for edge in &graph.edges {
        if let Some(count) = degrees.get_mut(&edge.source) {
            *count += 1;
        }
        if let Some(count) = degrees.get_mut(&edge.target) {
            *count += 1;
        }
    }

    let mut order = (0..graph.nodes.len()).collect::<Vec<_>>();
    // Stable sort preserves input order among equal degrees.
    order.sort_by_key(|&index| {
        std::cmp::Reverse(degrees.get(&graph.nodes[index].id).copied().unwrap_or(0))
    });
    order.truncate(ceiling);

    VisibleSet { order, degrees }
}
