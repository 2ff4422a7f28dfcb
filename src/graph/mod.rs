//! The cold-path layout pipeline: raw backend graph in, positioned and
//! classified visual nodes out. Runs synchronously to completion before a
//! project's first paint; results are cached per repository.

pub mod classify;
pub mod data;
pub mod demo;
pub mod radial;
pub mod visibility;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::backend::{NodeMetrics, RawGraph};
use crate::util::clean_label;
use classify::{NodeCategory, classify};
use radial::place_radial;
use visibility::{VISIBILITY_CEILING, select_visible};

/// A placed, classified, renderable node. Everything except `x`/`y` is fixed
/// after derivation; positions are mutated at simulation rate.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub category: NodeCategory,
    /// Ids of visible direct dependencies. Never references a hidden node.
    pub connections: Vec<String>,
    pub metrics: Option<NodeMetrics>,
    pub path: String,
    pub layer: Option<String>,
}

/// Derive the visible, positioned node set for a raw graph: rank by degree,
/// cap to the visibility ceiling, place on concentric rings, classify, and
/// prune connections down to the visible subset.
pub fn build_visual_nodes(graph: &RawGraph) -> Vec<VisualNode> {
    let visible = select_visible(graph, VISIBILITY_CEILING);
    let positions = place_radial(visible.order.len());

    let mut slot_by_id = HashMap::with_capacity(visible.order.len());
    for (slot, &index) in visible.order.iter().enumerate() {
        slot_by_id.insert(graph.nodes[index].id.as_str(), slot);
    }

    let mut connections = vec![Vec::new(); visible.order.len()];
    for edge in &graph.edges {
        if let Some(&source_slot) = slot_by_id.get(edge.source.as_str())
            && slot_by_id.contains_key(edge.target.as_str())
        {
            connections[source_slot].push(edge.target.clone());
        }
    }

    visible
        .order
        .iter()
        .zip(positions)
        .zip(connections)
        .map(|((&index, (x, y)), connections)| {
            let node = &graph.nodes[index];
            VisualNode {
                id: node.id.clone(),
                label: clean_label(&node.label),
                x,
                y,
                category: classify(&node.kind, &node.label),
                connections,
                metrics: node.metrics.clone(),
                path: node.id.clone(),
                layer: node.layer.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RawEdge, RawNode};

    fn node(id: &str, kind: &str) -> RawNode {
        RawNode {
            id: id.to_owned(),
            label: id.to_owned(),
            kind: kind.to_owned(),
            metrics: None,
            layer: None,
        }
    }

    fn edge(source: &str, target: &str) -> RawEdge {
        RawEdge {
            source: source.to_owned(),
            target: target.to_owned(),
            relation: "imports".to_owned(),
        }
    }

    fn graph(nodes: Vec<RawNode>, edges: Vec<RawEdge>) -> RawGraph {
        RawGraph {
            project_name: "t".to_owned(),
            branch: String::new(),
            nodes,
            edges,
            health_score: 0.0,
            project_root: String::new(),
        }
    }

    #[test]
    fn every_visible_id_appears_exactly_once() {
        let graph = graph(
            vec![node("a", "file"), node("b", "file"), node("c", "folder")],
            vec![edge("a", "b"), edge("b", "c")],
        );
        let nodes = build_visual_nodes(&graph);
        assert_eq!(nodes.len(), 3);

        let mut ids = nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn connections_reference_only_visible_nodes() {
        // hub connects to many leaves; ceiling of 150 is irrelevant here, so
        // hide nodes by pointing edges at ids that do not exist.
        let graph = graph(
            vec![node("hub", "file"), node("leaf", "file")],
            vec![edge("hub", "leaf"), edge("hub", "gone"), edge("gone", "leaf")],
        );
        let nodes = build_visual_nodes(&graph);

        for visual in &nodes {
            for target in &visual.connections {
                assert!(nodes.iter().any(|other| &other.id == target));
            }
        }
        let hub = nodes.iter().find(|n| n.id == "hub").unwrap();
        assert_eq!(hub.connections, vec!["leaf".to_owned()]);
    }

    #[test]
    fn worked_example_tiers_and_positions() {
        // A=3, B=2, C=2, D=1, E=0 with a ceiling of 150: the full five are
        // visible; the ranking test proper lives in the visibility module.
        let graph = graph(
            ["A", "B", "C", "D", "E"].iter().map(|id| node(id, "file")).collect(),
            vec![edge("A", "B"), edge("A", "C"), edge("A", "D"), edge("B", "C")],
        );
        let nodes = build_visual_nodes(&graph);
        assert_eq!(nodes[0].id, "A");
        // Lone tier-0 node sits at the canvas center.
        assert_eq!((nodes[0].x, nodes[0].y), (radial::CANVAS_CX, radial::CANVAS_CY));
    }

    #[test]
    fn derivation_is_deterministic() {
        let graph = graph(
            vec![node("a.py", "file"), node("b_service.py", "file")],
            vec![edge("a.py", "b_service.py")],
        );
        assert_eq!(build_visual_nodes(&graph), build_visual_nodes(&graph));
    }

    #[test]
    fn labels_are_cleaned_and_categories_assigned() {
        let graph = graph(
            vec![node("auth_controller.py", "file"), node("src", "folder")],
            Vec::new(),
        );
        let nodes = build_visual_nodes(&graph);
        let controller = nodes.iter().find(|n| n.id == "auth_controller.py").unwrap();
        assert_eq!(controller.label, "auth_controller");
        assert_eq!(controller.category, NodeCategory::Api);
        let folder = nodes.iter().find(|n| n.id == "src").unwrap();
        assert_eq!(folder.category, NodeCategory::Folder);
    }
}
