//! Force simulation over the visible node set. One bounded tick per frame:
//! edge springs, Barnes-Hut repulsion, x/y centering, and a minimum
//! separation pass, all driven by a decaying alpha that bottoms out at a
//! floor instead of freezing, so settled graphs keep a slow ambient drift.

mod quadtree;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::graph::VisualNode;
use crate::util::stable_pair;
use quadtree::QuadTree;

const ALPHA_START: f32 = 1.0;
const ALPHA_FLOOR: f32 = 0.03;
const ALPHA_DECAY: f32 = 0.0228;
const DRAG_ALPHA_TARGET: f32 = 0.3;

const REST_LENGTH: f32 = 35.0;
const REPULSION_STRENGTH: f32 = 150.0;
const BARNES_HUT_THETA: f32 = 0.9;
const CENTER_STRENGTH: f32 = 0.2;
const COLLIDE_RADIUS: f32 = 55.0;
const COLLIDE_STRENGTH: f32 = 0.7;
const VELOCITY_DECAY: f32 = 0.6;
const SOFTENING: f32 = 4.0;

/// Long-run attractor of the centering springs; the viewport anchors its
/// screen center here.
pub(in crate::app) const SIM_CENTER: Vec2 = Vec2 { x: 500.0, y: 400.0 };

pub(in crate::app) struct SimNode {
    pub id: String,
    pub pos: Vec2,
    pub vel: Vec2,
    /// A dragged node becomes a fixed anchor: forces skip it and its
    /// position tracks the pointer.
    pub pinned: Option<Vec2>,
}

struct SimEdge {
    from: usize,
    to: usize,
    strength: f32,
}

struct Scratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
}

pub(in crate::app) struct SimGraph {
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    index_by_id: HashMap<String, usize>,
    alpha: f32,
    alpha_target: f32,
    scratch: Scratch,
}

impl SimGraph {
    pub fn build(visual: &[VisualNode]) -> Self {
        let mut index_by_id = HashMap::with_capacity(visual.len());
        for (index, node) in visual.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        let mut degrees = vec![0usize; visual.len()];
        let mut pairs = Vec::new();
        for (from, node) in visual.iter().enumerate() {
            for target in &node.connections {
                let Some(&to) = index_by_id.get(target) else {
                    continue;
                };
                if from == to {
                    continue;
                }
                degrees[from] += 1;
                degrees[to] += 1;
                pairs.push((from, to));
            }
        }

        let edges = pairs
            .into_iter()
            .map(|(from, to)| SimEdge {
                from,
                to,
                // Weakly coupled endpoints get full pull; hubs share theirs
                // across incident edges.
                strength: 1.0 / degrees[from].min(degrees[to]).max(1) as f32,
            })
            .collect();

        let nodes = visual
            .iter()
            .map(|node| {
                // Ring slots clamped to the canvas edge can coincide exactly;
                // a sub-pixel stable jitter breaks the tie deterministically.
                let (jitter_x, jitter_y) = stable_pair(&node.id);
                SimNode {
                    id: node.id.clone(),
                    pos: vec2(node.x + jitter_x * 0.5, node.y + jitter_y * 0.5),
                    vel: Vec2::ZERO,
                    pinned: None,
                }
            })
            .collect();

        Self {
            nodes,
            edges,
            index_by_id,
            alpha: ALPHA_START,
            alpha_target: ALPHA_FLOOR,
            scratch: Scratch {
                forces: Vec::new(),
                positions: Vec::new(),
            },
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn begin_drag(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = Some(node.pos);
            self.alpha_target = DRAG_ALPHA_TARGET;
        }
    }

    pub fn drag_to(&mut self, index: usize, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = Some(pos);
            node.pos = pos;
            node.vel = Vec2::ZERO;
        }
    }

    pub fn end_drag(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = None;
        }
        self.alpha_target = ALPHA_FLOOR;
    }

    /// One discrete simulation step. Bounded work: every node and edge is
    /// visited a small constant number of times.
    pub fn tick(&mut self) {
        let node_count = self.nodes.len();
        if node_count == 0 {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
        self.alpha = self.alpha.max(ALPHA_FLOOR);
        let alpha = self.alpha;

        let scratch = &mut self.scratch;
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch.positions.extend(self.nodes.iter().map(|node| node.pos));

        let forces = &mut scratch.forces;
        let positions = &scratch.positions;

        if let Some(tree) = QuadTree::build(positions) {
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_repulsion(&tree, index, positions, REPULSION_STRENGTH * alpha, force);
            }
        }

        for edge in &self.edges {
            let delta = positions[edge.from] - positions[edge.to];
            let distance = delta.length().max(0.001);
            let correction =
                (delta / distance) * ((distance - REST_LENGTH) * edge.strength * alpha);
            forces[edge.from] -= correction;
            forces[edge.to] += correction;
        }

        for (index, force) in forces.iter_mut().enumerate() {
            *force += (SIM_CENTER - positions[index]) * (CENTER_STRENGTH * alpha);
        }

        // Minimum-separation constraint; deliberately not alpha-scaled so a
        // settled graph still respects node extents.
        separate_overlaps(positions, forces);

        for (node, force) in self.nodes.iter_mut().zip(forces.iter()) {
            if let Some(anchor) = node.pinned {
                node.pos = anchor;
                node.vel = Vec2::ZERO;
                continue;
            }
            node.vel = (node.vel + *force) * VELOCITY_DECAY;
            node.pos += node.vel;
        }
    }
}

fn repulsion_direction(delta: Vec2, distance: f32, seed_a: usize, seed_b: usize) -> Vec2 {
    if distance > 0.001 {
        delta / distance
    } else {
        // Coincident points: pick a deterministic escape direction.
        let angle = ((seed_a as f32) * 0.618_034 + (seed_b as f32) * 0.414_214) * TAU;
        vec2(angle.cos(), angle.sin())
    }
}

fn accumulate_repulsion(
    tree: &QuadTree,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    force: &mut Vec2,
) {
    if tree.mass <= 0.0 {
        return;
    }

    let point = positions[index];
    if tree.is_leaf() {
        for &other in &tree.points {
            if other == index {
                continue;
            }
            let delta = point - positions[other];
            let distance_sq = delta.length_sq();
            let direction = repulsion_direction(delta, distance_sq.sqrt(), index, other);
            *force += direction * (strength / (distance_sq + SOFTENING));
        }
        return;
    }

    let delta = point - tree.barycenter;
    let distance_sq = delta.length_sq().max(0.0001);
    let far_enough = !tree.bounds.contains(point)
        && (tree.bounds.side() * tree.bounds.side()) < (BARNES_HUT_THETA * BARNES_HUT_THETA) * distance_sq;

    if far_enough {
        let distance = distance_sq.sqrt();
        *force += (delta / distance) * ((strength * tree.mass) / (distance_sq + SOFTENING));
        return;
    }

    for child in tree.children.iter().flatten() {
        accumulate_repulsion(child, index, positions, strength, force);
    }
}

fn separate_overlaps(positions: &[Vec2], forces: &mut [Vec2]) {
    let min_separation = COLLIDE_RADIUS * 2.0;
    let min_separation_sq = min_separation * min_separation;

    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[i] - positions[j];
            let distance_sq = delta.length_sq();
            if distance_sq >= min_separation_sq {
                continue;
            }

            let distance = distance_sq.sqrt();
            let direction = repulsion_direction(delta, distance, i, j);
            let push = (min_separation - distance) * COLLIDE_STRENGTH * 0.5;
            forces[i] += direction * push;
            forces[j] -= direction * push;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::classify::NodeCategory;

    fn vnode(id: &str, x: f32, y: f32, connections: &[&str]) -> VisualNode {
        VisualNode {
            id: id.to_owned(),
            label: id.to_owned(),
            x,
            y,
            category: NodeCategory::File,
            connections: connections.iter().map(|&c| c.to_owned()).collect(),
            metrics: None,
            path: id.to_owned(),
            layer: None,
        }
    }

    #[test]
    fn positions_stay_finite_over_many_ticks() {
        let visual = vec![
            vnode("a", 400.0, 280.0, &["b", "c"]),
            vnode("b", 410.0, 280.0, &["c"]),
            vnode("c", 400.0, 290.0, &[]),
            vnode("d", 405.0, 285.0, &[]),
        ];
        let mut sim = SimGraph::build(&visual);
        for _ in 0..300 {
            sim.tick();
        }
        for node in sim.nodes() {
            assert!(node.pos.x.is_finite() && node.pos.y.is_finite());
        }
    }

    #[test]
    fn alpha_decays_to_the_floor_and_stays_there() {
        let visual = vec![vnode("a", 0.0, 0.0, &[]), vnode("b", 50.0, 0.0, &[])];
        let mut sim = SimGraph::build(&visual);
        for _ in 0..600 {
            sim.tick();
            assert!(sim.alpha >= ALPHA_FLOOR);
        }
        assert!(sim.alpha < ALPHA_FLOOR + 0.005);
    }

    #[test]
    fn drag_pins_a_node_and_reheats() {
        let visual = vec![
            vnode("a", 100.0, 100.0, &["b"]),
            vnode("b", 200.0, 100.0, &[]),
        ];
        let mut sim = SimGraph::build(&visual);
        for _ in 0..400 {
            sim.tick();
        }
        let cooled = sim.alpha;

        let anchor = vec2(150.0, 150.0);
        let index = sim.index_of("a").unwrap();
        sim.begin_drag(index);
        sim.drag_to(index, anchor);
        for _ in 0..50 {
            sim.tick();
        }

        assert_eq!(sim.nodes()[index].pos, anchor);
        assert!(sim.alpha > cooled);

        sim.end_drag(index);
        sim.tick();
        assert!(sim.nodes()[index].pos != anchor || sim.nodes()[index].pinned.is_none());
    }

    #[test]
    fn overlapping_nodes_separate() {
        let visual = vec![
            vnode("a", 300.0, 300.0, &[]),
            vnode("b", 301.0, 300.0, &[]),
        ];
        let mut sim = SimGraph::build(&visual);
        let initial = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        for _ in 0..120 {
            sim.tick();
        }
        let settled = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        assert!(settled > initial);
        assert!(settled > COLLIDE_RADIUS);
    }

    #[test]
    fn springs_pull_distant_neighbors_together() {
        let visual = vec![
            vnode("a", 100.0, 400.0, &["b"]),
            vnode("b", 900.0, 400.0, &[]),
        ];
        let mut sim = SimGraph::build(&visual);
        let initial = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        for _ in 0..60 {
            sim.tick();
        }
        let later = (sim.nodes()[0].pos - sim.nodes()[1].pos).length();
        assert!(later < initial);
    }

    #[test]
    fn self_referential_connections_are_ignored() {
        let visual = vec![vnode("a", 10.0, 10.0, &["a"])];
        let mut sim = SimGraph::build(&visual);
        sim.tick();
        assert!(sim.nodes()[0].pos.x.is_finite());
    }
}
