use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 4;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half: f32,
}

impl Square {
    fn around(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        Some(Self {
            center: (min + max) * 0.5,
            half: ((max.x - min.x).max(max.y - min.y).max(1.0) * 0.5) + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half && (point.y - self.center.y).abs() <= self.half
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        ((point.x >= self.center.x) as usize) | (((point.y >= self.center.y) as usize) << 1)
    }

    fn quadrant(self, index: usize) -> Self {
        let quarter = self.half * 0.5;
        let dx = if index & 1 == 0 { -quarter } else { quarter };
        let dy = if index & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(dx, dy),
            half: quarter,
        }
    }
}

/// Barnes-Hut acceleration structure over current node positions. Rebuilt
/// every tick; interior nodes carry aggregate mass and barycenter so distant
/// clusters collapse into a single repulsion source.
pub(super) struct QuadTree {
    pub(super) bounds: Square,
    pub(super) barycenter: Vec2,
    pub(super) mass: f32,
    pub(super) points: Vec<usize>,
    pub(super) children: [Option<Box<QuadTree>>; 4],
}

impl QuadTree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let bounds = Square::around(positions)?;
        Some(Self::subdivide(
            bounds,
            (0..positions.len()).collect(),
            positions,
            0,
        ))
    }

    fn subdivide(bounds: Square, points: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let mass = points.len() as f32;
        let mut barycenter = Vec2::ZERO;
        for &index in &points {
            barycenter += positions[index];
        }
        if mass > 0.0 {
            barycenter /= mass;
        }

        let mut node = Self {
            bounds,
            barycenter,
            mass,
            points,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || node.points.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &node.points {
            buckets[bounds.quadrant_of(positions[index])].push(index);
        }

        // Coincident points all land in one bucket; splitting further would
        // recurse without progress.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                node.children[quadrant] = Some(Box::new(Self::subdivide(
                    bounds.quadrant(quadrant),
                    bucket,
                    positions,
                    depth + 1,
                )));
            }
        }
        node.points.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_builds_nothing() {
        assert!(QuadTree::build(&[]).is_none());
    }

    #[test]
    fn aggregates_carry_total_mass() {
        let positions = vec![
            vec2(0.0, 0.0),
            vec2(100.0, 0.0),
            vec2(0.0, 100.0),
            vec2(100.0, 100.0),
            vec2(50.0, 50.0),
            vec2(51.0, 50.0),
        ];
        let tree = QuadTree::build(&positions).unwrap();
        assert_eq!(tree.mass, positions.len() as f32);
        assert!(tree.bounds.contains(vec2(50.0, 50.0)));
        assert!(!tree.is_leaf());
    }

    #[test]
    fn coincident_points_terminate() {
        let positions = vec![vec2(5.0, 5.0); 64];
        let tree = QuadTree::build(&positions).unwrap();
        assert_eq!(tree.mass, 64.0);
    }
}
