use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 12;
const QUADTREE_MAX_DEPTH: usize = 10;

#[derive(Clone, Copy)]
pub(super) struct QuadBounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl QuadBounds {
    fn from_points(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        // Square cell, slightly padded so boundary points stay inside.
        let span = (max - min).max(vec2(1.0, 1.0));
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: (span.max_elem() * 0.5) + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extent && offset.y <= self.half_extent
    }

    // Quadrant bits: 1 = right half, 2 = lower half.
    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let dx = if quadrant & 1 == 0 { -quarter } else { quarter };
        let dy = if quadrant & 2 == 0 { -quarter } else { quarter };

        Self {
            center: self.center + vec2(dx, dy),
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        ((point.x >= self.center.x) as usize) | (((point.y >= self.center.y) as usize) << 1)
    }

    pub(super) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }

    pub(super) fn distance_sq_to(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let gap = (self.center - other.center).abs() - vec2(reach, reach);
        gap.max(Vec2::ZERO).length_sq()
    }
}

pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    /// Weighted barycenter of the charges below this cell.
    pub(super) charge_center: Vec2,
    /// Signed sum of charge strengths below this cell.
    pub(super) charge: f32,
    /// Sum of absolute charge strengths; zero means the subtree exerts nothing.
    pub(super) weight: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], charges: &[f32]) -> Option<Self> {
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, charges, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Vec2],
        charges: &[f32],
        depth: usize,
    ) -> Self {
        let mut charge = 0.0_f32;
        let mut weight = 0.0_f32;
        let mut weighted_center = Vec2::ZERO;
        let mut plain_center = Vec2::ZERO;
        for &index in &indices {
            charge += charges[index];
            weight += charges[index].abs();
            weighted_center += positions[index] * charges[index].abs();
            plain_center += positions[index];
        }

        let charge_center = if weight > 0.0 {
            weighted_center / weight
        } else if indices.is_empty() {
            bounds.center
        } else {
            plain_center / indices.len() as f32
        };

        let mut node = Self {
            bounds,
            charge_center,
            charge,
            weight,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            let quadrant = bounds.quadrant_for(positions[index]);
            buckets[quadrant].push(index);
        }

        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let child_bounds = bounds.child(quadrant);
            node.children[quadrant] = Some(Box::new(Self::build_node(
                child_bounds,
                bucket,
                positions,
                charges,
                depth + 1,
            )));
        }
        node.indices.clear();
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
    fn empty_input_builds_no_tree() {
        assert!(QuadNode::build(&[], &[]).is_none());
    }

    #[test]
    fn single_point_is_a_leaf() {
        let tree = QuadNode::build(&[vec2(5.0, 7.0)], &[2.0]).unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.indices, vec![0]);
        assert_eq!(tree.charge, 2.0);
        assert!(tree.bounds.contains(vec2(5.0, 7.0)));
    }

    #[test]
    fn root_aggregates_total_charge_and_barycenter() {
        let positions = [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(0.0, 10.0)];
        let charges = [1.0, 3.0, 0.0];
        let tree = QuadNode::build(&positions, &charges).unwrap();

        assert!((tree.charge - 4.0).abs() < 1e-6);
        assert!((tree.weight - 4.0).abs() < 1e-6);
        // Weighted center leans toward the strongest charge.
        assert!((tree.charge_center.x - 7.5).abs() < 1e-4);
        assert!((tree.charge_center.y - 0.0).abs() < 1e-4);
    }

    #[test]
    fn splits_when_over_leaf_capacity() {
        let positions = (0..40)
            .map(|index| vec2((index % 8) as f32 * 30.0, (index / 8) as f32 * 30.0))
            .collect::<Vec<_>>();
        let charges = vec![1.0; positions.len()];
        let tree = QuadNode::build(&positions, &charges).unwrap();

        assert!(!tree.is_leaf());
        assert!((tree.charge - 40.0).abs() < 1e-4);
        for point in &positions {
            assert!(tree.bounds.contains(*point));
        }
    }

    #[test]
    fn zero_charges_fall_back_to_the_plain_centroid() {
        let positions = [vec2(0.0, 0.0), vec2(4.0, 0.0)];
        let tree = QuadNode::build(&positions, &[0.0, 0.0]).unwrap();
        assert_eq!(tree.weight, 0.0);
        assert!((tree.charge_center.x - 2.0).abs() < 1e-6);
    }
}
