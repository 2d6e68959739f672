use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) alpha: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) padding: f32,
    pub(super) strength: f32,
    pub(super) max_distance_sq: f32,
}

// Deterministic stand-in for jiggling coincident points apart.
fn untangle_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn charge_between(point: Vec2, other: Vec2, charge: f32, params: ChargeParams) -> Vec2 {
    let mut delta = other - point;
    let mut distance_sq = delta.length_sq();
    if distance_sq <= 1.0e-12 {
        delta = untangle_direction(0, 1) * 1.0e-3;
        distance_sq = delta.length_sq();
    }
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }

    delta * (charge * params.alpha / distance_sq)
}

/// Accumulates the many-body force on one node. Positive charges pull nodes
/// together, negative push apart; far cells are approximated by their
/// aggregate charge when they subtend less than `theta`.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if node.weight <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *velocity += charge_between(point, positions[other_index], charges[other_index], params);
        }
        return;
    }

    let delta = node.charge_center - point;
    let distance_sq = delta.length_sq().max(0.0001);
    let distance = distance_sq.sqrt();
    let can_approximate =
        !node.bounds.contains(point) && ((node.bounds.side_length() / distance) < params.theta);

    if can_approximate {
        *velocity += charge_between(point, node.charge_center, node.charge, params);
        return;
    }

    for child in &node.children {
        if let Some(child) = child.as_ref() {
            accumulate_charge_for_node(child, index, positions, charges, params, velocity);
        }
    }
}

/// Weak springs pulling each axis toward the surface center, scaled by alpha.
pub(super) fn accumulate_centering(
    center: Vec2,
    strength: f32,
    alpha: f32,
    positions: &[Vec2],
    velocities: &mut [Vec2],
) {
    for (position, velocity) in positions.iter().zip(velocities.iter_mut()) {
        *velocity += (center - *position) * (strength * alpha);
    }
}

fn resolve_collision(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    velocities: &mut [Vec2],
    params: CollisionParams,
) {
    let radius_from = radii[from] + params.padding;
    let radius_to = radii[to] + params.padding;
    let min_distance = radius_from + radius_to;

    // Collide on predicted positions so this tick's motion is accounted for.
    let predicted_from = positions[from] + velocities[from];
    let predicted_to = positions[to] + velocities[to];
    let mut delta = predicted_from - predicted_to;
    let mut distance_sq = delta.length_sq();
    if distance_sq >= min_distance * min_distance {
        return;
    }

    if distance_sq <= 1.0e-12 {
        delta = untangle_direction(from, to);
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((min_distance - distance) / distance * params.strength);
    // Heavier (larger) bubble yields less, apportioned by squared radius.
    let share = (radius_to * radius_to) / (radius_from * radius_from + radius_to * radius_to);

    velocities[from] += push * share;
    velocities[to] -= push * (1.0 - share);
}

pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    velocities: &mut [Vec2],
    params: CollisionParams,
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > params.max_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for i in 0..node_a.indices.len() {
                let from = node_a.indices[i];
                for j in (i + 1)..node_a.indices.len() {
                    resolve_collision(from, node_a.indices[j], positions, radii, velocities, params);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_collision(from, to, positions, radii, velocities, params);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, positions, radii, velocities, params);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a, child_b, false, positions, radii, velocities, params,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in &node_a.children {
            let Some(child) = child.as_ref() else {
                continue;
            };
            accumulate_collision_pairs(child, node_b, false, positions, radii, velocities, params);
        }
    } else {
        for child in &node_b.children {
            let Some(child) = child.as_ref() else {
                continue;
            };
            accumulate_collision_pairs(node_a, child, false, positions, radii, velocities, params);
        }
    }
}
