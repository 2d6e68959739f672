mod forces;
mod quadtree;

use eframe::egui::vec2;

use super::{CHART_HEIGHT, CHART_WIDTH, ChartCache};
use forces::{
    ChargeParams, CollisionParams, accumulate_centering, accumulate_charge_for_node,
    accumulate_collision_pairs,
};
use quadtree::QuadNode;

// Tuning defaults. The charge coefficient and collision padding have no
// physical derivation; they are the values the chart was tuned with.
const CHARGE_COEFF: f32 = 0.01;
const CENTER_STRENGTH: f32 = 0.03;
const COLLIDE_PADDING: f32 = 1.0;
const COLLIDE_STRENGTH: f32 = 1.0;
const BARNES_HUT_THETA: f32 = 0.9;
const DISTANCE_MIN_SQ: f32 = 1.0;

// Energy protocol: alpha decays toward zero over ~300 ticks and the
// simulation stops stepping once it falls below the floor.
const ALPHA_START: f32 = 1.0;
const ALPHA_TARGET: f32 = 0.0;
const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY: f32 = 0.0228;
const VELOCITY_RETAIN: f32 = 0.6;

/// Charge strength for one bubble. Grows with the square of the radius, so
/// the aggregate pull is proportional to circle area and the largest bubbles
/// drift toward the middle of the cluster.
fn charge_strength(radius: f32) -> f32 {
    radius * radius * CHARGE_COEFF
}

/// Iterative layout solver for the bubble chart.
///
/// One instance is owned by the view model; `tick` is called once per rendered
/// frame while the simulation is hot, and the caller schedules the next frame
/// only when `tick` reports motion. Dropping the owner is the teardown: no
/// timers exist, so a discarded chart can never keep stepping.
pub(in crate::app) struct Simulation {
    alpha: f32,
}

impl Simulation {
    pub(in crate::app) fn new() -> Self {
        Self { alpha: ALPHA_START }
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.alpha >= ALPHA_MIN
    }

    /// Resets the energy to maximum so the layout relaxes again. Safe to call
    /// every frame of a drag; there is no timer to double-schedule.
    pub(in crate::app) fn reheat(&mut self) {
        self.alpha = ALPHA_START;
    }

    pub(in crate::app) fn stop(&mut self) {
        self.alpha = 0.0;
    }

    /// Advances the layout one step: decay alpha, accumulate the charge,
    /// centering, and collision forces into per-node velocities, then
    /// integrate. Returns false once the simulation has cooled, in which case
    /// node state is left untouched.
    pub(in crate::app) fn tick(&mut self, cache: &mut ChartCache) -> bool {
        if !self.is_running() || cache.nodes.is_empty() {
            return false;
        }

        self.alpha += (ALPHA_TARGET - self.alpha) * ALPHA_DECAY;

        let node_count = cache.nodes.len();
        let scratch = &mut cache.sim_scratch;
        scratch.positions.clear();
        scratch.velocities.clear();
        scratch.radii.clear();
        scratch.charges.clear();
        let mut max_radius = 0.0_f32;
        for node in &cache.nodes {
            scratch.positions.push(node.pos);
            scratch.velocities.push(node.velocity);
            scratch.radii.push(node.radius);
            scratch.charges.push(charge_strength(node.radius));
            max_radius = max_radius.max(node.radius);
        }

        let positions = &scratch.positions;
        let radii = &scratch.radii;
        let charges = &scratch.charges;
        let velocities = &mut scratch.velocities;

        let quadtree = QuadNode::build(positions, charges);

        if let Some(quadtree) = &quadtree {
            let charge_params = ChargeParams {
                alpha: self.alpha,
                theta: BARNES_HUT_THETA,
                distance_min_sq: DISTANCE_MIN_SQ,
            };
            for (index, velocity) in velocities.iter_mut().enumerate().take(node_count) {
                accumulate_charge_for_node(
                    quadtree,
                    index,
                    positions,
                    charges,
                    charge_params,
                    velocity,
                );
            }
        }

        accumulate_centering(
            vec2(CHART_WIDTH * 0.5, CHART_HEIGHT * 0.5),
            CENTER_STRENGTH,
            self.alpha,
            positions,
            velocities,
        );

        // Collision goes last and unscaled by alpha: it sees the motion the
        // other forces just queued up and keeps resolving overlap even as
        // those fade out.
        if let Some(quadtree) = &quadtree {
            let reach = 2.0 * (max_radius + COLLIDE_PADDING) + 8.0;
            accumulate_collision_pairs(
                quadtree,
                quadtree,
                true,
                positions,
                radii,
                velocities,
                CollisionParams {
                    padding: COLLIDE_PADDING,
                    strength: COLLIDE_STRENGTH,
                    max_distance_sq: reach * reach,
                },
            );
        }

        for (node, velocity) in cache.nodes.iter_mut().zip(velocities.iter_mut()) {
            *velocity *= VELOCITY_RETAIN;
            node.velocity = *velocity;
            node.pos += *velocity;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Vec2;

    use super::super::{BubbleNode, ChartCache};
    use super::*;
    use crate::app::chart::build::{bubble_radius, seed_position};

    fn test_cache(sizes: &[f32]) -> ChartCache {
        let max_size = sizes.iter().copied().fold(0.0_f32, f32::max);
        let nodes = sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                let id = format!("skill-{index}");
                BubbleNode {
                    pos: seed_position(&id),
                    velocity: Vec2::ZERO,
                    radius: bubble_radius(size, max_size),
                    label: id.clone(),
                    group: (index % 5) as u32,
                    size,
                    id,
                }
            })
            .collect();
        ChartCache::new(nodes)
    }

    fn run_until_cool(simulation: &mut Simulation, cache: &mut ChartCache) -> usize {
        let mut ticks = 0;
        while simulation.tick(cache) {
            ticks += 1;
            assert!(ticks < 2_000, "simulation failed to cool");
        }
        ticks
    }

    #[test]
    fn cooling_takes_roughly_three_hundred_ticks() {
        let mut cache = test_cache(&[10.0, 40.0]);
        let mut simulation = Simulation::new();
        let ticks = run_until_cool(&mut simulation, &mut cache);
        assert!((250..=350).contains(&ticks), "cooled after {ticks} ticks");
        assert!(!simulation.is_running());
    }

    #[test]
    fn converged_layout_has_no_overlapping_circles() {
        let mut cache = test_cache(&[10.0, 40.0, 25.0, 5.0, 16.0, 33.0, 8.0, 12.0]);
        let mut simulation = Simulation::new();
        run_until_cool(&mut simulation, &mut cache);

        // One collision pass per tick resolves overlap iteratively, so allow
        // a small solver tolerance on the padding.
        for i in 0..cache.nodes.len() {
            for j in (i + 1)..cache.nodes.len() {
                let a = &cache.nodes[i];
                let b = &cache.nodes[j];
                let distance = (a.pos - b.pos).length();
                assert!(
                    distance >= a.radius + b.radius + 1.0 - 0.05,
                    "bubbles {i} and {j} overlap: {distance} < {} + {} + 1",
                    a.radius,
                    b.radius,
                );
            }
        }
    }

    #[test]
    fn converged_layout_clusters_near_the_surface_center() {
        let mut cache = test_cache(&[10.0, 40.0, 25.0, 5.0, 16.0]);
        let mut simulation = Simulation::new();

        let center = vec2(CHART_WIDTH * 0.5, CHART_HEIGHT * 0.5);
        let centroid = |cache: &ChartCache| {
            cache
                .nodes
                .iter()
                .fold(Vec2::ZERO, |sum, node| sum + node.pos)
                / cache.nodes.len() as f32
        };

        let before = (centroid(&cache) - center).length();
        run_until_cool(&mut simulation, &mut cache);
        let after = (centroid(&cache) - center).length();

        assert!(after < before, "cluster drifted away from center");
        assert!(after < 120.0, "cluster settled too far out: {after}");
    }

    #[test]
    fn cooled_simulation_stops_mutating_nodes() {
        let mut cache = test_cache(&[10.0, 40.0, 25.0]);
        let mut simulation = Simulation::new();
        run_until_cool(&mut simulation, &mut cache);

        let frozen = cache.nodes.iter().map(|node| node.pos).collect::<Vec<_>>();
        assert!(!simulation.tick(&mut cache));
        assert!(!simulation.tick(&mut cache));
        let still = cache.nodes.iter().map(|node| node.pos).collect::<Vec<_>>();
        assert_eq!(frozen, still);
    }

    #[test]
    fn reheat_restores_full_energy_and_resumes() {
        let mut cache = test_cache(&[10.0, 40.0]);
        let mut simulation = Simulation::new();
        run_until_cool(&mut simulation, &mut cache);
        assert!(!simulation.is_running());

        simulation.reheat();
        simulation.reheat();
        assert_eq!(simulation.alpha(), 1.0);
        assert!(simulation.tick(&mut cache));
    }

    #[test]
    fn stop_halts_stepping_immediately() {
        let mut cache = test_cache(&[10.0, 40.0]);
        let mut simulation = Simulation::new();
        assert!(simulation.tick(&mut cache));

        simulation.stop();
        assert!(!simulation.is_running());
        assert!(!simulation.tick(&mut cache));
    }

    #[test]
    fn empty_chart_never_steps() {
        let mut cache = test_cache(&[]);
        let mut simulation = Simulation::new();
        assert!(!simulation.tick(&mut cache));
        assert!(simulation.is_running(), "alpha is untouched with no nodes");
    }

    #[test]
    fn single_bubble_drifts_toward_the_center() {
        let mut cache = test_cache(&[10.0]);
        let mut simulation = Simulation::new();

        let center = vec2(CHART_WIDTH * 0.5, CHART_HEIGHT * 0.5);
        let before = (cache.nodes[0].pos - center).length();
        run_until_cool(&mut simulation, &mut cache);
        let after = (cache.nodes[0].pos - center).length();

        assert!(after < before);
    }

    #[test]
    fn zero_size_bubbles_do_not_break_the_solver() {
        let mut cache = test_cache(&[0.0, 0.0, 10.0]);
        let mut simulation = Simulation::new();
        run_until_cool(&mut simulation, &mut cache);

        for node in &cache.nodes {
            assert!(node.pos.x.is_finite() && node.pos.y.is_finite());
        }
    }
}
