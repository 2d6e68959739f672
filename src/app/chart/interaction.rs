use eframe::egui::{self, Rect, Vec2};

use super::super::render_utils::screen_to_chart;
use super::super::sim::Simulation;
use super::super::{ChartCache, ViewModel};

impl ViewModel {
    /// Bubble whose circle contains the chart-space point, preferring the one
    /// whose center is closest when circles transiently overlap.
    pub(in crate::app) fn bubble_at(cache: &ChartCache, point: Vec2) -> Option<usize> {
        cache
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = (node.pos - point).length();
                (distance <= node.radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _distance)| index)
    }

    /// Press picks the bubble under the pointer, every drag movement pins it
    /// to the pointer, release leaves it where it was dropped. Returns whether
    /// a bubble followed the pointer this frame.
    pub(in crate::app) fn handle_bubble_drag(
        surface: Rect,
        response: &egui::Response,
        cache: &mut ChartCache,
        simulation: &mut Simulation,
        drag_index: &mut Option<usize>,
    ) -> bool {
        if response.drag_started_by(egui::PointerButton::Primary) {
            *drag_index = response
                .interact_pointer_pos()
                .and_then(|pointer| Self::bubble_at(cache, screen_to_chart(surface, pointer)));
        }

        if response.drag_stopped() {
            *drag_index = None;
            return false;
        }

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(index) = *drag_index
            && let Some(pointer) = response.interact_pointer_pos()
        {
            Self::apply_drag(cache, simulation, index, screen_to_chart(surface, pointer));
            return true;
        }

        false
    }

    /// Moves a bubble to the target and restores full layout energy so the
    /// neighborhood relaxes around the new position.
    pub(in crate::app) fn apply_drag(
        cache: &mut ChartCache,
        simulation: &mut Simulation,
        index: usize,
        target: Vec2,
    ) {
        let Some(node) = cache.nodes.get_mut(index) else {
            return;
        };

        node.pos = target;
        simulation.reheat();
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::data::{DatasetSource, SkillDataset, SkillRecord};

    fn model_with_sizes(sizes: &[f32]) -> ViewModel {
        let records = sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| SkillRecord {
                id: format!("skill-{index}"),
                label: format!("skill-{index}"),
                group: 1,
                size,
            })
            .collect();
        let mut model = ViewModel::new(SkillDataset {
            source: DatasetSource::BuiltIn,
            records,
        });
        model.rebuild_chart();
        model
    }

    #[test]
    fn drag_sets_the_position_immediately_and_reheats() {
        let mut model = model_with_sizes(&[10.0, 40.0]);
        {
            let cache = model.chart_cache.as_mut().unwrap();
            while model.simulation.tick(cache) {}
        }
        assert!(!model.simulation.is_running());

        let target = vec2(77.0, 88.0);
        let cache = model.chart_cache.as_mut().unwrap();
        ViewModel::apply_drag(cache, &mut model.simulation, 0, target);

        assert_eq!(cache.nodes[0].pos, target);
        assert_eq!(model.simulation.alpha(), 1.0);
        assert!(model.simulation.is_running());
    }

    #[test]
    fn dragging_one_bubble_resumes_motion_of_its_neighbors() {
        let mut model = model_with_sizes(&[10.0, 40.0, 25.0]);
        {
            let cache = model.chart_cache.as_mut().unwrap();
            while model.simulation.tick(cache) {}
        }

        let cache = model.chart_cache.as_mut().unwrap();
        let neighbor_before = cache.nodes[1].pos;
        // Drop the dragged bubble on top of a neighbor and let one tick run.
        ViewModel::apply_drag(cache, &mut model.simulation, 0, neighbor_before);
        assert!(model.simulation.tick(cache));
        assert_ne!(cache.nodes[1].pos, neighbor_before);
    }

    #[test]
    fn drag_out_of_range_index_is_ignored() {
        let mut model = model_with_sizes(&[10.0]);
        let cache = model.chart_cache.as_mut().unwrap();
        let held = cache.nodes[0].pos;
        ViewModel::apply_drag(cache, &mut model.simulation, 9, vec2(1.0, 1.0));
        assert_eq!(cache.nodes[0].pos, held);
    }

    #[test]
    fn bubble_at_hits_the_circle_interior_only() {
        let mut model = model_with_sizes(&[10.0, 40.0]);
        let cache = model.chart_cache.as_mut().unwrap();
        cache.nodes[0].pos = vec2(100.0, 100.0);
        cache.nodes[1].pos = vec2(400.0, 400.0);

        let small_radius = cache.nodes[0].radius;
        assert_eq!(ViewModel::bubble_at(cache, vec2(100.0, 100.0)), Some(0));
        assert_eq!(
            ViewModel::bubble_at(cache, vec2(100.0 + small_radius + 1.0, 100.0)),
            None
        );
        assert_eq!(ViewModel::bubble_at(cache, vec2(395.0, 405.0)), Some(1));
        assert_eq!(ViewModel::bubble_at(cache, vec2(250.0, 250.0)), None);
    }

    #[test]
    fn overlapping_bubbles_resolve_to_the_nearer_center() {
        let mut model = model_with_sizes(&[40.0, 40.0]);
        let cache = model.chart_cache.as_mut().unwrap();
        cache.nodes[0].pos = vec2(200.0, 200.0);
        cache.nodes[1].pos = vec2(230.0, 200.0);

        assert_eq!(ViewModel::bubble_at(cache, vec2(205.0, 200.0)), Some(0));
        assert_eq!(ViewModel::bubble_at(cache, vec2(225.0, 200.0)), Some(1));
    }
}
