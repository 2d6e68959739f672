use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::super::{BubbleNode, ChartCache, ViewModel};

pub(in crate::app) const MAX_RADIUS: f32 = 60.0;
const SEED_SPAN: f32 = 200.0;

/// Square-root scale from raw size to pixel radius, so circle area stays
/// linear in size. Domain [0, max_size] maps onto [0, MAX_RADIUS].
pub(in crate::app) fn bubble_radius(size: f32, max_size: f32) -> f32 {
    if max_size <= 0.0 || size <= 0.0 {
        return 0.0;
    }

    MAX_RADIUS * (size / max_size).sqrt()
}

/// Seed position inside the small corner region the layout unfolds from.
/// Hashing the id instead of rolling dice keeps rebinds reproducible.
pub(in crate::app) fn seed_position(id: &str) -> Vec2 {
    let (jx, jy) = stable_pair(id);
    vec2((jx * 0.5 + 0.5) * SEED_SPAN, (jy * 0.5 + 0.5) * SEED_SPAN)
}

impl ViewModel {
    /// Rebinds dataset records to bubbles, keyed by id: records whose id was
    /// already bound keep their node (and with it position and motion), new
    /// ids get freshly seeded nodes, and ids gone from the dataset drop out.
    /// Radii are recomputed wholesale since the scale depends on the dataset
    /// maximum.
    pub(in crate::app) fn rebuild_chart(&mut self) {
        self.chart_revision = self.chart_revision.wrapping_add(1);
        self.search_match_cache = None;

        if self.dataset.records.is_empty() {
            self.chart_cache = None;
            self.simulation.stop();
            self.chart_dirty = false;
            return;
        }

        let max_size = self.dataset.max_size();

        let mut prior_nodes = self
            .chart_cache
            .take()
            .map(|cache| {
                cache
                    .nodes
                    .into_iter()
                    .map(|node| (node.id.clone(), node))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        let nodes = self
            .dataset
            .records
            .iter()
            .map(|record| {
                let radius = bubble_radius(record.size, max_size);
                if let Some(mut node) = prior_nodes.remove(&record.id) {
                    node.label = record.label.clone();
                    node.group = record.group;
                    node.size = record.size;
                    node.radius = radius;
                    node
                } else {
                    BubbleNode {
                        id: record.id.clone(),
                        label: record.label.clone(),
                        group: record.group,
                        size: record.size,
                        radius,
                        pos: seed_position(&record.id),
                        velocity: Vec2::ZERO,
                    }
                }
            })
            .collect::<Vec<_>>();

        self.chart_cache = Some(ChartCache::new(nodes));
        self.simulation.reheat();
        self.chart_dirty = false;
    }
}
