use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::format_years;

use super::super::render_utils::{
    blend_color, chart_surface_rect, chart_to_screen, dim_color, draw_surface, group_color,
    screen_to_chart,
};
use super::super::{ChartCache, SearchMatchCache, ViewModel};

const LABEL_COLOR: Color32 = Color32::from_gray(51);
const MATCH_RING_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    fn ensure_draw_order(cache: &mut ChartCache) {
        let scratch = &mut cache.view_scratch;
        if !scratch.draw_order_dirty && scratch.draw_order.len() == cache.nodes.len() {
            return;
        }

        scratch.draw_order.clear();
        scratch.draw_order.extend(0..cache.nodes.len());
        let nodes = &cache.nodes;
        // Large bubbles first so smaller ones stay visible on top while the
        // layout is still untangling.
        scratch
            .draw_order
            .sort_by(|a, b| nodes[*b].radius.total_cmp(&nodes[*a].radius));
        scratch.draw_order_dirty = false;
    }

    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let search_query = self.search.trim();
        if search_query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.chart_revision == self.chart_revision
            && cached.query == search_query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let cache = self.chart_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = cache
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let hit = fuzzy_match_score(&matcher, &node.label, search_query).is_some()
                    || fuzzy_match_score(&matcher, &node.id, search_query).is_some();
                hit.then_some(index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: search_query.to_owned(),
            chart_revision: self.chart_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        if self.chart_dirty {
            self.rebuild_chart();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let surface = chart_surface_rect(rect);
        draw_surface(&painter, surface);

        let search_matches = self.cached_search_matches();

        let Some(cache) = self.chart_cache.as_mut() else {
            painter.text(
                surface.center(),
                Align2::CENTER_CENTER,
                "no skills to chart",
                FontId::proportional(14.0),
                Color32::from_gray(120),
            );
            return;
        };

        let running = self.simulation.tick(cache);
        let dragging = Self::handle_bubble_drag(
            surface,
            &response,
            cache,
            &mut self.simulation,
            &mut self.drag_index,
        );
        if running || dragging {
            ui.ctx().request_repaint();
        }

        Self::ensure_draw_order(cache);

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer
            .filter(|position| surface.contains(*position))
            .and_then(|position| Self::bubble_at(cache, screen_to_chart(surface, position)));

        if hovered.is_some() || self.drag_index.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.drag_index.is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());

        for &index in &cache.view_scratch.draw_order {
            let node = &cache.nodes[index];
            let position = chart_to_screen(surface, node.pos);

            let is_held = hovered == Some(index) || self.drag_index == Some(index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = group_color(node.group);
            let fill = if is_held {
                blend_color(base_color, Color32::WHITE, 0.25)
            } else if search_active && !is_match {
                dim_color(base_color, 0.35)
            } else {
                base_color
            };

            if node.radius > 0.0 {
                painter.circle_filled(position, node.radius, fill);
                painter.circle_stroke(position, node.radius, Stroke::new(1.2, dim_color(fill, 0.6)));
                if is_match {
                    painter.circle_stroke(
                        position,
                        node.radius + 2.5,
                        Stroke::new(1.5, MATCH_RING_COLOR),
                    );
                }
            }

            painter.text(
                position,
                Align2::CENTER_CENTER,
                &node.label,
                FontId::proportional(14.0),
                LABEL_COLOR,
            );
        }

        if let Some(index) = self.drag_index.or(hovered)
            && let Some(node) = cache.nodes.get(index)
        {
            let readout = format!(
                "{}  |  group {}  |  {}",
                node.label.lines().next().unwrap_or_default(),
                node.group,
                format_years(node.size)
            );
            painter.text(
                surface.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                readout,
                FontId::proportional(13.0),
                Color32::from_gray(70),
            );
        }
    }
}
