use eframe::egui::{self, Align, Context, Layout};

use crate::data::SkillDataset;

use super::{ViewModel, sim};

impl ViewModel {
    pub(super) fn new(dataset: SkillDataset) -> Self {
        Self {
            dataset,
            search: String::new(),
            chart_dirty: true,
            chart_revision: 0,
            chart_cache: None,
            search_match_cache: None,
            simulation: sim::Simulation::new(),
            drag_index: None,
        }
    }

    /// Swaps in a freshly loaded dataset; the next frame rebinds bubbles to
    /// records by id.
    pub(super) fn replace_dataset(&mut self, dataset: SkillDataset) {
        self.dataset = dataset;
        self.chart_dirty = true;
        self.drag_index = None;
    }

    fn layout_status_text(&self) -> String {
        if self.simulation.is_running() {
            format!("layout: relaxing (alpha {:.2})", self.simulation.alpha())
        } else {
            "layout: settled".to_owned()
        }
    }

    pub(super) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.chart_dirty {
            self.rebuild_chart();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("tech bubbles");
                    ui.separator();
                    ui.label(format!("data: {}", self.dataset.source.describe()));
                    ui.label(format!("skills: {}", self.dataset.record_count()));
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.label("find:");
                    ui.add(egui::TextEdit::singleline(&mut self.search).desired_width(120.0));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.layout_status_text());
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading skills dataset...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_chart(ui);
            }
        });
    }
}
