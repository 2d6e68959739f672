use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::data::{SkillDataset, load_dataset};

mod chart;
mod render_utils;
mod sim;
mod ui;

pub(crate) const CHART_WIDTH: f32 = 600.0;
pub(crate) const CHART_HEIGHT: f32 = 500.0;

pub struct BubbleChartApp {
    data_path: Option<String>,
    state: AppState,
    reload_rx: Option<Receiver<Result<SkillDataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<SkillDataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: SkillDataset,
    search: String,
    chart_dirty: bool,
    chart_revision: u64,
    chart_cache: Option<ChartCache>,
    search_match_cache: Option<SearchMatchCache>,
    simulation: sim::Simulation,
    drag_index: Option<usize>,
}

struct SearchMatchCache {
    query: String,
    chart_revision: u64,
    matches: Arc<HashSet<usize>>,
}

struct ChartCache {
    nodes: Vec<BubbleNode>,
    sim_scratch: SimScratch,
    view_scratch: ViewScratch,
}

impl ChartCache {
    fn new(nodes: Vec<BubbleNode>) -> Self {
        Self {
            nodes,
            sim_scratch: SimScratch::default(),
            view_scratch: ViewScratch {
                draw_order: Vec::new(),
                draw_order_dirty: true,
            },
        }
    }
}

#[derive(Default)]
struct SimScratch {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    radii: Vec<f32>,
    charges: Vec<f32>,
}

struct ViewScratch {
    draw_order: Vec<usize>,
    draw_order_dirty: bool,
}

struct BubbleNode {
    id: String,
    label: String,
    group: u32,
    size: f32,
    radius: f32,
    pos: Vec2,
    velocity: Vec2,
}

impl BubbleChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: Option<String>) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: Option<String>) -> Receiver<Result<SkillDataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(data_path.as_deref()).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: Option<String>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }
}

impl eframe::App for BubbleChartApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(dataset) => AppState::Ready(Box::new(ViewModel::new(dataset))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading skills dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load skills dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        // A reload keeps the live model: the chart rebind below
                        // reuses nodes by id, so surviving bubbles hold their
                        // positions instead of rescattering.
                        Ok(Ok(dataset)) => model.replace_dataset(dataset),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
