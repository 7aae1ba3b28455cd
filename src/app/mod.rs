use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Rect, Vec2};

use crate::codegraph::{CodeGraph, LinkType, NodeType, load_code_graph};

mod graph;
mod physics;
mod render;
mod render_utils;
mod ui;
mod viewport;

use physics::Simulation;
use viewport::Viewport;

pub struct GraphExplorerApp {
    graph_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<CodeGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<CodeGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// One visualization session; rebuilt wholesale per successful load.
struct ViewModel {
    graph: CodeGraph,
    scene: Scene,
    sim: Simulation,
    viewport: Viewport,
    filter: TypeFilter,
    labels_visible: bool,
    selected: Option<String>,
    drag: Option<DragState>,
    search: String,
    canvas_rect: Option<Rect>,
    visible_node_count: usize,
    visible_link_count: usize,
}

/// Layout working set. Filtering never removes entries here, so physics
/// keep accounting for hidden nodes.
struct Scene {
    nodes: Vec<SceneNode>,
    links: Vec<SceneLink>,
    index_by_id: HashMap<String, usize>,
}

struct SceneNode {
    id: String,
    name: String,
    node_type: NodeType,
    pos: Vec2,
    vel: Vec2,
    pin: Option<Vec2>,
}

struct SceneLink {
    source: usize,
    target: usize,
    link_type: LinkType,
}

struct DragState {
    node_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypeFilter {
    All,
    Only(NodeType),
}

impl TypeFilter {
    fn matches(self, node_type: NodeType) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => node_type == only,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::All => "All types",
            Self::Only(node_type) => node_type.label(),
        }
    }
}

impl GraphExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, graph_path: String) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: String) -> Receiver<Result<CodeGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_code_graph(&graph_path).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for GraphExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading code graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load code graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Reload").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.graph_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
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
