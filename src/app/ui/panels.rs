use eframe::egui::{self, Align, Context, Layout};

use crate::codegraph::CodeGraph;

use super::super::graph::Command;
use super::super::physics::Simulation;
use super::super::viewport::Viewport;
use super::super::{Scene, TypeFilter, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(graph: CodeGraph) -> Self {
        let scene = Scene::from_graph(&graph);

        Self {
            graph,
            scene,
            sim: Simulation::new(),
            viewport: Viewport::new(),
            filter: TypeFilter::All,
            labels_visible: true,
            selected: None,
            drag: None,
            search: String::new(),
            canvas_rect: None,
            visible_node_count: 0,
            visible_link_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        graph_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        let now = ctx.input(|input| input.time);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("codegraph explorer");
                    ui.separator();
                    ui.label(format!("graph: {graph_path}"));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("links: {}", self.graph.link_count()));

                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible: {} nodes, {} links",
                            self.visible_node_count, self.visible_link_count
                        ));
                        if ui.button("Reset view").clicked() {
                            self.apply_command(Command::ResetView, now);
                        }
                        if ui.button("−").on_hover_text("Zoom out").clicked() {
                            self.apply_command(Command::ZoomOut, now);
                        }
                        if ui.button("+").on_hover_text("Zoom in").clicked() {
                            self.apply_command(Command::ZoomIn, now);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading code graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
