use eframe::egui::{self, Color32, RichText, Ui};

use crate::codegraph::NodeType;

use super::super::graph::Command;
use super::super::render::node_fill;
use super::super::{TypeFilter, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);

        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search by symbol name")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Type to highlight matching nodes, then click one to select it.");

        ui.separator();

        ui.label("Node type filter");
        let mut pending_filter = None;
        egui::ComboBox::from_id_salt("node_type_filter")
            .selected_text(self.filter.label())
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(self.filter == TypeFilter::All, TypeFilter::All.label())
                    .clicked()
                {
                    pending_filter = Some(TypeFilter::All);
                }
                for node_type in NodeType::ALL {
                    let filter = TypeFilter::Only(node_type);
                    if ui
                        .selectable_label(self.filter == filter, node_type.label())
                        .clicked()
                    {
                        pending_filter = Some(filter);
                    }
                }
            });
        if let Some(filter) = pending_filter {
            self.apply_command(Command::SetFilter(filter), now);
        }

        ui.add_space(4.0);

        let mut labels_visible = self.labels_visible;
        if ui
            .checkbox(&mut labels_visible, "Show node labels")
            .on_hover_text("Draw symbol names next to visible nodes.")
            .changed()
        {
            self.apply_command(Command::ToggleLabels, now);
        }

        ui.separator();

        egui::CollapsingHeader::new("Legend")
            .default_open(true)
            .show(ui, |ui| {
                for node_type in NodeType::ALL {
                    ui.horizontal(|ui| {
                        let (rect, _) = ui
                            .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter()
                            .circle_filled(rect.center(), 5.0, node_fill(node_type));
                        ui.label(node_type.label());
                    });
                }
            });

        ui.add_space(8.0);
        ui.label(
            RichText::new("Drag a node to pin it under the cursor; release to let the layout settle. Drag empty space to pan, scroll to zoom.")
                .small()
                .color(Color32::from_gray(150)),
        );
    }
}
