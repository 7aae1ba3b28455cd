use eframe::egui::{self, RichText, Ui};

use crate::codegraph::{CodeGraph, LinkType};
use crate::util::escape_html;

use super::super::ViewModel;
use super::super::graph::Command;

#[derive(Debug, PartialEq, Eq)]
struct RelationshipRow {
    other_id: String,
    other_name: String,
    link_type: LinkType,
    outgoing: bool,
}

/// All relationships of `selected_id`, outgoing first, sorted by the other
/// endpoint's name. Unresolvable endpoints are omitted; self-loops show up
/// once per direction.
fn relationship_rows(graph: &CodeGraph, selected_id: &str) -> Vec<RelationshipRow> {
    let mut rows = Vec::new();

    for link in graph.links_of(selected_id) {
        if link.source == selected_id {
            rows.extend(make_row(graph, &link.target, link.link_type, true));
        }
        if link.target == selected_id {
            rows.extend(make_row(graph, &link.source, link.link_type, false));
        }
    }

    rows.sort_by(|a, b| {
        b.outgoing
            .cmp(&a.outgoing)
            .then_with(|| a.other_name.cmp(&b.other_name))
            .then_with(|| a.other_id.cmp(&b.other_id))
    });
    rows
}

fn make_row(
    graph: &CodeGraph,
    other_id: &str,
    link_type: LinkType,
    outgoing: bool,
) -> Option<RelationshipRow> {
    let other = graph.nodes.get(other_id)?;

    Some(RelationshipRow {
        other_id: other_id.to_owned(),
        other_name: other.name.clone(),
        link_type,
        outgoing,
    })
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);

        ui.heading("Node Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node in the graph to inspect it.");
            return;
        };

        let Some(node) = self.graph.nodes.get(&selected_id) else {
            ui.label("Selected node no longer exists in the loaded graph.");
            return;
        };

        let name = node.name.clone();
        let type_label = node.node_type.label();
        let file_path = node.file_path.clone();
        let (line_start, line_end) = node.line_range;
        let summary = node.summary.clone();
        let content = node.content.clone();
        let mut metadata = node
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Vec<_>>();
        metadata.sort_by(|a, b| a.0.cmp(&b.0));

        ui.horizontal(|ui| {
            ui.label(RichText::new(&name).strong().size(16.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    self.apply_command(Command::ClearSelection, now);
                }
            });
        });
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Type: {type_label}"));
        ui.label(format!("File: {file_path}"));
        ui.label(format!("Lines: {line_start}\u{2013}{line_end}"));

        if let Some(summary) = &summary {
            ui.add_space(4.0);
            ui.label(RichText::new("Summary").strong());
            ui.label(summary.as_str());
        }

        if !metadata.is_empty() {
            ui.add_space(4.0);
            ui.label(RichText::new("Metadata").strong());
            for (key, value) in &metadata {
                ui.label(format!("{key}: {value}"));
            }
        }

        if !content.is_empty() {
            ui.separator();
            ui.label(RichText::new("Source").strong());
            egui::ScrollArea::vertical()
                .id_salt("details_source_scroll")
                .max_height(220.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    ui.label(RichText::new(escape_html(&content)).monospace());
                });
        }

        ui.separator();
        ui.label(RichText::new("Relationships").strong());

        let rows = relationship_rows(&self.graph, &selected_id);
        if rows.is_empty() {
            ui.label("No links touch this node.");
            return;
        }

        let mut follow = None;
        let mut heading_shown = (false, false);

        egui::ScrollArea::vertical()
            .id_salt("details_relationships_scroll")
            .max_height(280.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for row in &rows {
                    if row.outgoing && !heading_shown.0 {
                        ui.small("Outgoing");
                        heading_shown.0 = true;
                    }
                    if !row.outgoing && !heading_shown.1 {
                        if heading_shown.0 {
                            ui.add_space(4.0);
                        }
                        ui.small("Incoming");
                        heading_shown.1 = true;
                    }

                    let arrow = if row.outgoing { "\u{2192}" } else { "\u{2190}" };
                    let label = format!(
                        "{arrow} {} ({})",
                        row.other_name,
                        row.link_type.label()
                    );
                    if ui.link(label).on_hover_text(row.other_id.as_str()).clicked() {
                        follow = Some(row.other_id.clone());
                    }
                }
            });

        if let Some(id) = follow {
            self.apply_command(Command::Select(id), now);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::codegraph::{CodeLink, CodeNode, NodeType};

    use super::*;

    fn node(id: &str, name: &str) -> CodeNode {
        CodeNode {
            id: id.to_owned(),
            name: name.to_owned(),
            node_type: NodeType::Function,
            file_path: format!("src/{id}.rs"),
            line_range: (1, 10),
            content: String::new(),
            summary: None,
            metadata: HashMap::new(),
        }
    }

    fn graph() -> CodeGraph {
        let mut nodes = HashMap::new();
        for (id, name) in [("a", "alpha"), ("b", "beta"), ("c", "gamma")] {
            nodes.insert(id.to_owned(), node(id, name));
        }

        let link = |source: &str, target: &str, link_type| CodeLink {
            source: source.to_owned(),
            target: target.to_owned(),
            link_type,
        };

        CodeGraph {
            nodes,
            links: vec![
                link("a", "b", LinkType::Calls),
                link("c", "a", LinkType::Imports),
                link("a", "c", LinkType::References),
            ],
        }
    }

    #[test]
    fn outgoing_rows_come_first_and_are_name_sorted() {
        let rows = relationship_rows(&graph(), "a");

        assert_eq!(rows.len(), 3);
        assert!(rows[0].outgoing && rows[0].other_id == "b");
        assert!(rows[1].outgoing && rows[1].other_id == "c");
        assert!(!rows[2].outgoing && rows[2].other_id == "c");
        assert_eq!(rows[2].link_type, LinkType::Imports);
    }

    #[test]
    fn rows_with_unresolvable_endpoints_are_omitted() {
        let mut graph = graph();
        graph.links.push(CodeLink {
            source: "a".to_owned(),
            target: "ghost".to_owned(),
            link_type: LinkType::Calls,
        });

        let rows = relationship_rows(&graph, "a");
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.other_id != "ghost"));
    }

    #[test]
    fn self_loop_appears_in_both_directions() {
        let mut graph = graph();
        graph.links.push(CodeLink {
            source: "b".to_owned(),
            target: "b".to_owned(),
            link_type: LinkType::References,
        });

        let rows = relationship_rows(&graph, "b");
        let loops = rows
            .iter()
            .filter(|row| row.other_id == "b")
            .collect::<Vec<_>>();
        assert_eq!(loops.len(), 2);
        assert!(loops.iter().any(|row| row.outgoing));
        assert!(loops.iter().any(|row| !row.outgoing));
    }
}
