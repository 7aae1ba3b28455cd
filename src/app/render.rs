use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, vec2};

use crate::codegraph::{LinkType, NodeType};

use super::render_utils::{circle_visible, segment_visible, world_to_screen};
use super::viewport::Viewport;
use super::{Scene, TypeFilter};

pub(super) const NODE_RADIUS: f32 = 8.0;

pub(super) fn node_fill(node_type: NodeType) -> Color32 {
    match node_type {
        NodeType::Function | NodeType::Method => Color32::from_rgb(0xff, 0x7f, 0x0e),
        NodeType::Class => Color32::from_rgb(0x2c, 0xa0, 0x2c),
        NodeType::Interface => Color32::from_rgb(0xd6, 0x27, 0x28),
        NodeType::Module => Color32::from_rgb(0x94, 0x67, 0xbd),
        NodeType::Variable => Color32::from_rgb(0x8c, 0x56, 0x4b),
        NodeType::Constant => Color32::from_rgb(0xe3, 0x77, 0xc2),
        NodeType::TypeDefinition => Color32::from_rgb(0x7f, 0x7f, 0x7f),
        NodeType::Unknown => Color32::from_rgb(0x1f, 0x77, 0xb4),
    }
}

pub(super) fn link_style(link_type: LinkType) -> (Color32, f32) {
    match link_type {
        LinkType::Calls => (Color32::from_rgb(0xff, 0x00, 0x00), 2.0),
        LinkType::Imports => (Color32::from_rgb(0x00, 0xff, 0x00), 3.0),
        LinkType::Inherits => (Color32::from_rgb(0x00, 0x00, 0xff), 2.5),
        LinkType::References => (Color32::from_rgb(0x99, 0x99, 0x99), 1.0),
        LinkType::Implements => (Color32::from_rgb(0x99, 0x32, 0xcc), 1.0),
        LinkType::Contains => (Color32::from_rgb(0xff, 0xa5, 0x00), 1.0),
        LinkType::DependsOn => (Color32::from_rgb(0x8b, 0x45, 0x13), 1.0),
        LinkType::Unknown => (Color32::from_rgb(0x99, 0x99, 0x99), 1.0),
    }
}

pub(super) struct NodeSprite {
    pub(super) pos: Pos2,
    pub(super) radius: f32,
    pub(super) fill: Color32,
    pub(super) outline: Stroke,
    pub(super) label: Option<String>,
}

pub(super) struct LinkSprite {
    pub(super) start: Pos2,
    pub(super) end: Pos2,
    pub(super) stroke: Stroke,
}

/// One resolved frame: screen-space sprites, visibility applied, links
/// drawn before nodes.
pub(super) struct SceneFrame {
    pub(super) links: Vec<LinkSprite>,
    pub(super) nodes: Vec<NodeSprite>,
}

/// The one seam between state logic and a drawing surface.
pub(super) trait RenderAdapter {
    fn sync(&mut self, frame: &SceneFrame);
}

pub(super) struct PainterAdapter<'a> {
    pub(super) painter: &'a Painter,
}

impl RenderAdapter for PainterAdapter<'_> {
    fn sync(&mut self, frame: &SceneFrame) {
        for link in &frame.links {
            self.painter.line_segment([link.start, link.end], link.stroke);
        }

        for node in &frame.nodes {
            self.painter.circle_filled(node.pos, node.radius, node.fill);
            if node.outline.width > 0.0 {
                self.painter.circle_stroke(node.pos, node.radius, node.outline);
            }

            if let Some(label) = &node.label {
                self.painter.text(
                    node.pos + vec2(node.radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    label,
                    FontId::proportional(node.radius * 1.5),
                    Color32::from_gray(238),
                );
            }
        }
    }
}

pub(super) struct FrameParams<'a> {
    pub(super) rect: Rect,
    pub(super) viewport: &'a Viewport,
    pub(super) filter: TypeFilter,
    pub(super) labels_visible: bool,
    pub(super) selected: Option<usize>,
    pub(super) hovered: Option<usize>,
    pub(super) search_matches: &'a HashSet<usize>,
}

pub(super) fn build_frame(scene: &Scene, params: &FrameParams) -> SceneFrame {
    let zoom = params.viewport.zoom();
    let radius = NODE_RADIUS * zoom;

    let screen_positions = scene
        .nodes
        .iter()
        .map(|node| world_to_screen(params.rect, params.viewport, node.pos))
        .collect::<Vec<_>>();
    let filter_visible = scene
        .nodes
        .iter()
        .map(|node| params.filter.matches(node.node_type))
        .collect::<Vec<_>>();

    let mut links = Vec::new();
    for link in &scene.links {
        // A link shows only while both of its endpoints do.
        if !filter_visible[link.source] || !filter_visible[link.target] {
            continue;
        }

        let start = screen_positions[link.source];
        let end = screen_positions[link.target];
        if !segment_visible(params.rect, start, end, radius) {
            continue;
        }

        let (color, width) = link_style(link.link_type);
        links.push(LinkSprite {
            start,
            end,
            stroke: Stroke::new(width * zoom, color),
        });
    }

    let mut nodes = Vec::new();
    for (index, node) in scene.nodes.iter().enumerate() {
        if !filter_visible[index] {
            continue;
        }

        let pos = screen_positions[index];
        if !circle_visible(params.rect, pos, radius) {
            continue;
        }

        let outline = if params.selected == Some(index) {
            Stroke::new(2.2 * zoom.max(0.5), Color32::from_rgb(245, 206, 93))
        } else if params.hovered == Some(index) {
            Stroke::new(1.8 * zoom.max(0.5), Color32::from_rgb(255, 164, 101))
        } else if params.search_matches.contains(&index) {
            Stroke::new(1.8 * zoom.max(0.5), Color32::from_rgb(103, 196, 255))
        } else {
            Stroke::new(1.0 * zoom.max(0.5), Color32::from_rgba_unmultiplied(15, 15, 15, 190))
        };

        nodes.push(NodeSprite {
            pos,
            radius,
            fill: node_fill(node.node_type),
            outline,
            label: params
                .labels_visible
                .then(|| node.name.clone()),
        });
    }

    SceneFrame { links, nodes }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::super::Scene;
    use super::*;
    use crate::codegraph::{CodeGraph, CodeLink, CodeNode};

    fn sample_graph() -> CodeGraph {
        let mut graph = CodeGraph::default();
        for (id, node_type) in [
            ("a", NodeType::Class),
            ("b", NodeType::Function),
            ("c", NodeType::Class),
        ] {
            graph.nodes.insert(
                id.to_owned(),
                CodeNode {
                    id: id.to_owned(),
                    name: id.to_uppercase(),
                    node_type,
                    file_path: String::new(),
                    line_range: (1, 1),
                    content: String::new(),
                    summary: None,
                    metadata: Default::default(),
                },
            );
        }
        for target in ["b", "c"] {
            graph.links.push(CodeLink {
                source: "a".to_owned(),
                target: target.to_owned(),
                link_type: LinkType::Contains,
            });
        }
        graph
    }

    // Pans world (0,0), where the seeded scene clusters, to the middle of
    // the test rect so nothing is culled off the left/top edge.
    fn centered_viewport() -> Viewport {
        let mut viewport = Viewport::new();
        viewport.gesture_pan(eframe::egui::vec2(10_000.0, 10_000.0));
        viewport
    }

    fn params<'a>(
        viewport: &'a Viewport,
        filter: TypeFilter,
        search_matches: &'a HashSet<usize>,
    ) -> FrameParams<'a> {
        FrameParams {
            rect: Rect::from_min_max(pos2(-10_000.0, -10_000.0), pos2(10_000.0, 10_000.0)),
            viewport,
            filter,
            labels_visible: true,
            selected: None,
            hovered: None,
            search_matches,
        }
    }

    #[test]
    fn type_filter_hides_nodes_and_links_with_hidden_endpoints() {
        let scene = Scene::from_graph(&sample_graph());
        let viewport = centered_viewport();
        let no_matches = HashSet::new();

        let frame = build_frame(
            &scene,
            &params(&viewport, TypeFilter::Only(NodeType::Class), &no_matches),
        );

        let labels = frame
            .nodes
            .iter()
            .filter_map(|node| node.label.clone())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["A".to_owned(), "C".to_owned()]);
        // A->C survives, A->B does not.
        assert_eq!(frame.links.len(), 1);
    }

    #[test]
    fn clearing_the_filter_restores_full_visibility() {
        let scene = Scene::from_graph(&sample_graph());
        let viewport = centered_viewport();
        let no_matches = HashSet::new();

        let frame = build_frame(&scene, &params(&viewport, TypeFilter::All, &no_matches));
        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.links.len(), 2);
    }

    #[test]
    fn label_visibility_follows_the_toggle() {
        let scene = Scene::from_graph(&sample_graph());
        let viewport = centered_viewport();
        let no_matches = HashSet::new();

        let mut frame_params = params(&viewport, TypeFilter::All, &no_matches);
        frame_params.labels_visible = false;

        let frame = build_frame(&scene, &frame_params);
        assert!(frame.nodes.iter().all(|node| node.label.is_none()));
    }

    #[test]
    fn sprites_scale_uniformly_with_the_viewport() {
        let scene = Scene::from_graph(&sample_graph());
        let mut viewport = centered_viewport();
        viewport.gesture_zoom(2.0, eframe::egui::vec2(10_000.0, 10_000.0));
        let no_matches = HashSet::new();

        let frame = build_frame(&scene, &params(&viewport, TypeFilter::All, &no_matches));
        assert!(frame.nodes.iter().all(|node| node.radius == NODE_RADIUS * 2.0));
        let (_, contains_width) = link_style(LinkType::Contains);
        assert!(frame.links.iter().all(|link| link.stroke.width == contains_width * 2.0));
    }

    #[test]
    fn every_type_tag_has_a_color_entry() {
        for node_type in NodeType::ALL {
            // The table is exhaustive by construction; pin the fallback.
            let _ = node_fill(node_type);
        }
        assert_eq!(node_fill(NodeType::Unknown), Color32::from_rgb(0x1f, 0x77, 0xb4));
        assert_eq!(
            link_style(LinkType::Unknown),
            (Color32::from_rgb(0x99, 0x99, 0x99), 1.0)
        );
    }
}
