use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::short_path;

use super::super::ViewModel;
use super::super::render::{FrameParams, PainterAdapter, RenderAdapter, build_frame};
use super::super::render_utils::{draw_background, screen_to_world};
use super::Command;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);

        self.sync_canvas(rect);
        draw_background(&painter, rect, &self.viewport);

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let pointer = ui
                    .input(|input| input.pointer.hover_pos())
                    .unwrap_or_else(|| rect.center());
                let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
                self.viewport.gesture_zoom(factor, pointer - rect.left_top());
            }
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .and_then(|pointer| self.node_at(rect, pointer));

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(index) = self.node_at(rect, pointer)
        {
            let id = self.scene.nodes[index].id.clone();
            self.apply_command(Command::DragStart { id }, now);
        }

        if self.drag.is_some() {
            if response.dragged_by(egui::PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                let at = screen_to_world(rect, &self.viewport, pointer);
                self.apply_command(Command::DragMove { at }, now);
            }

            if response.drag_stopped_by(egui::PointerButton::Primary) {
                self.apply_command(Command::DragEnd, now);
            }
        } else if response.dragged() {
            self.viewport.gesture_pan(response.drag_delta());
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            match hovered {
                Some(index) => {
                    let id = self.scene.nodes[index].id.clone();
                    self.apply_command(Command::Select(id), now);
                }
                None => self.apply_command(Command::ClearSelection, now),
            }
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        // The simulation tick doubles as the animation clock.
        let view_animating = self.viewport.tick(now);
        let layout_ticked = self.sim.step(&mut self.scene);
        if view_animating || layout_ticked || response.dragged() {
            ui.ctx().request_repaint();
        }

        let selected_index = self
            .selected
            .as_ref()
            .and_then(|id| self.scene.index_by_id.get(id))
            .copied();
        let search_matches = self.search_matches();

        let frame = build_frame(
            &self.scene,
            &FrameParams {
                rect,
                viewport: &self.viewport,
                filter: self.filter,
                labels_visible: self.labels_visible,
                selected: selected_index,
                hovered,
                search_matches: &search_matches,
            },
        );
        self.visible_node_count = frame.nodes.len();
        self.visible_link_count = frame.links.len();

        PainterAdapter { painter: &painter }.sync(&frame);

        if let Some(index) = hovered
            && let Some(node) = self.graph.nodes.get(&self.scene.nodes[index].id)
        {
            let status = format!(
                "{}  |  {}  |  {}:{}-{}",
                node.name,
                node.node_type.label(),
                short_path(&node.file_path),
                node.line_range.0,
                node.line_range.1
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                status,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }

    /// Fuzzy name matches for the search box; highlight-only.
    fn search_matches(&self) -> HashSet<usize> {
        let query = self.search.trim();
        if query.is_empty() {
            return HashSet::new();
        }

        let matcher = SkimMatcherV2::default();
        self.scene
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                matcher.fuzzy_match(&node.name, query).map(|_score| index)
            })
            .collect()
    }
}
