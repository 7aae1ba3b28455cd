use eframe::egui::{Pos2, Rect, Vec2, vec2};

use super::super::physics::ACTIVE_ALPHA;
use super::super::render::NODE_RADIUS;
use super::super::render_utils::{circle_visible, world_to_screen};
use super::super::{DragState, TypeFilter, ViewModel};

/// Typed interaction commands; `apply_command` is the only consumer, so the
/// controller can be driven without a live input surface.
pub(in crate::app) enum Command {
    Select(String),
    ClearSelection,
    SetFilter(TypeFilter),
    ToggleLabels,
    DragStart { id: String },
    DragMove { at: Vec2 },
    DragEnd,
    ZoomIn,
    ZoomOut,
    ResetView,
}

impl ViewModel {
    pub(in crate::app) fn apply_command(&mut self, command: Command, now: f64) {
        match command {
            Command::Select(id) => {
                if self.scene.index_by_id.contains_key(&id) {
                    self.selected = Some(id);
                }
            }
            Command::ClearSelection => {
                self.selected = None;
            }
            Command::SetFilter(filter) => {
                self.filter = filter;
            }
            Command::ToggleLabels => {
                self.labels_visible = !self.labels_visible;
            }
            Command::DragStart { id } => {
                if let Some(&index) = self.scene.index_by_id.get(&id) {
                    let node = &mut self.scene.nodes[index];
                    node.pin = Some(node.pos);
                    self.drag = Some(DragState { node_index: index });
                    self.sim.set_alpha_target(ACTIVE_ALPHA);
                    self.sim.restart();
                }
            }
            Command::DragMove { at } => {
                if let Some(drag) = &self.drag {
                    let node = &mut self.scene.nodes[drag.node_index];
                    node.pin = Some(at);
                    node.pos = at;
                }
            }
            Command::DragEnd => {
                if let Some(drag) = self.drag.take() {
                    self.scene.nodes[drag.node_index].pin = None;
                    self.sim.set_alpha_target(0.0);
                }
            }
            Command::ZoomIn => {
                if let Some(rect) = self.canvas_rect {
                    self.viewport.zoom_in(rect.size(), now);
                }
            }
            Command::ZoomOut => {
                if let Some(rect) = self.canvas_rect {
                    self.viewport.zoom_out(rect.size(), now);
                }
            }
            Command::ResetView => {
                self.viewport.reset_view(now);
            }
        }
    }

    /// Tracks the canvas allocation; a size change recenters and reheats
    /// the layout.
    pub(in crate::app) fn sync_canvas(&mut self, rect: Rect) {
        let resized = self
            .canvas_rect
            .is_none_or(|previous| (previous.size() - rect.size()).length() > 0.5);
        self.canvas_rect = Some(rect);

        if resized {
            self.sim
                .recenter(vec2(rect.width() * 0.5, rect.height() * 0.5));
        }
    }

    /// Closest filter-visible node under the pointer, if any.
    pub(in crate::app) fn node_at(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        let radius = NODE_RADIUS * self.viewport.zoom();
        let mut best: Option<(usize, f32)> = None;

        for (index, node) in self.scene.nodes.iter().enumerate() {
            if !self.filter.matches(node.node_type) {
                continue;
            }

            let screen = world_to_screen(rect, &self.viewport, node.pos);
            if !circle_visible(rect, screen, radius) {
                continue;
            }

            let distance = screen.distance(pointer);
            if distance <= radius && best.is_none_or(|(_, closest)| distance < closest) {
                best = Some((index, distance));
            }
        }

        best.map(|(index, _)| index)
    }
}
