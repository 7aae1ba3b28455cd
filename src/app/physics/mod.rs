mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::Scene;

/// Geometric decay per step toward the alpha target (rest from a cold
/// start in roughly 300 ticks).
const ALPHA_DECAY: f32 = 0.022_755;
const ALPHA_MIN: f32 = 0.001;
/// Fraction of velocity retained after each integration step.
const VELOCITY_RETAIN: f32 = 0.6;

/// Alpha target used while an interaction needs the layout kept active.
pub(in crate::app) const ACTIVE_ALPHA: f32 = 0.3;

pub(super) const LINK_DISTANCE: f32 = 100.0;
pub(super) const CHARGE_STRENGTH: f32 = -300.0;
pub(super) const CENTER_STRENGTH: f32 = 0.05;

/// Stepped force integrator; the caller must redraw after every live tick.
pub(in crate::app) struct Simulation {
    alpha: f32,
    alpha_target: f32,
    center: Vec2,
    running: bool,
}

impl Simulation {
    pub(in crate::app) fn new() -> Self {
        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            center: Vec2::ZERO,
            running: true,
        }
    }

    #[cfg(test)]
    pub(in crate::app) fn center(&self) -> Vec2 {
        self.center
    }

    pub(in crate::app) fn recenter(&mut self, center: Vec2) {
        self.center = center;
        self.alpha = self.alpha.max(ACTIVE_ALPHA);
        self.running = true;
    }

    /// Target 0 settles the layout; `ACTIVE_ALPHA` keeps it hot.
    pub(in crate::app) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
    }

    pub(in crate::app) fn restart(&mut self) {
        self.running = true;
    }

    #[cfg(test)]
    pub(in crate::app) fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    #[cfg(test)]
    pub(in crate::app) fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    /// Returns false once at rest. Pinned nodes snap to their pin after
    /// integration, so a held pin always wins over the forces.
    pub(in crate::app) fn step(&mut self, scene: &mut Scene) -> bool {
        if !self.running || scene.nodes.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
        if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
            self.running = false;
            return false;
        }

        forces::apply_link_springs(scene, self.alpha);
        forces::apply_many_body(scene, self.alpha);
        forces::apply_centering(scene, self.center, self.alpha);

        for node in &mut scene.nodes {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.vel = Vec2::ZERO;
            } else {
                node.vel *= VELOCITY_RETAIN;
                node.pos += node.vel;
            }
        }

        true
    }
}
