use eframe::egui::Vec2;

pub(in crate::app) const MIN_ZOOM: f32 = 0.1;
pub(in crate::app) const MAX_ZOOM: f32 = 8.0;
const ZOOM_IN_FACTOR: f32 = 1.5;
const ZOOM_OUT_FACTOR: f32 = 0.75;
const ANIMATION_SECS: f64 = 0.75;

/// Pan/zoom transform for the whole scene:
/// `screen = canvas_origin + pan + world * zoom`.
pub(in crate::app) struct Viewport {
    pan: Vec2,
    zoom: f32,
    animation: Option<ViewAnimation>,
}

struct ViewAnimation {
    from_pan: Vec2,
    from_zoom: f32,
    to_pan: Vec2,
    to_zoom: f32,
    start: f64,
}

fn ease_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - ((-2.0 * t + 2.0).powi(3)) / 2.0
    }
}

impl Viewport {
    pub(in crate::app) fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            animation: None,
        }
    }

    pub(in crate::app) fn pan(&self) -> Vec2 {
        self.pan
    }

    pub(in crate::app) fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Chained zoom steps compound from here so rapid clicks do not lose
    /// steps.
    fn target(&self) -> (Vec2, f32) {
        match &self.animation {
            Some(animation) => (animation.to_pan, animation.to_zoom),
            None => (self.pan, self.zoom),
        }
    }

    fn animate_to(&mut self, to_pan: Vec2, to_zoom: f32, now: f64) {
        self.animation = Some(ViewAnimation {
            from_pan: self.pan,
            from_zoom: self.zoom,
            to_pan,
            to_zoom,
            start: now,
        });
    }

    /// Returns true while the transform is still changing.
    pub(in crate::app) fn tick(&mut self, now: f64) -> bool {
        let Some(animation) = &self.animation else {
            return false;
        };

        let t = ((now - animation.start) / ANIMATION_SECS) as f32;
        if t >= 1.0 {
            self.pan = animation.to_pan;
            self.zoom = animation.to_zoom;
            self.animation = None;
            return false;
        }

        let mix = ease_cubic(t.max(0.0));
        self.pan = animation.from_pan + (animation.to_pan - animation.from_pan) * mix;
        self.zoom = animation.from_zoom + (animation.to_zoom - animation.from_zoom) * mix;
        true
    }

    fn animate_zoom_step(&mut self, factor: f32, viewport_size: Vec2, now: f64) {
        let (base_pan, base_zoom) = self.target();
        let next_zoom = (base_zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Keep the world point under the viewport center fixed.
        let center = viewport_size * 0.5;
        let world_at_center = (center - base_pan) / base_zoom;
        let next_pan = center - world_at_center * next_zoom;

        self.animate_to(next_pan, next_zoom, now);
    }

    pub(in crate::app) fn zoom_in(&mut self, viewport_size: Vec2, now: f64) {
        self.animate_zoom_step(ZOOM_IN_FACTOR, viewport_size, now);
    }

    pub(in crate::app) fn zoom_out(&mut self, viewport_size: Vec2, now: f64) {
        self.animate_zoom_step(ZOOM_OUT_FACTOR, viewport_size, now);
    }

    pub(in crate::app) fn reset_view(&mut self, now: f64) {
        self.animate_to(Vec2::ZERO, 1.0, now);
    }

    /// `pointer` is relative to the canvas origin.
    pub(in crate::app) fn gesture_zoom(&mut self, factor: f32, pointer: Vec2) {
        self.animation = None;

        let world_before = (pointer - self.pan) / self.zoom;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - world_before * self.zoom;
    }

    pub(in crate::app) fn gesture_pan(&mut self, delta: Vec2) {
        self.animation = None;
        self.pan += delta;
    }
}
