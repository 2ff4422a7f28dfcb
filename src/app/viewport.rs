use eframe::egui::{Pos2, Rect, Vec2};

use super::physics::SIM_CENTER;

const ZOOM_WHEEL_RATE: f32 = 0.0018;
const ZOOM_STEP_CLAMP: (f32, f32) = (0.85, 1.15);
const ZOOM_RANGE: (f32, f32) = (0.05, 6.0);

/// Pan/zoom window over the shared node coordinate space. Orthogonal to the
/// simulation: nodes never see the viewport and the viewport never mutates
/// node positions.
pub(in crate::app) struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn world_to_screen(&self, rect: Rect, world: Pos2) -> Pos2 {
        rect.center() + self.pan + (world - SIM_CENTER.to_pos2()) * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Pos2 {
        SIM_CENTER.to_pos2() + (screen - rect.center() - self.pan) / self.zoom
    }

    /// Translate by a screen-space pointer delta. The equivalent world-space
    /// motion scales with the current zoom automatically.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Scale by a fixed factor per wheel step, re-anchored on the cursor so
    /// the world point under it stays put.
    pub fn zoom_at(&mut self, rect: Rect, pointer: Pos2, scroll: f32) {
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let world_before = self.screen_to_world(rect, pointer);
        let step = (1.0 + scroll * ZOOM_WHEEL_RATE).clamp(ZOOM_STEP_CLAMP.0, ZOOM_STEP_CLAMP.1);
        self.zoom = (self.zoom * step).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
        self.pan = pointer - rect.center() - (world_before - SIM_CENTER.to_pos2()) * self.zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn view_rect() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(1200.0, 800.0))
    }

    #[test]
    fn screen_and_world_transforms_invert() {
        let mut viewport = Viewport::default();
        viewport.pan = vec2(31.0, -12.0);
        viewport.zoom = 1.7;

        let world = pos2(420.0, 260.0);
        let round_trip = viewport.screen_to_world(view_rect(), viewport.world_to_screen(view_rect(), world));
        assert!((round_trip - world).length() < 0.001);
    }

    #[test]
    fn zoom_keeps_the_point_under_the_cursor_fixed() {
        let mut viewport = Viewport::default();
        let pointer = pos2(900.0, 150.0);

        let before = viewport.screen_to_world(view_rect(), pointer);
        viewport.zoom_at(view_rect(), pointer, 40.0);
        let after = viewport.screen_to_world(view_rect(), pointer);

        assert!(viewport.zoom > 1.0);
        assert!((after - before).length() < 0.01);
    }

    #[test]
    fn zoom_out_also_anchors_on_the_cursor() {
        let mut viewport = Viewport::default();
        viewport.zoom = 2.0;
        let pointer = pos2(200.0, 600.0);

        let before = viewport.screen_to_world(view_rect(), pointer);
        viewport.zoom_at(view_rect(), pointer, -40.0);
        let after = viewport.screen_to_world(view_rect(), pointer);

        assert!(viewport.zoom < 2.0);
        assert!((after - before).length() < 0.01);
    }

    #[test]
    fn pan_translates_the_window() {
        let mut viewport = Viewport::default();
        let world = pos2(500.0, 400.0);
        let before = viewport.world_to_screen(view_rect(), world);

        viewport.pan_by(vec2(25.0, -40.0));
        let after = viewport.world_to_screen(view_rect(), world);

        assert!((after - (before + vec2(25.0, -40.0))).length() < 0.001);
    }

    #[test]
    fn zoom_respects_its_range() {
        let mut viewport = Viewport::default();
        for _ in 0..200 {
            viewport.zoom_at(view_rect(), pos2(600.0, 400.0), 1000.0);
        }
        assert!(viewport.zoom <= ZOOM_RANGE.1);
        for _ in 0..400 {
            viewport.zoom_at(view_rect(), pos2(600.0, 400.0), -1000.0);
        }
        assert!(viewport.zoom >= ZOOM_RANGE.0);
    }
}
