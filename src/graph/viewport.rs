//! Viewport - pan/zoom transform between screen space and model space
//!
//! `screen = model * zoom + pan`. Zoom is clamped to [`MIN_ZOOM`, `MAX_ZOOM`];
//! pan is unbounded.
//!
//! Mutated only by the interaction controller, read by the renderer.

use egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 3.0;

/// Zoom multiplier for one wheel notch towards the user (wheel up)
pub const ZOOM_IN_FACTOR: f32 = 1.1;
/// Zoom multiplier for one wheel notch away from the user (wheel down)
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

/// Pan offset and zoom scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // CURRENT VALUES
    // =========================================================================

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    // =========================================================================
    // CONTROLS
    // =========================================================================

    /// Set the pan offset (screen pixels)
    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Offset the pan by a screen-space delta
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Multiply zoom by `factor` and clamp. Returns true if zoom changed.
    ///
    /// Non-positive or non-finite factors are ignored.
    pub fn zoom_by(&mut self, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            tracing::debug!(factor, "ignoring invalid zoom factor");
            return false;
        }
        let old = self.zoom;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom != old
    }

    /// Apply one wheel event. Positive `delta_y` (wheel down) zooms out,
    /// negative zooms in, zero does nothing.
    pub fn apply_wheel(&mut self, delta_y: f32) -> bool {
        if delta_y > 0.0 {
            self.zoom_by(ZOOM_OUT_FACTOR)
        } else if delta_y < 0.0 {
            self.zoom_by(ZOOM_IN_FACTOR)
        } else {
            false
        }
    }

    /// Restore zoom 1, pan (0, 0)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // =========================================================================
    // COORDINATE TRANSFORMS
    // =========================================================================

    /// Screen position to model position
    pub fn screen_to_model(&self, screen_pos: Pos2) -> Pos2 {
        Pos2::new(
            (screen_pos.x - self.pan.x) / self.zoom,
            (screen_pos.y - self.pan.y) / self.zoom,
        )
    }

    /// Model position to screen position
    pub fn model_to_screen(&self, model_pos: Pos2) -> Pos2 {
        Pos2::new(
            model_pos.x * self.zoom + self.pan.x,
            model_pos.y * self.zoom + self.pan.y,
        )
    }

    /// Model-space rectangle visible on a surface of `screen_size`
    pub fn visible_model_rect(&self, screen_size: Vec2) -> Rect {
        Rect::from_min_max(
            self.screen_to_model(Pos2::ZERO),
            self.screen_to_model(screen_size.to_pos2()),
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_state() {
        let vp = Viewport::new();
        assert_eq!(vp.zoom(), 1.0);
        assert_eq!(vp.pan(), Vec2::ZERO);
        assert_eq!(vp.screen_to_model(Pos2::new(10.0, 20.0)), Pos2::new(10.0, 20.0));
    }

    #[test]
    fn test_screen_to_model() {
        let mut vp = Viewport::new();
        vp.set_pan(Vec2::new(100.0, 50.0));
        vp.zoom_by(2.0);
        assert_eq!(vp.screen_to_model(Pos2::new(300.0, 250.0)), Pos2::new(100.0, 100.0));
        assert_eq!(vp.model_to_screen(Pos2::new(100.0, 100.0)), Pos2::new(300.0, 250.0));
    }

    #[test]
    fn test_wheel_direction() {
        let mut vp = Viewport::new();
        assert!(vp.apply_wheel(1.0));
        assert!((vp.zoom() - 0.9).abs() < 1e-6);

        vp.reset();
        assert!(vp.apply_wheel(-1.0));
        assert!((vp.zoom() - 1.1).abs() < 1e-6);

        assert!(!vp.apply_wheel(0.0));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut vp = Viewport::new();
        for _ in 0..100 {
            vp.apply_wheel(1.0);
        }
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert!(!vp.apply_wheel(1.0));

        for _ in 0..100 {
            vp.apply_wheel(-1.0);
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_invalid_zoom_factor_ignored() {
        let mut vp = Viewport::new();
        assert!(!vp.zoom_by(0.0));
        assert!(!vp.zoom_by(-2.0));
        assert!(!vp.zoom_by(f32::NAN));
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut vp = Viewport::new();
        vp.pan_by(Vec2::new(-5000.0, 12000.0));
        vp.zoom_by(2.5);
        vp.reset();
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn test_visible_rect() {
        let mut vp = Viewport::new();
        vp.zoom_by(2.0);
        let rect = vp.visible_model_rect(Vec2::new(800.0, 600.0));
        assert_eq!(rect.size(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_only_clamped_zoom_is_reachable() {
        let mut vp = Viewport::new();
        vp.zoom_by(1.0e-30);
        assert_eq!(vp.zoom(), MIN_ZOOM);
        let model = vp.screen_to_model(Pos2::new(800.0, 600.0));
        assert!(model.x.is_finite() && model.y.is_finite());

        vp.zoom_by(1.0e30);
        assert_eq!(vp.zoom(), MAX_ZOOM);
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            px in -5000.0f32..5000.0,
            py in -5000.0f32..5000.0,
            pan_x in -5000.0f32..5000.0,
            pan_y in -5000.0f32..5000.0,
            zoom in MIN_ZOOM..MAX_ZOOM,
        ) {
            let mut vp = Viewport::new();
            vp.set_pan(Vec2::new(pan_x, pan_y));
            vp.zoom_by(zoom);

            let screen = Pos2::new(px, py);
            let back = vp.model_to_screen(vp.screen_to_model(screen));
            prop_assert!((back.x - screen.x).abs() < 1e-2, "{back:?} vs {screen:?}");
            prop_assert!((back.y - screen.y).abs() < 1e-2, "{back:?} vs {screen:?}");
        }

        #[test]
        fn prop_zoom_stays_in_range(wheel in proptest::collection::vec(-3.0f32..3.0, 0..200)) {
            let mut vp = Viewport::new();
            for delta in wheel {
                vp.apply_wheel(delta);
                prop_assert!(vp.zoom() >= MIN_ZOOM && vp.zoom() <= MAX_ZOOM);
            }
        }
    }
}
