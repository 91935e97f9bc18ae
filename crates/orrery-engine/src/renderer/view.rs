use glam::Vec2;

use crate::input::queue::InputEvent;

/// Pan/zoom tuning for the 2D viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Smallest allowed zoom scale.
    pub zoom_min: f32,
    /// Largest allowed zoom scale.
    pub zoom_max: f32,
    /// Scale change per unit of wheel `delta_y`.
    pub zoom_speed: f32,
    /// Divide label font size and stroke widths by the zoom scale so they stay
    /// the same on-screen size at every zoom level.
    pub compensate_zoom: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.1,
            zoom_max: 5.0,
            zoom_speed: 0.001,
            compensate_zoom: false,
        }
    }
}

impl ViewConfig {
    /// Bounds usable for clamping: positive, finite and ordered. Bad bounds
    /// fall back to the defaults, and swapped ones are put back in order.
    pub fn normalized(self) -> Self {
        let defaults = ViewConfig::default();
        let usable = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        let min = usable(self.zoom_min, defaults.zoom_min);
        let max = usable(self.zoom_max, defaults.zoom_max);
        Self {
            zoom_min: min.min(max),
            zoom_max: min.max(max),
            ..self
        }
    }
}

/// Size of the drawing surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }
}

/// Pointer drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Button held; `last` is the previous pointer position.
    Dragging { last: Vec2 },
}

/// Pan/zoom bookkeeping for the camera-less 2D viewport.
///
/// The draw step applies `translate(surface center + offset)` and then
/// `scale(scale)` to the whole scene, once per frame.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Zoom scale, always within `[config.zoom_min, config.zoom_max]`.
    pub scale: f32,
    /// Pan offset in screen pixels.
    pub offset: Vec2,
    pub drag: DragState,
    config: ViewConfig,
}

impl ViewState {
    pub fn new(config: ViewConfig) -> Self {
        let config = config.normalized();
        Self {
            scale: 1.0_f32.clamp(config.zoom_min, config.zoom_max),
            offset: Vec2::ZERO,
            drag: DragState::Idle,
            config,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Apply one input event. Resize events update `surface`.
    pub fn handle(&mut self, event: &InputEvent, surface: &mut Surface) {
        match *event {
            InputEvent::Wheel { delta_y } => self.wheel(delta_y),
            InputEvent::PointerDown { x, y } => self.pointer_down(Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => self.pointer_move(Vec2::new(x, y)),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Resize { width, height } => {
                surface.resize(width, height);
                log::debug!("surface resized to {}x{}", surface.width, surface.height);
            }
        }
    }

    /// Zoom by a wheel delta, then clamp.
    pub fn wheel(&mut self, delta_y: f32) {
        let scale = self.scale - delta_y * self.config.zoom_speed;
        // NaN deltas would poison every later frame
        if scale.is_nan() {
            return;
        }
        self.scale = scale.clamp(self.config.zoom_min, self.config.zoom_max);
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.drag = DragState::Dragging { last: pos };
    }

    /// Pan by the pointer delta while dragging; ignored when idle.
    pub fn pointer_move(&mut self, pos: Vec2) {
        if let DragState::Dragging { last } = self.drag {
            self.offset += pos - last;
            self.drag = DragState::Dragging { last: pos };
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Screen position of the world origin.
    pub fn origin(&self, surface: &Surface) -> Vec2 {
        surface.center() + self.offset
    }

    pub fn world_to_screen(&self, world: Vec2, surface: &Surface) -> Vec2 {
        self.origin(surface) + world * self.scale
    }

    pub fn screen_to_world(&self, screen: Vec2, surface: &Surface) -> Vec2 {
        (screen - self.origin(surface)) / self.scale
    }

    /// Factor applied to font sizes, stroke widths and label gaps.
    pub fn stroke_factor(&self) -> f32 {
        if self.config.compensate_zoom {
            1.0 / self.scale
        } else {
            1.0
        }
    }

}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_zooms_in_and_out() {
        let mut view = ViewState::default();
        view.wheel(-100.0);
        assert!((view.scale - 1.1).abs() < 1e-6);
        view.wheel(200.0);
        assert!((view.scale - 0.9).abs() < 1e-6);
    }

    #[test]
    fn wheel_clamps_to_max_exactly() {
        let mut view = ViewState::default();
        for _ in 0..5 {
            view.wheel(-5000.0);
            assert!(view.scale <= 5.0);
        }
        assert_eq!(view.scale, 5.0);
    }

    #[test]
    fn wheel_clamps_to_min_exactly() {
        let mut view = ViewState::default();
        for _ in 0..5 {
            view.wheel(5000.0);
            assert!(view.scale >= 0.1);
        }
        assert_eq!(view.scale, 0.1);
    }

    #[test]
    fn scale_stays_in_range_for_mixed_wheel_input() {
        let mut view = ViewState::default();
        let deltas = [-3.0, 9000.0, -1e9, 42.0, 1e12, -0.5, f32::INFINITY, f32::NEG_INFINITY, f32::NAN];
        for d in deltas {
            view.wheel(d);
            assert!((0.1..=5.0).contains(&view.scale), "scale {} after {}", view.scale, d);
        }
    }

    #[test]
    fn swapped_zoom_bounds_are_reordered() {
        let mut view = ViewState::new(ViewConfig {
            zoom_min: 5.0,
            zoom_max: 0.1,
            ..ViewConfig::default()
        });
        assert_eq!(view.config().zoom_min, 0.1);
        assert_eq!(view.config().zoom_max, 5.0);
        view.wheel(-5000.0);
        assert_eq!(view.scale, 5.0);
    }

    #[test]
    fn unusable_zoom_bounds_fall_back_to_defaults() {
        let mut view = ViewState::new(ViewConfig {
            zoom_min: f32::NAN,
            zoom_max: -2.0,
            ..ViewConfig::default()
        });
        assert_eq!(view.config().zoom_min, 0.1);
        assert_eq!(view.config().zoom_max, 5.0);
        view.wheel(5000.0);
        assert_eq!(view.scale, 0.1);
    }

    #[test]
    fn drag_accumulates_net_delta() {
        let mut view = ViewState::default();
        view.pointer_down(Vec2::new(100.0, 100.0));
        view.pointer_move(Vec2::new(110.0, 95.0));
        view.pointer_move(Vec2::new(130.0, 80.0));
        view.pointer_move(Vec2::new(125.0, 140.0));
        view.pointer_up();
        assert_eq!(view.offset, Vec2::new(25.0, 40.0));
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut view = ViewState::default();
        view.pointer_move(Vec2::new(50.0, 50.0));
        assert_eq!(view.offset, Vec2::ZERO);
        assert!(!view.is_dragging());
    }

    #[test]
    fn release_outside_surface_ends_drag() {
        let mut surface = Surface::new(800.0, 600.0);
        let mut view = ViewState::default();
        view.handle(&InputEvent::PointerDown { x: 400.0, y: 300.0 }, &mut surface);
        view.handle(&InputEvent::PointerMove { x: 900.0, y: 300.0 }, &mut surface);
        // Released past the right edge of the canvas
        view.handle(&InputEvent::PointerUp { x: 1200.0, y: -40.0 }, &mut surface);
        assert!(!view.is_dragging());
        let after_release = view.offset;

        view.handle(&InputEvent::PointerMove { x: 0.0, y: 0.0 }, &mut surface);
        assert_eq!(view.offset, after_release);
    }

    #[test]
    fn resize_updates_surface() {
        let mut surface = Surface::new(800.0, 600.0);
        let mut view = ViewState::default();
        view.handle(&InputEvent::Resize { width: 1280.0, height: 720.0 }, &mut surface);
        assert_eq!(surface, Surface::new(1280.0, 720.0));
        assert_eq!(surface.center(), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn world_screen_round_trip() {
        let surface = Surface::new(800.0, 600.0);
        let mut view = ViewState::default();
        view.offset = Vec2::new(30.0, -20.0);
        view.scale = 2.0;

        let screen = view.world_to_screen(Vec2::new(100.0, 0.0), &surface);
        assert_eq!(screen, Vec2::new(400.0 + 30.0 + 200.0, 300.0 - 20.0));
        assert_eq!(view.screen_to_world(screen, &surface), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn stroke_factor_follows_config() {
        let mut plain = ViewState::default();
        plain.scale = 4.0;
        assert_eq!(plain.stroke_factor(), 1.0);

        let mut compensated = ViewState::new(ViewConfig {
            compensate_zoom: true,
            ..ViewConfig::default()
        });
        compensated.scale = 4.0;
        assert_eq!(compensated.stroke_factor(), 0.25);
    }
}
