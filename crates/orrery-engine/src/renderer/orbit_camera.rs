use glam::{Mat4, Vec2, Vec3};

use crate::input::queue::InputEvent;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Orbit-controls camera for the 3D scene.
///
/// Input moves *goal* values; `update` eases the current values toward them
/// by `damping` each frame, so drags and wheel steps glide to a stop.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Rotation around the Y axis (radians).
    pub azimuth: f32,
    /// Angle above the XZ plane (radians).
    pub elevation: f32,
    /// Distance from target.
    pub distance: f32,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Fraction of the remaining gap closed per frame (1.0 = no damping).
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Vertical field of view (radians).
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    goal_azimuth: f32,
    goal_elevation: f32,
    goal_distance: f32,
    drag_last: Option<Vec2>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(400.0, 16.0 / 9.0)
    }
}

impl OrbitCamera {
    const ROTATE_SPEED: f32 = 0.005;
    const ZOOM_SPEED: f32 = 0.001;
    const MAX_ELEVATION: f32 = 1.5; // just under 90 degrees

    pub fn new(distance: f32, aspect: f32) -> Self {
        let elevation = 0.5;
        Self {
            azimuth: 0.0,
            elevation,
            distance,
            target: Vec3::ZERO,
            damping: 0.1,
            min_distance: 20.0,
            max_distance: 2000.0,
            fov_y: 75.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 10_000.0,
            goal_azimuth: 0.0,
            goal_elevation: elevation,
            goal_distance: distance,
            drag_last: None,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    /// Limit the dolly range. Non-finite bounds keep the current ones.
    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        if min.is_finite() {
            self.min_distance = min.max(0.0);
        }
        self.max_distance = if max.is_finite() { max } else { self.max_distance }.max(self.min_distance);
        self.goal_distance = self.goal_distance.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y } => self.drag_last = Some(Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => {
                if let Some(last) = self.drag_last {
                    let pos = Vec2::new(x, y);
                    self.rotate(pos - last);
                    self.drag_last = Some(pos);
                }
            }
            InputEvent::PointerUp { .. } => self.drag_last = None,
            InputEvent::Wheel { delta_y } => self.dolly(delta_y),
            InputEvent::Resize { width, height } => {
                if width > 0.0 && height > 0.0 {
                    self.aspect = width / height;
                }
            }
        }
    }

    /// Orbit by a pointer delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.goal_azimuth -= delta.x * Self::ROTATE_SPEED;
        self.goal_elevation = (self.goal_elevation + delta.y * Self::ROTATE_SPEED)
            .clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
    }

    /// Move toward (negative) or away from (positive) the target.
    pub fn dolly(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.goal_distance = (self.goal_distance * (delta_y * Self::ZOOM_SPEED).exp())
            .clamp(self.min_distance, self.max_distance);
    }

    /// Ease current values toward their goals. Call once per frame.
    pub fn update(&mut self) {
        self.azimuth = lerp(self.azimuth, self.goal_azimuth, self.damping);
        self.elevation = lerp(self.elevation, self.goal_elevation, self.damping);
        self.distance = lerp(self.distance, self.goal_distance, self.damping);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_last.is_some()
    }

    /// Camera position in world space (Y up).
    pub fn position(&self) -> Vec3 {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        self.target + Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

}
