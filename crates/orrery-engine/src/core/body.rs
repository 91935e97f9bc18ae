use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::types::BodyId;
use crate::assets::texture::Material;
use crate::core::color::Color;

/// A celestial body on a fixed circular orbit.
///
/// Position is never stored: it is derived from `distance` and `angle` each
/// time it is needed. Only `angle` and `spin` change after spawn.
#[derive(Debug, Clone)]
pub struct Body {
    /// Unique identifier.
    pub id: BodyId,
    /// Display label.
    pub name: String,
    /// Base color plus optional texture.
    pub material: Material,
    /// Display radius in world units.
    pub radius: f32,
    /// Orbital distance from the parent (0 for the central body).
    pub distance: f32,
    /// Orbital angular speed in radians per frame.
    pub speed: f32,
    /// Current orbital angle in radians.
    pub angle: f32,
    /// Current self-rotation in radians.
    pub spin: f32,
    /// Self-rotation speed in radians per frame.
    pub spin_speed: f32,
    /// Fixed tilt of the orbital plane, radians (3D only).
    pub inclination: f32,
    /// Fixed tilt of the spin axis relative to the orbital plane, radians (3D only).
    pub axial_tilt: f32,
    /// Whether the body carries a ring (Saturn).
    pub ring: bool,
    /// Body this one orbits. `None` orbits the origin.
    pub parent: Option<BodyId>,
}

impl Body {
    /// Ring inner edge, in body radii.
    pub const RING_INNER: f32 = 1.4;
    /// Ring outer edge, in body radii.
    pub const RING_OUTER: f32 = 2.2;

    /// Create a body at the origin with a white material.
    pub fn new(id: BodyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            material: Material::default(),
            radius: 1.0,
            distance: 0.0,
            speed: 0.0,
            angle: 0.0,
            spin: 0.0,
            spin_speed: 0.0,
            inclination: 0.0,
            axial_tilt: 0.0,
            ring: false,
            parent: None,
        }
    }

    // -- Builder pattern --

    pub fn with_color(mut self, color: Color) -> Self {
        self.material.color = color;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_orbit(mut self, distance: f32, speed: f32) -> Self {
        self.distance = distance;
        self.speed = speed;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_spin(mut self, spin_speed: f32) -> Self {
        self.spin_speed = spin_speed;
        self
    }

    pub fn with_inclination(mut self, inclination: f32) -> Self {
        self.inclination = inclination;
        self
    }

    pub fn with_axial_tilt(mut self, axial_tilt: f32) -> Self {
        self.axial_tilt = axial_tilt;
        self
    }

    pub fn with_ring(mut self, ring: bool) -> Self {
        self.ring = ring;
        self
    }

    pub fn with_parent(mut self, parent: BodyId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Whether this body moves along an orbit.
    pub fn is_orbiting(&self) -> bool {
        self.distance > 0.0
    }

    /// Advance one frame: orbital angle (if orbiting) and spin, independently.
    /// With `wrap`, both values are kept in [0, 2π).
    pub fn advance(&mut self, wrap: bool) {
        if self.is_orbiting() {
            self.angle += self.speed;
        }
        self.spin += self.spin_speed;

        if wrap {
            self.angle = self.angle.rem_euclid(TAU);
            self.spin = self.spin.rem_euclid(TAU);
        }
    }

    /// Offset from the orbit centre in the orbital plane.
    pub fn orbit_offset(&self) -> Vec2 {
        let (sin, cos) = self.angle.sin_cos();
        Vec2::new(self.distance * cos, self.distance * sin)
    }
}
