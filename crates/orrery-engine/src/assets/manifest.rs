use std::collections::HashMap;
use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, TextureId};
use crate::assets::error::AssetError;
use crate::assets::texture::{Material, TextureRequest};
use crate::core::body::Body;
use crate::core::color::Color;
use crate::core::system::BodySystem;

/// A body table, loaded from JSON at runtime.
///
/// Bodies are listed in draw order; a parent must appear before its moons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemManifest {
    pub bodies: Vec<BodyDescriptor>,
}

/// One row of the body table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub name: String,
    #[serde(default)]
    pub color: Color,
    /// Image URL, relative to the page.
    #[serde(default)]
    pub texture: Option<String>,
    pub radius: f32,
    /// Orbital distance from the parent (0 = stationary).
    #[serde(default)]
    pub distance: f32,
    /// Orbital speed, radians per frame.
    #[serde(default)]
    pub speed: f32,
    /// Starting angle in radians. Orbiting bodies without one get a scattered
    /// start so the planets don't line up.
    #[serde(default)]
    pub angle: Option<f32>,
    /// Self-rotation speed, radians per frame.
    #[serde(default)]
    pub spin_speed: f32,
    #[serde(default)]
    pub inclination_deg: f32,
    #[serde(default)]
    pub axial_tilt_deg: f32,
    #[serde(default)]
    pub ring: bool,
    /// Name of the body this one orbits.
    #[serde(default)]
    pub parent: Option<String>,
}

/// Bodies built from a manifest plus the textures they are waiting on.
pub struct LoadedSystem {
    pub system: BodySystem,
    pub textures: Vec<TextureRequest>,
}

/// Deterministic integer hash (no rand crate in the engine).
pub fn scatter_hash(seed: u32) -> u32 {
    let mut n = seed;
    n = n.wrapping_mul(2654435761);
    n ^= n >> 16;
    n = n.wrapping_mul(2246822519);
    n ^= n >> 13;
    n
}

/// Starting angle in [0, 2π) for the `index`-th body under `seed`.
pub fn scatter_angle(seed: u32, index: usize) -> f32 {
    let h = scatter_hash(seed.wrapping_add((index as u32).wrapping_mul(7919)));
    (h as f32 / u32::MAX as f32) * TAU % TAU
}

impl SystemManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Spawn every body. Texture slots are numbered in table order.
    pub fn build(&self, seed: u32) -> Result<LoadedSystem, AssetError> {
        let mut system = BodySystem::new();
        let mut textures = Vec::new();
        let mut ids: HashMap<&str, BodyId> = HashMap::with_capacity(self.bodies.len());

        for (index, desc) in self.bodies.iter().enumerate() {
            if ids.contains_key(desc.name.as_str()) {
                return Err(AssetError::DuplicateBody(desc.name.clone()));
            }

            let parent = match &desc.parent {
                Some(name) => Some(*ids.get(name.as_str()).ok_or_else(|| AssetError::UnknownParent {
                    body: desc.name.clone(),
                    parent: name.clone(),
                })?),
                None => None,
            };

            let angle = match desc.angle {
                Some(a) => a,
                None if desc.distance > 0.0 => scatter_angle(seed, index),
                None => 0.0,
            };

            let id = system.next_id();
            let mut body = Body::new(id, desc.name.clone())
                .with_material(Material::new(desc.color.clone()))
                .with_radius(desc.radius)
                .with_orbit(desc.distance, desc.speed)
                .with_angle(angle)
                .with_spin(desc.spin_speed)
                .with_inclination(desc.inclination_deg.to_radians())
                .with_axial_tilt(desc.axial_tilt_deg.to_radians())
                .with_ring(desc.ring);
            if let Some(p) = parent {
                body = body.with_parent(p);
            }
            system.spawn(body);
            ids.insert(desc.name.as_str(), id);

            if let Some(url) = &desc.texture {
                textures.push(TextureRequest {
                    body: id,
                    texture: TextureId(textures.len() as u32),
                    url: url.clone(),
                    generation: 0,
                });
            }
        }

        log::info!(
            "built system: {} bodies, {} textures pending",
            system.len(),
            textures.len()
        );
        Ok(LoadedSystem { system, textures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "bodies": [
            { "name": "Sun", "color": "yellow", "radius": 40, "texture": "sun.jpg", "spin_speed": 0.002 },
            { "name": "Earth", "color": "blue", "radius": 11, "distance": 140, "speed": 0.029,
              "texture": "earth.jpg", "axial_tilt_deg": 23.4 },
            { "name": "Moon", "color": "gray", "radius": 3, "distance": 20, "speed": 0.1,
              "angle": 1.0, "parent": "Earth" },
            { "name": "Saturn", "color": "khaki", "radius": 20, "distance": 340, "speed": 0.009,
              "ring": true, "inclination_deg": 2.5 }
        ]
    }"#;

    #[test]
    fn builds_bodies_in_order() {
        let manifest = SystemManifest::from_json(JSON).unwrap();
        let loaded = manifest.build(7).unwrap();
        let sys = &loaded.system;
        assert_eq!(sys.len(), 4);

        let names: Vec<&str> = sys.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Sun", "Earth", "Moon", "Saturn"]);

        let sun = sys.find_by_name("Sun").unwrap();
        assert_eq!(sun.angle, 0.0);
        assert_eq!(sun.spin_speed, 0.002);

        let earth = sys.find_by_name("Earth").unwrap();
        assert!((earth.axial_tilt - 23.4_f32.to_radians()).abs() < 1e-6);
        assert!(earth.angle >= 0.0 && earth.angle < TAU);

        let moon = sys.find_by_name("Moon").unwrap();
        assert_eq!(moon.parent, Some(earth.id));
        assert_eq!(moon.angle, 1.0);

        let saturn = sys.find_by_name("Saturn").unwrap();
        assert!(saturn.ring);
        assert_eq!(saturn.material.color.as_css(), "khaki");
    }

    #[test]
    fn collects_texture_requests() {
        let loaded = SystemManifest::from_json(JSON).unwrap().build(0).unwrap();
        assert_eq!(loaded.textures.len(), 2);
        assert_eq!(loaded.textures[0].texture, TextureId(0));
        assert_eq!(loaded.textures[0].url, "sun.jpg");
        assert_eq!(loaded.textures[1].texture, TextureId(1));

        let earth = loaded.system.find_by_name("Earth").unwrap();
        assert_eq!(loaded.textures[1].body, earth.id);
        // Nothing is attached until the load resolves
        assert!(!earth.material.is_textured());
    }

    #[test]
    fn same_seed_same_start() {
        let manifest = SystemManifest::from_json(JSON).unwrap();
        let a = manifest.build(42).unwrap();
        let b = manifest.build(42).unwrap();
        let angle = |l: &LoadedSystem| l.system.find_by_name("Saturn").unwrap().angle;
        assert_eq!(angle(&a), angle(&b));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let json = r#"{ "bodies": [ { "name": "Moon", "radius": 3, "parent": "Earth" } ] }"#;
        let err = SystemManifest::from_json(json).unwrap().build(0).err().unwrap();
        assert!(matches!(err, AssetError::UnknownParent { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"{ "bodies": [ { "name": "Sun", "radius": 3 }, { "name": "Sun", "radius": 4 } ] }"#;
        let err = SystemManifest::from_json(json).unwrap().build(0).err().unwrap();
        assert!(matches!(err, AssetError::DuplicateBody(name) if name == "Sun"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SystemManifest::from_json("{ not json"),
            Err(AssetError::Manifest(_))
        ));
    }

    #[test]
    fn scatter_angle_in_range() {
        for i in 0..64 {
            let a = scatter_angle(12345, i);
            assert!((0.0..TAU).contains(&a), "angle {a}");
        }
        assert_ne!(scatter_angle(1, 1), scatter_angle(1, 2));
    }
}
