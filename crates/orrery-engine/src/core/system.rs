use glam::Vec2;

use crate::api::types::BodyId;
use crate::core::body::Body;

/// Flat storage for the bodies of one solar system.
///
/// Bodies are spawned once at init and live for the whole session; lookup is
/// a linear scan, which is plenty for a dozen planets.
pub struct BodySystem {
    bodies: Vec<Body>,
    next_id: u32,
}

/// Parent chains deeper than this are treated as broken (cycle or typo).
const MAX_PARENT_DEPTH: usize = 16;

impl BodySystem {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(16),
            next_id: 0,
        }
    }

    /// Generate the next unique body ID.
    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a body. Bodies are drawn in insertion order.
    pub fn spawn(&mut self, body: Body) -> BodyId {
        let id = body.id;
        self.next_id = self.next_id.max(id.0 + 1);
        self.bodies.push(body);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Find a body by its display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advance every body by one frame.
    pub fn advance(&mut self, wrap_angles: bool) {
        for body in &mut self.bodies {
            body.advance(wrap_angles);
        }
    }

    /// Derived 2D position of a body: its orbit offset plus its parent's
    /// position. Unknown IDs resolve to the origin.
    pub fn position(&self, id: BodyId) -> Vec2 {
        let mut pos = Vec2::ZERO;
        let mut current = self.get(id);
        let mut depth = 0;
        while let Some(body) = current {
            pos += body.orbit_offset();
            depth += 1;
            if depth > MAX_PARENT_DEPTH {
                log::warn!("parent chain of {:?} is too deep, truncating", id);
                break;
            }
            current = body.parent.and_then(|p| self.get(p));
        }
        pos
    }

    /// Centre of a body's orbit (its parent's position, or the origin).
    pub fn orbit_center(&self, id: BodyId) -> Vec2 {
        self.get(id)
            .and_then(|b| b.parent)
            .map(|p| self.position(p))
            .unwrap_or(Vec2::ZERO)
    }

    /// Topmost body whose disc contains the world-space point.
    /// Later bodies are drawn on top, so the search runs back to front.
    pub fn pick(&self, world: Vec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .rev()
            .find(|b| self.position(b.id).distance(world) <= b.radius)
            .map(|b| b.id)
    }
}

impl Default for BodySystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> (BodySystem, BodyId, BodyId, BodyId) {
        let mut sys = BodySystem::new();
        let sun = sys.next_id();
        sys.spawn(Body::new(sun, "Sun").with_radius(40.0));
        let earth = sys.next_id();
        sys.spawn(Body::new(earth, "Earth").with_radius(11.0).with_orbit(140.0, 0.029));
        let moon = sys.next_id();
        sys.spawn(
            Body::new(moon, "Moon")
                .with_radius(3.0)
                .with_orbit(20.0, 0.1)
                .with_parent(earth),
        );
        (sys, sun, earth, moon)
    }

    #[test]
    fn spawn_and_lookup() {
        let (sys, sun, earth, _) = system();
        assert_eq!(sys.len(), 3);
        assert_eq!(sys.get(sun).unwrap().name, "Sun");
        assert_eq!(sys.find_by_name("Earth").unwrap().id, earth);
        assert!(sys.find_by_name("Vulcan").is_none());
    }

    #[test]
    fn next_id_skips_spawned_ids() {
        let mut sys = BodySystem::new();
        sys.spawn(Body::new(BodyId(7), "Seven"));
        assert_eq!(sys.next_id(), BodyId(8));
    }

    #[test]
    fn advance_moves_every_orbiting_body() {
        let (mut sys, sun, earth, moon) = system();
        sys.advance(false);
        assert_eq!(sys.get(sun).unwrap().angle, 0.0);
        assert!((sys.get(earth).unwrap().angle - 0.029).abs() < 1e-7);
        assert!((sys.get(moon).unwrap().angle - 0.1).abs() < 1e-7);
    }

    #[test]
    fn moon_position_includes_parent() {
        let (sys, _, earth, moon) = system();
        assert_eq!(sys.position(earth), Vec2::new(140.0, 0.0));
        assert_eq!(sys.position(moon), Vec2::new(160.0, 0.0));
        assert_eq!(sys.orbit_center(moon), Vec2::new(140.0, 0.0));
    }

    #[test]
    fn pick_prefers_topmost_body() {
        let (sys, sun, earth, moon) = system();
        assert_eq!(sys.pick(Vec2::new(5.0, 5.0)), Some(sun));
        assert_eq!(sys.pick(Vec2::new(141.0, 0.0)), Some(earth));
        assert_eq!(sys.pick(Vec2::new(160.0, 1.0)), Some(moon));
        assert_eq!(sys.pick(Vec2::new(-300.0, 0.0)), None);
    }
}
