use glam::{Mat4, Quat, Vec3};

use crate::api::types::BodyId;
use crate::core::body::Body;
use crate::core::system::BodySystem;
use crate::scene::graph::{LocalTransform, NodeId, SceneGraph};

/// The node chain that places one body, outermost first:
///
/// ```text
/// orbit (angle about +Y, per frame)
///   └ inclination (fixed, about +Z)
///       └ anchor (translation by distance along +X)
///           └ tilt (fixed, about +Z)
///               └ spin (about +Y, per frame)
/// ```
///
/// Moons hang their `orbit` node under the parent's `anchor`, so they follow
/// the parent's position but not its tilt or spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRig {
    pub body: BodyId,
    pub orbit: NodeId,
    pub inclination: NodeId,
    pub anchor: NodeId,
    pub tilt: NodeId,
    pub spin: NodeId,
}

/// Scene graph for a whole body system plus each body's rig.
#[derive(Debug, Default)]
pub struct SceneRigs {
    graph: SceneGraph,
    rigs: Vec<BodyRig>,
}

impl SceneRigs {
    /// Build the hierarchy once. Parents must precede their moons in the
    /// system; a moon whose parent has no rig yet orbits the origin.
    pub fn build(system: &BodySystem) -> Self {
        let mut scene = Self::default();
        for body in system.iter() {
            let parent_anchor = body.parent.and_then(|p| match scene.rig(p) {
                Some(rig) => Some(rig.anchor),
                None => {
                    log::warn!("{} orbits {:?}, which has no rig; using the origin", body.name, p);
                    None
                }
            });
            let rig = scene.add_rig(body, parent_anchor);
            scene.rigs.push(rig);
        }
        scene.graph.propagate();
        log::info!("scene built: {} rigs, {} nodes", scene.rigs.len(), scene.graph.len());
        scene
    }

    fn add_rig(&mut self, body: &Body, parent_anchor: Option<NodeId>) -> BodyRig {
        let orbit_local = LocalTransform::new().with_rotation(Quat::from_rotation_y(body.angle));
        let orbit = match parent_anchor {
            Some(anchor) => self.graph.add_child(anchor, orbit_local),
            None => self.graph.add(orbit_local),
        };
        let inclination = self.graph.add_child(
            orbit,
            LocalTransform::new().with_rotation(Quat::from_rotation_z(body.inclination)),
        );
        let anchor = self.graph.add_child(
            inclination,
            LocalTransform::new().with_translation(Vec3::new(body.distance, 0.0, 0.0)),
        );
        let tilt = self.graph.add_child(
            anchor,
            LocalTransform::new().with_rotation(Quat::from_rotation_z(body.axial_tilt)),
        );
        let spin = self.graph.add_child(
            tilt,
            LocalTransform::new().with_rotation(Quat::from_rotation_y(body.spin)),
        );
        BodyRig { body: body.id, orbit, inclination, anchor, tilt, spin }
    }

    /// Copy the per-frame angles into the graph and propagate.
    pub fn sync(&mut self, system: &BodySystem) {
        for rig in &self.rigs {
            if let Some(body) = system.get(rig.body) {
                self.graph.set_rotation(rig.orbit, Quat::from_rotation_y(body.angle));
                self.graph.set_rotation(rig.spin, Quat::from_rotation_y(body.spin));
            }
        }
        self.graph.propagate();
    }

    pub fn rig(&self, body: BodyId) -> Option<&BodyRig> {
        self.rigs.iter().find(|r| r.body == body)
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// World matrix of the body itself (spin node), unscaled.
    pub fn body_matrix(&self, body: BodyId) -> Option<Mat4> {
        self.rig(body).and_then(|r| self.graph.world(r.spin))
    }

    /// World matrix a ring hangs from: tilted with the body, not spinning.
    pub fn ring_matrix(&self, body: BodyId) -> Option<Mat4> {
        self.rig(body).and_then(|r| self.graph.world(r.tilt))
    }

    pub fn body_position(&self, body: BodyId) -> Option<Vec3> {
        self.rig(body).and_then(|r| self.graph.world_position(r.anchor))
    }
}
