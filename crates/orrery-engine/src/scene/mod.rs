// scene/mod.rs
//
// Retained 3D hierarchy for the scene-graph variant. The 2D variant never
// touches it; positions there come straight from BodySystem.

pub mod graph;
pub mod rig;

pub use graph::{LocalTransform, NodeId, SceneGraph};
pub use rig::{BodyRig, SceneRigs};
