// scene/graph.rs
//
// 3D transform hierarchy. Nodes carry a local TRS transform; `propagate`
// walks from the roots and stores each node's world matrix
// (parent world * local).
//
// Usage:
//   let mut graph = SceneGraph::new();
//   let pivot = graph.add(LocalTransform::new());
//   let arm = graph.add_child(pivot, LocalTransform::new().with_translation(Vec3::X * 100.0));
//   graph.propagate();
//   let pos = graph.world_position(arm);

use glam::{Mat4, Quat, Vec3};

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Transform relative to the parent node (or world for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Debug, Clone)]
struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalTransform,
    world: Mat4,
}

/// Parent/child transform hierarchy.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    /// Set when any local transform or link changes, cleared by propagate.
    dirty: bool,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node.
    pub fn add(&mut self, local: LocalTransform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            parent: None,
            children: Vec::new(),
            local,
            world: local.matrix(),
        });
        self.roots.push(id);
        self.dirty = true;
        id
    }

    /// Add a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, local: LocalTransform) -> NodeId {
        let id = self.add(local);
        self.set_parent(id, Some(parent));
        id
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Whether `ancestor` is `id` or lies above it.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    /// Re-parent a node. `None` makes it a root. Links that would create a
    /// cycle, or that name unknown nodes, are refused and return false.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        if self.node(child).is_none() {
            return false;
        }
        if let Some(p) = parent {
            if self.node(p).is_none() || self.is_ancestor(child, p) {
                log::warn!("refusing to parent {:?} under {:?}", child, p);
                return false;
            }
        }

        if let Some(old) = self.node(child).and_then(|n| n.parent) {
            if let Some(old_node) = self.node_mut(old) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.node_mut(child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.node_mut(p) {
                    parent_node.children.push(child);
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }

        self.dirty = true;
        true
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.node(id).map(|n| n.children.as_slice())
    }

    /// Replace only the rotation of a node.
    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) {
        if let Some(node) = self.node_mut(id) {
            node.local.rotation = rotation;
            self.dirty = true;
        }
    }

    /// Recompute world matrices from the roots down. No-op when clean.
    pub fn propagate(&mut self) {
        if !self.dirty {
            return;
        }

        // Iterative depth-first walk; parents are always visited before children.
        let mut stack: Vec<(NodeId, Mat4)> =
            self.roots.iter().rev().map(|&r| (r, Mat4::IDENTITY)).collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.0 as usize) else { continue };
            node.world = parent_world * node.local.matrix();
            let world = node.world;
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }

        self.dirty = false;
    }

    /// World matrix as of the last propagate.
    pub fn world(&self, id: NodeId) -> Option<Mat4> {
        self.node(id).map(|n| n.world)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world(id).map(|m| m.w_axis.truncate())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
