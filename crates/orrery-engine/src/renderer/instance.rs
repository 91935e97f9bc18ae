use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::api::types::TextureId;

/// What the JS renderer should draw for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    /// Unit sphere scaled by the model matrix.
    Sphere = 0,
    /// Flat annulus in the local XZ plane, outer radius 1.
    Ring = 1,
}

/// Per-instance data for the 3D scene, read by the TypeScript renderer.
/// Must match the TypeScript protocol: 24 floats = 96 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct SceneInstance {
    /// Column-major world matrix, radius already folded into its scale.
    pub model: [f32; 16],
    /// Linear RGBA base color.
    pub color: [f32; 4],
    /// Texture slot, or -1.0 when the body is untextured.
    pub texture: f32,
    /// [`InstanceKind`] as a float.
    pub kind: f32,
    /// Body radius in scene units (for picking and labels).
    pub radius: f32,
    /// Ring inner radius as a fraction of the outer; 0 for spheres.
    pub inner: f32,
}

impl SceneInstance {
    pub const FLOATS: usize = 24;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn sphere(model: Mat4, color: [f32; 4], texture: Option<TextureId>, radius: f32) -> Self {
        Self {
            model: model.to_cols_array(),
            color,
            texture: texture.map_or(-1.0, |t| t.0 as f32),
            kind: InstanceKind::Sphere as u8 as f32,
            radius,
            inner: 0.0,
        }
    }

    pub fn ring(model: Mat4, color: [f32; 4], radius: f32, inner: f32) -> Self {
        Self {
            model: model.to_cols_array(),
            color,
            texture: -1.0,
            kind: InstanceKind::Ring as u8 as f32,
            radius,
            inner,
        }
    }

    pub fn kind(&self) -> InstanceKind {
        if self.kind >= 1.0 {
            InstanceKind::Ring
        } else {
            InstanceKind::Sphere
        }
    }

    pub fn texture(&self) -> Option<TextureId> {
        (self.texture >= 0.0).then(|| TextureId(self.texture as u32))
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array(&self.model)
    }
}

/// All instances for one frame, in body order (rings follow their body).
pub struct SceneBuffer {
    pub instances: Vec<SceneInstance>,
    capacity: usize,
}

impl SceneBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns false once the buffer is full.
    pub fn push(&mut self, instance: SceneInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for JS reads out of wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for SceneBuffer {
    fn default() -> Self {
        Self::new(256)
    }
}
