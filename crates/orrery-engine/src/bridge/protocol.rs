/// Shared frame buffer layout for the 3D renderer.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 32 floats (view matrix, projection matrix), column-major]
/// [Instances: max_instances × 24 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::sim::EngineConfig;
use crate::renderer::instance::{SceneBuffer, SceneInstance};
use crate::renderer::orbit_camera::OrbitCamera;
use crate::renderer::view::Surface;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_SURFACE_WIDTH: usize = 4;
pub const HEADER_SURFACE_HEIGHT: usize = 5;
pub const HEADER_CAMERA_X: usize = 6;
pub const HEADER_CAMERA_Y: usize = 7;
pub const HEADER_CAMERA_Z: usize = 8;
pub const HEADER_CAMERA_OFFSET: usize = 9;
pub const HEADER_INSTANCE_OFFSET: usize = 10;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the camera section: two 4×4 matrices.
pub const CAMERA_FLOATS: usize = 32;

/// Floats per scene instance (wire format).
pub const INSTANCE_FLOATS: usize = SceneInstance::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub camera_offset: usize,
    pub instance_data_offset: usize,
    pub instance_data_floats: usize,
    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let instance_data_offset = camera_offset + CAMERA_FLOATS;
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let buffer_total_floats = instance_data_offset + instance_data_floats;
        Self {
            max_instances,
            camera_offset,
            instance_data_offset,
            instance_data_floats,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_instances)
    }
}

/// The flat float buffer JS reads each frame.
pub struct FrameBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let data = vec![0.0; layout.buffer_total_floats];
        Self { layout, data }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    /// Pack one frame: header, camera matrices, instances. Instances past
    /// capacity are dropped.
    pub fn write(&mut self, frame: u64, surface: &Surface, camera: &OrbitCamera, scene: &SceneBuffer) {
        let count = scene.instances.len().min(self.layout.max_instances);
        let eye = camera.position();

        let header = &mut self.data[..HEADER_FLOATS];
        header.fill(0.0);
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = frame as f32;
        header[HEADER_MAX_INSTANCES] = self.layout.max_instances as f32;
        header[HEADER_INSTANCE_COUNT] = count as f32;
        header[HEADER_SURFACE_WIDTH] = surface.width;
        header[HEADER_SURFACE_HEIGHT] = surface.height;
        header[HEADER_CAMERA_X] = eye.x;
        header[HEADER_CAMERA_Y] = eye.y;
        header[HEADER_CAMERA_Z] = eye.z;
        header[HEADER_CAMERA_OFFSET] = self.layout.camera_offset as f32;
        header[HEADER_INSTANCE_OFFSET] = self.layout.instance_data_offset as f32;

        let cam = self.layout.camera_offset;
        self.data[cam..cam + 16].copy_from_slice(&camera.view_matrix().to_cols_array());
        self.data[cam + 16..cam + 32].copy_from_slice(&camera.projection_matrix().to_cols_array());

        let start = self.layout.instance_data_offset;
        let floats = &scene.as_floats()[..count * INSTANCE_FLOATS];
        self.data[start..start + floats.len()].copy_from_slice(floats);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn default_config_layout() {
        let layout = ProtocolLayout::from_config(&EngineConfig::default());
        assert_eq!(layout.max_instances, 256);
        assert_eq!(layout.camera_offset, 16);
        assert_eq!(layout.instance_data_offset, 48);
        assert_eq!(layout.buffer_total_floats, 48 + 256 * 24);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(10);
        assert_eq!(layout.instance_data_offset, layout.camera_offset + CAMERA_FLOATS);
        assert_eq!(
            layout.buffer_total_floats,
            layout.instance_data_offset + layout.instance_data_floats
        );
    }

    #[test]
    fn write_packs_header_camera_and_instances() {
        let mut fb = FrameBuffer::new(ProtocolLayout::new(4));
        let camera = OrbitCamera::default();
        let mut scene = SceneBuffer::new(4);
        scene.push(SceneInstance::sphere(Mat4::IDENTITY, [1.0, 0.0, 0.0, 1.0], None, 3.0));
        scene.push(SceneInstance::ring(Mat4::IDENTITY, [1.0; 4], 3.0, 0.5));

        fb.write(7, &Surface::new(640.0, 480.0), &camera, &scene);
        let d = fb.as_slice();
        assert_eq!(d[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(d[HEADER_FRAME_COUNTER], 7.0);
        assert_eq!(d[HEADER_INSTANCE_COUNT], 2.0);
        assert_eq!(d[HEADER_SURFACE_WIDTH], 640.0);
        assert_eq!(&d[16..32], &camera.view_matrix().to_cols_array());

        let first = 48;
        assert_eq!(d[first], 1.0); // model[0][0]
        assert_eq!(d[first + 16], 1.0); // red
        assert_eq!(d[first + 20], -1.0); // untextured
        assert_eq!(d[first + INSTANCE_FLOATS + 21], 1.0); // ring kind
    }

    #[test]
    fn write_truncates_to_capacity() {
        let mut fb = FrameBuffer::new(ProtocolLayout::new(1));
        let mut scene = SceneBuffer::new(4);
        scene.push(SceneInstance::default());
        scene.push(SceneInstance::default());
        fb.write(0, &Surface::new(1.0, 1.0), &OrbitCamera::default(), &scene);
        assert_eq!(fb.as_slice()[HEADER_INSTANCE_COUNT], 1.0);
        assert_eq!(fb.as_slice().len(), 48 + 24);
    }
}
