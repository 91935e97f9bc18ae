pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod scene;

// Re-export key types at crate root for convenience
pub use api::sim::{Simulation, EngineConfig, EngineContext, RenderMode};
pub use api::types::{BodyId, TextureId};
pub use core::body::Body;
pub use core::color::Color;
pub use core::system::BodySystem;
pub use core::time::{FixedTimestep, FrameClock, FrameMode};
pub use core::frame_loop::{FrameLoop, LoopControl, LoopHandle};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::canvas::{Canvas2d, CommandRecorder, DrawCommand, TextAlign};
pub use renderer::instance::{InstanceKind, SceneBuffer, SceneInstance};
pub use renderer::orbit_camera::OrbitCamera;
pub use renderer::view::{DragState, Surface, ViewConfig, ViewState};
pub use assets::error::AssetError;
pub use assets::manifest::{BodyDescriptor, LoadedSystem, SystemManifest};
pub use assets::texture::{load_texture, Material, TextureLoaded, TextureLoader, TextureRequest};
pub use bridge::protocol::{FrameBuffer, ProtocolLayout};
pub use scene::{BodyRig, LocalTransform, NodeId, SceneGraph, SceneRigs};
pub use systems::draw2d::draw_frame;
pub use systems::scene_pass::build_scene_buffer;
