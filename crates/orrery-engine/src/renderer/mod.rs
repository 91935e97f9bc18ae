pub mod canvas;
pub mod instance;
pub mod orbit_camera;
pub mod view;

// Re-export key types for convenient access
pub use canvas::{Canvas2d, CommandRecorder, DrawCommand, TextAlign};
pub use instance::{InstanceKind, SceneBuffer, SceneInstance};
pub use orbit_camera::OrbitCamera;
pub use view::{DragState, Surface, ViewConfig, ViewState};
