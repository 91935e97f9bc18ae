use crate::assets::texture::{TextureLoaded, TextureRequest};
use crate::core::system::BodySystem;
use crate::core::time::FrameMode;
use crate::input::queue::InputEvent;
use crate::renderer::canvas::Canvas2d;
use crate::renderer::orbit_camera::OrbitCamera;
use crate::renderer::view::{Surface, ViewConfig, ViewState};
use crate::systems::draw2d;

/// How a simulation is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Immediate-mode drawing with pan/zoom.
    #[default]
    Canvas2d,
    /// Scene graph + instance buffer with orbit controls.
    Scene3d,
}

/// Configuration for the engine, provided by the simulation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub render_mode: RenderMode,
    /// Once per host frame (default) or fixed steps.
    pub frame_mode: FrameMode,
    pub view: ViewConfig,
    /// Keep orbital and spin angles in [0, 2π).
    pub wrap_angles: bool,
    /// Scene buffer capacity (3D only, default: 256).
    pub max_instances: usize,
    /// Surface size before the host reports the real one.
    pub surface_width: f32,
    pub surface_height: f32,
    /// Initial orbit-camera distance (3D only).
    pub camera_distance: f32,
    /// Fraction of the remaining camera motion applied per step (3D only).
    pub camera_damping: f32,
    /// Closest and farthest the camera may dolly (3D only).
    pub camera_distance_range: (f32, f32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Canvas2d,
            frame_mode: FrameMode::PerFrame,
            view: ViewConfig::default(),
            wrap_angles: false,
            max_instances: 256,
            surface_width: 800.0,
            surface_height: 600.0,
            camera_distance: 600.0,
            camera_damping: 0.1,
            camera_distance_range: (20.0, 2000.0),
        }
    }
}

/// The contract every orrery variant fulfils.
pub trait Simulation {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Spawn the bodies.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Textures the bodies spawned by `init` are waiting on. Called once,
    /// right after init.
    fn texture_requests(&mut self) -> Vec<TextureRequest> {
        Vec::new()
    }

    /// Per-step hook, called after the orbits have advanced.
    fn update(&mut self, _ctx: &mut EngineContext) {}

    /// See an input event before the engine does. Return true to consume it.
    fn handle_input(&mut self, _ctx: &mut EngineContext, _event: &InputEvent) -> bool {
        false
    }

    /// 2D draw pass. The default draws the standard orrery frame.
    fn render(&self, ctx: &EngineContext, canvas: &mut dyn Canvas2d) {
        draw2d::draw_frame(canvas, &ctx.bodies, &ctx.view, &ctx.surface);
    }
}

/// All mutable engine state, passed to every Simulation hook.
pub struct EngineContext {
    pub bodies: BodySystem,
    pub view: ViewState,
    pub camera: OrbitCamera,
    pub surface: Surface,
    render_mode: RenderMode,
    wrap_angles: bool,
    steps: u64,
}

impl EngineContext {
    pub fn new(config: &EngineConfig) -> Self {
        let surface = Surface::new(config.surface_width, config.surface_height);
        let aspect = if surface.height > 0.0 {
            surface.width / surface.height
        } else {
            1.0
        };
        Self {
            bodies: BodySystem::new(),
            view: ViewState::new(config.view.clone()),
            camera: OrbitCamera::new(config.camera_distance, aspect)
                .with_damping(config.camera_damping)
                .with_distance_range(config.camera_distance_range.0, config.camera_distance_range.1),
            surface,
            render_mode: config.render_mode,
            wrap_angles: config.wrap_angles,
            steps: 0,
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Route one input event: resize always reaches the surface and the camera
    /// aspect; pointer and wheel go to the pan/zoom view or the orbit camera.
    pub fn apply_input(&mut self, event: &InputEvent) {
        match (self.render_mode, event) {
            (_, InputEvent::Resize { .. }) => {
                self.view.handle(event, &mut self.surface);
                self.camera.handle(event);
            }
            (RenderMode::Canvas2d, _) => self.view.handle(event, &mut self.surface),
            (RenderMode::Scene3d, _) => self.camera.handle(event),
        }
    }

    /// Advance the orbits one step and ease the camera.
    pub fn step(&mut self) {
        self.bodies.advance(self.wrap_angles);
        if self.render_mode == RenderMode::Scene3d {
            self.camera.update();
        }
        self.steps += 1;
    }

    /// Number of steps taken since init.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Attach a loaded texture to its body.
    pub fn attach_texture(&mut self, loaded: TextureLoaded) -> bool {
        let attached = loaded.apply(&mut self.bodies);
        if !attached {
            log::warn!("texture {:?} arrived for missing body {:?}", loaded.texture, loaded.body);
        }
        attached
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
