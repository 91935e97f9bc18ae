/// Solar Scene: the textured 3D orrery.
///
/// Bodies come from the JSON table bundled at build time; JS can swap in
/// another through `sim_load_manifest`. Every body sits in an
/// orbit → inclination → anchor → tilt → spin chain, and JS draws the
/// instance buffer with the orbit camera from the shared frame buffer.

use orrery_engine::*;

const DEFAULT_SYSTEM: &str = include_str!("../assets/system.json");

/// Far enough back to frame Neptune's orbit.
const CAMERA_DISTANCE: f32 = 900.0;

pub struct SolarScene {
    seed: u32,
    pending: Vec<TextureRequest>,
}

impl SolarScene {
    pub fn new() -> Self {
        Self::with_seed(orrery_web::host::random_seed())
    }

    pub fn with_seed(seed: u32) -> Self {
        Self { seed, pending: Vec::new() }
    }
}

impl Simulation for SolarScene {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            render_mode: RenderMode::Scene3d,
            wrap_angles: true,
            camera_distance: CAMERA_DISTANCE,
            camera_damping: 0.08,
            camera_distance_range: (60.0, 3000.0),
            ..EngineConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let loaded = SystemManifest::from_json(DEFAULT_SYSTEM).and_then(|m| m.build(self.seed));
        match loaded {
            Ok(loaded) => {
                ctx.bodies = loaded.system;
                self.pending = loaded.textures;
            }
            Err(e) => log::error!("solar-scene: bundled system failed to load: {e}"),
        }
    }

    fn texture_requests(&mut self) -> Vec<TextureRequest> {
        std::mem::take(&mut self.pending)
    }
}
