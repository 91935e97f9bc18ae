use orrery_engine::{
    Simulation, EngineConfig, EngineContext, RenderMode,
    InputEvent, InputQueue, Canvas2d,
    FixedTimestep, FrameClock, FrameMode,
    SceneBuffer, SceneRigs, FrameBuffer, ProtocolLayout,
    SystemManifest, TextureRequest, TextureLoaded, AssetError,
};
use orrery_engine::systems::scene_pass::build_scene_buffer;

/// Generic simulation runner that wires up the engine loop.
///
/// Each concrete demo creates a `thread_local!` SimRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct SimRunner<S: Simulation> {
    sim: S,
    ctx: EngineContext,
    input: InputQueue,
    clock: FrameClock,
    timestep: Option<FixedTimestep>,
    config: EngineConfig,
    /// 3D only: the hierarchy built at init, plus this frame's output.
    rigs: Option<SceneRigs>,
    scene: SceneBuffer,
    frame_buffer: FrameBuffer,
    /// Textures requested by init or a manifest, not yet handed to a loader.
    pending_textures: Vec<TextureRequest>,
    /// Bumped by every manifest load; textures from older tables are refused.
    generation: u32,
    initialized: bool,
}

impl<S: Simulation> SimRunner<S> {
    pub fn new(sim: S) -> Self {
        let config = sim.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: EngineContext::new(&config),
            sim,
            input: InputQueue::new(),
            clock: FrameClock::new(),
            timestep: None,
            scene: SceneBuffer::new(config.max_instances),
            frame_buffer: FrameBuffer::new(layout),
            rigs: None,
            config,
            pending_textures: Vec::new(),
            generation: 0,
            initialized: false,
        }
    }

    /// Initialize the simulation. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.sim.config();
        self.ctx = EngineContext::new(&self.config);
        self.timestep = match self.config.frame_mode {
            FrameMode::PerFrame => None,
            FrameMode::Fixed { dt } => Some(FixedTimestep::new(dt)),
        };
        self.scene = SceneBuffer::new(self.config.max_instances);
        self.frame_buffer = FrameBuffer::new(ProtocolLayout::from_config(&self.config));

        self.sim.init(&mut self.ctx);
        let requests = self.sim.texture_requests();
        self.pending_textures = self.stamp(requests);
        self.rebuild_scene();
        self.initialized = true;
        log::info!(
            "runner initialized: {} bodies, {:?}, {:?}",
            self.ctx.bodies.len(),
            self.config.render_mode,
            self.config.frame_mode
        );
    }

    fn stamp(&self, requests: Vec<TextureRequest>) -> Vec<TextureRequest> {
        let generation = self.generation;
        requests.into_iter().map(|r| r.with_generation(generation)).collect()
    }

    fn rebuild_scene(&mut self) {
        self.rigs = match self.config.render_mode {
            RenderMode::Scene3d => Some(SceneRigs::build(&self.ctx.bodies)),
            RenderMode::Canvas2d => None,
        };
        self.publish_scene();
    }

    /// Sync rigs, rebuild the instance buffer and pack the frame for JS.
    fn publish_scene(&mut self) {
        if let Some(rigs) = self.rigs.as_mut() {
            rigs.sync(&self.ctx.bodies);
            build_scene_buffer(&self.ctx.bodies, rigs, &mut self.scene);
            self.frame_buffer
                .write(self.ctx.steps(), &self.ctx.surface, &self.ctx.camera, &self.scene);
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame at timestamp `now_ms`: apply queued input, advance
    /// the orbits, refresh the 3D output. Returns the steps taken.
    pub fn tick(&mut self, now_ms: f64) -> u32 {
        if !self.initialized {
            return 0;
        }

        for event in self.input.drain() {
            if !self.sim.handle_input(&mut self.ctx, &event) {
                self.ctx.apply_input(&event);
            }
        }

        let dt = self.clock.delta(now_ms);
        let steps = match self.timestep.as_mut() {
            Some(timestep) => timestep.accumulate(dt),
            None => 1,
        };
        for _ in 0..steps {
            self.ctx.step();
            self.sim.update(&mut self.ctx);
        }

        self.publish_scene();
        steps
    }

    /// Draw the current state (2D mode).
    pub fn render(&self, canvas: &mut dyn Canvas2d) {
        if self.initialized {
            self.sim.render(&self.ctx, canvas);
        }
    }

    /// Replace the body table with one parsed from JSON. Its textures replace
    /// any still pending, and loads still in flight for the old table will be
    /// refused. Returns the number of bodies loaded.
    pub fn load_manifest(&mut self, json: &str, seed: u32) -> Result<usize, AssetError> {
        let loaded = SystemManifest::from_json(json)?.build(seed)?;
        self.generation = self.generation.wrapping_add(1);
        self.ctx.bodies = loaded.system;
        self.pending_textures = self.stamp(loaded.textures);
        self.rebuild_scene();
        Ok(self.ctx.bodies.len())
    }

    /// Generation of the current body table.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Hand over the textures waiting to be fetched.
    pub fn take_texture_requests(&mut self) -> Vec<TextureRequest> {
        std::mem::take(&mut self.pending_textures)
    }

    /// Attach a loaded texture. Loads from a replaced body table are dropped.
    pub fn attach_texture(&mut self, loaded: TextureLoaded) -> bool {
        if loaded.generation != self.generation {
            log::debug!(
                "dropping texture {:?} from table generation {} (now {})",
                loaded.texture,
                loaded.generation,
                self.generation
            );
            return false;
        }
        let attached = self.ctx.attach_texture(loaded);
        if attached {
            self.publish_scene();
        }
        attached
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- Pointer accessors for JS reads out of wasm memory ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame_buffer.ptr()
    }

    pub fn frame_floats(&self) -> u32 {
        self.frame_buffer.layout().buffer_total_floats as u32
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.scene.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.scene.instance_count()
    }

    pub fn max_instances(&self) -> u32 {
        self.frame_buffer.layout().max_instances as u32
    }

    pub fn surface_width(&self) -> f32 {
        self.ctx.surface.width
    }

    pub fn surface_height(&self) -> f32 {
        self.ctx.surface.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::{Body, BodyId, Color, CommandRecorder, TextureId};
    use orrery_engine::bridge::protocol::{HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT};

    struct TwoBodies {
        mode: RenderMode,
        frame_mode: FrameMode,
        updates: u32,
    }

    impl TwoBodies {
        fn new(mode: RenderMode) -> Self {
            Self { mode, frame_mode: FrameMode::PerFrame, updates: 0 }
        }
    }

    impl Simulation for TwoBodies {
        fn config(&self) -> EngineConfig {
            EngineConfig {
                render_mode: self.mode,
                frame_mode: self.frame_mode,
                ..EngineConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let sun = ctx.bodies.next_id();
            ctx.bodies.spawn(Body::new(sun, "Sun").with_color(Color::css("yellow")).with_radius(40.0));
            let planet = ctx.bodies.next_id();
            ctx.bodies.spawn(
                Body::new(planet, "Planet")
                    .with_color(Color::css("blue"))
                    .with_radius(10.0)
                    .with_orbit(100.0, 0.01),
            );
        }

        fn update(&mut self, _ctx: &mut EngineContext) {
            self.updates += 1;
        }
    }

    fn planet_angle(runner: &SimRunner<TwoBodies>) -> f32 {
        runner.ctx().bodies.find_by_name("Planet").unwrap().angle
    }

    #[test]
    fn tick_before_init_is_a_no_op() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Canvas2d));
        assert_eq!(runner.tick(0.0), 0);
        assert!(runner.ctx().bodies.is_empty());
    }

    #[test]
    fn per_frame_mode_steps_once_per_tick() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Canvas2d));
        runner.init();
        // Frame timestamps don't matter in per-frame mode
        runner.tick(0.0);
        runner.tick(500.0);
        runner.tick(501.0);
        assert!((planet_angle(&runner) - 0.03).abs() < 1e-6);
        assert_eq!(runner.sim().updates, 3);
    }

    #[test]
    fn fixed_mode_follows_elapsed_time() {
        let mut sim = TwoBodies::new(RenderMode::Canvas2d);
        sim.frame_mode = FrameMode::Fixed { dt: 0.01 };
        let mut runner = SimRunner::new(sim);
        runner.init();
        assert_eq!(runner.tick(1000.0), 0);
        assert_eq!(runner.tick(1050.0), 5);
    }

    #[test]
    fn input_is_applied_before_the_frame() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Canvas2d));
        runner.init();
        runner.push_input(InputEvent::Resize { width: 1024.0, height: 768.0 });
        runner.push_input(InputEvent::Wheel { delta_y: -5000.0 });
        runner.tick(0.0);
        assert_eq!(runner.surface_width(), 1024.0);
        assert_eq!(runner.ctx().view.scale, 5.0);

        let mut rec = CommandRecorder::new();
        runner.render(&mut rec);
        assert!(rec
            .commands()
            .contains(&orrery_engine::DrawCommand::Translate { x: 512.0, y: 384.0 }));
    }

    #[test]
    fn scene_mode_publishes_instances() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Scene3d));
        runner.init();
        assert_eq!(runner.instance_count(), 2);
        runner.tick(0.0);
        runner.tick(16.0);

        let frame = unsafe {
            std::slice::from_raw_parts(runner.frame_ptr(), runner.frame_floats() as usize)
        };
        assert_eq!(frame[HEADER_FRAME_COUNTER], 2.0);
        assert_eq!(frame[HEADER_INSTANCE_COUNT], 2.0);
    }

    #[test]
    fn canvas_mode_has_no_scene_output() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Canvas2d));
        runner.init();
        runner.tick(0.0);
        assert_eq!(runner.instance_count(), 0);
    }

    #[test]
    fn manifest_replaces_bodies() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Scene3d));
        runner.init();
        let json = r#"{ "bodies": [
            { "name": "Sun", "radius": 40, "texture": "sun.jpg" },
            { "name": "Earth", "radius": 11, "distance": 140, "speed": 0.029, "angle": 0 },
            { "name": "Moon", "radius": 3, "distance": 20, "speed": 0.1, "angle": 0, "parent": "Earth" }
        ] }"#;
        assert_eq!(runner.load_manifest(json, 1).unwrap(), 3);
        assert_eq!(runner.instance_count(), 3);

        let textures = runner.take_texture_requests();
        assert_eq!(textures.len(), 1);
        assert!(runner.take_texture_requests().is_empty());

        assert_eq!(textures[0].generation, runner.generation());
        assert!(runner.attach_texture(TextureLoaded::from_request(&textures[0])));
        let orphan = TextureLoaded {
            body: BodyId(42),
            texture: TextureId(1),
            generation: runner.generation(),
        };
        assert!(!runner.attach_texture(orphan));
    }

    #[test]
    fn texture_from_replaced_manifest_is_refused() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Scene3d));
        runner.init();
        let first = r#"{ "bodies": [
            { "name": "Sun", "radius": 40 },
            { "name": "Earth", "radius": 11, "distance": 140, "speed": 0.029, "texture": "earth.jpg" }
        ] }"#;
        let second = r#"{ "bodies": [
            { "name": "Sun", "radius": 40 },
            { "name": "Pluto", "radius": 2, "distance": 500, "speed": 0.004 }
        ] }"#;

        runner.load_manifest(first, 0).unwrap();
        let in_flight = runner.take_texture_requests();
        assert_eq!(in_flight.len(), 1);

        runner.load_manifest(second, 0).unwrap();
        let pluto = runner.ctx().bodies.find_by_name("Pluto").unwrap().id;
        // Same id the old request was made for
        assert_eq!(pluto, in_flight[0].body);

        assert!(!runner.attach_texture(TextureLoaded::from_request(&in_flight[0])));
        let material = &runner.ctx().bodies.get(pluto).unwrap().material;
        assert!(!material.is_textured());
    }

    #[test]
    fn only_successful_manifest_loads_advance_generation() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Scene3d));
        runner.init();
        assert_eq!(runner.generation(), 0);
        runner.load_manifest(r#"{ "bodies": [ { "name": "Sun", "radius": 40 } ] }"#, 0).unwrap();
        assert_eq!(runner.generation(), 1);
        assert!(runner.load_manifest("{", 0).is_err());
        assert_eq!(runner.generation(), 1);
    }

    #[test]
    fn bad_manifest_keeps_existing_bodies() {
        let mut runner = SimRunner::new(TwoBodies::new(RenderMode::Canvas2d));
        runner.init();
        assert!(runner.load_manifest("{", 0).is_err());
        assert_eq!(runner.ctx().bodies.len(), 2);
    }
}
