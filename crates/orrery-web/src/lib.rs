pub mod canvas;
pub mod host;
pub mod runner;
pub mod texture;

pub use runner::SimRunner;

// Re-exported for the export macros, so demos need no extra dependencies.
pub use orrery_engine as engine;
pub use web_sys;

/// Generate all `#[wasm_bindgen]` exports for a simulation.
///
/// Generates:
/// - `thread_local!` storage for the SimRunner, the mounted host and texture slots
/// - `with_runner()` helper function
/// - wasm-bindgen exports: `sim_init`, `sim_start`, `sim_stop`, `sim_tick`,
///   input handlers and surface accessors
///
/// The `scene` variant adds the 3D exports: manifest loading, decoded texture
/// images, and the shared frame buffer.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod sim;
/// use sim::SolarCanvas;
///
/// orrery_web::export_sim!(SolarCanvas, "solar-canvas");
/// ```
///
/// # Arguments
///
/// - `$sim_type`: a type implementing `orrery_engine::Simulation` with a `new()` constructor
/// - `$sim_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_sim {
    ($sim_type:ty, $sim_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SimRunner<$sim_type>>> = RefCell::new(None);
            static HOST: RefCell<Option<$crate::host::HostState>> = RefCell::new(None);
            static TEXTURES: $crate::texture::TextureSlots = $crate::texture::TextureSlots::new();
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::SimRunner<$sim_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call sim_init() first", $sim_name);
                        None
                    }
                }
            })
        }

        fn load_pending_textures() {
            let requests = with_runner(|r| r.take_texture_requests()).unwrap_or_default();
            if requests.is_empty() {
                return;
            }
            log::info!("{}: loading {} textures", $sim_name, requests.len());
            let loader = $crate::texture::ImageTextureLoader::new(TEXTURES.with(|t| t.clone()));
            $crate::texture::spawn_texture_loads(&loader, requests, |loaded| {
                with_runner(|r| r.attach_texture(loaded));
            });
        }

        #[wasm_bindgen]
        pub fn sim_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let mut runner = $crate::SimRunner::new(<$sim_type>::new());
            runner.init();
            let generation = runner.generation();
            TEXTURES.with(|t| t.reset(generation));
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            load_pending_textures();
            log::info!("{}: initialized", $sim_name);
        }

        /// Mount on a canvas element and run from requestAnimationFrame.
        #[wasm_bindgen]
        pub fn sim_start(canvas_id: &str) -> Result<(), JsValue> {
            let canvas = $crate::host::canvas_by_id(canvas_id)?;
            let draw_2d = with_runner(|r| r.config().render_mode == $crate::engine::RenderMode::Canvas2d)
                .ok_or_else(|| JsValue::from_str("sim_init() has not been called"))?;

            sim_stop();
            let state = $crate::host::HostState::mount(
                &canvas,
                draw_2d,
                |event| {
                    with_runner(|r| r.push_input(event));
                },
                |now, surface| {
                    with_runner(|r| {
                        r.tick(now);
                        if let Some(surface) = surface {
                            r.render(surface);
                        }
                    });
                },
            )?;
            HOST.with(|cell| *cell.borrow_mut() = Some(state));
            Ok(())
        }

        /// Stop the frame loop and remove the DOM listeners.
        #[wasm_bindgen]
        pub fn sim_stop() {
            if let Some(state) = HOST.with(|cell| cell.borrow_mut().take()) {
                state.stop();
                log::info!("{}: stopped", $sim_name);
            }
        }

        /// Advance one frame without a mounted host (JS-driven loops).
        #[wasm_bindgen]
        pub fn sim_tick(now_ms: f64) -> u32 {
            with_runner(|r| r.tick(now_ms)).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn sim_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn sim_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn sim_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn sim_wheel(delta_y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::Wheel { delta_y }));
        }

        #[wasm_bindgen]
        pub fn sim_resize(width: f32, height: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::Resize { width, height }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_surface_width() -> f32 {
            with_runner(|r| r.surface_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_surface_height() -> f32 {
            with_runner(|r| r.surface_height()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_body_count() -> u32 {
            with_runner(|r| r.ctx().bodies.len() as u32).unwrap_or(0)
        }
    };

    // Variant with the 3D scene exports
    ($sim_type:ty, $sim_name:literal, scene) => {
        $crate::export_sim!($sim_type, $sim_name);

        /// Replace the bodies with a JSON table and start fetching its textures.
        #[wasm_bindgen]
        pub fn sim_load_manifest(json: &str) -> Result<u32, JsValue> {
            let seed = $crate::host::random_seed();
            let (count, generation) = with_runner(|r| r.load_manifest(json, seed).map(|n| (n, r.generation())))
                .ok_or_else(|| JsValue::from_str("sim_init() has not been called"))?
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            // Loads still decoding for the old table will no longer land here
            TEXTURES.with(|t| t.reset(generation));
            load_pending_textures();
            Ok(count as u32)
        }

        /// Decoded image for a texture slot, once it has loaded.
        #[wasm_bindgen]
        pub fn get_texture_image(slot: u32) -> Option<$crate::web_sys::HtmlImageElement> {
            TEXTURES.with(|t| t.get($crate::engine::TextureId(slot)))
        }

        // ---- Shared frame buffer accessors ----

        #[wasm_bindgen]
        pub fn get_frame_ptr() -> *const f32 {
            with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_frame_floats() -> u32 {
            with_runner(|r| r.frame_floats()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }
    };
}
