pub mod runner;

pub use runner::SceneRunner;

// Used by `export_scene!` expansions in widget crates.
pub use js_sys;

/// Generate all `#[wasm_bindgen]` exports for a scene.
///
/// Generates:
/// - `thread_local!` storage for the SceneRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (scene_init, scene_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use portal_engine::*;
///
/// mod scene;
/// use scene::MyScene;
///
/// portal_web::export_scene!(MyScene, "my-scene");
/// ```
///
/// # Arguments
///
/// - `$scene_type`: The scene struct type that implements `portal_engine::Scene`
///   and has a `new()` constructor
/// - `$scene_name`: A string literal used in log messages
#[macro_export]
macro_rules! export_scene {
    ($scene_type:ty, $scene_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SceneRunner<$scene_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::SceneRunner<$scene_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call scene_init() first", $scene_name);
                        None
                    }
                }
            })
        }

        /// Create and start the scene. `manifest_json` may be empty.
        #[wasm_bindgen]
        pub fn scene_init(manifest_json: &str) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let seed = ($crate::js_sys::Math::random() * u32::MAX as f64) as u64;
            let mut runner = $crate::SceneRunner::new(<$scene_type>::new()).with_seed(seed);
            if !manifest_json.is_empty() {
                runner.load_manifest(manifest_json);
            }
            runner.init();

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized", $scene_name);
        }

        #[wasm_bindgen]
        pub fn scene_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        /// Unmount. Drops the runner; a later `scene_init` starts fresh.
        #[wasm_bindgen]
        pub fn scene_teardown() {
            with_runner(|r| r.teardown());
            RUNNER.with(|cell| {
                *cell.borrow_mut() = None;
            });
            log::info!("{}: torn down", $scene_name);
        }

        #[wasm_bindgen]
        pub fn scene_load_manifest(json: &str) -> bool {
            with_runner(|r| r.load_manifest(json)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn scene_asset_failed(path: &str) {
            with_runner(|r| r.report_asset_failure(path));
        }

        #[wasm_bindgen]
        pub fn scene_is_fallback() -> bool {
            with_runner(|r| r.is_fallback()).unwrap_or(true)
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn scene_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_leave() {
            with_runner(|r| r.push_input(InputEvent::PointerLeave));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_normalized(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerNormalized { x, y }));
        }

        /// Returns true when the host should call `preventDefault`.
        #[wasm_bindgen]
        pub fn scene_wheel(delta_y: f32, x: f32, y: f32) -> bool {
            with_runner(|r| r.wheel(delta_y, x, y)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn scene_node_enter(node: u32) {
            with_runner(|r| r.push_input(InputEvent::NodeEnter { node: NodeId(node) }));
        }

        #[wasm_bindgen]
        pub fn scene_node_leave(node: u32) {
            with_runner(|r| r.push_input(InputEvent::NodeLeave { node: NodeId(node) }));
        }

        #[wasm_bindgen]
        pub fn scene_node_click(node: u32) {
            with_runner(|r| r.push_input(InputEvent::NodeClick { node: NodeId(node) }));
        }

        #[wasm_bindgen]
        pub fn scene_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_instance_floats() -> u32 {
            with_runner(|r| r.instance_floats()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_scene_events_ptr() -> *const f32 {
            with_runner(|r| r.scene_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_scene_events_len() -> u32 {
            with_runner(|r| r.scene_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        /// Current guide broadcast, empty when nothing is highlighted.
        #[wasm_bindgen]
        pub fn get_guide_action() -> String {
            with_runner(|r| r.guide_action()).unwrap_or_default()
        }
    };
}
