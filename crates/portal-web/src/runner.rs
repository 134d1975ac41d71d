use portal_engine::{
    build_render_buffer, FrameClock, InputEvent, InputQueue, RenderBuffer, RenderInstance, Scene,
    SceneConfig, SceneContext, SceneManifest, TextureRegistry, WheelResponse,
};

/// Generic scene runner that wires the engine into the host frame loop.
///
/// Each concrete widget creates a `thread_local!` SceneRunner and exports
/// free functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct SceneRunner<S: Scene> {
    scene: S,
    ctx: SceneContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    clock: FrameClock,
    config: SceneConfig,
    manifest: Option<SceneManifest>,
    initialized: bool,
    /// Set when an asset or the manifest failed. The host swaps in its static
    /// fallback and the scene no longer ticks.
    fallback: bool,
    seed: u64,
}

impl<S: Scene> SceneRunner<S> {
    pub fn new(scene: S) -> Self {
        let config = scene.config();
        Self {
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            clock: FrameClock::new(config.max_frame_dt),
            ctx: SceneContext::new(),
            input: InputQueue::new(),
            scene,
            config,
            manifest: None,
            initialized: false,
            fallback: false,
            seed: 42,
        }
    }

    /// Seed the scene's random source (variant picks).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.ctx = SceneContext::with_seed(seed);
        self
    }

    /// Initialize the scene. Call once after construction (and after
    /// `load_manifest` when there is one).
    pub fn init(&mut self) {
        if self.fallback {
            log::warn!("scene init skipped: running in fallback mode");
            return;
        }
        if let Some(manifest) = &self.manifest {
            self.ctx.textures = TextureRegistry::from_manifest(manifest);
            self.scene.configure(manifest);
        }
        // Overrides can change the node count, so size buffers afterwards.
        self.config = self.scene.config();
        self.render_buffer = RenderBuffer::with_capacity(self.config.max_instances);
        self.clock = FrameClock::new(self.config.max_frame_dt);
        self.ctx.events.reserve(self.config.max_events);
        self.scene.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Parse and apply a scene manifest. A malformed manifest switches the
    /// runner to fallback mode. Loading after `init` restarts the scene.
    pub fn load_manifest(&mut self, json: &str) -> bool {
        match SceneManifest::from_json(json) {
            Ok(manifest) => {
                log::info!(
                    "manifest: {} textures, {} dialogue lines",
                    manifest.textures.len(),
                    manifest.dialogues.len()
                );
                self.manifest = Some(manifest);
                if self.initialized {
                    self.restart();
                }
                true
            }
            Err(e) => {
                log::error!("manifest parse failed: {}", e);
                self.enter_fallback();
                false
            }
        }
    }

    fn restart(&mut self) {
        self.scene.teardown(&mut self.ctx);
        self.ctx = SceneContext::with_seed(self.seed);
        self.initialized = false;
        self.init();
    }

    /// The host failed to load an asset. There is no partial recovery: the
    /// scene stops and the host shows its fallback.
    pub fn report_asset_failure(&mut self, path: &str) {
        match self.ctx.textures.name_for_path(path) {
            Some(name) => log::error!("texture '{}' failed to load from {}", name, path),
            None => log::error!("asset failed to load: {}", path),
        }
        self.enter_fallback();
    }

    fn enter_fallback(&mut self) {
        if self.fallback {
            return;
        }
        self.fallback = true;
        if self.initialized {
            self.scene.teardown(&mut self.ctx);
        }
        self.render_buffer.clear();
        self.ctx.clear_frame_data();
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Wheel events are answered synchronously: true means the scene used the
    /// event and the host should call `preventDefault`.
    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) -> bool {
        if !self.initialized || self.fallback {
            return false;
        }
        self.scene.wheel(&mut self.ctx, delta_y, x, y) == WheelResponse::Consumed
    }

    /// Run one frame: advance the clock, update the scene, rebuild the buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.fallback {
            return;
        }

        self.ctx.clear_frame_data();
        self.ctx.time = self.clock.advance(dt);

        self.scene.update(&mut self.ctx, &self.input);
        self.input.drain();

        build_render_buffer(self.ctx.nodes.iter(), &mut self.render_buffer);
    }

    /// Unmount: stop timers and release subscriptions.
    pub fn teardown(&mut self) {
        if self.initialized {
            self.scene.teardown(&mut self.ctx);
            self.initialized = false;
        }
        self.input.drain();
        self.render_buffer.clear();
    }

    // ---- Pointer accessors for zero-copy reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn scene_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn scene_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn instance_floats(&self) -> u32 {
        RenderInstance::FLOATS as u32
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }

    /// The guide's current broadcast action, empty when none.
    pub fn guide_action(&self) -> String {
        self.ctx.guide.current().unwrap_or_default()
    }

    pub fn elapsed(&self) -> f32 {
        self.ctx.time.elapsed
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn context(&self) -> &SceneContext {
        &self.ctx
    }
}
