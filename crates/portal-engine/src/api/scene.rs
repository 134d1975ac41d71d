use crate::api::types::{NodeId, SceneEvent};
use crate::assets::manifest::SceneManifest;
use crate::assets::registry::TextureRegistry;
use crate::core::rng::Rng;
use crate::core::scene::NodeStore;
use crate::core::time::FrameTime;
use crate::input::queue::InputQueue;
use crate::systems::guide_channel::GuideChannel;
use crate::systems::wheel_scale::WheelResponse;

/// Configuration for the runner, provided by the scene.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Largest frame delta accepted by the clock, in seconds (default: 0.1).
    pub max_frame_dt: f32,
    /// Initial capacity of the render buffer (default: 64).
    pub max_instances: usize,
    /// Initial capacity of the per-frame event list (default: 16).
    pub max_events: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,
            max_instances: 64,
            max_events: 16,
        }
    }
}

/// The contract every decorative scene fulfills.
pub trait Scene {
    /// Runner configuration. Called once before init.
    fn config(&self) -> SceneConfig {
        SceneConfig::default()
    }

    /// Take tuning overrides and the dialogue script from a parsed manifest.
    /// Called before `init` when the host supplies one.
    fn configure(&mut self, _manifest: &SceneManifest) {}

    /// Spawn nodes and set up initial state.
    fn init(&mut self, ctx: &mut SceneContext);

    /// One rendered frame. `ctx.time` already holds this frame's clock reading.
    fn update(&mut self, ctx: &mut SceneContext, input: &InputQueue);

    /// Answer a wheel event synchronously, before the host decides on
    /// `preventDefault`.
    fn wheel(&mut self, _ctx: &mut SceneContext, _delta_y: f32, _x: f32, _y: f32) -> WheelResponse {
        WheelResponse::PassThrough
    }

    /// The scene is being unmounted. Drop pending timers and subscriptions.
    fn teardown(&mut self, _ctx: &mut SceneContext) {}
}

/// Mutable access to scene state, passed to every `Scene` hook.
pub struct SceneContext {
    pub nodes: NodeStore,
    pub events: Vec<SceneEvent>,
    pub textures: TextureRegistry,
    pub guide: GuideChannel,
    pub time: FrameTime,
    /// Variant picks. Seeded by the host so reloads differ.
    pub rng: Rng,
    next_id: u32,
}

impl SceneContext {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            nodes: NodeStore::new(),
            events: Vec::new(),
            textures: TextureRegistry::new(),
            guide: GuideChannel::new(),
            time: FrameTime::default(),
            rng: Rng::new(seed),
            next_id: 1,
        }
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit an event to be forwarded to the host.
    pub fn emit_event(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_start_at_one() {
        let mut ctx = SceneContext::new();
        assert_eq!(ctx.next_id(), NodeId(1));
        assert_eq!(ctx.next_id(), NodeId(2));
    }

    #[test]
    fn frame_data_is_cleared() {
        let mut ctx = SceneContext::new();
        ctx.emit_event(SceneEvent::new(1, 0.0, 0.0, 0.0));
        assert_eq!(ctx.events.len(), 1);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }
}
