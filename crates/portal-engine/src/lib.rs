pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod extensions;

pub use glam;

// Re-export key types at crate root for convenience
pub use api::scene::{Scene, SceneConfig, SceneContext};
pub use api::types::{NodeId, TextureId, SceneEvent};
pub use components::node::Node;
pub use core::scene::NodeStore;
pub use core::time::{FrameClock, FrameTime};
pub use core::timer::TimerQueue;
pub use core::rng::{RandomSource, Rng, SeqRandom};
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::{SceneManifest, TextureDescriptor};
pub use assets::registry::TextureRegistry;
pub use systems::render::build_render_buffer;
pub use systems::wheel_scale::{WheelScale, WheelScaleConfig, WheelResponse, Rect};
pub use systems::drag_rotation::{DragRotation, DragConfig};
pub use systems::heartbeat::Heartbeat;
pub use systems::tilt::{Tilt, TiltConfig};
pub use systems::character::{
    CharacterAnimator, CharacterConfig, CharacterState, EmergeVariant, Facing, Motion, Pose,
};
pub use systems::dialogue::{DialogueLine, DialogueScript, DialogueSequencer, GOODBYE_ID};
pub use systems::guide::{Farewell, GuideConfig, GuideController, CLOSE_PORTAL};
pub use systems::guide_channel::{GuideChannel, NavHighlight, SubscriptionId, HIGHLIGHT_NAV};
pub use systems::paper_layer::{LayerConfig, LayerPose, PaperLayer};
pub use systems::portal::{PortalConfig, PortalSequencer, PortalSignal};

// Extensions: decoupled helpers
pub use extensions::{
    Easing, lerp, ease, time_corrected_blend,
    Smoothed, Blend, Throttle,
};
