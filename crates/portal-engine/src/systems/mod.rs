pub mod character;
pub mod dialogue;
pub mod drag_rotation;
pub mod guide;
pub mod guide_channel;
pub mod heartbeat;
pub mod paper_layer;
pub mod portal;
pub mod render;
pub mod tilt;
pub mod wheel_scale;
