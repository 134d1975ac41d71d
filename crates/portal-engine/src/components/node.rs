use glam::Vec3;
use crate::api::types::{NodeId, TextureId};

/// Fat scene node: one struct with every transform field a decorative
/// widget needs. The host mirrors these onto its own scene graph each frame.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// String tag for finding nodes by name.
    pub tag: String,
    /// Inactive nodes are skipped by the render buffer.
    pub active: bool,
    /// Position in world space.
    pub position: Vec3,
    /// Euler rotation (XYZ order) in radians.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
    /// 0.0 = invisible, 1.0 = opaque.
    pub opacity: f32,
    /// Texture bound to the node's material, if any.
    pub texture: Option<TextureId>,
    /// Whether the host should deliver pointer events for this node.
    pub interactive: bool,
}

impl Node {
    /// Create a new node at the origin.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            opacity: 1.0,
            texture: None,
            interactive: false,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }
}
