use crate::components::node::Node;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from the scene's nodes, in store order.
/// Inactive nodes are skipped.
pub fn build_render_buffer<'a>(nodes: impl Iterator<Item = &'a Node>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for node in nodes.filter(|n| n.active) {
        buffer.push(RenderInstance {
            node: node.id.0 as f32,
            x: node.position.x,
            y: node.position.y,
            z: node.position.z,
            rot_x: node.rotation.x,
            rot_y: node.rotation.y,
            rot_z: node.rotation.z,
            scale: node.scale,
            opacity: node.opacity,
            texture: node.texture.map_or(-1.0, |t| t.0 as f32),
            interactive: if node.interactive { 1.0 } else { 0.0 },
            _pad: 0.0,
        });
    }
}
