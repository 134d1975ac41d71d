use bytemuck::{Pod, Zeroable};

/// Per-node transform data read by the host renderer each frame.
/// Must match the JS protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Node id, so the host can map the slot onto its own object.
    pub node: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub opacity: f32,
    /// Texture index, or -1.0 when the node keeps its material map.
    pub texture: f32,
    /// 1.0 when the node accepts pointer events.
    pub interactive: f32,
    pub _pad: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Flat buffer of node transforms for the current frame.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for zero-copy reads from JS.
    pub fn instances_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<RenderInstance, f32>(&self.instances).as_ptr()
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_instance_is_12_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), RenderInstance::STRIDE_BYTES);
        assert_eq!(RenderInstance::FLOATS, 12);
    }

    #[test]
    fn render_buffer_push_and_count() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance::default());
        buf.push(RenderInstance::default());
        assert_eq!(buf.instance_count(), 2);
    }

    #[test]
    fn floats_are_laid_out_in_order() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance { node: 7.0, x: 1.0, scale: 2.0, ..Default::default() });
        let floats: &[f32] = bytemuck::cast_slice(&buf.instances);
        assert_eq!(floats[0], 7.0);
        assert_eq!(floats[1], 1.0);
        assert_eq!(floats[7], 2.0);
    }
}
