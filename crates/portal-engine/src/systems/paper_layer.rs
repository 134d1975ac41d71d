// systems/paper_layer.rs
//
// One cut-paper sheet of the portal tunnel. Unfolds toward the viewer when
// its layer is expanded, bobs gently while folded.

use crate::components::node::Node;
use crate::core::time::FrameTime;
use crate::extensions::easing::{lerp, Easing};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerConfig {
    /// Depth gap between neighbouring folded sheets.
    pub spacing: f32,
    /// Unfold speed, progress per second.
    pub unfold_rate: f32,
    /// Fold speed, progress per second.
    pub fold_rate: f32,
    /// Per-frame blend of the rendered transform toward its target.
    pub follow_factor: f32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            spacing: 2.5,
            unfold_rate: 1.2,
            fold_rate: 2.0,
            follow_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPose {
    pub y: f32,
    pub z: f32,
    pub rotation_z: f32,
    pub scale: f32,
}

pub struct PaperLayer {
    index: usize,
    base_z: f32,
    config: LayerConfig,
    /// Raw unfold progress in [0, 1].
    progress: f32,
    rotation_z: f32,
    z: f32,
    scale: f32,
    pose: LayerPose,
    expanded: bool,
}

impl PaperLayer {
    pub fn new(index: usize, config: LayerConfig) -> Self {
        let base_z = -(index as f32) * config.spacing;
        Self {
            index,
            base_z,
            config,
            progress: 0.0,
            rotation_z: 0.0,
            z: base_z,
            scale: 1.0,
            pose: LayerPose { y: 0.0, z: base_z, rotation_z: 0.0, scale: 1.0 },
            expanded: false,
        }
    }

    /// Layers are stacked as `count` sheets with the default spacing.
    pub fn stack(count: usize, config: LayerConfig) -> Vec<PaperLayer> {
        (0..count).map(|i| PaperLayer::new(i, config)).collect()
    }

    pub fn tick(&mut self, time: &FrameTime, expanded: bool) -> LayerPose {
        self.expanded = expanded;
        let cfg = self.config;
        let i = self.index as f32;

        self.progress = if expanded {
            (self.progress + time.delta * cfg.unfold_rate).min(1.0)
        } else {
            (self.progress - time.delta * cfg.fold_rate).max(0.0)
        };
        let p = Easing::CubicOut.apply(self.progress);

        let target_rotation = i * 0.05 * p;
        let target_z = self.base_z - i * 1.5 * p;
        let target_scale = 1.0 + (1.5 + i * 0.1) * p;

        let f = cfg.follow_factor;
        self.rotation_z = lerp(self.rotation_z, target_rotation, f);
        self.z = lerp(self.z, target_z, f);
        self.scale = lerp(self.scale, target_scale, f);

        let (y, z) = if expanded {
            (self.pose.y, self.z)
        } else {
            let t = time.elapsed;
            let bounce = (t * 1.5 + i * 0.5).sin() * 0.03;
            let float = (t * 0.8 + i * 0.3).cos() * 0.02;
            (bounce, self.z + float)
        };

        self.pose = LayerPose { y, z, rotation_z: self.rotation_z, scale: self.scale };
        self.pose
    }

    pub fn apply_to(&self, node: &mut Node) {
        node.position.y = self.pose.y;
        node.position.z = self.pose.z;
        node.rotation.z = self.pose.rotation_z;
        node.scale = self.pose.scale;
    }

    /// The glowing star rim only shows on an unfolded sheet.
    pub fn neon_visible(&self) -> bool {
        self.expanded
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn base_z(&self) -> f32 {
        self.base_z
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn pose(&self) -> LayerPose {
        self.pose
    }
}
