//! Strength molecule scene - thin controller layer.
//!
//! Routes pointer input to the drag rotation, wheel events to the zoom, node
//! hover to the per-sphere heartbeat, and writes every node each frame.

use glam::{Vec2, Vec3};
use portal_engine::input::queue::{InputEvent, InputQueue};
use portal_engine::{
    DragConfig, DragRotation, Heartbeat, Node, NodeId, Rect, Scene, SceneConfig, SceneContext,
    SceneEvent, SceneManifest, WheelResponse, WheelScale, WheelScaleConfig,
};

use crate::molecule::{self, STRENGTHS};

/// Custom event kinds from the page.
mod events {
    /// a, b: container top-left in canvas pixels.
    pub const CONTAINER_ORIGIN: u32 = 1;
    /// a, b: container width and height.
    pub const CONTAINER_SIZE: u32 = 2;
}

/// Scene event kinds to the page.
mod scene_events {
    /// a: strength index.
    pub const STRENGTH_SELECTED: u32 = 1;
    /// a: strength index, b: 1.0 hovered / 0.0 not.
    pub const HOVER_CHANGED: u32 = 2;
    /// a: strength index, b: colour as 0xRRGGBB. Sent once per sphere on
    /// the first frame after init.
    pub const STRENGTH_COLOR: u32 = 3;
}

fn molecule_wheel() -> WheelScaleConfig {
    WheelScaleConfig {
        initial: 0.6,
        min: 0.4,
        max: 0.9,
        step: 0.0008,
        damping: 8.0,
    }
}

struct Sphere {
    node: NodeId,
    heartbeat: Heartbeat,
}

pub struct StrengthMolecule {
    drag: DragRotation,
    wheel: WheelScale,
    spheres: Vec<Sphere>,
    bonds: Vec<(NodeId, usize, usize)>,
    container_origin: Vec2,
    container_size: Option<Vec2>,
    colors_sent: bool,
}

impl StrengthMolecule {
    pub fn new() -> Self {
        Self {
            drag: DragRotation::new(DragConfig::default()),
            wheel: WheelScale::new(molecule_wheel()),
            spheres: Vec::with_capacity(STRENGTHS.len()),
            bonds: Vec::new(),
            container_origin: Vec2::ZERO,
            container_size: None,
            colors_sent: false,
        }
    }

    fn sphere_index(&self, node: NodeId) -> Option<usize> {
        self.spheres.iter().position(|s| s.node == node)
    }

    fn rescope_wheel(&mut self) {
        let bounds = self
            .container_size
            .map(|size| Rect::new(self.container_origin, self.container_origin + size));
        self.wheel.set_bounds(bounds);
    }

    fn handle_input(&mut self, ctx: &mut SceneContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => self.drag.pointer_down(Vec2::new(x, y)),
                InputEvent::PointerMove { x, y } => self.drag.pointer_move(Vec2::new(x, y)),
                InputEvent::PointerUp { .. } => {
                    self.drag.pointer_up();
                }
                InputEvent::PointerLeave => self.drag.pointer_leave(),
                InputEvent::NodeEnter { node } => self.set_hover(ctx, node, true),
                InputEvent::NodeLeave { node } => self.set_hover(ctx, node, false),
                InputEvent::NodeClick { node } => {
                    let Some(index) = self.sphere_index(node) else { continue };
                    if self.drag.take_click() {
                        log::info!("strength selected: {}", STRENGTHS[index].name);
                        ctx.emit_event(SceneEvent::new(
                            scene_events::STRENGTH_SELECTED,
                            index as f32,
                            0.0,
                            0.0,
                        ));
                    } else {
                        log::debug!("click on {} swallowed after drag", STRENGTHS[index].name);
                    }
                }
                InputEvent::Custom { kind, a, b, .. } => match kind {
                    events::CONTAINER_ORIGIN => {
                        self.container_origin = Vec2::new(a, b);
                        self.rescope_wheel();
                    }
                    events::CONTAINER_SIZE => {
                        self.container_size = Some(Vec2::new(a, b));
                        self.rescope_wheel();
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn set_hover(&mut self, ctx: &mut SceneContext, node: NodeId, hovered: bool) {
        let Some(index) = self.sphere_index(node) else { return };
        let heartbeat = &mut self.spheres[index].heartbeat;
        if heartbeat.is_hovered() == hovered {
            return;
        }
        heartbeat.set_hovered(hovered);
        ctx.emit_event(SceneEvent::new(
            scene_events::HOVER_CHANGED,
            index as f32,
            if hovered { 1.0 } else { 0.0 },
            0.0,
        ));
    }

    fn write_nodes(&self, ctx: &mut SceneContext, rotation: Vec2) {
        let scale = self.wheel.current();
        let tilt = Vec3::new(rotation.x, rotation.y, 0.0);

        for (sphere, strength) in self.spheres.iter().zip(STRENGTHS.iter()) {
            let Some(node) = ctx.nodes.get_mut(sphere.node) else { continue };
            node.position = molecule::to_world(strength.offset, rotation, scale);
            node.rotation = tilt;
            node.scale = strength.radius * scale * sphere.heartbeat.scale();
        }

        for &(id, from, to) in &self.bonds {
            let Some(node) = ctx.nodes.get_mut(id) else { continue };
            node.position = molecule::bond_midpoint(from, to, rotation, scale);
            node.rotation = tilt;
            node.scale = scale;
        }
    }

    /// Runs inside a tick: events emitted during init are cleared before the
    /// host's first read.
    fn send_colors(&mut self, ctx: &mut SceneContext) {
        for (i, strength) in STRENGTHS.iter().enumerate() {
            ctx.emit_event(SceneEvent::new(
                scene_events::STRENGTH_COLOR,
                i as f32,
                strength.color as f32,
                0.0,
            ));
        }
        self.colors_sent = true;
    }

    pub fn rotation(&self) -> Vec2 {
        self.drag.rotation()
    }

    pub fn zoom(&self) -> f32 {
        self.wheel.current()
    }
}

impl Scene for StrengthMolecule {
    fn config(&self) -> SceneConfig {
        SceneConfig {
            max_instances: 16,
            ..SceneConfig::default()
        }
    }

    /// Missing overrides fall back to the defaults, so a reloaded manifest
    /// does not keep the previous one's tuning.
    fn configure(&mut self, manifest: &SceneManifest) {
        self.wheel = WheelScale::new(manifest.wheel.unwrap_or_else(molecule_wheel));
        self.rescope_wheel();
        self.drag = DragRotation::new(manifest.drag.unwrap_or_default());
    }

    fn init(&mut self, ctx: &mut SceneContext) {
        self.spheres.clear();
        self.bonds.clear();

        for strength in STRENGTHS.iter() {
            let id = ctx.next_id();
            ctx.nodes.spawn(
                Node::new(id)
                    .with_tag(format!("strength:{}", strength.name))
                    .with_position(molecule::to_world(strength.offset, Vec2::ZERO, self.wheel.current()))
                    .with_scale(strength.radius * self.wheel.current())
                    .interactive(),
            );
            self.spheres.push(Sphere { node: id, heartbeat: Heartbeat::new() });
        }
        self.colors_sent = false;

        for (from, to) in molecule::bonds() {
            let id = ctx.next_id();
            ctx.nodes.spawn(Node::new(id).with_tag(format!("bond:{}", to)));
            self.bonds.push((id, from, to));
        }

        log::info!("molecule: {} spheres, {} bonds", self.spheres.len(), self.bonds.len());
    }

    fn update(&mut self, ctx: &mut SceneContext, input: &InputQueue) {
        if !self.colors_sent {
            self.send_colors(ctx);
        }
        self.handle_input(ctx, input);

        let time = ctx.time;
        let rotation = self.drag.tick();
        self.wheel.tick(time.delta);
        for sphere in &mut self.spheres {
            sphere.heartbeat.tick(time.elapsed);
        }

        self.write_nodes(ctx, rotation);
    }

    fn wheel(&mut self, _ctx: &mut SceneContext, delta_y: f32, x: f32, y: f32) -> WheelResponse {
        self.wheel.on_wheel(delta_y, Vec2::new(x, y))
    }
}
