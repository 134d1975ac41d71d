// systems/wheel_scale.rs
//
// Mouse wheel → clamped target scale, smoothed toward once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::node::Node;
use crate::extensions::easing::clamp;
use crate::extensions::smoothing::Smoothed;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelScaleConfig {
    pub initial: f32,
    pub min: f32,
    pub max: f32,
    /// Scale change per unit of wheel `deltaY`.
    pub step: f32,
    /// Exponential damping rate for the per-frame follow.
    pub damping: f32,
}

impl Default for WheelScaleConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            min: 0.7,
            max: 1.8,
            step: 0.0008,
            damping: 8.0,
        }
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// What the host should do with the wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelResponse {
    /// The scale changed; the host calls `preventDefault`.
    Consumed,
    /// Let the page scroll.
    PassThrough,
}

pub struct WheelScale {
    config: WheelScaleConfig,
    scale: Smoothed<f32>,
    /// Container the wheel is scoped to. `None` listens everywhere.
    bounds: Option<Rect>,
}

impl WheelScale {
    pub fn new(config: WheelScaleConfig) -> Self {
        let initial = clamp(config.initial, config.min, config.max);
        Self {
            config,
            scale: Smoothed::new(initial),
            bounds: None,
        }
    }

    /// Only react to wheel events whose pointer is inside `bounds`;
    /// `None` listens everywhere.
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    /// Apply a wheel event. Positive `delta_y` zooms out.
    ///
    /// At a limit, a push further past it passes through so the page keeps
    /// scrolling instead of getting stuck on a maxed-out zoom.
    pub fn on_wheel(&mut self, delta_y: f32, pointer: Vec2) -> WheelResponse {
        if let Some(bounds) = self.bounds {
            if !bounds.contains(pointer) {
                return WheelResponse::PassThrough;
            }
        }

        let target = self.scale.target;
        let at_min = target <= self.config.min && delta_y > 0.0;
        let at_max = target >= self.config.max && delta_y < 0.0;
        if at_min || at_max || delta_y == 0.0 {
            return WheelResponse::PassThrough;
        }

        self.scale.target = clamp(target - delta_y * self.config.step, self.config.min, self.config.max);
        WheelResponse::Consumed
    }

    /// Advance the smoothed scale by one frame.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.scale.follow(self.config.damping, dt)
    }

    /// Write the current scale straight onto a node.
    pub fn apply_to(&self, node: &mut Node) {
        node.scale = self.scale.current;
    }

    pub fn current(&self) -> f32 {
        self.scale.current
    }

    pub fn target(&self) -> f32 {
        self.scale.target
    }

    pub fn config(&self) -> &WheelScaleConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::NodeId;

    fn molecule_config() -> WheelScaleConfig {
        WheelScaleConfig {
            initial: 0.6,
            min: 0.4,
            max: 0.9,
            step: 0.0008,
            damping: 8.0,
        }
    }

    #[test]
    fn target_never_leaves_bounds() {
        let mut wheel = WheelScale::new(molecule_config());
        let deltas = [-900.0, -50.0, 3000.0, 12.5, -0.1, 400.0, -10_000.0, 999.0, 1.0, -1.0];
        for (i, d) in deltas.iter().cycle().take(200).enumerate() {
            wheel.on_wheel(*d * (1.0 + (i % 7) as f32), Vec2::ZERO);
            assert!(wheel.target() >= 0.4 && wheel.target() <= 0.9, "target {}", wheel.target());
        }
    }

    #[test]
    fn scroll_passes_through_at_limits() {
        let mut wheel = WheelScale::new(molecule_config());
        assert_eq!(wheel.on_wheel(-10_000.0, Vec2::ZERO), WheelResponse::Consumed);
        assert_eq!(wheel.target(), 0.9);
        // Further zoom-in is handed back to the page.
        assert_eq!(wheel.on_wheel(-100.0, Vec2::ZERO), WheelResponse::PassThrough);
        // Zooming back out is still ours.
        assert_eq!(wheel.on_wheel(100.0, Vec2::ZERO), WheelResponse::Consumed);
    }

    #[test]
    fn events_outside_container_are_ignored() {
        let mut wheel = WheelScale::new(molecule_config());
        wheel.set_bounds(Some(Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0))));
        assert_eq!(wheel.on_wheel(-100.0, Vec2::new(150.0, 50.0)), WheelResponse::PassThrough);
        assert_eq!(wheel.target(), 0.6);
        assert_eq!(wheel.on_wheel(-100.0, Vec2::new(50.0, 50.0)), WheelResponse::Consumed);
        assert!(wheel.target() > 0.6);
    }

    #[test]
    fn tick_smooths_toward_target_and_applies() {
        let mut wheel = WheelScale::new(molecule_config());
        wheel.on_wheel(-250.0, Vec2::ZERO);
        let target = wheel.target();
        let first = wheel.tick(1.0 / 60.0);
        assert!(first > 0.6 && first < target);
        for _ in 0..300 {
            wheel.tick(1.0 / 60.0);
        }
        assert!((wheel.current() - target).abs() < 1e-4);

        let mut node = Node::new(NodeId(1));
        wheel.apply_to(&mut node);
        assert_eq!(node.scale, wheel.current());
    }
}
