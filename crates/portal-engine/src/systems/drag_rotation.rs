// systems/drag_rotation.rs
//
// Pointer-drag rotation with inertia and a spring back to rest.
// Physics runs once per rendered frame; the rendered rotation is a separate
// follower so the visual stays smooth even when the physics snaps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::extensions::smoothing::Smoothed;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Radians of rotation per pixel of pointer travel.
    pub sensitivity: f32,
    /// Travel (px) at or above which a gesture counts as a drag, not a click.
    pub click_threshold: f32,
    /// Per-frame velocity retention after release.
    pub inertia_damping: f32,
    /// Pull toward zero rotation per frame.
    pub spring_stiffness: f32,
    /// Damping applied to velocity after the spring force.
    pub spring_damping: f32,
    /// Below this on both axes, rotation and velocity snap to exactly zero.
    pub rest_epsilon: f32,
    /// Per-frame lerp factor of the rendered follower.
    pub follow_factor: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.01,
            click_threshold: 5.0,
            inertia_damping: 0.95,
            spring_stiffness: 0.02,
            spring_damping: 0.9,
            rest_epsilon: 1e-3,
            follow_factor: 0.12,
        }
    }
}

/// Rotation is stored as (x, y) Euler angles: pointer X travel turns around
/// the Y axis, pointer Y travel around the X axis.
pub struct DragRotation {
    config: DragConfig,
    rotation: Vec2,
    velocity: Vec2,
    rendered: Smoothed<Vec2>,
    dragging: bool,
    last_pointer: Vec2,
    drag_start: Vec2,
    total_drag_distance: f32,
    /// Set once travel crosses the threshold; the next click is swallowed.
    suppress_click: bool,
}

impl DragRotation {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            rotation: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rendered: Smoothed::new(Vec2::ZERO),
            dragging: false,
            last_pointer: Vec2::ZERO,
            drag_start: Vec2::ZERO,
            total_drag_distance: 0.0,
            suppress_click: false,
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.dragging = true;
        self.drag_start = pos;
        self.last_pointer = pos;
        self.total_drag_distance = 0.0;
        self.velocity = Vec2::ZERO;
        self.suppress_click = false;
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if !self.dragging {
            return;
        }
        let delta = pos - self.last_pointer;
        self.last_pointer = pos;
        self.total_drag_distance += delta.length();

        // Screen X moves yaw (rotation.y), screen Y moves pitch (rotation.x).
        self.velocity = Vec2::new(delta.y, delta.x) * self.config.sensitivity;
        self.rotation += self.velocity;

        if self.total_drag_distance >= self.config.click_threshold {
            self.suppress_click = true;
        }
    }

    /// Release: inertia and spring take over on the next tick.
    /// Returns true when the gesture was a drag.
    pub fn pointer_up(&mut self) -> bool {
        if !self.dragging {
            return false;
        }
        self.dragging = false;
        log::debug!(
            "drag released after {:.1}px from {:?}, velocity {:?}",
            self.total_drag_distance,
            self.drag_start,
            self.velocity
        );
        self.suppress_click
    }

    /// Pointer left the surface mid-drag; treated as a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Decide whether a click following the gesture is honoured.
    /// After a drag the click is swallowed once and the flag cleared.
    pub fn take_click(&mut self) -> bool {
        if self.suppress_click {
            self.suppress_click = false;
            false
        } else {
            true
        }
    }

    /// One physics frame plus the rendered follower. Returns the rendered rotation.
    pub fn tick(&mut self) -> Vec2 {
        if !self.dragging && !self.is_at_rest() {
            let cfg = &self.config;
            self.velocity *= cfg.inertia_damping;
            let spring = -self.rotation * cfg.spring_stiffness;
            self.velocity = (self.velocity + spring) * cfg.spring_damping;
            self.rotation += self.velocity;

            let eps = cfg.rest_epsilon;
            let settled = self.rotation.abs().max_element() < eps && self.velocity.abs().max_element() < eps;
            if settled {
                self.rotation = Vec2::ZERO;
                self.velocity = Vec2::ZERO;
            }
        }

        self.rendered.set_target(self.rotation);
        self.rendered.approach(self.config.follow_factor)
    }

    pub fn is_at_rest(&self) -> bool {
        self.rotation == Vec2::ZERO && self.velocity == Vec2::ZERO
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn rendered(&self) -> Vec2 {
        self.rendered.current
    }
}

impl Default for DragRotation {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_gesture_is_a_click() {
        let mut drag = DragRotation::default();
        drag.pointer_down(Vec2::new(100.0, 100.0));
        drag.pointer_move(Vec2::new(102.0, 101.0));
        assert!(!drag.pointer_up());
        assert!(drag.take_click());
    }

    #[test]
    fn long_gesture_suppresses_click_and_keeps_velocity() {
        let mut drag = DragRotation::default();
        drag.pointer_down(Vec2::new(100.0, 100.0));
        drag.pointer_move(Vec2::new(104.0, 100.0));
        drag.pointer_move(Vec2::new(120.0, 100.0));
        assert!(drag.pointer_up());
        assert_ne!(drag.velocity(), Vec2::ZERO);
        assert!(!drag.take_click());
        // Swallowed once only.
        assert!(drag.take_click());
    }

    #[test]
    fn drag_rotates_about_the_perpendicular_axis() {
        let mut drag = DragRotation::default();
        drag.pointer_down(Vec2::ZERO);
        drag.pointer_move(Vec2::new(50.0, 0.0));
        assert!(drag.rotation().y > 0.0);
        assert_eq!(drag.rotation().x, 0.0);
    }

    #[test]
    fn spring_returns_to_exact_rest_and_stays() {
        let mut drag = DragRotation::default();
        drag.pointer_down(Vec2::ZERO);
        drag.pointer_move(Vec2::new(40.0, -25.0));
        drag.pointer_move(Vec2::new(90.0, -60.0));
        drag.pointer_up();

        let mut frames = 0;
        while !drag.is_at_rest() {
            drag.tick();
            frames += 1;
            assert!(frames < 10_000, "never came to rest");
        }
        assert_eq!(drag.rotation(), Vec2::ZERO);
        assert_eq!(drag.velocity(), Vec2::ZERO);

        for _ in 0..500 {
            drag.tick();
            assert_eq!(drag.rotation(), Vec2::ZERO);
            assert_eq!(drag.velocity(), Vec2::ZERO);
        }
    }

    #[test]
    fn no_physics_while_dragging() {
        let mut drag = DragRotation::default();
        drag.pointer_down(Vec2::ZERO);
        drag.pointer_move(Vec2::new(30.0, 0.0));
        let held = drag.rotation();
        for _ in 0..10 {
            drag.tick();
        }
        assert_eq!(drag.rotation(), held);
    }

    #[test]
    fn rendered_lags_behind_physics() {
        let mut drag = DragRotation::default();
        drag.pointer_down(Vec2::ZERO);
        drag.pointer_move(Vec2::new(100.0, 0.0));
        let rendered = drag.tick();
        assert!(rendered.y > 0.0 && rendered.y < drag.rotation().y);
    }

    #[test]
    fn leave_counts_as_release() {
        let mut drag = DragRotation::default();
        drag.pointer_down(Vec2::ZERO);
        drag.pointer_leave();
        assert!(!drag.is_dragging());
    }
}
