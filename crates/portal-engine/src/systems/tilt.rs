// systems/tilt.rs
//
// Whole-character tilt toward the pointer.

use glam::Vec2;

use crate::extensions::smoothing::Smoothed;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltConfig {
    /// Largest tilt in radians.
    pub max_tilt: f32,
    /// Per-frame follow while active.
    pub follow_factor: f32,
    /// Per-frame return to level while inactive.
    pub release_factor: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_tilt: 0.15,
            follow_factor: 0.05,
            release_factor: 0.1,
        }
    }
}

pub struct Tilt {
    config: TiltConfig,
    tilt: Smoothed<Vec2>,
}

impl Tilt {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            tilt: Smoothed::new(Vec2::ZERO),
        }
    }

    /// `pointer` is normalized to [-1, 1], y up. Returns (rot_x, rot_y).
    pub fn tick(&mut self, pointer: Vec2, active: bool) -> Vec2 {
        if active {
            self.tilt.set_target(Vec2::new(-pointer.y, pointer.x) * self.config.max_tilt);
            self.tilt.approach(self.config.follow_factor)
        } else {
            self.tilt.set_target(Vec2::ZERO);
            self.tilt.approach(self.config.release_factor)
        }
    }

    pub fn current(&self) -> Vec2 {
        self.tilt.current
    }
}

impl Default for Tilt {
    fn default() -> Self {
        Self::new(TiltConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_pointer_when_active() {
        let mut tilt = Tilt::default();
        for _ in 0..400 {
            tilt.tick(Vec2::new(1.0, 1.0), true);
        }
        let t = tilt.current();
        assert!((t.x + 0.15).abs() < 1e-3);
        assert!((t.y - 0.15).abs() < 1e-3);
    }

    #[test]
    fn levels_out_when_inactive() {
        let mut tilt = Tilt::default();
        for _ in 0..100 {
            tilt.tick(Vec2::new(1.0, 0.0), true);
        }
        for _ in 0..200 {
            tilt.tick(Vec2::new(1.0, 0.0), false);
        }
        assert!(tilt.current().length() < 1e-4);
    }
}
