// systems/heartbeat.rs
//
// Hover pulse for the molecule spheres.

use crate::extensions::easing::lerp;

/// Pulse amplitude on top of 1.0 (peak scale 1.15).
const PULSE_AMPLITUDE: f32 = 0.15;
/// Pulse angular speed in rad/s.
const PULSE_SPEED: f32 = 8.0;
/// Per-frame decay back to 1.0 once the pointer leaves.
const RELAX_FACTOR: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Heartbeat {
    hovered: bool,
    scale: f32,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self {
            hovered: false,
            scale: 1.0,
        }
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Scale for this frame, given the clock's elapsed time.
    pub fn tick(&mut self, elapsed: f32) -> f32 {
        self.scale = if self.hovered {
            1.0 + PULSE_AMPLITUDE * (0.5 + 0.5 * (elapsed * PULSE_SPEED).sin())
        } else {
            lerp(self.scale, 1.0, RELAX_FACTOR)
        };
        self.scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulses_within_range_while_hovered() {
        let mut hb = Heartbeat::new();
        hb.set_hovered(true);
        let mut t = 0.0;
        let mut max: f32 = 1.0;
        for _ in 0..240 {
            t += 1.0 / 60.0;
            let s = hb.tick(t);
            assert!((1.0..=1.15 + 1e-6).contains(&s), "scale {}", s);
            max = max.max(s);
        }
        assert!(max > 1.1);
    }

    #[test]
    fn relaxes_back_to_one() {
        let mut hb = Heartbeat::new();
        hb.set_hovered(true);
        hb.tick(0.2);
        hb.set_hovered(false);
        let mut last = hb.scale();
        for i in 0..200 {
            let s = hb.tick(0.2 + i as f32 / 60.0);
            assert!(s <= last);
            last = s;
        }
        assert!((last - 1.0).abs() < 1e-4);
    }
}
