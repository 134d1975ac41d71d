// extensions/smoothing.rs
//
// A value with a `current` that chases a `target` every frame.

use glam::{Vec2, Vec3};

use super::easing::time_corrected_blend;

/// Anything that can be blended linearly and measured.
pub trait Blend: Copy {
    fn blend(self, target: Self, t: f32) -> Self;
    fn distance(self, other: Self) -> f32;
}

impl Blend for f32 {
    #[inline]
    fn blend(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }

    #[inline]
    fn distance(self, other: Self) -> f32 {
        (self - other).abs()
    }
}

impl Blend for Vec2 {
    #[inline]
    fn blend(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }

    #[inline]
    fn distance(self, other: Self) -> f32 {
        self.distance(other)
    }
}

impl Blend for Vec3 {
    #[inline]
    fn blend(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }

    #[inline]
    fn distance(self, other: Self) -> f32 {
        self.distance(other)
    }
}

/// A smoothed scalar or vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed<T: Blend> {
    pub current: T,
    pub target: T,
}

impl<T: Blend> Smoothed<T> {
    pub fn new(value: T) -> Self {
        Self { current: value, target: value }
    }

    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Exponential, frame-rate independent follow. The blend factor stays in
    /// [0, 1) for finite input, so `current` never passes `target`.
    pub fn follow(&mut self, damping_rate: f32, dt: f32) -> T {
        let t = time_corrected_blend(damping_rate, dt.max(0.0)).clamp(0.0, 1.0);
        self.current = self.current.blend(self.target, t);
        self.current
    }

    /// Fixed fraction per call. Frame-rate dependent: only for purely cosmetic
    /// followers that are ticked once per rendered frame.
    pub fn approach(&mut self, factor: f32) -> T {
        self.current = self.current.blend(self.target, factor);
        self.current
    }

    pub fn is_settled(&self, eps: f32) -> bool {
        self.current.distance(self.target) <= eps
    }
}

impl<T: Blend + Default> Default for Smoothed<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_strictly_approaches_without_overshoot() {
        let mut v = Smoothed::new(0.0_f32);
        v.set_target(1.0);
        let mut last_gap = 1.0;
        for _ in 0..60 {
            v.follow(8.0, 1.0 / 60.0);
            let gap = 1.0 - v.current;
            assert!(gap >= 0.0, "overshot: {}", v.current);
            assert!(gap < last_gap);
            last_gap = gap;
        }
    }

    #[test]
    fn converges_within_predicted_ticks() {
        let damping = 8.0;
        let dt = 1.0 / 60.0;
        let eps: f32 = 1e-3;
        let keep = 1.0 - time_corrected_blend(damping, dt);
        let predicted = (eps.ln() / keep.ln()).floor() as usize + 1;

        let mut v = Smoothed::new(0.0_f32);
        v.set_target(1.0);
        for _ in 0..predicted {
            v.follow(damping, dt);
        }
        assert!(v.is_settled(eps), "gap after {} ticks: {}", predicted, 1.0 - v.current);
    }

    #[test]
    fn frame_rate_independent() {
        let damping = 6.0;
        let total = 0.5;

        let mut fine = Smoothed::new(Vec3::ZERO);
        fine.set_target(Vec3::new(2.0, -1.0, 4.0));
        let steps = 240;
        for _ in 0..steps {
            fine.follow(damping, total / steps as f32);
        }

        let mut coarse = Smoothed::new(Vec3::ZERO);
        coarse.set_target(Vec3::new(2.0, -1.0, 4.0));
        coarse.follow(damping, total);

        assert!(fine.current.distance(coarse.current) < 1e-3);
    }

    #[test]
    fn approach_is_fixed_fraction() {
        let mut v = Smoothed::new(Vec2::ZERO);
        v.set_target(Vec2::new(10.0, 0.0));
        v.approach(0.1);
        assert!((v.current.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_is_identity() {
        let mut v = Smoothed::new(3.0_f32);
        v.set_target(5.0);
        v.follow(8.0, 0.0);
        assert_eq!(v.current, 3.0);
    }
}
