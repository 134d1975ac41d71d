// extensions/easing.rs
//
// Pure easing and blending functions for per-frame animation.
// No dependencies on Node/Scene, just math.

use std::f32::consts::PI;

/// Easing curve applied to a normalized progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Stronger slow end. Paper layers unfold with this.
    CubicOut,
    /// Springy overshoot that settles on 1.
    ElasticOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped into [0, 1].
    /// ElasticOut overshoots in between but is exactly 0 and 1 at the bounds.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::ElasticOut => {
                const C4: f32 = (2.0 * PI) / 3.0;
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
        }
    }
}

/// `1 - (1-t)²`
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    Easing::QuadOut.apply(t)
}

/// `t²`
#[inline]
pub fn ease_in_quad(t: f32) -> f32 {
    Easing::QuadIn.apply(t)
}

#[inline]
pub fn elastic_out(t: f32) -> f32 {
    Easing::ElasticOut.apply(t)
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values. `t` is not clamped, callers
/// that want overshoot rely on that.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

/// Frame-rate independent blend factor for exponential smoothing.
///
/// Blending by this factor every frame converges at the same wall-clock speed
/// no matter how the frame deltas are sliced, unlike a fixed per-frame fraction.
#[inline]
pub fn time_corrected_blend(damping_rate: f32, dt: f32) -> f32 {
    1.0 - (-damping_rate * dt).exp()
}

/// Linear fade with distance, floored: `max(floor, base - distance * slope)`.
#[inline]
pub fn falloff(distance: f32, base: f32, slope: f32, floor: f32) -> f32 {
    (base - distance * slope).max(floor)
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}
