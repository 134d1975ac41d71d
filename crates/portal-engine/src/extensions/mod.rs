// extensions/mod.rs
//
// Math helpers shared by every system: easing, smoothing, throttling.
// Decoupled from Node/Scene; systems opt in by importing them.

pub mod easing;
pub mod smoothing;
pub mod throttle;

pub use easing::{
    Easing, clamp, ease, ease_in_quad, ease_out_quad, elastic_out, falloff, lerp,
    time_corrected_blend,
};
pub use smoothing::{Blend, Smoothed};
pub use throttle::Throttle;
