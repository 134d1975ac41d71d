/// Snapshot of the animation clock for one rendered frame.
/// All durations in the engine are seconds measured against `elapsed`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the scene started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

/// Monotonic clock advanced once per host frame callback.
///
/// Elapsed time accumulates in f64 so a page left open for hours still
/// advances by whole frame steps; systems read it as f32.
pub struct FrameClock {
    elapsed: f64,
    last_delta: f32,
    /// Largest delta accepted per frame.
    max_delta: f32,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            elapsed: 0.0,
            last_delta: 0.0,
            max_delta,
        }
    }

    /// Advance by the host's frame delta and return the new snapshot.
    /// Negative or non-finite deltas count as zero; large ones are capped so
    /// a backgrounded tab does not teleport every animation on return.
    pub fn advance(&mut self, frame_dt: f32) -> FrameTime {
        let dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, self.max_delta) } else { 0.0 };
        self.elapsed += f64::from(dt);
        self.last_delta = dt;
        self.now()
    }

    pub fn now(&self) -> FrameTime {
        FrameTime {
            elapsed: self.elapsed as f32,
            delta: self.last_delta,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}
