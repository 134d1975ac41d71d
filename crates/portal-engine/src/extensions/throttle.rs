// extensions/throttle.rs
//
// Leading-edge throttle measured against the frame clock.

/// Lets one call through, then swallows further calls until `limit`
/// seconds have passed.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: f32,
    last_fired: Option<f32>,
}

impl Throttle {
    pub fn new(limit: f32) -> Self {
        Self { limit, last_fired: None }
    }

    /// Returns true if the call at `now` should run.
    pub fn try_fire(&mut self, now: f32) -> bool {
        match self.last_fired {
            Some(last) if now - last < self.limit => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swallows_within_window() {
        let mut t = Throttle::new(0.3);
        assert!(t.try_fire(1.0));
        assert!(!t.try_fire(1.1));
        assert!(!t.try_fire(1.29));
        assert!(t.try_fire(1.31));
    }

    #[test]
    fn reset_reopens() {
        let mut t = Throttle::new(0.3);
        assert!(t.try_fire(0.0));
        t.reset();
        assert!(t.try_fire(0.01));
    }
}
