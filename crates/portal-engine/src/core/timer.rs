// core/timer.rs
//
// Delayed payloads drained against the frame clock.

/// Fire-once delayed payloads ordered by due time.
///
/// Stands in for the host's `setTimeout`: the runner drains due entries each
/// frame against the animation clock. Entries cannot be cancelled one by one;
/// payloads that may go stale carry their own generation and are checked by
/// whoever handles them.
#[derive(Debug)]
pub struct TimerQueue<T> {
    pending: Vec<Timer<T>>,
    next_seq: u64,
}

#[derive(Debug)]
struct Timer<T> {
    due: f32,
    seq: u64,
    payload: T,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire `delay` seconds after `now`.
    pub fn schedule(&mut self, now: f32, delay: f32, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer {
            due: now + delay.max(0.0),
            seq,
            payload,
        });
    }

    /// Remove and return every payload due at `now`, earliest first.
    /// Equal due times come out in scheduling order.
    pub fn drain_due(&mut self, now: f32) -> Vec<T> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|t| t.due <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|t| t.payload).collect()
    }

    /// Drop everything pending (scene teardown).
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
