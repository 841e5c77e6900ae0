//! Leading and trailing throttle for high-frequency edits.
//!
//! Pure timing: callers pass `Instant`s in, so it runs the same under a
//! tokio loop or in a test.

use std::time::{Duration, Instant};

/// Default throttle window for slider and picker drags.
pub const THROTTLE_MS: u64 = 100;

/// Emits the first value of a burst at once and the latest one when the
/// window closes. Intermediate values are dropped.
#[derive(Debug)]
pub struct Throttle<T> {
    window: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Default for Throttle<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(THROTTLE_MS))
    }
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_emit: None,
            pending: None,
        }
    }

    /// Offer a value. Returns it straight back if the window is open.
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        if self.is_open(now) {
            self.last_emit = Some(now);
            self.pending = None;
            return Some(value);
        }
        self.pending = Some(value);
        None
    }

    /// Release the pending value once the window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_none() || !self.is_open(now) {
            return None;
        }
        self.last_emit = Some(now);
        self.pending.take()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_emit) {
            (Some(_), Some(last)) => Some(last + self.window),
            _ => None,
        }
    }

    /// Take the pending value regardless of timing.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Nothing pending and the window has closed, so the throttle holds no
    /// state worth keeping.
    pub fn is_idle(&self, now: Instant) -> bool {
        self.pending.is_none() && self.is_open(now)
    }

    fn is_open(&self, now: Instant) -> bool {
        match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_edge_passes() {
        let mut throttle = Throttle::default();
        let t0 = Instant::now();
        assert_eq!(throttle.offer(1, t0), Some(1));
        assert!(!throttle.has_pending());
    }

    #[test]
    fn test_trailing_edge_keeps_latest() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let t0 = Instant::now();

        assert_eq!(throttle.offer(1, t0), Some(1));
        assert_eq!(throttle.offer(2, t0 + Duration::from_millis(10)), None);
        assert_eq!(throttle.offer(3, t0 + Duration::from_millis(20)), None);
        assert_eq!(throttle.deadline(), Some(t0 + Duration::from_millis(100)));

        assert_eq!(throttle.poll(t0 + Duration::from_millis(50)), None);
        assert_eq!(throttle.poll(t0 + Duration::from_millis(100)), Some(3));
        assert_eq!(throttle.poll(t0 + Duration::from_millis(300)), None);
    }

    #[test]
    fn test_window_reopens() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let t0 = Instant::now();

        throttle.offer("a", t0);
        assert_eq!(throttle.offer("b", t0 + Duration::from_millis(150)), Some("b"));
    }

    #[test]
    fn test_flush() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let t0 = Instant::now();
        throttle.offer(1, t0);
        throttle.offer(2, t0);

        assert_eq!(throttle.flush(), Some(2));
        assert_eq!(throttle.flush(), None);
    }

    #[test]
    fn test_idle_after_window() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let t0 = Instant::now();
        assert!(throttle.is_idle(t0));

        throttle.offer(1, t0);
        throttle.offer(2, t0 + Duration::from_millis(10));
        assert!(!throttle.is_idle(t0 + Duration::from_millis(200)));

        assert_eq!(throttle.poll(t0 + Duration::from_millis(100)), Some(2));
        assert!(!throttle.is_idle(t0 + Duration::from_millis(150)));
        assert!(throttle.is_idle(t0 + Duration::from_millis(200)));
    }
}
